//! Output formatting and artifact export

pub mod artifacts;
pub mod console;
