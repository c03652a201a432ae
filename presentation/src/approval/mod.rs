//! Terminal approval gate

pub mod interactive;
