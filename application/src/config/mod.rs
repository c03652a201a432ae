//! Application-level configuration.
//!
//! - [`CouncilConfig`]: which model runs each stage, at which temperature
//! - [`CallProfile`]: per-call token and time limits

pub mod call_profile;
pub mod council_config;

pub use call_profile::CallProfile;
pub use council_config::CouncilConfig;
