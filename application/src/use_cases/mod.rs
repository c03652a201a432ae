//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod audit_trail;
pub mod completion_client;
pub mod orchestrator;
pub mod run_pipeline;
