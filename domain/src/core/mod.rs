//! Core domain concepts shared across all subdomains.
//!
//! - [`model::ModelKey`] / [`model::ModelSpec`]: the model registry and pricing
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: small text helpers

pub mod error;
pub mod model;
pub mod string;
