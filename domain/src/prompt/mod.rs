//! Prompt domain
//!
//! System and user templates for every pipeline stage.

mod template;

pub use template::{PromptTemplate, WritingInputs};
