//! Code execution sandboxes
//!
//! Provides [`LocalPythonExecutor`], which implements the
//! [`CodeExecutorPort`](council_application::CodeExecutorPort) by running the
//! generated script with a local interpreter in a throwaway directory.

mod local_python;

pub use local_python::{LocalPythonExecutor, SandboxSettings};
