//! Dataset loading

mod loader;

pub use loader::{DatasetError, load_dataset};
