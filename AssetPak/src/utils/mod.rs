//! Utility functions

pub mod path;

pub use path::{absolute, clean_path, normalize_path};
