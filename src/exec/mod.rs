//! External process execution

pub mod subprocess;
pub mod tools;

pub use tools::{ExternalTools, SystemTools};
