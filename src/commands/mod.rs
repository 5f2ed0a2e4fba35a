//! Command implementations

pub mod args;
pub mod fingerprint;
pub mod subproject;
