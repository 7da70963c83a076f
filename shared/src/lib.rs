//! APIBoy Shared Library
//!
//! This crate contains the document models, operation inputs/outputs and
//! validation rules shared between the backend and its clients.

pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use models::*;
pub use types::*;
