//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation, validation, and reserved words

pub mod code_generator;
