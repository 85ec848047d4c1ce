//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Link store implementations (PostgreSQL and in-memory)
//! - [`storage`] - Remote object-storage client

pub mod persistence;
pub mod storage;
