//! Domain layer containing business entities and the contracts of external
//! collaborators.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (links, uploaded files)
//! - [`repositories`] - Link store contract implemented by the infrastructure layer
//! - [`storage`] - Remote object-storage contract and its error taxonomy
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.
//! Business logic lives in [`crate::application::services`].

pub mod entities;
pub mod repositories;
pub mod storage;
