//! Remote object-storage client.
//!
//! - [`DiskClient`] - REST client for a Yandex.Disk-style storage API

pub mod disk_client;

pub use disk_client::{DiskClient, DiskSettings};
