//! Core domain entities.
//!
//! - [`Link`] - A persisted short code mapping (URL or file-backed)
//! - [`NewLink`] - Input for creating a link
//! - [`FileItem`] - One file of an upload batch

pub mod file;
pub mod link;

pub use file::FileItem;
pub use link::{Link, NewLink};
