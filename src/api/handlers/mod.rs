//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod files;
pub mod health;
pub mod links;
pub mod redirect;

pub use files::files_handler;
pub use health::health_handler;
pub use links::{create_link_handler, get_link_handler};
pub use redirect::redirect_handler;
