//! Application layer services implementing business logic.
//!
//! Services consume the domain traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code allocation and lookup
//! - [`services::upload_service::UploadService`] - Concurrent batch upload to storage
//! - [`services::file_service::FileShareService`] - File links from upload outcomes
//! - [`services::resolve_service::ResolveService`] - Redirect or stream on resolution

pub mod services;
