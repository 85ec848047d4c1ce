//! Business logic services for the application layer.

pub mod file_service;
pub mod link_service;
pub mod resolve_service;
pub mod upload_service;

pub use file_service::{FileShareItem, FileShareService};
pub use link_service::LinkService;
pub use resolve_service::{Resolution, ResolveService};
pub use upload_service::{UploadOutcome, UploadService};
