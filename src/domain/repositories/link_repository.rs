//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a unique insert.
///
/// Uniqueness of `short_code` and of `original` is enforced by the store itself,
/// so two concurrent inserts racing for the same value cannot both succeed.
#[derive(Debug, Error)]
pub enum InsertError {
    #[error("short code is already taken")]
    ShortCodeTaken,

    #[error("original is already shortened")]
    OriginalTaken,

    #[error(transparent)]
    Store(#[from] AppError),
}

/// Repository interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its original URL or file name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_original(&self, original: &str) -> Result<Option<Link>, AppError>;

    /// Inserts a new link, atomically rejecting duplicates.
    ///
    /// # Errors
    ///
    /// - [`InsertError::ShortCodeTaken`] if the short code already exists
    /// - [`InsertError::OriginalTaken`] if the original already exists
    /// - [`InsertError::Store`] on database errors
    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, InsertError>;

    /// Lists file-backed links whose original is one of `names`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_file_links_with_originals_in(
        &self,
        names: &[String],
    ) -> Result<Vec<Link>, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
