//! Short code allocation and link lookup service.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertError, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{
    DEFAULT_CODE_LENGTH, generate_code, is_reserved, is_valid_code, normalize_custom_code,
};

/// Maximum length of an original URL or file name.
pub const MAX_ORIGINAL_LENGTH: usize = 512;

/// Upper bound on generated-code collisions before allocation gives up.
///
/// With 62^6 possible codes this is never reached at the intended scale; it
/// only turns a saturated keyspace into an error instead of a hung request.
const MAX_GENERATION_ATTEMPTS: usize = 100;

pub const INVALID_CODE_MSG: &str = "Invalid short link name";
pub const CODE_CONFLICT_MSG: &str = "The proposed short link already exists.";
pub const DUPLICATE_FILE_MSG: &str = "A file with this name already exists.";
pub const FILE_NAME_TOO_LONG_MSG: &str = "file name is too long";
pub const NOT_FOUND_MSG: &str = "Requested id was not found";

/// Service allocating short codes and creating links.
///
/// Collisions are detected against the reserved words and the store; the
/// store's uniqueness constraints are the final arbiter, so a race between
/// [`Self::is_taken`] and the insert still yields exactly one winner.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    code_length: usize,
}

impl LinkService {
    /// Creates a new link service generating codes of the default length.
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self {
            repository,
            code_length: DEFAULT_CODE_LENGTH,
        }
    }

    /// Returns true if `code` is reserved or already used by a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn is_taken(&self, code: &str) -> Result<bool, AppError> {
        if is_reserved(code) {
            return Ok(true);
        }

        Ok(self.repository.find_by_short_code(code).await?.is_some())
    }

    /// Allocates a short code for `original` and persists the link.
    ///
    /// A custom code is trimmed first; a blank one falls back to generation.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the custom code is not 1-16 letters/digits
    /// - [`AppError::Conflict`] if the custom code is reserved or taken, or the
    ///   original is already stored
    /// - [`AppError::Internal`] on database errors
    pub async fn allocate(
        &self,
        original: &str,
        custom_code: Option<&str>,
        is_file: bool,
    ) -> Result<Link, AppError> {
        match normalize_custom_code(custom_code) {
            Some(code) => self.allocate_custom(original, code, is_file).await,
            None => self.allocate_generated(original, is_file).await,
        }
    }

    async fn allocate_custom(
        &self,
        original: &str,
        code: &str,
        is_file: bool,
    ) -> Result<Link, AppError> {
        if !is_valid_code(code) {
            return Err(AppError::bad_request(INVALID_CODE_MSG));
        }

        if self.is_taken(code).await? {
            return Err(AppError::conflict(CODE_CONFLICT_MSG));
        }

        let new_link = NewLink {
            short_code: code.to_string(),
            original: original.to_string(),
            is_file,
        };

        match self.repository.insert_unique(new_link).await {
            Ok(link) => Ok(created(link)),
            Err(InsertError::ShortCodeTaken) => Err(AppError::conflict(CODE_CONFLICT_MSG)),
            Err(InsertError::OriginalTaken) => Err(original_conflict(is_file)),
            Err(InsertError::Store(e)) => Err(e),
        }
    }

    async fn allocate_generated(&self, original: &str, is_file: bool) -> Result<Link, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_code(self.code_length);

            if self.is_taken(&code).await? {
                tracing::debug!(code = %code, "Generated code collided, resampling");
                continue;
            }

            let new_link = NewLink {
                short_code: code,
                original: original.to_string(),
                is_file,
            };

            match self.repository.insert_unique(new_link).await {
                Ok(link) => return Ok(created(link)),
                // Lost a race for this code; draw another one.
                Err(InsertError::ShortCodeTaken) => continue,
                Err(InsertError::OriginalTaken) => return Err(original_conflict(is_file)),
                Err(InsertError::Store(e)) => return Err(e),
            }
        }

        Err(AppError::internal("Failed to generate a unique short code"))
    }

    /// Creates a URL link, reusing an existing link for the same URL.
    ///
    /// An existing link is returned when no custom code is requested or the
    /// requested code is the existing one; any other custom code conflicts.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is empty, too long, or not http(s)
    /// - See [`Self::allocate`] for the remaining cases
    pub async fn create_link(
        &self,
        original: &str,
        custom_code: Option<&str>,
    ) -> Result<Link, AppError> {
        validate_original(original)?;

        let custom_code = normalize_custom_code(custom_code);

        if let Some(existing) = self.repository.find_by_original(original).await? {
            return match custom_code {
                None => Ok(existing),
                Some(code) if code == existing.short_code => Ok(existing),
                Some(_) => Err(AppError::conflict(CODE_CONFLICT_MSG)),
            };
        }

        self.allocate(original, custom_code, false).await
    }

    /// Creates a file-backed link for an uploaded object.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if `filename` is longer than
    ///   [`MAX_ORIGINAL_LENGTH`] characters
    /// - [`AppError::Conflict`] if any link already uses `filename` as its
    ///   original
    pub async fn create_file_link(&self, filename: &str) -> Result<Link, AppError> {
        if filename.chars().count() > MAX_ORIGINAL_LENGTH {
            return Err(AppError::bad_request(FILE_NAME_TOO_LONG_MSG));
        }

        if self.repository.find_by_original(filename).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_FILE_MSG));
        }

        self.allocate(filename, None, true).await
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_link(&self, short_code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_short_code(short_code)
            .await?
            .ok_or_else(|| AppError::not_found(NOT_FOUND_MSG))
    }

    /// Returns the names among `names` that already back a file link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn existing_file_names(&self, names: &[String]) -> Result<Vec<String>, AppError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let links = self
            .repository
            .list_file_links_with_originals_in(names)
            .await?;

        Ok(links.into_iter().map(|l| l.original).collect())
    }

    /// Checks that the link store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

fn created(link: Link) -> Link {
    let kind = if link.is_file { "file" } else { "url" };
    metrics::counter!("links_created_total", "kind" => kind).increment(1);
    tracing::info!(code = %link.short_code, kind, "Link created");
    link
}

fn original_conflict(is_file: bool) -> AppError {
    if is_file {
        AppError::conflict(DUPLICATE_FILE_MSG)
    } else {
        AppError::conflict("This URL has already been shortened")
    }
}

/// Validates an original URL submitted for shortening.
fn validate_original(original: &str) -> Result<(), AppError> {
    if original.trim().is_empty() {
        return Err(AppError::bad_request("\"url\" is a required field!"));
    }

    if original.chars().count() > MAX_ORIGINAL_LENGTH {
        return Err(AppError::bad_request(format!(
            "URL must be at most {MAX_ORIGINAL_LENGTH} characters"
        )));
    }

    // The URL parser drops tabs and newlines, but a Location header refuses them.
    if original.chars().any(char::is_control) {
        return Err(AppError::bad_request("Invalid URL format"));
    }

    let parsed =
        url::Url::parse(original).map_err(|_| AppError::bad_request("Invalid URL format"))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
        return Err(AppError::bad_request("Invalid URL format"));
    }

    Ok(())
}
