//! Short code generation and validation utilities.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated short codes.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Maximum length of a custom short code.
pub const MAX_CODE_LENGTH: usize = 16;

/// Route accepting file uploads.
pub const FILES_ROUTE: &str = "files";

/// Prefix of the programmatic API.
pub const API_PREFIX: &str = "api";

/// Codes that collide with the service's own routes and can never be allocated.
pub const RESERVED_CODES: &[&str] = &[FILES_ROUTE, API_PREFIX];

/// Generates a random short code of `length` symbols from `[A-Za-z0-9]`.
///
/// Each symbol is drawn uniformly from the 62-character alphabet.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(DEFAULT_CODE_LENGTH);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `code` is 1..=16 ASCII letters or digits.
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Returns true if `code` is one of the [`RESERVED_CODES`].
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Trims a user-supplied custom code; blank input means "no custom code".
pub fn normalize_custom_code(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}
