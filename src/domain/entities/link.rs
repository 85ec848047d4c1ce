//! Link entity representing a short code mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// `original` is either an arbitrary URL or, when `is_file` is set, the name of
/// an object in the remote storage backend. Links are never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub short_code: String,
    pub original: String,
    pub is_file: bool,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        short_code: String,
        original: String,
        is_file: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original,
            is_file,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub short_code: String,
    pub original: String,
    pub is_file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            false,
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.original, "https://example.com");
        assert!(!link.is_file);
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_file_link() {
        let link = Link::new(
            7,
            "Qx7".to_string(),
            "report.pdf".to_string(),
            true,
            Utc::now(),
        );

        assert!(link.is_file);
        assert_eq!(link.original, "report.pdf");
    }
}
