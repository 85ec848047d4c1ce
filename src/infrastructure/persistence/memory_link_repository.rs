//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{InsertError, LinkRepository};
use crate::error::AppError;

#[derive(Default)]
struct Inner {
    next_id: i64,
    by_code: HashMap<String, Link>,
    /// original -> short code
    by_original: HashMap<String, String>,
}

/// Process-local link store.
///
/// Both uniqueness checks and the insert happen under a single lock, giving the
/// same one-winner guarantee as the database constraints. Data is lost when the
/// process exits.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    inner: Mutex<Inner>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.by_code.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.inner.lock().await.by_code.get(short_code).cloned())
    }

    async fn find_by_original(&self, original: &str) -> Result<Option<Link>, AppError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .by_original
            .get(original)
            .and_then(|code| inner.by_code.get(code))
            .cloned())
    }

    async fn insert_unique(&self, new_link: NewLink) -> Result<Link, InsertError> {
        let mut inner = self.inner.lock().await;

        if inner.by_code.contains_key(&new_link.short_code) {
            return Err(InsertError::ShortCodeTaken);
        }
        if inner.by_original.contains_key(&new_link.original) {
            return Err(InsertError::OriginalTaken);
        }

        inner.next_id += 1;
        let link = Link::new(
            inner.next_id,
            new_link.short_code,
            new_link.original,
            new_link.is_file,
            Utc::now(),
        );

        inner
            .by_original
            .insert(link.original.clone(), link.short_code.clone());
        inner.by_code.insert(link.short_code.clone(), link.clone());

        Ok(link)
    }

    async fn list_file_links_with_originals_in(
        &self,
        names: &[String],
    ) -> Result<Vec<Link>, AppError> {
        let inner = self.inner.lock().await;

        Ok(names
            .iter()
            .filter_map(|name| inner.by_original.get(name))
            .filter_map(|code| inner.by_code.get(code))
            .filter(|link| link.is_file)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
