//! Uploaded file entity.

use bytes::Bytes;

/// A single file submitted in an upload batch.
///
/// An empty `filename` marks a part without a name; such items are skipped.
#[derive(Debug, Clone)]
pub struct FileItem {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FileItem {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the trimmed file name, or `None` if the part had no usable name.
    pub fn name(&self) -> Option<&str> {
        let name = self.filename.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}
