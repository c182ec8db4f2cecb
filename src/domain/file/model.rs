use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Storage bucket, derived from the MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Document,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            FileKind::Image
        } else {
            FileKind::Document
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Document => "document",
        }
    }

    /// Sub-directory under the upload root
    pub fn dir(&self) -> &'static str {
        match self {
            FileKind::Image => "images",
            FileKind::Document => "documents",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("image") {
            FileKind::Image
        } else {
            FileKind::Document
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub id: String,
    /// Generated name on disk, `<uuid>.<ext>`
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: i64,
    /// Path relative to the upload root
    pub path: String,
    pub url: String,
    pub kind: FileKind,
    pub metadata: Option<Value>,
    pub uploaded_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileValidationOptions {
    pub max_size: u64,
    pub allowed_mime_types: Vec<String>,
}

impl FileValidationOptions {
    pub fn allows(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_mime_prefix() {
        assert_eq!(FileKind::from_mime("image/webp"), FileKind::Image);
        assert_eq!(FileKind::from_mime("application/pdf"), FileKind::Document);
        assert_eq!(FileKind::Image.dir(), "images");
    }
}
