use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{QueueError, Result};

/// Stores uploaded binaries on disk and hands back publicly resolvable
/// URLs.
///
/// Files land under `<root>/<category>/<uuid>.<ext>`; the original
/// filename only contributes its extension, so path traversal in the
/// upload name is a non-issue.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
    public_base: String,
    max_bytes: usize,
}

impl AttachmentStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            public_base: config.public_base.trim_end_matches('/').to_string(),
            max_bytes: config.max_upload_bytes,
        }
    }

    /// Directory that holds all stored files; the HTTP layer serves it
    /// read-only under `/files`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save an upload under a category, returning its public URL.
    pub async fn save(&self, category: &str, original_name: &str, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(QueueError::Validation("Empty upload".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(QueueError::Validation(format!(
                "Upload exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        let category = sanitize_segment(category)?;
        let file_name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let dir = self.root.join(&category);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Attachment stored");

        Ok(format!(
            "{}/files/{}/{}",
            self.public_base, category, file_name
        ))
    }
}

/// A single path segment: no separators, no dot-dot, not empty.
fn sanitize_segment(segment: &str) -> Result<String> {
    let segment = segment.trim();
    if segment.is_empty()
        || segment == ".."
        || segment
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
    {
        return Err(QueueError::Validation(format!(
            "Invalid upload category: {:?}",
            segment
        )));
    }
    Ok(segment.to_string())
}

/// Extension of the uploaded filename, if it has a usable one.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(10)
        .collect::<String>()
        .to_lowercase();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_must_be_a_plain_segment() {
        assert!(sanitize_segment("cam-jobs").is_ok());
        assert!(sanitize_segment("completed").is_ok());
        assert!(sanitize_segment("../etc").is_err());
        assert!(sanitize_segment("a/b").is_err());
        assert!(sanitize_segment("").is_err());
    }

    #[test]
    fn extension_comes_from_the_original_name() {
        assert_eq!(extension_of("part.NC").as_deref(), Some("nc"));
        assert_eq!(extension_of("photo.final.jpg").as_deref(), Some("jpg"));
        assert_eq!(extension_of("no_extension"), None);
    }
}
