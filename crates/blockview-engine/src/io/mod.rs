use crate::document::{BlockDocument, DocumentError};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not load {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        source: DocumentError,
    },
}

/// Load a saved block document (editor `save()` output as JSON)
pub fn read_document(path: &Path) -> Result<BlockDocument, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(IoError::Io)?;
    BlockDocument::from_json_str(&content).map_err(|source| IoError::InvalidDocument {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{create_test_dir, create_test_file};

    #[test]
    fn test_read_document_success() {
        let dir = create_test_dir();
        let path = create_test_file(
            &dir,
            "doc.json",
            r#"{ "blocks": [{ "type": "paragraph", "data": { "text": "hello" } }] }"#,
        );

        let document = read_document(&path).unwrap();
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_read_document_not_found() {
        let dir = create_test_dir();
        let result = read_document(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(IoError::NotFound(_))));
    }

    #[test]
    fn test_read_document_invalid_json() {
        let dir = create_test_dir();
        let path = create_test_file(&dir, "broken.json", "{ nope");

        let err = read_document(&path).unwrap_err();

        assert!(matches!(err, IoError::InvalidDocument { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
