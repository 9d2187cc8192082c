//! The single statement file picked for upload.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("only PDF statements are accepted: {}", .0.display())]
    NotPdf(PathBuf),
    #[error("read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Upload candidate: payload bytes plus the name and media type sent with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(file_name, PDF_MEDIA_TYPE, bytes)
    }

    /// Load a PDF from disk. Anything without a `.pdf` extension is rejected
    /// before the file is read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        if !is_pdf_path(path) {
            return Err(FileError::NotPdf(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| FileError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "statement.pdf".to_string());

        Ok(Self::pdf(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cardparse-file-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_from_path_reads_pdf() {
        let dir = scratch_dir("read");
        let p = dir.join("March.PDF");
        fs::write(&p, b"%PDF-1.4 test").unwrap();

        let f = SelectedFile::from_path(&p).unwrap();
        assert_eq!(f.file_name, "March.PDF");
        assert_eq!(f.media_type, PDF_MEDIA_TYPE);
        assert_eq!(f.bytes, b"%PDF-1.4 test");
    }

    #[test]
    fn test_from_path_rejects_non_pdf() {
        let dir = scratch_dir("reject");
        let p = dir.join("statement.csv");
        fs::write(&p, b"a,b").unwrap();

        let err = SelectedFile::from_path(&p).unwrap_err();
        assert!(matches!(err, FileError::NotPdf(_)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = scratch_dir("missing");
        let err = SelectedFile::from_path(dir.join("nope.pdf")).unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
    }
}
