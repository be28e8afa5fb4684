//! Routing from document files to the extractor that can read them

use crate::error::{Result, SignalScorerError};
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Document formats the scorer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    Markdown,
}

impl DocumentFormat {
    /// Reads the format from the file extension. Files without an extension,
    /// or with one no extractor handles, are rejected before any I/O.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            SignalScorerError::InvalidInput(format!("File has no extension: {}", path.display()))
        })?;

        match extension.to_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "txt" => Ok(DocumentFormat::PlainText),
            "md" | "markdown" => Ok(DocumentFormat::Markdown),
            other => Err(SignalScorerError::UnsupportedFormat(format!(
                "Unsupported file type '.{}' for: {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Loads documents and caches extracted text, so scoring the same file in
/// several passes only pays the extraction cost once.
pub struct DocumentLoader {
    cache: HashMap<PathBuf, String>,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    pub async fn load(&mut self, path: &Path) -> Result<String> {
        if let Some(text) = self.cache.get(path) {
            debug!("Using cached text for: {}", path.display());
            return Ok(text.clone());
        }

        let format = DocumentFormat::from_path(path)?;

        if !path.exists() {
            return Err(SignalScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        debug!("Extracting {:?} text from: {}", format, path.display());
        let text = match format {
            DocumentFormat::Pdf => PdfExtractor.extract(path).await?,
            DocumentFormat::PlainText => PlainTextExtractor.extract(path).await?,
            DocumentFormat::Markdown => MarkdownExtractor.extract(path).await?,
        };

        self.cache.insert(path.to_path_buf(), text.clone());
        Ok(text)
    }

    pub fn cached_documents(&self) -> usize {
        self.cache.len()
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.txt")).unwrap(),
            DocumentFormat::PlainText
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.markdown")).unwrap(),
            DocumentFormat::Markdown
        );
    }

    #[test]
    fn test_rejects_unknown_and_missing_extensions() {
        assert!(matches!(
            DocumentFormat::from_path(Path::new("cv.docx")),
            Err(SignalScorerError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            DocumentFormat::from_path(Path::new("cv")),
            Err(SignalScorerError::InvalidInput(_))
        ));
    }
}
