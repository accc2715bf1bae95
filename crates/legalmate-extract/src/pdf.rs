use lopdf::Document;
use tracing::debug;

use crate::{ExtractionError, FormatExtractor};

/// PDF text extractor using lopdf.
///
/// Pages are read in page order and concatenated without a separator. A
/// page whose content cannot be decoded contributes nothing instead of
/// failing the document.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Per-page text in page order.
    pub fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let pages = doc
            .get_pages()
            .into_keys()
            .map(|page_no| {
                doc.extract_text(&[page_no]).unwrap_or_else(|e| {
                    debug!(page = page_no, error = %e, "page has no extractable text");
                    String::new()
                })
            })
            .collect();
        Ok(pages)
    }
}

impl FormatExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.extract_pages(bytes)?.concat())
    }
}
