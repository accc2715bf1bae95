//! Text extraction: PDF pages via lopdf, DOCX paragraphs via zip + quick-xml.

mod docx;
mod error;
mod pdf;

pub use docx::DocxTextExtractor;
pub use error::ExtractionError;
pub use pdf::PdfTextExtractor;

use std::path::Path;

use legalmate_core::{DocumentFormat, RawDocument};
use tracing::{debug, error};

/// Format-specific text extraction.
pub trait FormatExtractor {
    /// Extract plain text from the whole document.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

fn extractor_for(format: DocumentFormat) -> &'static dyn FormatExtractor {
    match format {
        DocumentFormat::Pdf => &PdfTextExtractor,
        DocumentFormat::Docx => &DocxTextExtractor,
    }
}

/// Extract text from in-memory document bytes.
///
/// Empty or whitespace-only output is [`ExtractionError::NoText`].
pub fn extract_bytes(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    let result = extractor_for(format)
        .extract_text(bytes)
        .and_then(|text| {
            if text.trim().is_empty() {
                Err(ExtractionError::NoText)
            } else {
                Ok(text)
            }
        });
    match &result {
        Ok(text) => debug!(%format, bytes = bytes.len(), chars = text.len(), "extracted text"),
        Err(e) => error!(%format, bytes = bytes.len(), error = %e, "text extraction failed"),
    }
    result
}

/// Extract text from a [`RawDocument`].
pub fn extract_document(doc: &RawDocument) -> Result<String, ExtractionError> {
    extract_bytes(&doc.bytes, doc.format)
}

/// Read a file and extract its text using the declared format.
pub fn extract(path: &Path, format: DocumentFormat) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "cannot read document");
        ExtractionError::Io(e)
    })?;
    extract_bytes(&bytes, format)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    use lopdf::dictionary;
    use lopdf::{Document, Object, Stream};

    /// Build a PDF with one page per entry; `None` pages point at a missing
    /// content stream.
    pub fn pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.4");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let contents: Object = match page {
                Some(text) => {
                    let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
                    doc.add_object(Stream::new(dictionary! {}, content.into_bytes()))
                        .into()
                }
                None => Object::Reference((9999, 0)),
            };
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => contents,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    /// Build a DOCX container whose `word/document.xml` has the given body XML.
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(b"<Types/>").unwrap();
            zip.start_file("word/document.xml", options).unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    /// DOCX with one plain paragraph per entry.
    pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        docx_with_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn docx_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&fixtures::docx(&["Force Majeure applies."]))
            .unwrap();
        let text = extract(file.path(), DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Force Majeure applies.");
    }

    #[test]
    fn zero_byte_files_fail() {
        for format in [DocumentFormat::Pdf, DocumentFormat::Docx] {
            let file = tempfile::NamedTempFile::new().unwrap();
            let err = extract(file.path(), format).unwrap_err();
            assert!(
                !matches!(err, ExtractionError::Io(_)),
                "{format}: expected parse failure, got {err}"
            );
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = extract(Path::new("/nonexistent/contract.pdf"), DocumentFormat::Pdf).unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[test]
    fn garbage_bytes_fail_for_both_formats() {
        assert!(matches!(
            extract_bytes(b"not a pdf", DocumentFormat::Pdf),
            Err(ExtractionError::Pdf(_))
        ));
        assert!(matches!(
            extract_bytes(b"not a zip", DocumentFormat::Docx),
            Err(ExtractionError::Docx(_))
        ));
    }

    #[test]
    fn whitespace_only_document_has_no_text() {
        let bytes = fixtures::docx(&["   ", ""]);
        assert!(matches!(
            extract_bytes(&bytes, DocumentFormat::Docx),
            Err(ExtractionError::NoText)
        ));
    }

    #[test]
    fn raw_document_dispatch() {
        let doc = RawDocument::new(fixtures::docx(&["Term.", "Liability."]), DocumentFormat::Docx);
        assert_eq!(extract_document(&doc).unwrap(), "Term.\nLiability.");
    }
}
