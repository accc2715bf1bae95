use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use crate::{ExtractionError, FormatExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

/// DOCX text extractor: reads the main document part of the OOXML container.
///
/// One output line per `w:p` paragraph, in document order, joined by `\n`.
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    /// Paragraph texts in document order.
    pub fn extract_paragraphs(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let xml = read_document_part(bytes)?;
        parse_paragraphs(&xml)
    }
}

impl FormatExtractor for DocxTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.extract_paragraphs(bytes)?.join("\n"))
    }
}

fn docx_err(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::Docx(e.to_string())
}

fn read_document_part(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(docx_err)?;
    let mut part = archive.by_name(DOCUMENT_PART).map_err(docx_err)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

fn parse_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    // Open paragraphs; text boxes nest a `w:p` inside a run of the outer one.
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    // `w:tab` inside paragraph properties defines tab stops, not content.
    let mut props_depth = 0usize;

    loop {
        match reader.read_event().map_err(docx_err)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    push_char(&mut open, '\n');
                    open.push(String::new());
                }
                b"w:pPr" => props_depth += 1,
                b"w:t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" if props_depth == 0 => push_char(&mut open, '\t'),
                b"w:br" | b"w:cr" => push_char(&mut open, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t.unescape().map_err(docx_err)?;
                if let Some(p) = open.last_mut() {
                    p.push_str(&text);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(p) = open.pop() {
                        paragraphs.push(p);
                    }
                }
                b"w:pPr" => props_depth = props_depth.saturating_sub(1),
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    // Unclosed paragraphs in a truncated part still count.
    paragraphs.extend(open.into_iter().rev());
    Ok(paragraphs)
}

/// Append to the innermost open paragraph; a break in the outer paragraph
/// when a nested one opens keeps its two halves apart.
fn push_char(open: &mut [String], c: char) {
    if let Some(p) = open.last_mut() {
        p.push(c);
    }
}
