use super::error::TemplateError;
use super::format::DocumentFormat;
use super::package::{DocumentPackage, ZipPackage, DEFAULT_MAX_PART_BYTES, MAIN_DOCUMENT_PART};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::any::Any;
use std::panic;

/// Plain text of a template, used only for placeholder scanning.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, TemplateError> {
    extract_text_with_limit(bytes, format, DEFAULT_MAX_PART_BYTES)
}

/// [`extract_text`] with an explicit cap on the inflated size of the DOCX body.
pub fn extract_text_with_limit(
    bytes: &[u8],
    format: DocumentFormat,
    max_part_bytes: usize,
) -> Result<String, TemplateError> {
    match format {
        DocumentFormat::Docx => extract_docx_text(bytes, max_part_bytes),
        DocumentFormat::Pdf => extract_pdf_text(bytes),
    }
}

fn extract_docx_text(bytes: &[u8], max_part_bytes: usize) -> Result<String, TemplateError> {
    let mut package = ZipPackage::open(bytes)?.with_part_limit(max_part_bytes);
    let markup = package.read_part(MAIN_DOCUMENT_PART)?.ok_or_else(|| {
        TemplateError::CorruptArchive(format!("missing {MAIN_DOCUMENT_PART}"))
    })?;
    let markup = String::from_utf8(markup).map_err(|err| {
        TemplateError::CorruptArchive(format!("{MAIN_DOCUMENT_PART} is not UTF-8: {err}"))
    })?;

    let paragraphs = paragraph_text(&markup)?;
    Ok(paragraphs.join("\n\n"))
}

fn extract_pdf_text(bytes: &[u8]) -> Result<String, TemplateError> {
    // pdf-extract panics on some malformed font and encoding dictionaries.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(result) => result.map_err(|err| TemplateError::UnreadablePdf(err.to_string())),
        Err(payload) => Err(TemplateError::UnreadablePdf(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "PDF parser aborted".to_string()
    }
}

/// Collects the text of every `w:p` element in document order.
///
/// Paragraphs nested inside another paragraph (text boxes) are emitted on
/// their own, when their closing tag is reached. Only the `mc:Fallback`
/// branch of alternate content is read, so a text box counts once.
fn paragraph_text(markup: &str) -> Result<Vec<String>, TemplateError> {
    let mut reader = Reader::from_str(markup);
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    let mut in_tab_stops = false;
    let mut skipped_depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|err| {
            TemplateError::CorruptArchive(format!(
                "malformed {MAIN_DOCUMENT_PART} at byte {}: {err}",
                reader.buffer_position()
            ))
        })?;

        if skipped_depth > 0 {
            match event {
                Event::Start(_) => skipped_depth += 1,
                Event::End(_) => skipped_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => open.push(String::new()),
                b"t" => in_text = true,
                b"tabs" => in_tab_stops = true,
                b"Choice" => skipped_depth = 1,
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                b"t" => in_text = false,
                b"tabs" => in_tab_stops = false,
                _ => {}
            },
            Event::Empty(ref e) => {
                let current = open.last_mut();
                match (e.local_name().as_ref(), current) {
                    (b"p", _) => paragraphs.push(String::new()),
                    (b"tab", Some(_)) if in_tab_stops => {}
                    (b"tab", Some(paragraph)) => paragraph.push('\t'),
                    (b"br" | b"cr", Some(paragraph)) => paragraph.push('\n'),
                    _ => {}
                }
            }
            Event::Text(ref text) if in_text => {
                let unescaped = text.unescape().map_err(|err| {
                    TemplateError::CorruptArchive(format!("bad entity in text run: {err}"))
                })?;
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&unescaped);
                }
            }
            Event::CData(ref data) if in_text => {
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&String::from_utf8_lossy(data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
