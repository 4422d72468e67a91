/// Failures raised while scanning or filling a contract template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("file type '{0}' is not supported; upload a .docx or .pdf file")]
    UnsupportedFormat(String),
    #[error("filling PDF templates is not supported; convert the template to DOCX first")]
    FillNotSupported,
    #[error("document archive is unreadable: {0}")]
    CorruptArchive(String),
    #[error("PDF text could not be extracted: {0}")]
    UnreadablePdf(String),
    #[error("document is {size} bytes, above the {limit} byte upload limit")]
    DocumentTooLarge { size: usize, limit: usize },
    #[error("document part {part} inflates past the {limit} byte limit")]
    PartTooLarge { part: String, limit: usize },
}
