use super::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_MIME: &str = "application/pdf";

/// Container formats accepted for contract templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Docx,
    Pdf,
}

impl DocumentFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pdf => "pdf",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Docx => DOCX_MIME,
            Self::Pdf => PDF_MIME,
        }
    }

    /// Only the ZIP+XML container can be rewritten in place.
    pub const fn supports_fill(self) -> bool {
        matches!(self, Self::Docx)
    }

    pub fn from_file_name(file_name: &str) -> Result<Self, TemplateError> {
        let extension = Path::new(file_name.trim())
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| TemplateError::UnsupportedFormat(file_name.to_string()))?;
        extension.parse()
    }

    pub fn from_mime_type(mime_type: &str) -> Result<Self, TemplateError> {
        let unsupported = || TemplateError::UnsupportedFormat(mime_type.to_string());
        let parsed: mime::Mime = mime_type.trim().parse().map_err(|_| unsupported())?;

        match parsed.essence_str() {
            DOCX_MIME => Ok(Self::Docx),
            PDF_MIME => Ok(Self::Pdf),
            _ => Err(unsupported()),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = TemplateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            _ => Err(TemplateError::UnsupportedFormat(value.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Suggested template name for an uploaded file, without its document extension.
pub fn template_name_from_file_name(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    for suffix in [".docx", ".pdf"] {
        if lower.ends_with(suffix) {
            return &file_name[..file_name.len() - suffix.len()];
        }
    }
    file_name
}
