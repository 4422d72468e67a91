//! Contract template variables: detection on upload, substitution on generation.

mod classifier;
mod error;
mod escape;
mod extract;
mod filler;
mod format;
mod ordering;
pub mod package;
pub mod router;
mod scanner;
mod service;
mod variable;

pub use classifier::{classify, suggest_label, suggest_type};
pub use error::TemplateError;
pub use escape::escape_xml;
pub use extract::{extract_text, extract_text_with_limit};
pub use filler::{fill_document, fill_document_with_limit, fill_package, substitute};
pub use format::{template_name_from_file_name, DocumentFormat};
pub use ordering::{order, PRIORITY_ORDER};
pub use package::{DocumentPackage, ZipPackage, DEFAULT_MAX_PART_BYTES, MAIN_DOCUMENT_PART};
pub use router::template_router;
pub use scanner::{is_identifier, scan};
pub use service::ContractTemplateService;
pub use variable::{
    missing_required, suggestions, DetectedVariable, FillRequest, TemplateVariable, VariableType,
};

/// Detects, classifies, and orders the placeholders of an uploaded template.
pub fn scan_document(
    bytes: &[u8],
    format: DocumentFormat,
) -> Result<Vec<DetectedVariable>, TemplateError> {
    scan_document_with_limit(bytes, format, DEFAULT_MAX_PART_BYTES)
}

/// [`scan_document`] with an explicit cap on the inflated size of the DOCX body.
pub fn scan_document_with_limit(
    bytes: &[u8],
    format: DocumentFormat,
    max_part_bytes: usize,
) -> Result<Vec<DetectedVariable>, TemplateError> {
    let text = extract_text_with_limit(bytes, format, max_part_bytes)?;
    Ok(detect_variables(&text))
}

/// Same as [`scan_document`] for text that has already been extracted.
pub fn detect_variables(text: &str) -> Vec<DetectedVariable> {
    let variables = scan(text)
        .into_iter()
        .map(|(name, occurrences)| {
            let (suggested_type, suggested_label) = classify(&name);
            DetectedVariable {
                placeholder: DetectedVariable::placeholder_for(&name),
                name,
                suggested_label,
                suggested_type,
                occurrences,
            }
        })
        .collect();

    order(variables)
}
