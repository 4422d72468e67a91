use super::error::TemplateError;
use super::escape::escape_xml;
use super::format::DocumentFormat;
use super::package::{DocumentPackage, ZipPackage, DEFAULT_MAX_PART_BYTES, MAIN_DOCUMENT_PART};
use super::variable::{DetectedVariable, FillRequest};
use tracing::debug;

/// Substitutes `values` into a template and returns a new document buffer.
///
/// Only DOCX can be filled. Placeholders without a value are left in place.
pub fn fill_document(
    bytes: &[u8],
    format: DocumentFormat,
    values: &FillRequest,
) -> Result<Vec<u8>, TemplateError> {
    fill_document_with_limit(bytes, format, values, DEFAULT_MAX_PART_BYTES)
}

/// [`fill_document`] with an explicit cap on the inflated size of the DOCX body.
pub fn fill_document_with_limit(
    bytes: &[u8],
    format: DocumentFormat,
    values: &FillRequest,
    max_part_bytes: usize,
) -> Result<Vec<u8>, TemplateError> {
    if !format.supports_fill() {
        return Err(TemplateError::FillNotSupported);
    }

    let mut package = ZipPackage::open(bytes)?.with_part_limit(max_part_bytes);
    fill_package(&mut package, values)?;
    package.into_bytes()
}

/// Rewrites the main document part of `package` in place.
pub fn fill_package<P: DocumentPackage>(
    package: &mut P,
    values: &FillRequest,
) -> Result<(), TemplateError> {
    let markup = package.read_part(MAIN_DOCUMENT_PART)?.ok_or_else(|| {
        TemplateError::CorruptArchive(format!("missing {MAIN_DOCUMENT_PART}"))
    })?;
    let markup = String::from_utf8(markup).map_err(|err| {
        TemplateError::CorruptArchive(format!("{MAIN_DOCUMENT_PART} is not UTF-8: {err}"))
    })?;

    let filled = substitute(&markup, values);
    package.write_part(MAIN_DOCUMENT_PART, filled.into_bytes())
}

/// Literal, global replacement of each `{{name}}` token with its escaped value.
pub fn substitute(markup: &str, values: &FillRequest) -> String {
    let mut filled = markup.to_string();

    for (name, value) in values {
        let placeholder = DetectedVariable::placeholder_for(name);
        let replaced = filled.matches(placeholder.as_str()).count();
        if replaced == 0 {
            continue;
        }

        filled = filled.replace(placeholder.as_str(), &escape_xml(value));
        debug!(variable = %name, replaced, "substituted template placeholder");
    }

    filled
}
