use super::error::TemplateError;
use super::filler::fill_document_with_limit;
use super::format::DocumentFormat;
use super::scanner::is_identifier;
use super::variable::{suggestions, DetectedVariable, FillRequest, TemplateVariable};
use crate::config::TemplateConfig;
use tracing::{info, warn};

/// Upload-facing entry point that applies size limits before running the engine.
#[derive(Debug, Clone)]
pub struct ContractTemplateService {
    config: TemplateConfig,
}

impl ContractTemplateService {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Detect and classify the placeholders of an uploaded template.
    pub fn scan(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<Vec<DetectedVariable>, TemplateError> {
        self.check_size(bytes)?;
        let variables = super::scan_document_with_limit(bytes, format, self.config.max_part_bytes)?;
        info!(
            %format,
            size = bytes.len(),
            variables = variables.len(),
            "scanned contract template"
        );
        Ok(variables)
    }

    /// Initial review suggestions for an uploaded template.
    pub fn suggest(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
    ) -> Result<Vec<TemplateVariable>, TemplateError> {
        let detected = self.scan(bytes, format)?;
        Ok(suggestions(&detected))
    }

    /// Produce a filled contract from a template and operator-supplied values.
    pub fn fill(
        &self,
        bytes: &[u8],
        format: DocumentFormat,
        values: &FillRequest,
    ) -> Result<Vec<u8>, TemplateError> {
        self.check_size(bytes)?;

        for name in values.keys().filter(|name| !is_identifier(name)) {
            warn!(variable = %name, "value key can never match a placeholder");
        }

        let filled =
            fill_document_with_limit(bytes, format, values, self.config.max_part_bytes)?;
        info!(
            %format,
            size = bytes.len(),
            filled_size = filled.len(),
            values = values.len(),
            "filled contract template"
        );
        Ok(filled)
    }

    fn check_size(&self, bytes: &[u8]) -> Result<(), TemplateError> {
        let limit = self.config.max_upload_bytes;
        if bytes.len() > limit {
            return Err(TemplateError::DocumentTooLarge {
                size: bytes.len(),
                limit,
            });
        }
        Ok(())
    }
}

impl Default for ContractTemplateService {
    fn default() -> Self {
        Self::new(TemplateConfig::default())
    }
}
