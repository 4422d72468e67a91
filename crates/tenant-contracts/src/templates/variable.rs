use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic type suggested for a placeholder found in a contract template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    Text,
    Number,
    Date,
    Currency,
    Email,
    Phone,
    Address,
    PersonalNumber,
}

impl VariableType {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Text,
            Self::Number,
            Self::Date,
            Self::Currency,
            Self::Email,
            Self::Phone,
            Self::Address,
            Self::PersonalNumber,
        ]
    }

    /// Wire discriminant, identical to the serialized form.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Date => "DATE",
            Self::Currency => "CURRENCY",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Address => "ADDRESS",
            Self::PersonalNumber => "PERSONAL_NUMBER",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Nummer",
            Self::Date => "Datum",
            Self::Currency => "Belopp (kr)",
            Self::Email => "E-post",
            Self::Phone => "Telefon",
            Self::Address => "Adress",
            Self::PersonalNumber => "Personnummer",
        }
    }

    /// Input hint shown next to the field when an operator fills a contract.
    pub const fn input_hint(self) -> &'static str {
        match self {
            Self::Text => "Fritext",
            Self::Number => "Heltal eller decimal",
            Self::Date => "ÅÅÅÅ-MM-DD",
            Self::Currency => "Svensk valuta",
            Self::Email => "E-postadress",
            Self::Phone => "Telefonnummer",
            Self::Address => "Fullständig adress",
            Self::PersonalNumber => "ÅÅÅÅMMDD-XXXX",
        }
    }
}

/// A placeholder discovered in an uploaded template, with classification hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedVariable {
    pub name: String,
    pub placeholder: String,
    pub suggested_label: String,
    pub suggested_type: VariableType,
    pub occurrences: usize,
}

impl DetectedVariable {
    pub fn placeholder_for(name: &str) -> String {
        format!("{{{{{name}}}}}")
    }
}

/// Values keyed by variable name, applied when a contract is generated.
///
/// Values arrive pre-formatted; nothing here coerces or defaults them.
pub type FillRequest = BTreeMap<String, String>;

/// Operator-reviewed variable as persisted alongside a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    pub required: bool,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub sort_order: u32,
}

impl TemplateVariable {
    pub fn from_detected(detected: &DetectedVariable, sort_order: u32) -> Self {
        Self {
            name: detected.name.clone(),
            label: detected.suggested_label.clone(),
            placeholder: detected.placeholder.clone(),
            variable_type: detected.suggested_type,
            required: true,
            default_value: None,
            description: None,
            sort_order,
        }
    }
}

/// Initial suggestion set for the review step, one entry per detected variable.
pub fn suggestions(detected: &[DetectedVariable]) -> Vec<TemplateVariable> {
    detected
        .iter()
        .zip(0u32..)
        .map(|(variable, sort_order)| TemplateVariable::from_detected(variable, sort_order))
        .collect()
}

/// Required variables without a default that have no entry in `values`.
pub fn missing_required<'a>(
    variables: &'a [TemplateVariable],
    values: &FillRequest,
) -> Vec<&'a str> {
    variables
        .iter()
        .filter(|variable| variable.required && variable.default_value.is_none())
        .filter(|variable| !values.contains_key(&variable.name))
        .map(|variable| variable.name.as_str())
        .collect()
}
