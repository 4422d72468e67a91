use super::variable::VariableType;
use std::collections::HashMap;
use std::sync::OnceLock;

use VariableType::{Address, Currency, Date, Email, Number, PersonalNumber, Phone, Text};

/// Well-known variable names and their types.
///
/// Order is significant: the substring fallback walks this slice front to back
/// and the first key contained in the name wins.
const TYPE_TABLE: &[(&str, VariableType)] = &[
    // Personuppgifter
    ("name", Text),
    ("tenant_name", Text),
    ("landlord_name", Text),
    ("full_name", Text),
    ("first_name", Text),
    ("last_name", Text),
    // Identifiering
    ("personal_number", PersonalNumber),
    ("tenant_personal_number", PersonalNumber),
    ("personnummer", PersonalNumber),
    ("ssn", PersonalNumber),
    // Kontakt
    ("email", Email),
    ("tenant_email", Email),
    ("landlord_email", Email),
    ("phone", Phone),
    ("tenant_phone", Phone),
    ("landlord_phone", Phone),
    ("telefon", Phone),
    // Adresser
    ("address", Address),
    ("property_address", Address),
    ("street", Address),
    ("city", Text),
    ("postal_code", Text),
    // Belopp
    ("rent", Currency),
    ("rent_amount", Currency),
    ("hyra", Currency),
    ("deposit", Currency),
    ("deposit_amount", Currency),
    ("deposition", Currency),
    ("amount", Currency),
    ("belopp", Currency),
    // Datum
    ("date", Date),
    ("start_date", Date),
    ("end_date", Date),
    ("contract_start", Date),
    ("contract_end", Date),
    ("contract_start_date", Date),
    ("contract_end_date", Date),
    ("move_in_date", Date),
    ("move_out_date", Date),
    ("signing_date", Date),
    // Nummer
    ("number", Number),
    ("unit_number", Text),
    ("apartment_number", Text),
    ("rooms", Number),
    ("size", Number),
    ("area", Number),
];

const LABEL_TABLE: &[(&str, &str)] = &[
    ("tenant_name", "Hyresgästens namn"),
    ("landlord_name", "Hyresvärdens namn"),
    ("tenant_personal_number", "Hyresgästens personnummer"),
    ("landlord_personal_number", "Hyresvärdens personnummer"),
    ("tenant_email", "Hyresgästens e-post"),
    ("landlord_email", "Hyresvärdens e-post"),
    ("tenant_phone", "Hyresgästens telefon"),
    ("landlord_phone", "Hyresvärdens telefon"),
    ("property_address", "Fastighetsadress"),
    ("unit_label", "Lägenhetsbeteckning"),
    ("unit_number", "Lägenhetsnummer"),
    ("rent_amount", "Månadshyra"),
    ("deposit_amount", "Depositionsbelopp"),
    ("contract_start_date", "Kontraktets startdatum"),
    ("contract_end_date", "Kontraktets slutdatum"),
    ("move_in_date", "Inflyttningsdatum"),
    ("signing_date", "Signeringsdatum"),
    ("unit_size", "Lägenhetsstorlek"),
    ("unit_type", "Lägenhetstyp"),
    ("rooms", "Antal rum"),
];

static LABEL_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn label_map() -> &'static HashMap<&'static str, &'static str> {
    LABEL_MAP.get_or_init(|| LABEL_TABLE.iter().copied().collect())
}

/// Suggested type and label for a placeholder name.
pub fn classify(name: &str) -> (VariableType, String) {
    (suggest_type(name), suggest_label(name))
}

pub fn suggest_type(name: &str) -> VariableType {
    let lower = name.to_lowercase();

    if let Some((_, variable_type)) = TYPE_TABLE.iter().find(|(key, _)| *key == lower) {
        return *variable_type;
    }

    TYPE_TABLE
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, variable_type)| *variable_type)
        .unwrap_or(VariableType::Text)
}

pub fn suggest_label(name: &str) -> String {
    if let Some(label) = label_map().get(name) {
        return (*label).to_string();
    }

    generate_label(name)
}

/// Builds a readable label from snake_case or camelCase names.
fn generate_label(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() * 2);
    for ch in name.chars() {
        match ch {
            '_' => spaced.push(' '),
            upper if upper.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(upper);
            }
            other => spaced.push(other),
        }
    }

    spaced
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut titled: String = first.to_uppercase().collect();
            titled.push_str(&chars.as_str().to_lowercase());
            titled
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_is_case_insensitive() {
        assert_eq!(suggest_type("RENT_AMOUNT"), Currency);
        assert_eq!(suggest_type("Tenant_Personal_Number"), PersonalNumber);
        assert_eq!(suggest_type("unit_number"), Text);
    }

    #[test]
    fn substring_fallback_takes_first_key_in_table_order() {
        // "deposit" is defined before "date"
        assert_eq!(suggest_type("deposit_due_date"), Currency);
        assert_eq!(suggest_type("landlord_personal_number"), PersonalNumber);
        assert_eq!(suggest_type("tenant_phone_number"), Phone);
        assert_eq!(suggest_type("secondary_email_address"), Email);
        assert_eq!(suggest_type("username"), Text);
        assert_eq!(suggest_type("unit_size"), Number);
    }

    #[test]
    fn unknown_names_default_to_text() {
        assert_eq!(suggest_type("parking_spot"), Text);
        assert_eq!(suggest_type("x"), Text);
    }

    #[test]
    fn fixed_labels_are_used_verbatim() {
        assert_eq!(
            suggest_label("tenant_personal_number"),
            "Hyresgästens personnummer"
        );
        assert_eq!(suggest_label("rooms"), "Antal rum");
    }

    #[test]
    fn fixed_labels_are_case_sensitive() {
        assert_eq!(suggest_label("Rooms"), "Rooms");
    }

    #[test]
    fn generated_labels_split_snake_and_camel_case() {
        assert_eq!(suggest_label("parking_spot"), "Parking Spot");
        assert_eq!(suggest_label("parkingSpotNumber"), "Parking Spot Number");
        assert_eq!(suggest_label("__storage__unit_"), "Storage Unit");
        assert_eq!(suggest_label("HOA"), "H O A");
        assert_eq!(suggest_label("floor2"), "Floor2");
    }

    #[test]
    fn classify_pairs_type_and_label() {
        let (variable_type, label) = classify("tenant_personal_number");
        assert_eq!(variable_type, PersonalNumber);
        assert_eq!(label, "Hyresgästens personnummer");

        assert_eq!(classify("balcony_area"), classify("balcony_area"));
    }

    #[test]
    fn every_table_key_is_lowercase() {
        assert!(TYPE_TABLE
            .iter()
            .all(|(key, _)| key.chars().all(|ch| !ch.is_uppercase())));
    }
}
