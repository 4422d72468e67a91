use super::variable::DetectedVariable;
use std::cmp::Ordering;

/// Canonical fields shown first when an operator reviews a new template.
pub const PRIORITY_ORDER: [&str; 10] = [
    "tenant_name",
    "tenant_personal_number",
    "tenant_email",
    "tenant_phone",
    "property_address",
    "unit_label",
    "rent_amount",
    "deposit_amount",
    "contract_start_date",
    "contract_end_date",
];

fn priority(name: &str) -> Option<usize> {
    PRIORITY_ORDER.iter().position(|candidate| *candidate == name)
}

/// Canonical names first in list order, then everything else by name.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match (priority(a), priority(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

pub fn order(mut variables: Vec<DetectedVariable>) -> Vec<DetectedVariable> {
    variables.sort_by(|a, b| compare_names(&a.name, &b.name));
    variables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::variable::VariableType;

    fn variable(name: &str) -> DetectedVariable {
        DetectedVariable {
            name: name.to_string(),
            placeholder: DetectedVariable::placeholder_for(name),
            suggested_label: name.to_string(),
            suggested_type: VariableType::Text,
            occurrences: 1,
        }
    }

    fn names(variables: &[DetectedVariable]) -> Vec<&str> {
        variables.iter().map(|variable| variable.name.as_str()).collect()
    }

    #[test]
    fn priority_names_precede_others_in_list_order() {
        let ordered = order(vec![
            variable("parking_spot"),
            variable("rent_amount"),
            variable("balcony"),
            variable("tenant_name"),
            variable("property_address"),
        ]);

        assert_eq!(
            names(&ordered),
            vec![
                "tenant_name",
                "property_address",
                "rent_amount",
                "balcony",
                "parking_spot"
            ]
        );
    }

    #[test]
    fn unlisted_names_sort_lexically_with_case_folded_first() {
        let ordered = order(vec![
            variable("zone"),
            variable("Area"),
            variable("area"),
            variable("balcony"),
        ]);

        assert_eq!(names(&ordered), vec!["Area", "area", "balcony", "zone"]);
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let forward = order(vec![
            variable("contract_end_date"),
            variable("storage"),
            variable("tenant_email"),
        ]);
        let reversed = order(vec![
            variable("tenant_email"),
            variable("storage"),
            variable("contract_end_date"),
        ]);

        assert_eq!(forward, reversed);
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn priority_lookup_is_case_sensitive() {
        assert_eq!(compare_names("Tenant_Name", "balcony"), Ordering::Greater);
        assert_eq!(compare_names("tenant_name", "balcony"), Ordering::Less);
    }
}
