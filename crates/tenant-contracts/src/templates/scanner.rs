use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

static PLACEHOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER_PATTERN.get_or_init(|| {
        Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}").expect("placeholder pattern is valid")
    })
}

/// Counts `{{name}}` placeholders in `text`, keyed by name in first-seen order.
pub fn scan(text: &str) -> IndexMap<String, usize> {
    let mut occurrences: IndexMap<String, usize> = IndexMap::new();

    for captures in placeholder_pattern().captures_iter(text) {
        let name = &captures[1];
        match occurrences.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                occurrences.insert(name.to_string(), 1);
            }
        }
    }

    occurrences
}

/// True when `name` is a valid placeholder identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}
