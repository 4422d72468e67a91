/// Escapes a value for insertion into XML character data or attributes.
///
/// `&` is replaced first so the entities introduced afterwards stay intact.
pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
