//! Identifier rendering
//!
//! Turns raw WADL names (`tenant_id`, `list-servers`) into Go identifiers.

const DELIMITERS: [char; 2] = ['_', '-'];

/// Render a raw name as a camel-cased identifier
///
/// Every `_` or `-` is dropped and the character after it is upper-cased.
/// The first character is then upper-cased when `exported`, lower-cased
/// otherwise.
///
/// # Examples
/// ```
/// use wadlgen_common::naming::render_identifier;
///
/// assert_eq!(render_identifier("tenant_id", true), "TenantId");
/// assert_eq!(render_identifier("list-servers", false), "listServers");
/// assert_eq!(render_identifier("GetPet", false), "getPet");
/// ```
pub fn render_identifier(name: &str, exported: bool) -> String {
    let mut name = name.to_string();
    for delimiter in DELIMITERS {
        while let Some(idx) = name.find(delimiter) {
            let rest = case_first_char(&name[idx + delimiter.len_utf8()..], true);
            name.truncate(idx);
            name.push_str(&rest);
        }
    }

    case_first_char(&name, exported)
}

/// Upper- or lower-case only the first character of `s`
pub fn case_first_char(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Name of the generated parameter type for a method stem
pub fn params_type_name(stem: &str) -> String {
    render_identifier(&format!("{stem}Params"), true)
}

/// Name of the generated result type for a method stem
pub fn results_type_name(stem: &str) -> String {
    render_identifier(&format!("{stem}Results"), true)
}
