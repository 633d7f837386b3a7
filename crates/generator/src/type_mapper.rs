//! Type mapping from WADL and JSON-schema type tags to Go types

use wadlgen_common::Diagnostics;

/// Map a type tag to a Go type
///
/// Matching is case-insensitive. Unknown tags are passed through verbatim
/// with a warning.
///
/// # Examples
/// ```
/// use wadlgen_common::Diagnostics;
/// use wadlgen_generator::go_type;
///
/// let mut diags = Diagnostics::new();
/// assert_eq!(go_type("xsd:string", &mut diags), "string");
/// assert_eq!(go_type("xsd:dateTime", &mut diags), "time.Time");
/// assert_eq!(go_type("Boolean", &mut diags), "bool");
/// assert!(diags.is_empty());
/// ```
pub fn go_type(wadl_type: &str, diagnostics: &mut Diagnostics) -> String {
    let mapped = match wadl_type.to_lowercase().as_str() {
        "object" => "interface{}",
        "array" => "[]interface{}",
        "xsd:datetime" => "time.Time",
        "" | "string" | "xsd:string" | "csapi:uuid" | "csapi:string" => "string",
        "xsd:int" | "xsd:integer" | "integer" => "int",
        "xsd:long" => "int64",
        "number" | "xsd:double" | "xsd:float" => "float64",
        "xsd:boolean" | "boolean" => "bool",
        _ => {
            diagnostics.warn(format!("unknown WADL type: {wadl_type}"));
            wadl_type
        }
    };
    mapped.to_string()
}
