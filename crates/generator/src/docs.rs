//! Documentation scrubbing
//!
//! WADL documentation often carries DocBook-style markup. It is flattened
//! into a single Go comment, with paragraphs and list openings turned into
//! comment line breaks.

use regex::Regex;
use std::sync::OnceLock;

const SCRUB_RULES: &[(&str, &str)] = &[
    ("<para[^>]*>", "\n// "),
    ("</para>", ""),
    ("<code[^>]*>", ""),
    ("</code>", ""),
    ("<itemizedlist[^>]*>", "\n// "),
    ("</itemizedlist>", ":"),
    ("<listitem[^>]*>", ""),
    ("</listitem>", ""),
    (r"//\s*$", ""),
];

fn scrubbers() -> &'static [(Regex, &'static str)] {
    static SCRUBBERS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    SCRUBBERS.get_or_init(|| {
        SCRUB_RULES
            .iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(pattern).ok().map(|re| (re, *replacement))
            })
            .collect()
    })
}

/// Render documentation as a Go comment
///
/// Every source line is trimmed and appended after a single space, the
/// markup rules are applied, and the result is prefixed with `// `.
pub fn render_documentation(doc: &str) -> String {
    let mut line = String::new();
    for source_line in doc.lines() {
        line.push(' ');
        line.push_str(source_line.trim());
    }

    for (re, replacement) in scrubbers() {
        line = re.replace_all(&line, *replacement).into_owned();
    }

    format!("// {line}")
}
