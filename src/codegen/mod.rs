pub(crate) mod native;
pub(crate) mod raster;

/// Name used when the requested artifact name sanitizes to nothing.
pub const DEFAULT_ARTIFACT_NAME: &str = "my_anim";

/// C identifier stem for generated artifacts: every character outside
/// `[A-Za-z0-9_]` becomes `_`, then the result is lowercased.
pub fn sanitize_c_name(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>()
        .to_ascii_lowercase();
    if out.is_empty() {
        DEFAULT_ARTIFACT_NAME.to_string()
    } else {
        out
    }
}

/// Escapes a string for use inside a C string literal.
pub(crate) fn c_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/codegen/mod.rs"]
mod tests;
