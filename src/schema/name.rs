//! Identifier normalisation.

/// Convert a declared field name to its query-side form.
///
/// Splits at lower-to-upper boundaries and before the final upper of
/// an upper-case run followed by lowers, so acronyms stay together:
/// `FullName` becomes `full_name`, `HTTPUrl` becomes `http_url`, and
/// `UUID` becomes `uuid`.
pub(crate) fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 2);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let starts_word = i > 0
                && (chars[i - 1].is_lowercase()
                    || chars[i - 1].is_ascii_digit()
                    || (chars[i - 1].is_uppercase()
                        && chars.get(i + 1).is_some_and(|n| n.is_lowercase())));
            if starts_word {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether `s` can be spliced into SQL as a column segment.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
