//! Token cleaning.

/// Strip every `"` and `\` from a token and trim surrounding whitespace.
///
/// Idempotent: cleaning a cleaned token returns it unchanged.
pub fn clean_token(token: &str) -> String {
    token
        .chars()
        .filter(|&c| c != '"' && c != '\\')
        .collect::<String>()
        .trim()
        .to_string()
}
