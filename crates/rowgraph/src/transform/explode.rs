//! Multi-valued column explosion.

use super::coerce::{CoercionContext, coerce};
use crate::input::clean_token;
use crate::schema::{Value, ValueType};

/// Split a token on a literal separator, cleaning each piece and dropping
/// pieces that clean to nothing.
pub fn split_list<'a>(token: &'a str, separator: &'a str) -> impl Iterator<Item = String> + 'a {
    token
        .split(separator)
        .map(clean_token)
        .filter(|piece| !piece.is_empty())
}

/// Coerce a cleaned token into zero or more values.
///
/// Without a separator the whole token is one value. With one, every piece
/// is coerced on its own and a piece that fails is skipped.
pub fn explode(
    cleaned: &str,
    separator: Option<&str>,
    value_type: ValueType,
    ctx: &CoercionContext<'_>,
) -> Vec<Value> {
    match separator {
        None => coerce(value_type, cleaned, ctx).into_iter().collect(),
        Some(separator) => split_list(cleaned, separator)
            .filter_map(|piece| coerce(value_type, &piece, ctx))
            .collect(),
    }
}
