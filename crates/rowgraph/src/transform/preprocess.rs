//! Named text transforms applied before type coercion.

use regex::Regex;

use crate::error::{Result, RowgraphError};
use crate::schema::PreprocessorConfig;

/// A compiled preprocessor.
#[derive(Debug, Clone)]
pub enum Preprocessor {
    /// Replace every match of `pattern` with `replacement`.
    ///
    /// In the configured replacement `$1` is group 1 even when a letter
    /// follows (`$1T$2`), a group number takes further digits only while
    /// such a group exists, `${name}` passes through and `\$` is a literal
    /// dollar. `replacement`
    /// holds the rewritten form with explicit `${N}` references.
    Regex { pattern: Regex, replacement: String },
}

impl Preprocessor {
    /// Compile a preprocessor from its configuration.
    ///
    /// An unknown type tag is a configuration defect, not a data defect.
    pub fn from_config(config: &PreprocessorConfig) -> Result<Self> {
        match config.kind.as_str() {
            "regex" => {
                let pattern = config.params.regex_match.as_deref().ok_or_else(|| {
                    RowgraphError::Config("regex preprocessor requires params.regexMatch".to_string())
                })?;
                let pattern = Regex::new(pattern)?;
                let replacement = expand_group_refs(
                    config.params.regex_replace.as_deref().unwrap_or_default(),
                    pattern.captures_len() - 1,
                );
                Ok(Preprocessor::Regex {
                    pattern,
                    replacement,
                })
            }
            other => Err(RowgraphError::UnknownPreprocessor(other.to_string())),
        }
    }

    pub fn apply(&self, value: &str) -> String {
        match self {
            Preprocessor::Regex {
                pattern,
                replacement,
            } => pattern.replace_all(value, replacement.as_str()).into_owned(),
        }
    }
}

/// Rewrite `$N` group references as `${N}` so a following word character
/// is not read as part of the group name.
fn expand_group_refs(replacement: &str, group_count: usize) -> String {
    let mut out = String::with_capacity(replacement.len() + 8);
    let mut chars = replacement.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('$') => out.push_str("$$"),
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            '$' if chars.peek() == Some(&'{') => out.push('$'),
            '$' => {
                let Some(first) = chars.peek().and_then(|d| d.to_digit(10)) else {
                    out.push_str("$$");
                    continue;
                };
                chars.next();

                let mut group = first as usize;
                while let Some(next) = chars.peek().and_then(|d| d.to_digit(10)) {
                    let candidate = group * 10 + next as usize;
                    if candidate > group_count {
                        break;
                    }
                    group = candidate;
                    chars.next();
                }
                out.push_str(&format!("${{{group}}}"));
            }
            other => out.push(other),
        }
    }
    out
}

impl PreprocessorConfig {
    /// The compiled preprocessor, built on first use and shared afterwards.
    pub fn preprocessor(&self) -> Result<&Preprocessor> {
        self.compiled
            .get_or_try_init(|| Preprocessor::from_config(self))
    }

    /// Apply the configured transform to a cleaned value.
    pub fn apply(&self, value: &str) -> Result<String> {
        Ok(self.preprocessor()?.apply(value))
    }
}
