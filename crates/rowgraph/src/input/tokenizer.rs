//! Single-row CSV tokenizer with quoting recovery.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{Result, RowgraphError};

const QUOTE: u8 = b'"';

/// Split one raw row into tokens.
///
/// Rows that break RFC 4180 quoting are retried once with every `"`
/// escaped as `\"`. If that also fails the row degenerates to a single
/// empty token, so no mapping will find a value in it.
pub fn tokenize(row: &str, delimiter: u8, diagnostics: &dyn Diagnostics) -> Vec<String> {
    if row.is_empty() {
        return vec![String::new()];
    }

    let error = match parse_record(row, delimiter) {
        Ok(tokens) => return tokens,
        Err(e) => e,
    };

    diagnostics.report(Diagnostic::warning(
        DiagnosticKind::QuotingRecovered,
        format!("row <{row}> does not conform to RFC 4180, escaping all quotes and retrying: {error}"),
    ));

    let escaped = row.replace('"', "\\\"");
    match parse_record(&escaped, delimiter) {
        Ok(tokens) => tokens,
        Err(e) => {
            diagnostics.report(Diagnostic::error(
                DiagnosticKind::QuotingUnrecoverable,
                format!("cannot insert row <{row}>: not RFC 4180 and escaping quotes did not fix it: {e}"),
            ));
            vec![String::new()]
        }
    }
}

/// Parse a row strictly as one RFC 4180 record.
///
/// The `csv` reader accepts any quoting, so the row is checked first.
pub fn parse_record(row: &str, delimiter: u8) -> Result<Vec<String>> {
    check_quoting(row.as_bytes(), delimiter)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quote(QUOTE)
        .from_reader(row.as_bytes());

    let mut record = csv::StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(record.iter().map(|s| s.to_string()).collect())
    } else {
        Ok(vec![String::new()])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// Saw a quote inside a quoted field: either `""` or the closing quote.
    QuoteInQuoted,
    /// Whitespace after a closing quote.
    AfterQuoted,
}

/// Verify quoting: a field opened with `"` must be closed, and only
/// whitespace may sit between the closing quote and the next delimiter.
/// Quotes inside unquoted fields are literal.
fn check_quoting(row: &[u8], delimiter: u8) -> Result<()> {
    let mut state = QuoteState::FieldStart;

    for (position, &byte) in row.iter().enumerate() {
        state = match state {
            QuoteState::FieldStart if byte == QUOTE => QuoteState::Quoted,
            QuoteState::FieldStart | QuoteState::Unquoted => {
                if byte == delimiter {
                    QuoteState::FieldStart
                } else {
                    QuoteState::Unquoted
                }
            }
            QuoteState::Quoted => {
                if byte == QUOTE {
                    QuoteState::QuoteInQuoted
                } else {
                    QuoteState::Quoted
                }
            }
            QuoteState::QuoteInQuoted | QuoteState::AfterQuoted => {
                if byte == QUOTE && state == QuoteState::QuoteInQuoted {
                    QuoteState::Quoted
                } else if byte == delimiter {
                    QuoteState::FieldStart
                } else if byte.is_ascii_whitespace() {
                    QuoteState::AfterQuoted
                } else {
                    return Err(RowgraphError::Quoting {
                        position,
                        message: "invalid character between closing quote and delimiter".to_string(),
                    });
                }
            }
        };
    }

    if state == QuoteState::Quoted {
        return Err(RowgraphError::Quoting {
            position: row.len(),
            message: "end of row reached inside a quoted field".to_string(),
        });
    }

    Ok(())
}
