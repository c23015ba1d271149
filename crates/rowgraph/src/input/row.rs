//! Header and row representations.

use serde::{Deserialize, Serialize};

use super::tokenizer::tokenize;
use crate::diagnostics::Diagnostics;
use crate::error::{Result, RowgraphError};

/// Column names of a data file, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderIndex {
    pub columns: Vec<String>,
}

impl HeaderIndex {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Tokenize a header line.
    pub fn parse(line: &str, delimiter: u8, diagnostics: &dyn Diagnostics) -> Self {
        Self::new(tokenize(line, delimiter, diagnostics))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Positions of several columns, in the order the names are given.
    pub fn indices_of<S: AsRef<str>>(&self, names: &[S]) -> Vec<Option<usize>> {
        names.iter().map(|n| self.index_of(n.as_ref())).collect()
    }
}

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Line number in the source file (1-based), for diagnostics.
    pub line: usize,
    /// The line as read.
    pub raw: String,
    /// Tokens as split by the tokenizer, not yet cleaned.
    pub tokens: Vec<String>,
}

impl Row {
    /// Tokenize a raw line.
    pub fn parse(raw: &str, line: usize, delimiter: u8, diagnostics: &dyn Diagnostics) -> Self {
        Self {
            line,
            raw: raw.to_string(),
            tokens: tokenize(raw, delimiter, diagnostics),
        }
    }

    /// Raw token at a position.
    pub fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    /// Reject rows with more tokens than the header has columns.
    ///
    /// Fewer tokens is fine: the missing trailing columns are simply absent.
    pub fn ensure_width(&self, expected: usize) -> Result<()> {
        if self.tokens.len() > expected {
            return Err(RowgraphError::MalformedRow {
                line: self.line,
                row: self.raw.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;

    fn header() -> HeaderIndex {
        HeaderIndex::new(vec!["id".into(), "name".into(), "age".into()])
    }

    #[test]
    fn test_index_of() {
        let h = header();
        assert_eq!(h.index_of("name"), Some(1));
        assert_eq!(h.index_of("missing"), None);
        assert_eq!(h.index_of("Name"), None);
    }

    #[test]
    fn test_indices_of_preserves_order() {
        let h = header();
        assert_eq!(
            h.indices_of(&["age", "nope", "id"]),
            vec![Some(2), None, Some(0)]
        );
    }

    #[test]
    fn test_header_parse() {
        let sink = CollectingDiagnostics::new();
        let h = HeaderIndex::parse("id;\"full name\";age", b';', &sink);
        assert_eq!(h.columns, vec!["id", "full name", "age"]);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn test_ensure_width() {
        let sink = CollectingDiagnostics::new();
        let ok = Row::parse("1,Alice", 2, b',', &sink);
        assert!(ok.ensure_width(3).is_ok());

        let wide = Row::parse("1,Alice,30,extra", 3, b',', &sink);
        match wide.ensure_width(3) {
            Err(RowgraphError::MalformedRow { line, row }) => {
                assert_eq!(line, 3);
                assert_eq!(row, "1,Alice,30,extra");
            }
            other => panic!("expected malformed row, got {:?}", other),
        }
    }

    #[test]
    fn test_token_out_of_range() {
        let sink = CollectingDiagnostics::new();
        let row = Row::parse("a", 1, b',', &sink);
        assert_eq!(row.token(0), Some("a"));
        assert_eq!(row.token(5), None);
    }
}
