//! Fuzz target for the row tokenizer.
//!
//! The tokenizer must never panic and must always yield at least one
//! token, including after quoting recovery.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rowgraph::CollectingDiagnostics;
use rowgraph::input::{clean_token, tokenize};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }
    let Some((&delimiter, rest)) = data.split_first() else {
        return;
    };
    if !delimiter.is_ascii() || delimiter == b'"' || delimiter == b'\n' || delimiter == b'\r' {
        return;
    }

    if let Ok(row) = std::str::from_utf8(rest) {
        let sink = CollectingDiagnostics::new();
        let tokens = tokenize(row, delimiter, &sink);
        assert!(!tokens.is_empty());
        for token in &tokens {
            let _ = clean_token(token);
        }
    }
});
