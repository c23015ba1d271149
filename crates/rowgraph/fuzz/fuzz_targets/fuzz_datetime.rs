//! Fuzz target for value coercion.
//!
//! Every value type must either parse or report exactly one warning.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rowgraph::transform::{CoercionContext, coerce, parse_datetime};
use rowgraph::{CollectingDiagnostics, ValueType};

fuzz_target!(|data: &[u8]| {
    if data.len() > 1_000 {
        return;
    }

    if let Ok(value) = std::str::from_utf8(data) {
        let _ = parse_datetime(value);

        for value_type in ValueType::ALL {
            let sink = CollectingDiagnostics::new();
            let ctx = CoercionContext {
                line: 1,
                concept: "fuzz",
                diagnostics: &sink,
            };
            match coerce(value_type, value, &ctx) {
                Some(_) => assert!(sink.is_empty()),
                None => assert_eq!(sink.diagnostics().len(), 1),
            }
        }
    }
});
