//! Row processor: applies generator mappings to one tokenized row.

use indexmap::IndexMap;

use super::coerce::{CoercionContext, coerce};
use super::explode::explode;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{Result, RowgraphError};
use crate::input::{HeaderIndex, Row, clean_token};
use crate::schema::{ConceptGenerator, GeneratorMapping};
use crate::statement::{Attachable, AttributeStatement, UnboundVariable, attach_values};

/// A mapped column's value, ready for coercion.
struct ResolvedToken<'g> {
    generator: &'g ConceptGenerator,
    value: String,
}

/// Turns the tokens of a row into attribute values on statements.
///
/// Holds only shared references, so one processor can serve rows on many
/// threads at once.
pub struct RowProcessor<'a> {
    header: &'a HeaderIndex,
    generators: &'a IndexMap<String, ConceptGenerator>,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> RowProcessor<'a> {
    pub fn new(
        header: &'a HeaderIndex,
        generators: &'a IndexMap<String, ConceptGenerator>,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            header,
            generators,
            diagnostics,
        }
    }

    /// Attach the mapped column's value(s) to `target`.
    ///
    /// When the column is missing, out of range or empty, things and
    /// relations come back unchanged and an unbound variable yields `None`.
    /// Only configuration defects are errors.
    pub fn add_attribute<T: Attachable>(
        &self,
        row: &Row,
        target: T,
        mapping: &GeneratorMapping,
    ) -> Result<Option<T::Output>> {
        let Some(resolved) = self.resolve(row, mapping)? else {
            return Ok(target.unattached());
        };

        let generator = resolved.generator;
        let ctx = self.context(row, generator);
        let values = explode(
            &resolved.value,
            mapping.list_separator(),
            generator.value_type,
            &ctx,
        );
        Ok(attach_values(target, &generator.attribute_type, values))
    }

    /// Build a free-standing attribute predicate (`$var <value>`) from the
    /// mapped column. List separators do not apply here.
    pub fn add_value(
        &self,
        row: &Row,
        var: UnboundVariable,
        mapping: &GeneratorMapping,
    ) -> Result<Option<AttributeStatement>> {
        let Some(resolved) = self.resolve(row, mapping)? else {
            return Ok(None);
        };

        let generator = resolved.generator;
        let ctx = self.context(row, generator);
        Ok(coerce(generator.value_type, &resolved.value, &ctx).map(|value| var.eq_value(value)))
    }

    /// Look up the generator and column, then clean and preprocess the token.
    fn resolve(&self, row: &Row, mapping: &GeneratorMapping) -> Result<Option<ResolvedToken<'a>>> {
        let generator = self
            .generators
            .get(&mapping.generator)
            .ok_or_else(|| RowgraphError::UnknownGenerator(mapping.generator.clone()))?;

        let Some(index) = self.header.index_of(&mapping.column_name) else {
            self.diagnostics.report(
                Diagnostic::error(
                    DiagnosticKind::MissingColumn,
                    format!(
                        "column name <{}> was not found in the file being processed",
                        mapping.column_name
                    ),
                )
                .at_line(row.line),
            );
            return Ok(None);
        };

        let cleaned = match row.token(index).map(clean_token) {
            Some(cleaned) if !cleaned.is_empty() => cleaned,
            _ => return Ok(None),
        };

        let value = match &mapping.preprocessor {
            Some(preprocessor) => {
                let processed = preprocessor.apply(&cleaned)?;
                tracing::debug!(line = row.line, value = %processed, "preprocessed value");
                processed
            }
            None => cleaned,
        };

        Ok(Some(ResolvedToken { generator, value }))
    }

    fn context<'c>(&'c self, row: &Row, generator: &'c ConceptGenerator) -> CoercionContext<'c> {
        CoercionContext {
            line: row.line,
            concept: &generator.attribute_type,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingDiagnostics, Severity};
    use crate::schema::{PreprocessorConfig, Value, ValueType};

    fn generators() -> IndexMap<String, ConceptGenerator> {
        let mut g = IndexMap::new();
        g.insert("name".to_string(), ConceptGenerator::new("name", ValueType::String));
        g.insert("age".to_string(), ConceptGenerator::new("age", ValueType::Long));
        g.insert("nick".to_string(), ConceptGenerator::new("nickname", ValueType::String));
        g
    }

    fn header() -> HeaderIndex {
        HeaderIndex::new(vec!["name".into(), "age".into(), "nicks".into()])
    }

    #[test]
    fn test_thing_gets_attribute() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse(r#""Alice ",30,"#, 2, b',', &sink);

        let thing = UnboundVariable::named("e").isa("person");
        let thing = processor
            .add_attribute(&row, thing, &GeneratorMapping::new("name", "name"))
            .unwrap()
            .unwrap();
        let thing = processor
            .add_attribute(&row, thing, &GeneratorMapping::new("age", "age"))
            .unwrap()
            .unwrap();

        assert_eq!(thing.values_of("name"), vec![&Value::from("Alice")]);
        assert_eq!(thing.values_of("age"), vec![&Value::Long(30)]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_empty_token_leaves_thing_unchanged() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse(r#"Alice,"",x"#, 2, b',', &sink);

        let thing = UnboundVariable::named("e").isa("person");
        let result = processor
            .add_attribute(&row, thing.clone(), &GeneratorMapping::new("age", "age"))
            .unwrap();
        assert_eq!(result, Some(thing));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_short_row_contributes_nothing() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice", 2, b',', &sink);

        let result = processor
            .add_attribute(&row, UnboundVariable::named("x"), &GeneratorMapping::new("age", "age"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_column_reports_error() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,30,x", 5, b',', &sink);

        let thing = UnboundVariable::named("e").isa("person");
        let result = processor
            .add_attribute(&row, thing.clone(), &GeneratorMapping::new("age", "years"))
            .unwrap();
        assert_eq!(result, Some(thing));

        let reports = sink.diagnostics();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Error);
        assert_eq!(reports[0].kind, DiagnosticKind::MissingColumn);
        assert_eq!(reports[0].line, Some(5));
    }

    #[test]
    fn test_unknown_generator_is_error() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,30,x", 2, b',', &sink);

        let err = processor
            .add_attribute(&row, UnboundVariable::named("x"), &GeneratorMapping::new("height", "age"))
            .unwrap_err();
        assert!(matches!(err, RowgraphError::UnknownGenerator(_)));
    }

    #[test]
    fn test_unbound_explodes_into_repeated_attribute() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,30,Al;;Ali; Lissy ", 2, b',', &sink);

        let mapping = GeneratorMapping::new("nick", "nicks").with_list_separator(";");
        let thing = processor
            .add_attribute(&row, UnboundVariable::named("x"), &mapping)
            .unwrap()
            .unwrap();
        assert_eq!(
            thing.values_of("nickname"),
            vec![&Value::from("Al"), &Value::from("Ali"), &Value::from("Lissy")]
        );
    }

    #[test]
    fn test_preprocessor_runs_before_coercion() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,30 years,x", 2, b',', &sink);

        let mapping = GeneratorMapping::new("age", "age")
            .with_preprocessor(PreprocessorConfig::regex(r"\s*years$", ""));
        let thing = processor
            .add_attribute(&row, UnboundVariable::named("e").isa("person"), &mapping)
            .unwrap()
            .unwrap();
        assert_eq!(thing.values_of("age"), vec![&Value::Long(30)]);
    }

    #[test]
    fn test_unknown_preprocessor_propagates() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,30,x", 2, b',', &sink);

        let mapping = GeneratorMapping::new("name", "name").with_preprocessor(
            PreprocessorConfig::new("soundex", Default::default()),
        );
        let err = processor
            .add_attribute(&row, UnboundVariable::named("e").isa("person"), &mapping)
            .unwrap_err();
        assert!(matches!(err, RowgraphError::UnknownPreprocessor(_)));
    }

    #[test]
    fn test_add_value_builds_attribute_predicate() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,30,x", 2, b',', &sink);

        let attr = processor
            .add_value(&row, UnboundVariable::named("a"), &GeneratorMapping::new("age", "age"))
            .unwrap()
            .unwrap();
        assert_eq!(attr.value, Value::Long(30));
        assert_eq!(attr.isa("age").to_string(), "$a 30 isa age");
    }

    #[test]
    fn test_add_value_invalid_is_none_with_warning() {
        let (h, g, sink) = (header(), generators(), CollectingDiagnostics::new());
        let processor = RowProcessor::new(&h, &g, &sink);
        let row = Row::parse("Alice,thirty,x", 2, b',', &sink);

        let attr = processor
            .add_value(&row, UnboundVariable::named("a"), &GeneratorMapping::new("age", "age"))
            .unwrap();
        assert!(attr.is_none());
        assert_eq!(sink.count(Severity::Warning), 1);
    }
}
