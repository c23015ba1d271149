//! Attribute generators and their column bindings.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use super::types::ValueType;
use crate::transform::Preprocessor;

/// Target attribute of a generator, resolved by generator key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptGenerator {
    /// Attribute type name in the graph schema.
    pub attribute_type: String,
    pub value_type: ValueType,
}

impl ConceptGenerator {
    pub fn new(attribute_type: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            attribute_type: attribute_type.into(),
            value_type,
        }
    }
}

/// Binds one column of a data file to an attribute generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorMapping {
    /// Key of the [`ConceptGenerator`] in the processor.
    pub generator: String,
    pub column_name: String,
    /// Literal separator for multi-valued columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessor: Option<PreprocessorConfig>,
}

impl GeneratorMapping {
    pub fn new(generator: impl Into<String>, column_name: impl Into<String>) -> Self {
        Self {
            generator: generator.into(),
            column_name: column_name.into(),
            list_separator: None,
            preprocessor: None,
        }
    }

    pub fn with_list_separator(mut self, separator: impl Into<String>) -> Self {
        self.list_separator = Some(separator.into());
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: PreprocessorConfig) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// The list separator, if set and non-empty.
    pub fn list_separator(&self) -> Option<&str> {
        self.list_separator.as_deref().filter(|s| !s.is_empty())
    }
}

/// Text transform applied to a cleaned token before type coercion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// Processor type tag, e.g. `"regex"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: PreprocessorParams,
    #[serde(skip)]
    pub(crate) compiled: OnceCell<Preprocessor>,
}

impl PreprocessorConfig {
    pub fn new(kind: impl Into<String>, params: PreprocessorParams) -> Self {
        Self {
            kind: kind.into(),
            params,
            compiled: OnceCell::new(),
        }
    }

    /// A `"regex"` preprocessor replacing every match of `pattern`.
    pub fn regex(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::new(
            "regex",
            PreprocessorParams {
                regex_match: Some(pattern.into()),
                regex_replace: Some(replacement.into()),
            },
        )
    }
}

/// Type-specific preprocessor parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessorParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_match: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_replace: Option<String>,
}
