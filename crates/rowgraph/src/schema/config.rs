//! Migration configuration: processors and data entries.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::generator::{ConceptGenerator, GeneratorMapping};
use crate::error::{Result, RowgraphError};

/// Kind of statement a processor inserts per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorType {
    /// `$e isa <type>, has ...` with every mapped attribute.
    Entity,
    /// `$a <value> isa <type>` from the first mapping.
    Attribute,
}

/// Describes what a processor inserts and which attribute generators it offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    pub processor: String,
    pub processor_type: ProcessorType,
    /// Entity or attribute type inserted for each row.
    pub schema_type: String,
    /// Attribute generators keyed by generator key.
    #[serde(default)]
    pub attributes: IndexMap<String, ConceptGenerator>,
}

impl ProcessorConfig {
    pub fn attribute_generator(&self, key: &str) -> Option<&ConceptGenerator> {
        self.attributes.get(key)
    }
}

/// One data file and how its columns map onto a processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfigEntry {
    pub data_path: PathBuf,
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Name of the [`ProcessorConfig`] handling this file.
    pub processor: String,
    #[serde(default)]
    pub attributes: Vec<GeneratorMapping>,
}

fn default_separator() -> String {
    ",".to_string()
}

impl DataConfigEntry {
    /// The field delimiter as a single byte.
    pub fn delimiter(&self) -> Result<u8> {
        let mut chars = self.separator.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() && c != '"' && c != '\n' && c != '\r' => Ok(c as u8),
            _ => Err(RowgraphError::InvalidDelimiter(format!(
                "'{}' (must be a single ASCII character other than a quote or newline)",
                self.separator
            ))),
        }
    }
}

/// Complete migration configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationConfig {
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
    /// Data entries keyed by entry name, in migration order.
    #[serde(default)]
    pub data: IndexMap<String, DataConfigEntry>,
    /// Directory relative data paths resolve against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl MigrationConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| RowgraphError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: MigrationConfig = serde_json::from_str(&contents)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MigrationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn processor(&self, name: &str) -> Option<&ProcessorConfig> {
        self.processors.iter().find(|p| p.processor == name)
    }

    pub fn entry(&self, key: &str) -> Result<&DataConfigEntry> {
        self.data
            .get(key)
            .ok_or_else(|| RowgraphError::UnknownEntry(format!("data entry '{key}'")))
    }

    /// Processor handling a data entry.
    pub fn processor_for(&self, entry: &DataConfigEntry) -> Result<&ProcessorConfig> {
        self.processor(&entry.processor).ok_or_else(|| {
            RowgraphError::UnknownEntry(format!("processor '{}'", entry.processor))
        })
    }

    /// Data file path, resolved against the config file's directory.
    pub fn data_path(&self, entry: &DataConfigEntry) -> PathBuf {
        match &self.base_dir {
            Some(base) if entry.data_path.is_relative() => base.join(&entry.data_path),
            _ => entry.data_path.clone(),
        }
    }

    /// Check every entry before any row is read.
    ///
    /// Every defect found here would make each row fail the same way.
    pub fn validate(&self) -> Result<()> {
        for (key, entry) in &self.data {
            entry.delimiter()?;

            let processor = self.processor(&entry.processor).ok_or_else(|| {
                RowgraphError::UnknownEntry(format!(
                    "processor '{}' referenced by data entry '{key}'",
                    entry.processor
                ))
            })?;

            if processor.processor_type == ProcessorType::Attribute && entry.attributes.is_empty() {
                return Err(RowgraphError::Config(format!(
                    "data entry '{key}' uses attribute processor '{}' but maps no column",
                    processor.processor
                )));
            }

            for mapping in &entry.attributes {
                if processor.attribute_generator(&mapping.generator).is_none() {
                    return Err(RowgraphError::UnknownGenerator(mapping.generator.clone()));
                }
                if let Some(pre) = &mapping.preprocessor {
                    pre.preprocessor()?;
                }
            }
        }
        Ok(())
    }
}
