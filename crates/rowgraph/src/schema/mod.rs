//! Value types, attribute generators and migration configuration.

mod config;
mod generator;
mod types;

pub use config::{DataConfigEntry, MigrationConfig, ProcessorConfig, ProcessorType};
pub use generator::{ConceptGenerator, GeneratorMapping, PreprocessorConfig, PreprocessorParams};
pub use types::{Value, ValueType};
