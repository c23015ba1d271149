//! Value pipeline: preprocess, coerce, explode, attach.

mod coerce;
mod engine;
mod explode;
mod preprocess;

pub use coerce::{CoercionContext, coerce, parse_datetime, parse_value};
pub use engine::RowProcessor;
pub use explode::{explode, split_list};
pub use preprocess::Preprocessor;
