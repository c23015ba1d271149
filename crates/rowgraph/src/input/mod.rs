//! Row tokenizing and token cleaning.

mod clean;
mod row;
mod tokenizer;

pub use clean::clean_token;
pub use row::{HeaderIndex, Row};
pub use tokenizer::{parse_record, tokenize};
