//! Delimited text input.
//!
//! Records are split by the `csv` crate; raw field bytes feed the
//! [`crate::inference`] engine, which picks a parser per column.

mod config;
mod reader;

pub use config::CsvReadConfig;
pub use reader::{infer_schema, infer_schema_from_path, read_columns, read_columns_from_path};
