//! Type inference for delimited text.
//!
//! Each sampled field is classified and votes for a candidate type. A
//! [`ColumnInference`] keeps the votes for one column; tallies built on
//! separate shards merge before the decision. The decision picks a
//! [`FieldParser`], and a [`ColumnBuilder`] turns raw fields into a typed
//! [`crate::vector::Vector`].

mod builder;
mod classify;
mod parse;
mod schema;
mod tally;

pub use builder::{build_column, ColumnBuilder};
pub use classify::{classify, classify_date, classify_numeric, is_boolean, DateFormat, InferredType};
pub use parse::{
    parse_boolean, parse_day_month_year, parse_float64, parse_int32, parse_int64,
    parse_month_day_year, parse_month_name_long, parse_month_name_short, parse_text,
    parse_year_month_day, FieldParser, ParseFn, ParsedValue,
};
pub use schema::{ColumnSchema, Schema};
pub use tally::{merge_columns, ColumnInference};
