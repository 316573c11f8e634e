//! Field parsers.
//!
//! Every parser takes a raw byte field and yields either a typed value or
//! [`ParsedValue::Null`]. Malformed input never errors.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::classify::{DateFormat, InferredType};
use crate::types::LogicalType;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const SECONDS_PER_DAY: i64 = 86_400;

/// Integer literals at least this long are parsed as 64-bit.
const WIDE_INTEGER_LEN: usize = 10;

/// Fraction digits beyond this count no longer change an `f64`.
const MAX_FRACTION_DIGITS: u32 = 18;

/// Result of parsing one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue<'a> {
    Null,
    Int32(i32),
    Int64(i64),
    Float64(f64),
    /// Days since 1970-01-01.
    Date(i32),
    /// Seconds since 1970-01-01T00:00:00Z.
    Timestamp(i64),
    Bool(bool),
    Bytes(&'a [u8]),
}

impl ParsedValue<'_> {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ParsedValue::Null)
    }
}

/// A bare parse function.
pub type ParseFn = for<'a> fn(&'a [u8]) -> ParsedValue<'a>;

/// The parser selected for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldParser {
    Int32,
    Int64,
    Float64,
    Date(DateFormat),
    Boolean,
    Text,
}

impl FieldParser {
    /// Picks the parser for an inferred type.
    ///
    /// `max_len` is the longest field observed; integer columns whose literals
    /// reach ten bytes get the 64-bit parser.
    #[must_use]
    pub fn for_type(inferred: InferredType, max_len: usize) -> Self {
        match inferred {
            InferredType::Integer if max_len < WIDE_INTEGER_LEN => FieldParser::Int32,
            InferredType::Integer => FieldParser::Int64,
            InferredType::Float => FieldParser::Float64,
            InferredType::Date(format) => FieldParser::Date(format),
            InferredType::Boolean => FieldParser::Boolean,
            InferredType::Text | InferredType::Null => FieldParser::Text,
        }
    }

    /// Logical type of the vectors this parser fills.
    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        match self {
            FieldParser::Int32 => LogicalType::Int32,
            FieldParser::Int64 => LogicalType::Int64,
            FieldParser::Float64 => LogicalType::Float64,
            FieldParser::Date(
                DateFormat::YearMonthDay | DateFormat::MonthDayYear | DateFormat::DayMonthYear,
            ) => LogicalType::Date,
            FieldParser::Date(DateFormat::MonthNameLong | DateFormat::MonthNameShort) => {
                LogicalType::Timestamp
            }
            FieldParser::Boolean => LogicalType::Bool,
            FieldParser::Text => LogicalType::String,
        }
    }

    /// Returns the bare function handle for this parser.
    #[must_use]
    pub fn function(&self) -> ParseFn {
        match self {
            FieldParser::Int32 => parse_int32,
            FieldParser::Int64 => parse_int64,
            FieldParser::Float64 => parse_float64,
            FieldParser::Date(DateFormat::YearMonthDay) => parse_year_month_day,
            FieldParser::Date(DateFormat::MonthDayYear) => parse_month_day_year,
            FieldParser::Date(DateFormat::DayMonthYear) => parse_day_month_year,
            FieldParser::Date(DateFormat::MonthNameLong) => parse_month_name_long,
            FieldParser::Date(DateFormat::MonthNameShort) => parse_month_name_short,
            FieldParser::Boolean => parse_boolean,
            FieldParser::Text => parse_text,
        }
    }

    /// Parses one field.
    #[must_use]
    pub fn parse<'a>(&self, field: &'a [u8]) -> ParsedValue<'a> {
        (self.function())(field)
    }
}

fn split_sign(field: &[u8]) -> (bool, &[u8]) {
    match field.first() {
        Some(b'-') => (true, &field[1..]),
        Some(b'+') => (false, &field[1..]),
        _ => (false, field),
    }
}

/// Accumulates decimal digits with wrapping arithmetic.
fn parse_wrapping_i64(field: &[u8]) -> Option<i64> {
    let (negative, digits) = split_sign(field);
    if digits.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.wrapping_mul(10).wrapping_add(i64::from(b - b'0'));
    }
    Some(if negative { value.wrapping_neg() } else { value })
}

#[must_use]
pub fn parse_int32(field: &[u8]) -> ParsedValue<'_> {
    // Truncating the 64-bit accumulator equals accumulating in 32 bits.
    parse_wrapping_i64(field).map_or(ParsedValue::Null, |v| ParsedValue::Int32(v as i32))
}

#[must_use]
pub fn parse_int64(field: &[u8]) -> ParsedValue<'_> {
    parse_wrapping_i64(field).map_or(ParsedValue::Null, ParsedValue::Int64)
}

/// Parses `[+-]?digits[.digits]`. Percent signs and exponents yield null.
#[must_use]
pub fn parse_float64(field: &[u8]) -> ParsedValue<'_> {
    let (negative, body) = split_sign(field);

    let mut whole = 0.0_f64;
    let mut fraction = 0.0_f64;
    let mut scale = 1.0_f64;
    let mut fraction_digits = 0_u32;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for &b in body {
        match b {
            b'0'..=b'9' => {
                seen_digit = true;
                let digit = f64::from(b - b'0');
                if !seen_dot {
                    whole = whole * 10.0 + digit;
                } else if fraction_digits < MAX_FRACTION_DIGITS {
                    fraction = fraction * 10.0 + digit;
                    scale *= 10.0;
                    fraction_digits += 1;
                }
            }
            b'.' if !seen_dot => seen_dot = true,
            _ => return ParsedValue::Null,
        }
    }
    if !seen_digit {
        return ParsedValue::Null;
    }

    let value = whole + fraction / scale;
    ParsedValue::Float64(if negative { -value } else { value })
}

fn parse_numeric_date(field: &[u8], format: DateFormat) -> Option<i32> {
    let (first, second) = format.separator_positions()?;
    let mut buf: [u8; 10] = field.try_into().ok()?;
    buf[first] = b'/';
    buf[second] = b'/';
    let text = std::str::from_utf8(&buf).ok()?;
    let date = NaiveDate::parse_from_str(text, format.layout()).ok()?;
    Some(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
}

fn parse_month_name_date(field: &[u8], format: DateFormat) -> Option<i64> {
    let text = std::str::from_utf8(field).ok()?;
    let date = NaiveDate::parse_from_str(text, format.layout()).ok()?;
    let days = i64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE);
    Some(days * SECONDS_PER_DAY)
}

#[must_use]
pub fn parse_year_month_day(field: &[u8]) -> ParsedValue<'_> {
    parse_numeric_date(field, DateFormat::YearMonthDay).map_or(ParsedValue::Null, ParsedValue::Date)
}

#[must_use]
pub fn parse_month_day_year(field: &[u8]) -> ParsedValue<'_> {
    parse_numeric_date(field, DateFormat::MonthDayYear).map_or(ParsedValue::Null, ParsedValue::Date)
}

#[must_use]
pub fn parse_day_month_year(field: &[u8]) -> ParsedValue<'_> {
    parse_numeric_date(field, DateFormat::DayMonthYear).map_or(ParsedValue::Null, ParsedValue::Date)
}

#[must_use]
pub fn parse_month_name_long(field: &[u8]) -> ParsedValue<'_> {
    parse_month_name_date(field, DateFormat::MonthNameLong)
        .map_or(ParsedValue::Null, ParsedValue::Timestamp)
}

#[must_use]
pub fn parse_month_name_short(field: &[u8]) -> ParsedValue<'_> {
    parse_month_name_date(field, DateFormat::MonthNameShort)
        .map_or(ParsedValue::Null, ParsedValue::Timestamp)
}

/// Accepts `t`, `true`, `f`, `false` in any letter case.
#[must_use]
pub fn parse_boolean(field: &[u8]) -> ParsedValue<'_> {
    if field.eq_ignore_ascii_case(b"t") || field.eq_ignore_ascii_case(b"true") {
        ParsedValue::Bool(true)
    } else if field.eq_ignore_ascii_case(b"f") || field.eq_ignore_ascii_case(b"false") {
        ParsedValue::Bool(false)
    } else {
        ParsedValue::Null
    }
}

/// Passes the bytes through; only the empty field is null.
#[must_use]
pub fn parse_text(field: &[u8]) -> ParsedValue<'_> {
    if field.is_empty() {
        ParsedValue::Null
    } else {
        ParsedValue::Bytes(field)
    }
}
