//! Per-field type classification.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. empty            → [`InferredType::Null`]
//! 2. numeric pattern  → [`InferredType::Integer`] / [`InferredType::Float`]
//! 3. date patterns    → [`InferredType::Date`]
//! 4. boolean literals → [`InferredType::Boolean`]
//! 5. anything else    → [`InferredType::Text`]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shortest date accepted: `01-02-2006` or `Jan 2 2006`.
const MIN_DATE_LEN: usize = 10;
/// Longest date accepted: `September 30th, 2026`.
const MAX_DATE_LEN: usize = 20;

/// Supported date layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    /// `2006-01-02` or `2006/01/02`.
    YearMonthDay,
    /// `01-02-2006` or `01/02/2006`.
    MonthDayYear,
    /// `02-01-2006` or `02/01/2006`.
    DayMonthYear,
    /// `January 2, 2006`.
    MonthNameLong,
    /// `Jan 2, 2006`.
    MonthNameShort,
}

impl DateFormat {
    /// Returns the chrono layout used to parse this format.
    ///
    /// Numeric layouts expect both separators normalized to `/`.
    #[must_use]
    pub fn layout(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "%Y/%m/%d",
            DateFormat::MonthDayYear => "%m/%d/%Y",
            DateFormat::DayMonthYear => "%d/%m/%Y",
            DateFormat::MonthNameLong => "%B %d, %Y",
            DateFormat::MonthNameShort => "%b %d, %Y",
        }
    }

    /// Returns the byte positions of the two separators for numeric layouts.
    #[must_use]
    pub fn separator_positions(&self) -> Option<(usize, usize)> {
        match self {
            DateFormat::YearMonthDay => Some((4, 7)),
            DateFormat::MonthDayYear | DateFormat::DayMonthYear => Some((2, 5)),
            DateFormat::MonthNameLong | DateFormat::MonthNameShort => None,
        }
    }
}

/// Candidate column types a field can vote for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferredType {
    Integer,
    Float,
    Date(DateFormat),
    Boolean,
    Text,
    Null,
}

impl InferredType {
    /// Every candidate, in tie-break order: when two candidates hold the same
    /// share, the one listed first ranks higher.
    pub const ALL: [InferredType; 10] = [
        InferredType::Integer,
        InferredType::Float,
        InferredType::Date(DateFormat::YearMonthDay),
        InferredType::Date(DateFormat::MonthDayYear),
        InferredType::Date(DateFormat::DayMonthYear),
        InferredType::Date(DateFormat::MonthNameLong),
        InferredType::Date(DateFormat::MonthNameShort),
        InferredType::Boolean,
        InferredType::Text,
        InferredType::Null,
    ];

    /// Position of this candidate in [`InferredType::ALL`].
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            InferredType::Integer => 0,
            InferredType::Float => 1,
            InferredType::Date(DateFormat::YearMonthDay) => 2,
            InferredType::Date(DateFormat::MonthDayYear) => 3,
            InferredType::Date(DateFormat::DayMonthYear) => 4,
            InferredType::Date(DateFormat::MonthNameLong) => 5,
            InferredType::Date(DateFormat::MonthNameShort) => 6,
            InferredType::Boolean => 7,
            InferredType::Text => 8,
            InferredType::Null => 9,
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredType::Integer => f.write_str("integer"),
            InferredType::Float => f.write_str("float"),
            InferredType::Date(format) => write!(f, "date({format:?})"),
            InferredType::Boolean => f.write_str("boolean"),
            InferredType::Text => f.write_str("text"),
            InferredType::Null => f.write_str("null"),
        }
    }
}

/// Classifies one raw field.
#[must_use]
pub fn classify(field: &[u8]) -> InferredType {
    if field.is_empty() {
        return InferredType::Null;
    }
    if let Some(numeric) = classify_numeric(field) {
        return numeric;
    }
    if let Some(format) = classify_date(field) {
        return InferredType::Date(format);
    }
    if is_boolean(field) {
        return InferredType::Boolean;
    }
    InferredType::Text
}

/// Matches `[+-]?` then digits with at most one `.`, an optional trailing
/// `%`, and at most one `e`/`E` that is neither first nor last.
///
/// A `.` makes the field a float; everything else that matches is an integer.
#[must_use]
pub fn classify_numeric(field: &[u8]) -> Option<InferredType> {
    let body = match field.first() {
        Some(b'-' | b'+') => &field[1..],
        _ => field,
    };
    let last = body.len().checked_sub(1)?;

    let mut digits = false;
    let mut dots = 0;
    let mut exponents = 0;
    for (i, &b) in body.iter().enumerate() {
        match b {
            b'0'..=b'9' => digits = true,
            b'.' => dots += 1,
            b'%' if i == last => {}
            b'e' | b'E' if i != 0 && i != last => exponents += 1,
            _ => return None,
        }
    }

    if !digits || dots > 1 || exponents > 1 {
        return None;
    }
    if dots == 1 {
        Some(InferredType::Float)
    } else {
        Some(InferredType::Integer)
    }
}

/// Detects one of the five [`DateFormat`]s.
#[must_use]
pub fn classify_date(field: &[u8]) -> Option<DateFormat> {
    if !(MIN_DATE_LEN..=MAX_DATE_LEN).contains(&field.len()) {
        return None;
    }
    if field.len() == MIN_DATE_LEN && (is_separator(field[2]) || is_separator(field[4])) {
        return classify_numeric_date(field);
    }
    if field[0].is_ascii_alphabetic() {
        return classify_month_name_date(field);
    }
    None
}

fn classify_numeric_date(field: &[u8]) -> Option<DateFormat> {
    if is_separator(field[4]) {
        return is_separator(field[7]).then_some(DateFormat::YearMonthDay);
    }
    if !is_separator(field[5]) {
        return None;
    }
    // Month first only if the leading two bytes can be a month 01-12.
    match (field[0], field[1]) {
        (b'0', _) | (b'1', b'0'..=b'2') => Some(DateFormat::MonthDayYear),
        _ => Some(DateFormat::DayMonthYear),
    }
}

fn classify_month_name_date(field: &[u8]) -> Option<DateFormat> {
    if !field[field.len() - 4..].iter().all(u8::is_ascii_digit) {
        return None;
    }
    // "May" is three letters long in both forms; read it as the full name.
    if field[3] == b' ' && !field[..3].eq_ignore_ascii_case(b"may") {
        return Some(DateFormat::MonthNameShort);
    }
    Some(DateFormat::MonthNameLong)
}

/// Matches `t`, `f`, `true`, `false` in any letter case.
#[must_use]
pub fn is_boolean(field: &[u8]) -> bool {
    match field.len() {
        1 => matches!(field[0], b't' | b'T' | b'f' | b'F'),
        4 => field.eq_ignore_ascii_case(b"true"),
        5 => field.eq_ignore_ascii_case(b"false"),
        _ => false,
    }
}

fn is_separator(b: u8) -> bool {
    b == b'-' || b == b'/'
}
