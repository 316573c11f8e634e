//! Typed column assembly from raw fields.

use super::parse::{FieldParser, ParsedValue};
use crate::error::Result;
use crate::types::LogicalType;
use crate::vector::{BooleanVector, Column, NumericVector, StringVector, ValidityBitmap, Vector};

enum Values {
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Date(Vec<i32>),
    Timestamp(Vec<i64>),
    Bool(Vec<bool>),
    Bytes { data: Vec<u8>, offsets: Vec<i64> },
}

impl Values {
    fn with_capacity(logical_type: LogicalType, capacity: usize) -> Self {
        match logical_type {
            LogicalType::Int32 => Values::Int32(Vec::with_capacity(capacity)),
            LogicalType::Int64 => Values::Int64(Vec::with_capacity(capacity)),
            LogicalType::Float64 => Values::Float64(Vec::with_capacity(capacity)),
            LogicalType::Date => Values::Date(Vec::with_capacity(capacity)),
            LogicalType::Timestamp => Values::Timestamp(Vec::with_capacity(capacity)),
            LogicalType::Bool => Values::Bool(Vec::with_capacity(capacity)),
            _ => {
                let mut offsets = Vec::with_capacity(capacity + 1);
                offsets.push(0);
                Values::Bytes {
                    data: Vec::new(),
                    offsets,
                }
            }
        }
    }

    /// Appends a parsed value; returns false if it was stored as a null slot.
    fn push(&mut self, value: ParsedValue<'_>) -> bool {
        match (self, value) {
            (Values::Int32(v), ParsedValue::Int32(x)) | (Values::Date(v), ParsedValue::Date(x)) => {
                v.push(x);
            }
            (Values::Int64(v), ParsedValue::Int64(x))
            | (Values::Timestamp(v), ParsedValue::Timestamp(x)) => v.push(x),
            (Values::Float64(v), ParsedValue::Float64(x)) => v.push(x),
            (Values::Bool(v), ParsedValue::Bool(x)) => v.push(x),
            (Values::Bytes { data, offsets }, ParsedValue::Bytes(x)) => {
                data.extend_from_slice(x);
                offsets.push(data.len() as i64);
            }
            (values, _) => {
                values.push_null();
                return false;
            }
        }
        true
    }

    fn push_null(&mut self) {
        match self {
            Values::Int32(v) | Values::Date(v) => v.push(0),
            Values::Int64(v) | Values::Timestamp(v) => v.push(0),
            Values::Float64(v) => v.push(0.0),
            Values::Bool(v) => v.push(false),
            Values::Bytes { data, offsets } => offsets.push(data.len() as i64),
        }
    }
}

/// Accumulates parsed fields into a typed [`Vector`].
///
/// Fields the parser rejects become null slots; nothing here fails per field.
pub struct ColumnBuilder {
    parser: FieldParser,
    values: Values,
    validity: Vec<bool>,
}

impl ColumnBuilder {
    #[must_use]
    pub fn new(parser: FieldParser) -> Self {
        Self::with_capacity(parser, 0)
    }

    #[must_use]
    pub fn with_capacity(parser: FieldParser, capacity: usize) -> Self {
        Self {
            parser,
            values: Values::with_capacity(parser.logical_type(), capacity),
            validity: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn parser(&self) -> FieldParser {
        self.parser
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validity.is_empty()
    }

    /// Parses and appends one raw field.
    pub fn push_field(&mut self, field: &[u8]) {
        let valid = self.values.push(self.parser.parse(field));
        self.validity.push(valid);
    }

    pub fn push_null(&mut self) {
        self.values.push_null();
        self.validity.push(false);
    }

    /// Finalizes the accumulated values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KolumnError::InvalidVector`] if the buffers disagree
    /// in length, which the builder never produces.
    pub fn finish(self) -> Result<Vector> {
        let validity = ValidityBitmap::from_bools(&self.validity);
        let vector: Vector = match self.values {
            Values::Int32(v) => NumericVector::new(v, validity)?.into(),
            Values::Int64(v) => NumericVector::new(v, validity)?.into(),
            Values::Float64(v) => NumericVector::new(v, validity)?.into(),
            Values::Date(v) => Vector::Date(NumericVector::dates(v, validity)?),
            Values::Timestamp(v) => Vector::Timestamp(NumericVector::timestamps(v, validity)?),
            Values::Bool(v) => BooleanVector::from_bools(&v, &self.validity)?.into(),
            Values::Bytes { data, offsets } => {
                StringVector::try_from_parts(data, offsets, validity)?.into()
            }
        };
        Ok(vector)
    }
}

/// Parses every field of one column with `parser`.
///
/// # Errors
///
/// See [`ColumnBuilder::finish`].
pub fn build_column<'a, I>(name: impl Into<String>, parser: FieldParser, fields: I) -> Result<Column>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let fields = fields.into_iter();
    let mut builder = ColumnBuilder::with_capacity(parser, fields.size_hint().0);
    for field in fields {
        builder.push_field(field);
    }
    Ok(Column::new(name, builder.finish()?))
}
