//! Conversion into Apache Arrow arrays.
//!
//! Validity bitmaps share Arrow's layout (LSB-first, 1 = valid), so bitmap
//! bytes are handed over as-is. String vectors map to `LargeBinary`, which
//! has the same `i64` offsets and makes no UTF-8 promise.

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, LargeBinaryArray, PrimitiveArray};
use arrow::buffer::{BooleanBuffer, Buffer, NullBuffer, OffsetBuffer, ScalarBuffer};
use arrow::datatypes::{
    ArrowNativeType, ArrowPrimitiveType, DataType as ArrowDataType, Date32Type, Field,
    Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema, TimeUnit,
    TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::types::LogicalType;
use crate::vector::{Column, NumericType, NumericVector, ValidityBitmap, Vector};

impl LogicalType {
    /// The Arrow type a vector of this logical type converts to.
    #[must_use]
    pub fn to_arrow(self) -> ArrowDataType {
        match self {
            LogicalType::Bool => ArrowDataType::Boolean,
            LogicalType::UInt8 => ArrowDataType::UInt8,
            LogicalType::Int8 => ArrowDataType::Int8,
            LogicalType::UInt16 => ArrowDataType::UInt16,
            LogicalType::Int16 => ArrowDataType::Int16,
            LogicalType::UInt32 => ArrowDataType::UInt32,
            LogicalType::Int32 => ArrowDataType::Int32,
            LogicalType::UInt64 => ArrowDataType::UInt64,
            LogicalType::Int64 => ArrowDataType::Int64,
            LogicalType::Float32 => ArrowDataType::Float32,
            LogicalType::Float64 => ArrowDataType::Float64,
            LogicalType::String => ArrowDataType::LargeBinary,
            LogicalType::Date => ArrowDataType::Date32,
            LogicalType::Timestamp => ArrowDataType::Timestamp(TimeUnit::Second, None),
        }
    }
}

impl Vector {
    /// Converts into an Arrow array, copying the buffers once.
    ///
    /// # Errors
    ///
    /// Returns [`crate::KolumnError::Arrow`] if Arrow rejects the buffers.
    pub fn to_arrow(&self) -> Result<ArrayRef> {
        let array: ArrayRef = match self {
            Vector::UInt8(v) => primitive::<UInt8Type, _>(v)?,
            Vector::Int8(v) => primitive::<Int8Type, _>(v)?,
            Vector::UInt16(v) => primitive::<UInt16Type, _>(v)?,
            Vector::Int16(v) => primitive::<Int16Type, _>(v)?,
            Vector::UInt32(v) => primitive::<UInt32Type, _>(v)?,
            Vector::Int32(v) => primitive::<Int32Type, _>(v)?,
            Vector::UInt64(v) => primitive::<UInt64Type, _>(v)?,
            Vector::Int64(v) => primitive::<Int64Type, _>(v)?,
            Vector::Float32(v) => primitive::<Float32Type, _>(v)?,
            Vector::Float64(v) => primitive::<Float64Type, _>(v)?,
            Vector::Date(v) => primitive::<Date32Type, _>(v)?,
            Vector::Timestamp(v) => primitive::<TimestampSecondType, _>(v)?,
            Vector::Bool(v) => {
                let values = BooleanBuffer::new(Buffer::from_vec(v.data().to_vec()), 0, v.len());
                Arc::new(BooleanArray::new(values, null_buffer(v.validity())))
            }
            Vector::String(v) => {
                let offsets = OffsetBuffer::new(ScalarBuffer::from(v.offsets().to_vec()));
                let values = Buffer::from_vec(v.data().to_vec());
                Arc::new(LargeBinaryArray::try_new(offsets, values, null_buffer(v.validity()))?)
            }
        };
        Ok(array)
    }
}

/// Packs named columns into one Arrow record batch.
///
/// # Errors
///
/// Returns [`crate::KolumnError::Arrow`] if the columns differ in length.
pub fn columns_to_record_batch(columns: &[Column]) -> Result<RecordBatch> {
    let fields: Vec<Field> = columns
        .iter()
        .map(|c| Field::new(c.name.as_str(), c.vector.logical_type().to_arrow(), true))
        .collect();
    let arrays = columns
        .iter()
        .map(|c| c.vector.to_arrow())
        .collect::<Result<Vec<_>>>()?;
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn primitive<A, T>(v: &NumericVector<T>) -> Result<ArrayRef>
where
    A: ArrowPrimitiveType<Native = T>,
    T: NumericType + ArrowNativeType,
{
    let values = ScalarBuffer::from(v.values().to_vec());
    let array = PrimitiveArray::<A>::try_new(values, null_buffer(v.validity()))?;
    Ok(Arc::new(array))
}

/// Arrow omits the null buffer when nothing is null.
fn null_buffer(validity: &ValidityBitmap) -> Option<NullBuffer> {
    if validity.null_count() == 0 {
        return None;
    }
    let bits = BooleanBuffer::new(Buffer::from_vec(validity.as_bytes().to_vec()), 0, validity.len());
    Some(NullBuffer::new(bits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Date32Array, Float64Array, Int32Array, TimestampSecondArray};

    use crate::vector::{BooleanVector, StringVector};

    #[test]
    fn test_numeric_to_arrow() {
        let v: Vector = NumericVector::from_values(vec![1i32, 0, 3], &[true, false, true])
            .unwrap()
            .into();
        let array = v.to_arrow().unwrap();
        let ints = array.as_any().downcast_ref::<Int32Array>().unwrap();
        assert_eq!(ints.len(), 3);
        assert_eq!(ints.null_count(), 1);
        assert_eq!(ints.value(0), 1);
        assert!(ints.is_null(1));
        assert_eq!(ints.value(2), 3);
    }

    #[test]
    fn test_all_valid_has_no_null_buffer() {
        let v: Vector = NumericVector::all_valid(vec![1.5f64, 2.5]).into();
        let array = v.to_arrow().unwrap();
        assert!(array.nulls().is_none());
        let floats = array.as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(floats.value(1), 2.5);
    }

    #[test]
    fn test_boolean_to_arrow() {
        let v: Vector = BooleanVector::from_bools(&[true, false, true], &[true, true, false])
            .unwrap()
            .into();
        let array = v.to_arrow().unwrap();
        let bools = array.as_any().downcast_ref::<BooleanArray>().unwrap();
        assert!(bools.value(0));
        assert!(!bools.value(1));
        assert!(bools.is_null(2));
    }

    #[test]
    fn test_string_to_large_binary() {
        let v: Vector = StringVector::from_strings(&["ab", "", "cde"], &[true, false, true])
            .unwrap()
            .into();
        let array = v.to_arrow().unwrap();
        assert_eq!(array.data_type(), &ArrowDataType::LargeBinary);
        let strings = array.as_any().downcast_ref::<LargeBinaryArray>().unwrap();
        assert_eq!(strings.value(0), b"ab");
        assert!(strings.is_null(1));
        assert_eq!(strings.value(2), b"cde");
    }

    #[test]
    fn test_temporal_to_arrow() {
        let dates: Vector = NumericVector::dates(vec![0, 1], ValidityBitmap::new_valid(2))
            .unwrap()
            .into();
        let array = dates.to_arrow().unwrap();
        assert_eq!(array.as_any().downcast_ref::<Date32Array>().unwrap().value(1), 1);

        let stamps: Vector = NumericVector::timestamps(vec![86_400], ValidityBitmap::new_valid(1))
            .unwrap()
            .into();
        let array = stamps.to_arrow().unwrap();
        assert_eq!(
            array.data_type(),
            &ArrowDataType::Timestamp(TimeUnit::Second, None)
        );
        let secs = array.as_any().downcast_ref::<TimestampSecondArray>().unwrap();
        assert_eq!(secs.value(0), 86_400);
    }

    #[test]
    fn test_record_batch() {
        let columns = vec![
            Column::new("id", NumericVector::all_valid(vec![1i32, 2]).into()),
            Column::new("name", StringVector::all_valid(&["a", "b"]).into()),
        ];
        let batch = columns_to_record_batch(&columns).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(1).name(), "name");
        assert_eq!(batch.schema().field(1).data_type(), &ArrowDataType::LargeBinary);
    }

    #[test]
    fn test_record_batch_length_mismatch() {
        let columns = vec![
            Column::new("a", NumericVector::all_valid(vec![1i32, 2]).into()),
            Column::new("b", NumericVector::all_valid(vec![1i32]).into()),
        ];
        assert!(columns_to_record_batch(&columns).is_err());
    }
}
