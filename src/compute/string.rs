//! Append and concatenation kernels over [`StringVector`]s.
//!
//! The output payload size is known up front, and every element's new
//! offset is a pure function of the old offsets and its index:
//!
//! - append: `new[i] = old[i] + i * lit.len()`
//! - concat: `new[i] = x[i] + y[i] + i * sep.len()`
//!
//! so each worker can compute the exact byte range of its chunk and write
//! it without looking at any other worker's output.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{KolumnError, Result};
use crate::vector::{bitmap_byte_len, StringVector, ValidityBitmap};

use super::chunk::{split_disjoint_mut, ChunkRange};
use super::ComputeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Prefix,
    Suffix,
}

/// Returns a vector where every element is `lit + element`.
///
/// Null elements keep their null flag; their payload is still rewritten.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn add_prefix(ctx: &ComputeContext, x: &StringVector, lit: &[u8]) -> Result<StringVector> {
    Ok(append_literal(ctx, x, lit, Placement::Prefix))
}

/// Returns a vector where every element is `element + lit`.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn add_suffix(ctx: &ComputeContext, x: &StringVector, lit: &[u8]) -> Result<StringVector> {
    Ok(append_literal(ctx, x, lit, Placement::Suffix))
}

/// Returns `x[i] + sep + y[i]` for every `i`.
///
/// An output element is null if either input element is null.
///
/// # Errors
///
/// Returns [`KolumnError::LengthMismatch`] if the vectors differ in length.
pub fn concat(
    ctx: &ComputeContext,
    x: &StringVector,
    y: &StringVector,
    sep: &[u8],
) -> Result<StringVector> {
    if x.len() != y.len() {
        return Err(KolumnError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    let n = x.len();
    debug!(op = "concat", len = n, workers = ctx.num_workers(), "string kernel");

    let (x_off, y_off) = (x.offsets(), y.offsets());
    let stride = sep.len();
    let new_offset = |i: usize| x_off[i] as usize + y_off[i] as usize + i * stride;

    let total = x.data().len() + y.data().len() + n * stride;
    let bitmap_len = bitmap_byte_len(n);
    let mut data = vec![0u8; total];
    let mut offsets = vec![0i64; n + 1];
    let mut bits = vec![0u8; bitmap_len];

    let chunks = ctx.plan(n);
    let data_parts = split_disjoint_mut(
        &mut data,
        chunks.iter().map(|c| new_offset(c.start)..new_offset(c.stop)),
    );
    let offset_parts = split_disjoint_mut(&mut offsets[..n], chunks.iter().map(ChunkRange::range));
    let bit_parts = split_disjoint_mut(
        &mut bits,
        chunks.iter().map(|c| c.byte_range(bitmap_len)),
    );

    let (x_bits, y_bits) = (x.validity().as_bytes(), y.validity().as_bytes());

    ctx.install(|| {
        chunks
            .par_iter()
            .zip(data_parts)
            .zip(offset_parts)
            .zip(bit_parts)
            .with_max_len(1)
            .for_each(|(((chunk, out), out_offsets), out_bits)| {
                let base = new_offset(chunk.start);
                for (local, i) in chunk.range().enumerate() {
                    let start = new_offset(i);
                    out_offsets[local] = start as i64;

                    let (left, right) = (x.value(i), y.value(i));
                    let mut pos = start - base;
                    out[pos..pos + left.len()].copy_from_slice(left);
                    pos += left.len();
                    out[pos..pos + stride].copy_from_slice(sep);
                    pos += stride;
                    out[pos..pos + right.len()].copy_from_slice(right);
                }

                let bytes = chunk.byte_range(bitmap_len);
                for ((o, &a), &b) in out_bits
                    .iter_mut()
                    .zip(&x_bits[bytes.clone()])
                    .zip(&y_bits[bytes])
                {
                    *o = a & b;
                }
            });
    });

    offsets[n] = total as i64;
    let validity = ValidityBitmap::from_computed(bits, n);
    Ok(StringVector::from_parts(data, offsets, validity))
}

fn append_literal(
    ctx: &ComputeContext,
    x: &StringVector,
    lit: &[u8],
    placement: Placement,
) -> StringVector {
    let n = x.len();
    debug!(op = ?placement, len = n, workers = ctx.num_workers(), "string append kernel");

    let old = x.offsets();
    let stride = lit.len();
    let new_offset = |i: usize| old[i] as usize + i * stride;

    let total = x.data().len() + n * stride;
    let mut data = vec![0u8; total];
    let mut offsets = vec![0i64; n + 1];

    let chunks = ctx.plan(n);
    let data_parts = split_disjoint_mut(
        &mut data,
        chunks.iter().map(|c| new_offset(c.start)..new_offset(c.stop)),
    );
    let offset_parts = split_disjoint_mut(&mut offsets[..n], chunks.iter().map(ChunkRange::range));

    ctx.install(|| {
        chunks
            .par_iter()
            .zip(data_parts)
            .zip(offset_parts)
            .with_max_len(1)
            .for_each(|((chunk, out), out_offsets)| {
                let base = new_offset(chunk.start);
                for (local, i) in chunk.range().enumerate() {
                    let start = new_offset(i);
                    out_offsets[local] = start as i64;

                    let value = x.value(i);
                    let dst = &mut out[start - base..start - base + value.len() + stride];
                    match placement {
                        Placement::Prefix => {
                            dst[..stride].copy_from_slice(lit);
                            dst[stride..].copy_from_slice(value);
                        }
                        Placement::Suffix => {
                            dst[..value.len()].copy_from_slice(value);
                            dst[value.len()..].copy_from_slice(lit);
                        }
                    }
                }
            });
    });

    offsets[n] = total as i64;
    StringVector::from_parts(data, offsets, x.validity().deep_copy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComputeConfig;

    fn ctx(workers: usize) -> ComputeContext {
        ComputeContext::new(ComputeConfig::new().with_num_workers(workers)).unwrap()
    }

    fn strings(v: &StringVector) -> Vec<String> {
        (0..v.len())
            .map(|i| String::from_utf8_lossy(v.value(i)).into_owned())
            .collect()
    }

    #[test]
    fn test_add_prefix() {
        let x = StringVector::all_valid(&["cat", "dog"]);
        let out = add_prefix(&ctx(2), &x, b" X").unwrap();
        assert_eq!(strings(&out), vec![" Xcat", " Xdog"]);
        assert_eq!(out.offsets(), &[0, 5, 10]);
    }

    #[test]
    fn test_add_suffix() {
        let x = StringVector::from_strings(&["a", "", "bcd"], &[true, false, true]).unwrap();
        let out = add_suffix(&ctx(2), &x, b"!").unwrap();
        assert_eq!(strings(&out), vec!["a!", "!", "bcd!"]);
        assert_eq!(out.offsets(), &[0, 2, 3, 7]);
        assert!(out.is_null(1));
        assert_eq!(out.null_count(), 1);
    }

    #[test]
    fn test_append_empty_vector() {
        let x = StringVector::all_valid::<&str>(&[]);
        let out = add_prefix(&ctx(4), &x, b"zz").unwrap();
        assert!(out.is_empty());
        assert_eq!(out.offsets(), &[0]);
    }

    #[test]
    fn test_concat() {
        let x = StringVector::from_strings(&["John", "Ada", "Alan"], &[true, true, false]).unwrap();
        let y = StringVector::from_strings(&["Smith", "Lovelace", "Turing"], &[true, false, true]).unwrap();
        let out = concat(&ctx(2), &x, &y, b", ").unwrap();
        assert_eq!(strings(&out), vec!["John, Smith", "Ada, Lovelace", "Alan, Turing"]);
        assert_eq!(out.offsets(), &[0, 11, 24, 36]);
        assert_eq!(out.get(0), Some(&b"John, Smith"[..]));
        assert!(out.is_null(1));
        assert!(out.is_null(2));
        assert_eq!(out.null_count(), 2);
    }

    #[test]
    fn test_concat_length_mismatch() {
        let x = StringVector::all_valid(&["a", "b"]);
        let y = StringVector::all_valid(&["a"]);
        assert!(matches!(
            concat(&ctx(2), &x, &y, b"-"),
            Err(KolumnError::LengthMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_chunk_boundaries_match_single_worker() {
        let values: Vec<String> = (0..517).map(|i| "w".repeat(i % 13)).collect();
        let validity: Vec<bool> = (0..517).map(|i| i % 5 != 0).collect();
        let x = StringVector::from_strings(&values, &validity).unwrap();

        let single_prefix = add_prefix(&ctx(1), &x, b"<<").unwrap();
        let single_suffix = add_suffix(&ctx(1), &x, b">>>").unwrap();
        let single_concat = concat(&ctx(1), &x, &x, b"|").unwrap();
        for workers in [2, 3, 4, 7, 9, 64, 200] {
            assert_eq!(add_prefix(&ctx(workers), &x, b"<<").unwrap(), single_prefix);
            assert_eq!(add_suffix(&ctx(workers), &x, b">>>").unwrap(), single_suffix);
            assert_eq!(concat(&ctx(workers), &x, &x, b"|").unwrap(), single_concat);
        }
    }
}
