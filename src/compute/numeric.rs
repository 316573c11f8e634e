//! Elementwise arithmetic over [`NumericVector`]s.
//!
//! Vector-vs-vector kernels AND the operand bitmaps byte by byte, so an
//! output slot is valid only when both inputs were. Vector-vs-literal
//! kernels deep-copy the input bitmap since a literal is never null.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{KolumnError, Result};
use crate::vector::{bitmap_byte_len, NumericType, NumericVector, ValidityBitmap};

use super::chunk::{split_disjoint_mut, ChunkRange};
use super::ComputeContext;

/// Returns `x + y` elementwise.
///
/// # Errors
///
/// Returns [`KolumnError::LengthMismatch`] if the vectors differ in length.
pub fn add<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    y: &NumericVector<T>,
) -> Result<NumericVector<T>> {
    binary_kernel(ctx, "add", x, y, T::add, false)
}

/// Returns `x - y` elementwise.
///
/// # Errors
///
/// Returns [`KolumnError::LengthMismatch`] if the vectors differ in length.
pub fn subtract<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    y: &NumericVector<T>,
) -> Result<NumericVector<T>> {
    binary_kernel(ctx, "subtract", x, y, T::sub, false)
}

/// Returns `x * y` elementwise.
///
/// # Errors
///
/// Returns [`KolumnError::LengthMismatch`] if the vectors differ in length.
pub fn multiply<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    y: &NumericVector<T>,
) -> Result<NumericVector<T>> {
    binary_kernel(ctx, "multiply", x, y, T::mul, false)
}

/// Returns `x / y` elementwise.
///
/// Slots where `y` is zero come out null, for floats as well as integers.
///
/// # Errors
///
/// Returns [`KolumnError::LengthMismatch`] if the vectors differ in length.
pub fn divide<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    y: &NumericVector<T>,
) -> Result<NumericVector<T>> {
    binary_kernel(ctx, "divide", x, y, div_or_default, true)
}

/// Returns `x + lit` elementwise.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn add_literal<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    lit: T,
) -> Result<NumericVector<T>> {
    Ok(literal_kernel(ctx, "add_literal", x, lit, T::add))
}

/// Returns `x - lit` elementwise.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn subtract_literal<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    lit: T,
) -> Result<NumericVector<T>> {
    Ok(literal_kernel(ctx, "subtract_literal", x, lit, T::sub))
}

/// Returns `x * lit` elementwise.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn multiply_literal<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    lit: T,
) -> Result<NumericVector<T>> {
    Ok(literal_kernel(ctx, "multiply_literal", x, lit, T::mul))
}

/// Returns `x / lit` elementwise.
///
/// # Errors
///
/// Returns [`KolumnError::DivisionByZero`] if `lit` is zero.
pub fn divide_literal<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    lit: T,
) -> Result<NumericVector<T>> {
    if lit.is_zero() {
        return Err(KolumnError::DivisionByZero);
    }
    Ok(literal_kernel(ctx, "divide_literal", x, lit, T::div))
}

/// Returns `x ^ lit` elementwise.
///
/// Computed in `f64` and truncated back to `T`, so integer results follow
/// real-valued exponentiation (`2 ^ -1 == 0`) and saturate at the type bounds.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn power_literal<T: NumericType>(
    ctx: &ComputeContext,
    x: &NumericVector<T>,
    lit: T,
) -> Result<NumericVector<T>> {
    Ok(literal_kernel(ctx, "power_literal", x, lit, T::pow))
}

fn div_or_default<T: NumericType>(a: T, b: T) -> T {
    if b.is_zero() {
        T::default()
    } else {
        a.div(b)
    }
}

fn binary_kernel<T: NumericType>(
    ctx: &ComputeContext,
    name: &'static str,
    x: &NumericVector<T>,
    y: &NumericVector<T>,
    op: fn(T, T) -> T,
    null_on_zero: bool,
) -> Result<NumericVector<T>> {
    if x.len() != y.len() {
        return Err(KolumnError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    let n = x.len();
    debug!(op = name, len = n, workers = ctx.num_workers(), "numeric kernel");

    let bitmap_len = bitmap_byte_len(n);
    let mut data = vec![T::default(); n];
    let mut bits = vec![0u8; bitmap_len];

    let chunks = ctx.plan(n);
    let data_parts = split_disjoint_mut(&mut data, chunks.iter().map(ChunkRange::range));
    let bit_parts = split_disjoint_mut(
        &mut bits,
        chunks.iter().map(|c| c.byte_range(bitmap_len)),
    );

    let (xs, ys) = (x.values(), y.values());
    let (x_bits, y_bits) = (x.validity().as_bytes(), y.validity().as_bytes());

    ctx.install(|| {
        chunks
            .par_iter()
            .zip(data_parts)
            .zip(bit_parts)
            .with_max_len(1)
            .for_each(|((chunk, out), out_bits)| {
                let range = chunk.range();
                let bytes = chunk.byte_range(bitmap_len);
                let (xs, ys) = (&xs[range.clone()], &ys[range]);

                for ((o, &a), &b) in out.iter_mut().zip(xs).zip(ys) {
                    *o = op(a, b);
                }
                for ((o, &a), &b) in out_bits
                    .iter_mut()
                    .zip(&x_bits[bytes.clone()])
                    .zip(&y_bits[bytes])
                {
                    *o = a & b;
                }
                if null_on_zero {
                    // chunk.start is byte aligned, so local bit i is element start + i.
                    for (i, b) in ys.iter().enumerate() {
                        if b.is_zero() {
                            out_bits[i / 8] &= !(1 << (i % 8));
                        }
                    }
                }
            });
    });

    let validity = ValidityBitmap::from_computed(bits, n);
    Ok(NumericVector::from_parts(x.logical_type(), data, validity))
}

fn literal_kernel<T: NumericType>(
    ctx: &ComputeContext,
    name: &'static str,
    x: &NumericVector<T>,
    lit: T,
    op: fn(T, T) -> T,
) -> NumericVector<T> {
    let n = x.len();
    debug!(op = name, len = n, workers = ctx.num_workers(), "numeric literal kernel");

    let mut data = vec![T::default(); n];
    let chunks = ctx.plan(n);
    let data_parts = split_disjoint_mut(&mut data, chunks.iter().map(ChunkRange::range));
    let xs = x.values();

    ctx.install(|| {
        chunks
            .par_iter()
            .zip(data_parts)
            .with_max_len(1)
            .for_each(|(chunk, out)| {
                for (o, &a) in out.iter_mut().zip(&xs[chunk.range()]) {
                    *o = op(a, lit);
                }
            });
    });

    NumericVector::from_parts(x.logical_type(), data, x.validity().deep_copy())
}
