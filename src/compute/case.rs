//! ASCII case transforms.
//!
//! Case changes never alter a string's length, so offsets and validity are
//! copied unchanged and only the payload is rewritten. Only `A-Z` and `a-z`
//! are touched; every other byte passes through.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::vector::StringVector;

use super::chunk::{split_disjoint_mut, ChunkRange};
use super::ComputeContext;

/// Upper-cases every ASCII letter.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn to_upper(ctx: &ComputeContext, x: &StringVector) -> Result<StringVector> {
    Ok(map_bytes(ctx, "to_upper", x, |b| b.to_ascii_uppercase()))
}

/// Lower-cases every ASCII letter.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn to_lower(ctx: &ComputeContext, x: &StringVector) -> Result<StringVector> {
    Ok(map_bytes(ctx, "to_lower", x, |b| b.to_ascii_lowercase()))
}

/// Flips the case of every ASCII letter.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn swap_case(ctx: &ComputeContext, x: &StringVector) -> Result<StringVector> {
    Ok(map_bytes(ctx, "swap_case", x, swap_ascii_case))
}

/// Upper-cases the first byte of every element and lower-cases the rest.
///
/// # Errors
///
/// Never fails; the `Result` keeps the kernel surface uniform.
pub fn to_title(ctx: &ComputeContext, x: &StringVector) -> Result<StringVector> {
    let n = x.len();
    debug!(op = "to_title", len = n, workers = ctx.num_workers(), "string case kernel");

    let offsets = x.offsets();
    let mut data = x.data().to_vec();

    // Element boundaries matter here, so chunk by element and map each
    // chunk to the payload bytes it spans.
    let chunks = ctx.plan(n);
    let byte_ranges = chunks
        .iter()
        .map(|c| offsets[c.start] as usize..offsets[c.stop] as usize);
    let parts = split_disjoint_mut(&mut data, byte_ranges);

    ctx.install(|| {
        chunks
            .par_iter()
            .zip(parts)
            .with_max_len(1)
            .for_each(|(chunk, part)| {
                let base = offsets[chunk.start] as usize;
                for i in chunk.range() {
                    let start = offsets[i] as usize - base;
                    let stop = offsets[i + 1] as usize - base;
                    title_case(&mut part[start..stop]);
                }
            });
    });

    Ok(StringVector::from_parts(
        data,
        offsets.to_vec(),
        x.validity().deep_copy(),
    ))
}

fn map_bytes(
    ctx: &ComputeContext,
    name: &'static str,
    x: &StringVector,
    f: fn(u8) -> u8,
) -> StringVector {
    debug!(op = name, len = x.len(), workers = ctx.num_workers(), "string case kernel");

    // Payload bytes are independent of element boundaries, so chunk the raw buffer.
    let mut data = x.data().to_vec();
    let chunks = ctx.plan(data.len());
    let parts = split_disjoint_mut(&mut data, chunks.iter().map(ChunkRange::range));

    ctx.install(|| {
        parts.into_par_iter().with_max_len(1).for_each(|part| {
            for b in part.iter_mut() {
                *b = f(*b);
            }
        });
    });

    StringVector::from_parts(data, x.offsets().to_vec(), x.validity().deep_copy())
}

fn swap_ascii_case(b: u8) -> u8 {
    if b.is_ascii_lowercase() {
        b.to_ascii_uppercase()
    } else if b.is_ascii_uppercase() {
        b.to_ascii_lowercase()
    } else {
        b
    }
}

fn title_case(value: &mut [u8]) {
    if let Some((first, rest)) = value.split_first_mut() {
        first.make_ascii_uppercase();
        rest.make_ascii_lowercase();
    }
}
