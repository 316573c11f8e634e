//! Schema inference and column loading over `csv::Reader`.

use std::io::Read;
use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use super::config::CsvReadConfig;
use crate::compute::ComputeContext;
use crate::error::Result;
use crate::inference::{build_column, merge_columns, ColumnInference, Schema};
use crate::vector::Column;

/// Sampled records per inference shard.
const INFER_SHARD_ROWS: usize = 256;

/// Infers a schema from the first `infer_rows` records.
///
/// Sharded inference runs on the worker pool of `ctx`.
///
/// # Errors
///
/// Returns an error if the config is invalid or the reader fails, including
/// records whose field count differs from the first record.
pub fn infer_schema<R: Read>(ctx: &ComputeContext, reader: R, config: &CsvReadConfig) -> Result<Schema> {
    config.validate()?;
    let mut rdr = config.build_reader(reader);
    let names = column_names(&mut rdr, config)?;
    let records = read_records(&mut rdr, Some(config.infer_rows))?;
    Ok(infer_from_records(ctx, &names, &records, config))
}

/// Infers a schema, then parses every record into typed columns.
///
/// Columns are built in parallel on the worker pool of `ctx`.
///
/// # Errors
///
/// Returns an error if the config is invalid or the reader fails.
pub fn read_columns<R: Read>(ctx: &ComputeContext, reader: R, config: &CsvReadConfig) -> Result<Vec<Column>> {
    config.validate()?;
    let mut rdr = config.build_reader(reader);
    let names = column_names(&mut rdr, config)?;
    let records = read_records(&mut rdr, None)?;

    let sample = &records[..records.len().min(config.infer_rows)];
    let schema = infer_from_records(ctx, &names, sample, config);

    ctx.install(|| {
        schema
            .columns
            .par_iter()
            .enumerate()
            .map(|(i, column)| {
                let fields = records.iter().map(|record| record.get(i).unwrap_or_default());
                build_column(column.name.clone(), column.parser, fields)
            })
            .collect()
    })
}

/// [`infer_schema`] over a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn infer_schema_from_path(
    ctx: &ComputeContext,
    path: impl AsRef<Path>,
    config: &CsvReadConfig,
) -> Result<Schema> {
    let file = std::fs::File::open(path.as_ref())?;
    infer_schema(ctx, file, config)
}

/// [`read_columns`] over a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn read_columns_from_path(
    ctx: &ComputeContext,
    path: impl AsRef<Path>,
    config: &CsvReadConfig,
) -> Result<Vec<Column>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_columns(ctx, file, config)
}

/// Header names, or `column_{i}` when the input has no header row.
fn column_names<R: Read>(rdr: &mut csv::Reader<R>, config: &CsvReadConfig) -> Result<Vec<String>> {
    let headers = rdr.byte_headers()?;
    let names = if config.has_header {
        headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect()
    } else {
        (0..headers.len()).map(|i| format!("column_{i}")).collect()
    };
    Ok(names)
}

fn read_records<R: Read>(rdr: &mut csv::Reader<R>, limit: Option<usize>) -> Result<Vec<csv::ByteRecord>> {
    let mut records = Vec::new();
    let mut record = csv::ByteRecord::new();
    while limit.map_or(true, |n| records.len() < n) && rdr.read_byte_record(&mut record)? {
        records.push(record.clone());
    }
    Ok(records)
}

fn infer_from_records(
    ctx: &ComputeContext,
    names: &[String],
    records: &[csv::ByteRecord],
    config: &CsvReadConfig,
) -> Schema {
    debug!(
        columns = names.len(),
        records = records.len(),
        parallel = config.parallel_inference,
        workers = ctx.num_workers(),
        "inferring schema"
    );

    let tallies = if config.parallel_inference && records.len() > INFER_SHARD_ROWS {
        ctx.install(|| {
            records
                .par_chunks(INFER_SHARD_ROWS)
                .map(|shard| tally_shard(names, shard))
                .reduce(Vec::new, merge_columns)
        })
    } else {
        tally_shard(names, records)
    };

    Schema::new(tallies.into_iter().map(ColumnInference::finish).collect())
}

fn tally_shard(names: &[String], records: &[csv::ByteRecord]) -> Vec<ColumnInference> {
    let mut tallies: Vec<ColumnInference> = names.iter().map(ColumnInference::new).collect();
    for record in records {
        for (i, tally) in tallies.iter_mut().enumerate() {
            tally.observe(record.get(i).unwrap_or_default());
        }
    }
    tallies
}
