//! Integration tests for reading delimited files from disk.

use std::io::Write;

use kolumn::inference::InferredType;
use kolumn::io::{infer_schema_from_path, read_columns_from_path};
use kolumn::{ComputeContext, CsvReadConfig, KolumnError, LogicalType, Vector};
use tempfile::NamedTempFile;

fn write_fixture(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

fn ctx() -> ComputeContext {
    ComputeContext::with_default_workers().expect("compute context")
}

#[test]
fn test_infer_schema_from_file() {
    let file = write_fixture(
        "city,population,area,capital,founded\n\
         Springfield,167882,155.6,false,1821-01-01\n\
         Shelbyville,65000,80.1,f,1823-06-15\n\
         Capital City,1200000,420,true,1790-03-04\n",
    );
    let schema = infer_schema_from_path(&ctx(), file.path(), &CsvReadConfig::default()).unwrap();

    assert_eq!(schema.len(), 5);
    assert_eq!(schema.column("city").unwrap().inferred_type, InferredType::Text);
    assert_eq!(schema.column("population").unwrap().logical_type(), LogicalType::Int32);
    assert_eq!(schema.column("area").unwrap().inferred_type, InferredType::Float);
    assert_eq!(schema.column("capital").unwrap().logical_type(), LogicalType::Bool);
    assert_eq!(schema.column("founded").unwrap().logical_type(), LogicalType::Date);
}

#[test]
fn test_read_columns_from_file() {
    let file = write_fixture("a\tb\n1\tx\n\ty\n3\t\n");
    let config = CsvReadConfig::new().with_delimiter(b'\t');
    let columns = read_columns_from_path(&ctx(), file.path(), &config).unwrap();

    assert_eq!(columns.len(), 2);
    let Vector::Int32(a) = &columns[0].vector else {
        panic!("expected Int32");
    };
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![Some(1), None, Some(3)]);

    let Vector::String(b) = &columns[1].vector else {
        panic!("expected String");
    };
    assert_eq!(b.get_str(0), Some("x"));
    assert!(b.is_null(2));
}

#[test]
fn test_sample_limit_only_affects_inference() {
    let mut contents = String::from("v\n");
    for i in 0..10 {
        contents.push_str(&format!("{i}\n"));
    }
    contents.push_str("not a number\n");
    let file = write_fixture(&contents);

    let config = CsvReadConfig::new().with_infer_rows(5);
    let columns = read_columns_from_path(&ctx(), file.path(), &config).unwrap();
    assert_eq!(columns[0].len(), 11);
    assert_eq!(columns[0].vector.logical_type(), LogicalType::Int32);
    assert!(columns[0].vector.is_null(10));
}

#[test]
fn test_missing_file() {
    let result = infer_schema_from_path(&ctx(), "/nonexistent/kolumn.csv", &CsvReadConfig::default());
    assert!(matches!(result, Err(KolumnError::Io(_))));
}

#[test]
fn test_invalid_config_rejected() {
    let file = write_fixture("a\n1\n");
    let config = CsvReadConfig::new().with_infer_rows(0);
    assert!(matches!(
        read_columns_from_path(&ctx(), file.path(), &config),
        Err(KolumnError::ValidationError(_))
    ));
}
