//! Parquet / Arrow event-table I/O.
//!
//! Defines the **event table schema v1** used for sample files and provides
//! read/write functions bridging Arrow [`RecordBatch`] ↔ [`Sample`].
//!
//! # Schema: `shapecmp_events_v1`
//!
//! ## Columns
//!
//! | Column      | Arrow Type | Required | Description                           |
//! |-------------|------------|----------|---------------------------------------|
//! | `<field>`   | `Float64`  | ≥ 1      | One column per event field            |
//! | `_segment`  | `Utf8`     | yes      | Versioned sub-table label `name;N`    |
//!
//! ## Parquet key-value metadata
//!
//! | Key                        | Value                  |
//! |----------------------------|------------------------|
//! | `shapecmp.schema_version`  | `"shapecmp_events_v1"` |
//!
//! A file holds one or more versioned sub-tables of the same logical table
//! (`ntuple;1`, `ntuple;2`, ...). [`read_sample`] concatenates them in
//! ascending version order, preserving row order within each sub-table.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float64Array, LargeStringArray, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::sample::Sample;
use sc_core::{Error, Result};

/// Schema version string embedded in Parquet key-value metadata.
pub const EVENTS_SCHEMA_V1: &str = "shapecmp_events_v1";

/// Parquet metadata key for the schema version.
pub const META_KEY_SCHEMA_VERSION: &str = "shapecmp.schema_version";

/// Reserved column name for versioned sub-table labels.
pub const SEGMENT_COLUMN: &str = "_segment";

/// A parsed sub-table label: `<table>;<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    /// Logical table name shared by all versions.
    pub table: String,
    /// Sub-table version (positive, ascending read order).
    pub version: u32,
}

impl SegmentRef {
    /// Parse a `<table>;<version>` label. Returns `None` for malformed labels.
    pub fn parse(label: &str) -> Option<Self> {
        let (table, version) = label.rsplit_once(';')?;
        if table.is_empty() {
            return None;
        }
        let version: u32 = version.parse().ok()?;
        Some(Self { table: table.to_string(), version })
    }

    /// Render the label back to its `<table>;<version>` form.
    pub fn label(&self) -> String {
        format!("{};{}", self.table, self.version)
    }
}

// ---------------------------------------------------------------------------
// Write: Sample → Arrow RecordBatch → Parquet
// ---------------------------------------------------------------------------

/// Build a single Arrow [`RecordBatch`] holding the given sub-tables.
///
/// All samples must share the same schema (column names in the same order).
fn segments_to_record_batch(table: &str, segments: &[(u32, Sample)]) -> Result<RecordBatch> {
    if table.trim().is_empty() {
        return Err(Error::Validation("table name must be non-empty".into()));
    }
    if segments.is_empty() {
        return Err(Error::Validation("write_segments requires at least one sub-table".into()));
    }

    let col_names = segments[0].1.column_names().to_vec();
    for (version, s) in segments {
        if s.column_names() != col_names.as_slice() {
            return Err(Error::Validation(format!(
                "sub-table '{table};{version}' has columns {:?}, expected {:?}",
                s.column_names(),
                col_names
            )));
        }
    }

    let total_rows: usize = segments.iter().map(|(_, s)| s.n_rows()).sum();

    let mut fields: Vec<Field> =
        col_names.iter().map(|n| Field::new(n, DataType::Float64, false)).collect();
    fields.push(Field::new(SEGMENT_COLUMN, DataType::Utf8, false));

    let metadata = HashMap::from([(
        META_KEY_SCHEMA_VERSION.to_string(),
        EVENTS_SCHEMA_V1.to_string(),
    )]);
    let schema = Arc::new(Schema::new(fields).with_metadata(metadata));

    let mut arrays: Vec<Arc<dyn Array>> = Vec::with_capacity(col_names.len() + 1);
    for name in &col_names {
        let mut out = Vec::<f64>::with_capacity(total_rows);
        for (_, s) in segments {
            out.extend_from_slice(s.column(name).ok_or_else(|| {
                Error::Validation(format!("missing column '{name}' in sub-table"))
            })?);
        }
        arrays.push(Arc::new(Float64Array::from(out)) as Arc<dyn Array>);
    }

    let mut b = StringBuilder::new();
    for (version, s) in segments {
        let label = SegmentRef { table: table.to_string(), version: *version }.label();
        for _ in 0..s.n_rows() {
            b.append_value(&label);
        }
    }
    arrays.push(Arc::new(b.finish()) as Arc<dyn Array>);

    RecordBatch::try_new(schema, arrays)
        .map_err(|e| Error::Input(format!("failed to build RecordBatch: {e}")))
}

/// Write versioned sub-tables of one logical table to Parquet bytes.
pub fn write_segments_bytes(table: &str, segments: &[(u32, Sample)]) -> Result<Vec<u8>> {
    let batch = segments_to_record_batch(table, segments)?;
    let props = parquet::file::properties::WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut buf = Vec::new();
    let mut writer = parquet::arrow::ArrowWriter::try_new(&mut buf, batch.schema(), Some(props))
        .map_err(|e| Error::Input(format!("failed to create Parquet writer: {e}")))?;
    writer.write(&batch).map_err(|e| Error::Input(format!("failed to write Parquet: {e}")))?;
    writer.close().map_err(|e| Error::Input(format!("failed to close Parquet writer: {e}")))?;
    Ok(buf)
}

/// Write versioned sub-tables of one logical table to a Parquet file.
pub fn write_segments(path: &Path, table: &str, segments: &[(u32, Sample)]) -> Result<()> {
    let bytes = write_segments_bytes(table, segments)?;
    std::fs::write(path, bytes)
        .map_err(|e| Error::Input(format!("failed to write {}: {e}", path.display())))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Read: Parquet → Arrow RecordBatch → Sample
// ---------------------------------------------------------------------------

/// Read the named event fields of a logical table from a Parquet file.
///
/// All `<table>;<N>` sub-tables are concatenated in ascending version order.
/// Missing file, missing column, wrong column type, or no matching sub-table
/// is an error.
pub fn read_sample(path: &Path, table: &str, fields: &[&str]) -> Result<Sample> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::Input(format!("failed to open {}: {e}", path.display())))?;
    let builder = parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::Input(format!("failed to read Parquet {}: {e}", path.display())))?;
    sample_from_builder(builder, table, fields)
}

/// Read the named event fields of a logical table from in-memory Parquet bytes.
pub fn read_sample_bytes(data: &[u8], table: &str, fields: &[&str]) -> Result<Sample> {
    let buf = bytes::Bytes::copy_from_slice(data);
    let builder = parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder::try_new(buf)
        .map_err(|e| Error::Input(format!("failed to read Parquet bytes: {e}")))?;
    sample_from_builder(builder, table, fields)
}

fn sample_from_builder<T>(
    builder: parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder<T>,
    table: &str,
    fields: &[&str],
) -> Result<Sample>
where
    T: parquet::file::reader::ChunkReader + 'static,
{
    if table.trim().is_empty() {
        return Err(Error::Validation("table name must be non-empty".into()));
    }
    if fields.is_empty() {
        return Err(Error::Validation("read_sample requires at least one field".into()));
    }

    // Capture the Arrow schema (with key-value metadata) before building the reader.
    let full_schema = builder.schema().clone();

    if let Some(v) = full_schema.metadata().get(META_KEY_SCHEMA_VERSION) {
        if v != EVENTS_SCHEMA_V1 {
            return Err(Error::Input(format!(
                "unsupported event table schema '{v}', expected '{EVENTS_SCHEMA_V1}'"
            )));
        }
    }

    if full_schema.index_of(SEGMENT_COLUMN).is_err() {
        return Err(Error::Input(format!(
            "event table has no '{SEGMENT_COLUMN}' column; cannot select table='{table}'"
        )));
    }

    let reader = builder
        .build()
        .map_err(|e| Error::Input(format!("failed to build Parquet reader: {e}")))?;

    let batches: std::result::Result<Vec<_>, _> = reader.collect();
    let batches = batches.map_err(|e| Error::Input(format!("failed to read Parquet batches: {e}")))?;

    if batches.is_empty() {
        return Err(Error::Input("event table contains no data".into()));
    }

    let merged = arrow::compute::concat_batches(&full_schema, &batches)
        .map_err(|e| Error::Input(format!("failed to concat Parquet batches: {e}")))?;

    sample_from_record_batch(&merged, table, fields)
}

/// Extract a [`Sample`] for one logical table from a merged [`RecordBatch`].
fn sample_from_record_batch(batch: &RecordBatch, table: &str, fields: &[&str]) -> Result<Sample> {
    let schema = batch.schema();
    let seg_idx = schema.index_of(SEGMENT_COLUMN).map_err(|_| {
        Error::Input(format!("event table has no '{SEGMENT_COLUMN}' column"))
    })?;
    let seg_col = batch.column(seg_idx);

    // Group row indices by sub-table version, keeping file row order within each.
    let mut by_version: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let label = segment_label(seg_col, row)?;
        let seg = SegmentRef::parse(&label).ok_or_else(|| {
            Error::Input(format!("row {row}: malformed '{SEGMENT_COLUMN}' label '{label}'"))
        })?;
        if seg.table == table {
            by_version.entry(seg.version).or_default().push(row);
        }
    }

    if by_version.is_empty() {
        return Err(Error::Input(format!("no '{table}' sub-tables found in event table")));
    }

    // BTreeMap iteration gives ascending version order.
    let row_order: Vec<usize> = by_version.into_values().flatten().collect();

    let mut columns: Vec<(String, Vec<f64>)> = Vec::with_capacity(fields.len());
    for &name in fields {
        let col_idx = schema
            .index_of(name)
            .map_err(|_| Error::Input(format!("missing field column '{name}' in event table")))?;
        let arr = batch.column(col_idx);
        if arr.data_type() != &DataType::Float64 {
            return Err(Error::Input(format!(
                "column '{name}' has type {:?}, expected Float64",
                arr.data_type()
            )));
        }
        let values = arr.as_primitive::<arrow::datatypes::Float64Type>().values();
        let gathered: Vec<f64> = row_order.iter().map(|&i| values[i]).collect();
        columns.push((name.to_string(), gathered));
    }

    Sample::from_columns(columns)
}

fn segment_label(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Err(Error::Input(format!("row {row}: '{SEGMENT_COLUMN}' must not be null")));
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                Error::Input(format!(
                    "column '{SEGMENT_COLUMN}' has type {:?}, expected Utf8",
                    col.data_type()
                ))
            })?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_any().downcast_ref::<LargeStringArray>().ok_or_else(|| {
                Error::Input(format!(
                    "column '{SEGMENT_COLUMN}' has type {:?}, expected LargeUtf8",
                    col.data_type()
                ))
            })?;
            Ok(arr.value(row).to_string())
        }
        _ => Err(Error::Input(format!(
            "column '{SEGMENT_COLUMN}' has type {:?}, expected Utf8/LargeUtf8",
            col.data_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(xs: &[f64], ws: &[f64]) -> Sample {
        Sample::from_columns(vec![
            ("mJJ".to_string(), xs.to_vec()),
            ("weightModified".to_string(), ws.to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn segment_ref_parse_roundtrip() {
        let s = SegmentRef::parse("ntuple;2").unwrap();
        assert_eq!(s.table, "ntuple");
        assert_eq!(s.version, 2);
        assert_eq!(s.label(), "ntuple;2");

        assert!(SegmentRef::parse("ntuple").is_none());
        assert!(SegmentRef::parse(";3").is_none());
        assert!(SegmentRef::parse("ntuple;x").is_none());
    }

    #[test]
    fn bytes_roundtrip_single_segment() {
        let s = seg(&[500.0, 250.0, 900.0], &[1.0, 0.5, 2.0]);
        let bytes = write_segments_bytes("ntuple", &[(1, s)]).unwrap();
        assert!(!bytes.is_empty());

        let out = read_sample_bytes(&bytes, "ntuple", &["mJJ", "weightModified"]).unwrap();
        assert_eq!(out.n_rows(), 3);
        assert_eq!(out.column("mJJ").unwrap(), &[500.0, 250.0, 900.0]);
        assert_eq!(out.column("weightModified").unwrap(), &[1.0, 0.5, 2.0]);
    }

    #[test]
    fn segments_concatenated_in_version_order() {
        // Written out of order; the reader must still return version 1 first.
        let v2 = seg(&[30.0, 40.0], &[0.3, 0.4]);
        let v1 = seg(&[10.0, 20.0], &[0.1, 0.2]);
        let bytes = write_segments_bytes("ntuple", &[(2, v2), (1, v1)]).unwrap();

        let out = read_sample_bytes(&bytes, "ntuple", &["mJJ", "weightModified"]).unwrap();
        assert_eq!(out.column("mJJ").unwrap(), &[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(out.column("weightModified").unwrap(), &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn missing_table_is_error() {
        let s = seg(&[1.0], &[1.0]);
        let bytes = write_segments_bytes("ntuple", &[(1, s)]).unwrap();
        let err = read_sample_bytes(&bytes, "other", &["mJJ"]).unwrap_err();
        assert!(format!("{err}").contains("other"));
    }

    #[test]
    fn missing_field_is_error() {
        let s = seg(&[1.0], &[1.0]);
        let bytes = write_segments_bytes("ntuple", &[(1, s)]).unwrap();
        let err = read_sample_bytes(&bytes, "ntuple", &["metPt"]).unwrap_err();
        assert!(format!("{err}").contains("metPt"));
    }

    #[test]
    fn schema_metadata_written() {
        let s = seg(&[1.0], &[1.0]);
        let batch = segments_to_record_batch("ntuple", &[(1, s)]).unwrap();
        let schema = batch.schema();
        assert_eq!(schema.metadata().get(META_KEY_SCHEMA_VERSION).unwrap(), EVENTS_SCHEMA_V1);
        assert!(schema.index_of(SEGMENT_COLUMN).is_ok());
    }

    #[test]
    fn mismatched_segment_schemas_rejected() {
        let a = seg(&[1.0], &[1.0]);
        let b = Sample::from_columns(vec![("metPt".to_string(), vec![1.0])]).unwrap();
        assert!(write_segments_bytes("ntuple", &[(1, a), (2, b)]).is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("shapecmp_parquet_test_{}.parquet", std::process::id()));
        let s = seg(&[5.0, 6.0], &[1.0, 1.0]);
        write_segments(&path, "ntuple", &[(1, s)]).unwrap();

        let out = read_sample(&path, "ntuple", &["mJJ"]).unwrap();
        assert_eq!(out.column("mJJ").unwrap(), &[5.0, 6.0]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_error() {
        let err =
            read_sample(Path::new("/nonexistent/evts.parquet"), "ntuple", &["mJJ"]).unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/evts.parquet"));
    }
}
