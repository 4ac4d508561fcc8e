//! Columnar event samples and Parquet event-table I/O.

pub mod parquet;
pub mod sample;

pub use parquet::{
    read_sample, read_sample_bytes, write_segments, write_segments_bytes, SegmentRef,
    EVENTS_SCHEMA_V1, META_KEY_SCHEMA_VERSION, SEGMENT_COLUMN,
};
pub use sample::Sample;
