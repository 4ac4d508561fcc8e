//! Region selection, histogram building and overlay artifacts.

pub mod artifact;
pub mod fields;
pub mod histogram;
pub mod region;

pub use artifact::{overlay_artifact, BuildOptions, HistSeries, OverlayArtifact, VariableOverlay};
pub use fields::{field_style, retained_fields, BinRule, FieldStyle, EVENT_FIELDS, WEIGHT_FIELD};
pub use histogram::Histogram1D;
pub use region::{apply_selection, Region, SelectionConfig};
