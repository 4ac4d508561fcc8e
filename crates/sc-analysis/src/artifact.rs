//! Numbers-first overlay artifacts (shape comparison per variable).

use std::time::{SystemTime, UNIX_EPOCH};

use sc_core::Result;
use sc_sample::Sample;
use serde::{Deserialize, Serialize};

use crate::fields::{field_style, retained_fields, BinRule, WEIGHT_FIELD};
use crate::histogram::{bin_count, shared_range, Histogram1D};
use crate::region::Region;

/// Options controlling histogram construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Bin count for continuous variables.
    pub default_bins: usize,
    /// Fill with per-event weights; unit weights otherwise.
    pub use_weights: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { default_bins: 40, use_weights: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayArtifact {
    pub schema_version: String,
    pub meta: OverlayMeta,
    /// Display label for the selection regime.
    pub region_label: String,
    pub variables: Vec<VariableOverlay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayMeta {
    pub tool: String,
    pub tool_version: String,
    pub created_unix_ms: u128,
    pub weighted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableOverlay {
    /// Column name.
    pub name: String,
    /// Human-readable x-axis title.
    pub axis_title: String,
    pub signal: HistSeries,
    pub background: HistSeries,
    /// Optional x-axis display range hint `[lo, hi]` (rendering only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_range: Option<[f64; 2]>,
}

/// One sample's normalized series for one variable.
///
/// Edges are per-series: the discrete bin rule chooses bin counts per sample,
/// so signal and background edges can differ over the shared range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistSeries {
    pub bin_edges: Vec<f64>,
    /// Bin fractions (sum 1.0, or all zero for an empty series).
    pub y: Vec<f64>,
    /// Pre-normalization sum of weights.
    pub total_weight: f64,
    /// Rows filled.
    pub entries: u64,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| sc_core::Error::Computation(format!("system time error: {e}")))?;
    Ok(d.as_millis())
}

fn series(
    values: &[f64],
    weights: Option<&[f64]>,
    n_bins: usize,
    lo: f64,
    hi: f64,
) -> Result<HistSeries> {
    let mut h = Histogram1D::uniform(n_bins, lo, hi)?;
    h.fill(values, weights)?;
    let total_weight = h.total();
    let entries = h.entries;
    let h = h.normalized();
    Ok(HistSeries { bin_edges: h.bin_edges, y: h.y, total_weight, entries })
}

/// Build the per-variable overlay for one filtered variable pair.
pub fn variable_overlay(
    name: &str,
    signal: &Sample,
    background: &Sample,
    opts: &BuildOptions,
) -> Result<VariableOverlay> {
    let sig_vals = signal.require_column(name)?;
    let bg_vals = background.require_column(name)?;

    let sig_weights = opts.use_weights.then(|| signal.require_column(WEIGHT_FIELD)).transpose()?;
    let bg_weights =
        opts.use_weights.then(|| background.require_column(WEIGHT_FIELD)).transpose()?;

    let style = field_style(name);
    let bin_rule = style.map_or(BinRule::Default, |s| s.bin_rule);
    let axis_title = style.map_or(name, |s| s.axis_title).to_string();
    let display_range = style.and_then(|s| s.display_range);

    let (lo, hi) = shared_range(sig_vals, bg_vals);
    let sig_bins = bin_count(bin_rule, sig_vals, opts.default_bins);
    let bg_bins = bin_count(bin_rule, bg_vals, opts.default_bins);

    Ok(VariableOverlay {
        name: name.to_string(),
        axis_title,
        signal: series(sig_vals, sig_weights, sig_bins, lo, hi)?,
        background: series(bg_vals, bg_weights, bg_bins, lo, hi)?,
        display_range,
    })
}

/// Build the full overlay artifact over all retained variables.
///
/// Both samples must already be filtered (bookkeeping columns dropped).
pub fn overlay_artifact(
    signal: &Sample,
    background: &Sample,
    region: Region,
    opts: &BuildOptions,
) -> Result<OverlayArtifact> {
    let mut variables = Vec::new();
    for name in retained_fields() {
        variables.push(variable_overlay(name, signal, background, opts)?);
    }

    Ok(OverlayArtifact {
        schema_version: "shapecmp_overlay_v1".to_string(),
        meta: OverlayMeta {
            tool: "shapecmp".to_string(),
            tool_version: sc_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
            weighted: opts.use_weights,
        },
        region_label: region.label().to_string(),
        variables,
    })
}
