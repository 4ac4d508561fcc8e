//! Region selection policies.
//!
//! A [`Region`] maps to an ordered list of threshold predicates over named
//! columns; predicates compose by logical AND. Selection is applied to all
//! columns of a sample in one step so weights can never desynchronize from
//! the kinematic columns.

use sc_core::Result;
use sc_sample::Sample;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::fields::BOOKKEEPING_FIELDS;

/// Selection regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// No selection at all.
    Total,
    /// Lepton veto + at least two jets.
    ZGamma,
    /// The Z gamma cuts plus the VBF signal cuts.
    Signal,
}

impl Region {
    /// Display label used in plot annotations.
    pub fn label(&self) -> &'static str {
        match self {
            Region::Total => "total",
            Region::ZGamma => "Z gamma region",
            Region::Signal => "Signal region",
        }
    }

    /// Output subdirectory name for this region.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Region::Total => "total",
            Region::ZGamma => "zgamma",
            Region::Signal => "signal",
        }
    }

    /// The ordered predicate list for this region.
    fn predicates(&self, cfg: &SelectionConfig) -> Vec<Predicate> {
        match self {
            Region::Total => Vec::new(),
            Region::ZGamma => vec![
                Predicate { field: "nLeptons", cmp: Cmp::Eq, value: cfg.n_leptons },
                Predicate { field: "nJets", cmp: Cmp::Gt, value: 1.0 },
            ],
            Region::Signal => vec![
                Predicate { field: "nLeptons", cmp: Cmp::Eq, value: cfg.n_leptons },
                Predicate { field: "mJJ", cmp: Cmp::Gt, value: cfg.mjj_min },
                Predicate { field: "phCentrality", cmp: Cmp::Lt, value: cfg.centrality_max },
                Predicate { field: "nJets", cmp: Cmp::Gt, value: 1.0 },
            ],
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "total" => Ok(Region::Total),
            "zgamma" => Ok(Region::ZGamma),
            "signal" => Ok(Region::Signal),
            other => Err(format!("unknown region '{other}' (expected total|zgamma|signal)")),
        }
    }
}

/// Selection thresholds, overridable from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Required exact lepton multiplicity.
    pub n_leptons: f64,
    /// Minimum dijet invariant mass [GeV] for the signal region.
    pub mjj_min: f64,
    /// Maximum photon centrality for the signal region.
    pub centrality_max: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { n_leptons: 0.0, mjj_min: 300.0, centrality_max: 0.6 }
    }
}

#[derive(Debug, Clone, Copy)]
enum Cmp {
    Eq,
    Gt,
    Lt,
}

#[derive(Debug, Clone)]
struct Predicate {
    field: &'static str,
    cmp: Cmp,
    value: f64,
}

impl Predicate {
    fn mask(&self, sample: &Sample) -> Result<Vec<bool>> {
        let col = sample.require_column(self.field)?;
        let v = self.value;
        Ok(col
            .iter()
            .map(|&x| match self.cmp {
                Cmp::Eq => x == v,
                Cmp::Gt => x > v,
                Cmp::Lt => x < v,
            })
            .collect())
    }
}

/// Apply a region's selection to a sample.
///
/// Evaluates every predicate to a boolean mask, ANDs the masks, filters all
/// columns in one step, then drops the bookkeeping columns from the output
/// schema. Surviving rows keep their relative order.
pub fn apply_selection(sample: &Sample, region: Region, cfg: &SelectionConfig) -> Result<Sample> {
    let before = sample.n_rows();

    let mut mask = vec![true; before];
    for pred in region.predicates(cfg) {
        let m = pred.mask(sample)?;
        for (acc, v) in mask.iter_mut().zip(m) {
            *acc &= v;
        }
    }

    let filtered = sample.select(&mask)?;
    tracing::debug!(
        region = region.label(),
        before,
        after = filtered.n_rows(),
        "applied selection"
    );
    Ok(filtered.drop_columns(BOOKKEEPING_FIELDS))
}
