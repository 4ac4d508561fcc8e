//! Per-field configuration: axis titles, binning rules, display ranges.

/// Event fields read from the input table, in schema order.
///
/// The last two are selection bookkeeping only and are dropped after
/// filtering; `weightModified` carries the per-event MC weight.
pub const EVENT_FIELDS: &[&str] = &[
    "mJJ",
    "deltaYJJ",
    "metPt",
    "ptBalance",
    "subleadJetEta",
    "leadJetPt",
    "photonEta",
    "ptBalanceRed",
    "nJets",
    "sinDeltaPhiJJOver2",
    "deltaYJPh",
    "weightModified",
    "nLeptons",
    "phCentrality",
];

/// Column holding the per-event weight.
pub const WEIGHT_FIELD: &str = "weightModified";

/// Columns used only by the selection; dropped from the post-filter schema.
pub const BOOKKEEPING_FIELDS: &[&str] = &["nLeptons", "phCentrality"];

/// How to choose the bin count for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinRule {
    /// Use the configured default bin count.
    Default,
    /// Integer-valued field: bin count = maximum observed integer value,
    /// computed independently per sample (floor of 1).
    IntegerPerSample,
}

/// Display configuration for one event field.
#[derive(Debug, Clone)]
pub struct FieldStyle {
    /// Column name.
    pub name: &'static str,
    /// Human-readable x-axis title.
    pub axis_title: &'static str,
    /// Bin-count rule.
    pub bin_rule: BinRule,
    /// Optional x-axis display range override `[lo, hi]`.
    ///
    /// Affects rendering only; histogram fill ranges are data-driven.
    pub display_range: Option<[f64; 2]>,
}

const FIELD_STYLES: &[FieldStyle] = &[
    FieldStyle {
        name: "mJJ",
        axis_title: "m(jj) [GeV]",
        bin_rule: BinRule::Default,
        display_range: Some([0.0, 4000.0]),
    },
    FieldStyle {
        name: "deltaYJJ",
        axis_title: "dY(j1,j2)",
        bin_rule: BinRule::Default,
        display_range: None,
    },
    FieldStyle {
        name: "metPt",
        axis_title: "MET [GeV]",
        bin_rule: BinRule::Default,
        display_range: Some([100.0, 1000.0]),
    },
    FieldStyle {
        name: "ptBalance",
        axis_title: "pT balance",
        bin_rule: BinRule::Default,
        display_range: Some([0.0, 0.2]),
    },
    FieldStyle {
        name: "subleadJetEta",
        axis_title: "eta(j2)",
        bin_rule: BinRule::Default,
        display_range: None,
    },
    FieldStyle {
        name: "leadJetPt",
        axis_title: "pT(j1) [GeV]",
        bin_rule: BinRule::Default,
        display_range: Some([0.0, 800.0]),
    },
    FieldStyle {
        name: "photonEta",
        axis_title: "eta(gamma)",
        bin_rule: BinRule::Default,
        display_range: None,
    },
    FieldStyle {
        name: "ptBalanceRed",
        axis_title: "reduced pT balance",
        bin_rule: BinRule::Default,
        display_range: None,
    },
    FieldStyle {
        name: "nJets",
        axis_title: "N(jets)",
        bin_rule: BinRule::IntegerPerSample,
        display_range: None,
    },
    FieldStyle {
        name: "sinDeltaPhiJJOver2",
        axis_title: "sin(|dphi(j1,j2)|/2)",
        bin_rule: BinRule::Default,
        display_range: None,
    },
    FieldStyle {
        name: "deltaYJPh",
        axis_title: "dY(j1,gamma)",
        bin_rule: BinRule::Default,
        display_range: None,
    },
    FieldStyle {
        name: "weightModified",
        axis_title: "event weight",
        bin_rule: BinRule::Default,
        display_range: None,
    },
];

/// Look up the style for a field, if one is configured.
pub fn field_style(name: &str) -> Option<&'static FieldStyle> {
    FIELD_STYLES.iter().find(|s| s.name == name)
}

/// Fields kept after selection, i.e. [`EVENT_FIELDS`] minus bookkeeping.
pub fn retained_fields() -> Vec<&'static str> {
    EVENT_FIELDS.iter().copied().filter(|f| !BOOKKEEPING_FIELDS.contains(f)).collect()
}
