//! Shared types for stimband.
//!
//! Design goal: versioned, explicit, boring.
//! These structs are used for band reports, quadrant groupings, and the
//! persisted stat-dictionary input format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const BAND_REPORT_SCHEMA_V1: &str = "stimband.band_report.v1";
pub const QUADRANTS_SCHEMA_V1: &str = "stimband.quadrants.v1";

/// One aggregate measurement per stimulus: identifier plus a scalar summary
/// statistic (e.g. the mean Likert rating across participants).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StimulusStat {
    pub id: String,
    pub value: f64,
}

impl StimulusStat {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Raw observations for one stimulus as persisted by the upstream pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ObservationSet {
    /// Individual Likert responses for this stimulus.
    pub raw: Vec<f64>,

    /// Number of participants, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u64>,
}

/// Persisted stat dictionary: question -> stimulus -> observations.
///
/// The JSON serialization of the upstream `{question: {stimulus: {...}}}`
/// dictionaries. BTreeMap keys give a deterministic (lexicographic)
/// iteration order.
pub type StatDict = BTreeMap<String, BTreeMap<String, ObservationSet>>;

/// One of four fixed, non-overlapping ordinal bands over the rating scale.
///
/// Declaration order is ascending; `Ord` follows the scale.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Low,
    MidLow,
    MidHigh,
    High,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Low, Band::MidLow, Band::MidHigh, Band::High];
}

/// The rating-scale endpoints the bands are computed from.
///
/// The scale span is divided into three equal steps `s = (max - min) / 3`;
/// the middle step is halved once more, giving four bands with non-strict
/// upper bounds at `min + s`, `(min + max) / 2` and `min + 2s`. The
/// endpoints are named configuration, not magic numbers, so the same logic
/// serves other rating scales.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BandScale {
    pub likert_min: f64,
    pub likert_max: f64,
}

impl Default for BandScale {
    fn default() -> Self {
        Self {
            likert_min: 1.0,
            likert_max: 5.0,
        }
    }
}

impl BandScale {
    pub fn new(likert_min: f64, likert_max: f64) -> Self {
        Self {
            likert_min,
            likert_max,
        }
    }

    /// The three partition points, ascending. A value on a partition point
    /// belongs to the band below it.
    pub fn partition(&self) -> [f64; 3] {
        let span = self.likert_max - self.likert_min;
        [
            self.likert_min + span / 3.0,
            self.likert_min + span / 2.0,
            self.likert_min + 2.0 * span / 3.0,
        ]
    }

    /// Display label for a band, e.g. `"2.34-3.00"` on the default scale.
    ///
    /// Upper bounds are truncated to two decimals and each lower bound sits
    /// one cent above the previous band's upper bound, reproducing the
    /// labels of the observed report files (`1.00-2.33`, `2.34-3.00`,
    /// `3.01-3.66`, `3.67-5.00`).
    pub fn label(&self, band: Band) -> String {
        let [t1, t2, t3] = self.partition();
        let (lo, hi) = match band {
            Band::Low => (cents(self.likert_min), cents(t1)),
            Band::MidLow => (cents(t1) + 1, cents(t2)),
            Band::MidHigh => (cents(t2) + 1, cents(t3)),
            Band::High => (cents(t3) + 1, cents(self.likert_max)),
        };
        format!("{}-{}", fmt_cents(lo), fmt_cents(hi))
    }
}

/// Truncate a scale value to whole cents.
fn cents(value: f64) -> i64 {
    (value * 100.0).floor() as i64
}

fn fmt_cents(c: i64) -> String {
    format!("{}.{:02}", c / 100, c % 100)
}

/// One of four bivariate categories over two independent statistics.
///
/// Declaration order matches the report order of the observed grouping files.
#[derive(
    Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    HighHigh,
    HighLow,
    LowHigh,
    LowLow,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::HighHigh,
        Quadrant::HighLow,
        Quadrant::LowHigh,
        Quadrant::LowLow,
    ];
}

/// Rule set for assigning stimuli to quadrants.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum QuadrantPolicy {
    /// Only stimuli in the extreme thirds on *both* axes are grouped; values
    /// are rounded to three decimals first, and anything in
    /// `[low_below, high_above]` on either axis is discarded entirely.
    ExtremesOnly { high_above: f64, low_below: f64 },

    /// Every stimulus is grouped: high if the value exceeds the midpoint,
    /// low otherwise. No rounding.
    FullSplit { midpoint: f64 },
}

impl QuadrantPolicy {
    /// The observed "extremes" cutoffs: high > 3.66, low < 2.34.
    pub fn extremes_only() -> Self {
        QuadrantPolicy::ExtremesOnly {
            high_above: 3.66,
            low_below: 2.34,
        }
    }

    /// The observed "full split" cutoff: high > 3, low <= 3.
    pub fn full_split() -> Self {
        QuadrantPolicy::FullSplit { midpoint: 3.0 }
    }
}

/// One line of a band report: identifier, value, assigned band.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BandEntry {
    pub id: String,
    pub value: f64,
    pub band: Band,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BandCount {
    pub band: Band,
    pub count: u32,
}

/// Band report: entries sorted ascending by value (stable), plus per-band
/// counts in first-seen order. Write-once; never mutated after generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BandReport {
    pub schema: String,
    pub scale: BandScale,
    pub entries: Vec<BandEntry>,
    pub counts: Vec<BandCount>,
}

/// One grouped stimulus with its value on each axis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuadrantMember {
    pub id: String,
    pub primary: f64,
    pub secondary: f64,
}

/// Result of a bivariate grouping run: members per quadrant in discovery
/// order, plus how many stimuli the policy discarded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuadrantGrouping {
    pub schema: String,
    pub policy: QuadrantPolicy,
    pub members: BTreeMap<Quadrant, Vec<QuadrantMember>>,

    /// Stimuli excluded by the policy (ExtremesOnly middle band). Not a
    /// fifth group; never rendered in reports.
    pub discarded: u32,
}

impl QuadrantGrouping {
    pub fn count(&self, quadrant: Quadrant) -> u32 {
        self.members.get(&quadrant).map_or(0, |m| m.len() as u32)
    }

    /// Total number of grouped (non-discarded) stimuli.
    pub fn grouped_total(&self) -> u32 {
        Quadrant::ALL.iter().map(|q| self.count(*q)).sum()
    }
}
