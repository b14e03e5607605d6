//! Domain logic for stimband.
//!
//! This crate is intentionally I/O-free: it does math and policy.

use std::collections::{BTreeMap, HashMap, HashSet};
use stimband_types::{
    Band, BandCount, BandEntry, BandReport, BandScale, Quadrant, QuadrantGrouping, QuadrantMember,
    QuadrantPolicy, StimulusStat, BAND_REPORT_SCHEMA_V1, QUADRANTS_SCHEMA_V1,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("stimulus '{0}' has no counterpart in the secondary statistic")]
    MissingCounterpart(String),

    #[error("stimulus '{0}' appears more than once in the secondary statistic")]
    DuplicateCounterpart(String),

    #[error("stimulus '{0}' appears more than once in the primary statistic")]
    DuplicateStimulus(String),
}

/// Assign a scalar value to its band.
///
/// Pure function of the value and the scale's fixed partition points; a value
/// exactly on a boundary belongs to the lower band. Values outside the scale
/// are not validated and fall into the nearest open-ended band.
pub fn assign_band(value: f64, scale: &BandScale) -> Band {
    let [t1, t2, t3] = scale.partition();
    if value <= t1 {
        Band::Low
    } else if value <= t2 {
        Band::MidLow
    } else if value <= t3 {
        Band::MidHigh
    } else {
        Band::High
    }
}

/// Build a band report: entries sorted ascending by value (stable, so equal
/// values keep their input order), with per-band counts in first-seen order.
///
/// An empty input produces an empty report whose counts list every band with
/// zero members.
pub fn band_report(stats: &[StimulusStat], scale: &BandScale) -> BandReport {
    let mut entries: Vec<BandEntry> = stats
        .iter()
        .map(|s| BandEntry {
            id: s.id.clone(),
            value: s.value,
            band: assign_band(s.value, scale),
        })
        .collect();
    entries.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut counts: Vec<BandCount> = Vec::new();
    for entry in &entries {
        match counts.iter_mut().find(|c| c.band == entry.band) {
            Some(c) => c.count += 1,
            None => counts.push(BandCount {
                band: entry.band,
                count: 1,
            }),
        }
    }
    if entries.is_empty() {
        counts = Band::ALL
            .iter()
            .map(|b| BandCount { band: *b, count: 0 })
            .collect();
    }

    BandReport {
        schema: BAND_REPORT_SCHEMA_V1.to_string(),
        scale: *scale,
        entries,
        counts,
    }
}

/// Classify each stimulus of the primary statistic into a quadrant using the
/// matching value from the secondary statistic.
///
/// Every primary stimulus must have exactly one counterpart in the secondary
/// statistic; absence or duplication is a fatal integrity error (the dataset
/// is malformed) rather than something to skip or average over. Member lists
/// keep the discovery order of the primary input.
pub fn group_quadrants(
    primary: &[StimulusStat],
    secondary: &[StimulusStat],
    policy: &QuadrantPolicy,
) -> Result<QuadrantGrouping, GroupingError> {
    let mut counterparts: HashMap<&str, f64> = HashMap::with_capacity(secondary.len());
    for stat in secondary {
        if counterparts.insert(stat.id.as_str(), stat.value).is_some() {
            return Err(GroupingError::DuplicateCounterpart(stat.id.clone()));
        }
    }

    let mut members: BTreeMap<Quadrant, Vec<QuadrantMember>> = BTreeMap::new();
    for q in Quadrant::ALL {
        members.insert(q, Vec::new());
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(primary.len());
    let mut discarded = 0u32;

    for stat in primary {
        if !seen.insert(stat.id.as_str()) {
            return Err(GroupingError::DuplicateStimulus(stat.id.clone()));
        }
        let counterpart = *counterparts
            .get(stat.id.as_str())
            .ok_or_else(|| GroupingError::MissingCounterpart(stat.id.clone()))?;

        let (p, s) = match policy {
            QuadrantPolicy::ExtremesOnly { .. } => (round3(stat.value), round3(counterpart)),
            QuadrantPolicy::FullSplit { .. } => (stat.value, counterpart),
        };

        let (Some(p_side), Some(s_side)) = (axis_side(p, policy), axis_side(s, policy)) else {
            discarded += 1;
            continue;
        };

        let quadrant = match (p_side, s_side) {
            (AxisSide::High, AxisSide::High) => Quadrant::HighHigh,
            (AxisSide::High, AxisSide::Low) => Quadrant::HighLow,
            (AxisSide::Low, AxisSide::High) => Quadrant::LowHigh,
            (AxisSide::Low, AxisSide::Low) => Quadrant::LowLow,
        };

        members.entry(quadrant).or_default().push(QuadrantMember {
            id: stat.id.clone(),
            primary: p,
            secondary: s,
        });
    }

    Ok(QuadrantGrouping {
        schema: QUADRANTS_SCHEMA_V1.to_string(),
        policy: *policy,
        members,
        discarded,
    })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum AxisSide {
    High,
    Low,
}

/// Which side of an axis a value falls on; `None` means the middle band that
/// `ExtremesOnly` discards.
fn axis_side(value: f64, policy: &QuadrantPolicy) -> Option<AxisSide> {
    match *policy {
        QuadrantPolicy::ExtremesOnly {
            high_above,
            low_below,
        } => {
            if value > high_above {
                Some(AxisSide::High)
            } else if value < low_below {
                Some(AxisSide::Low)
            } else {
                None
            }
        }
        QuadrantPolicy::FullSplit { midpoint } => {
            if value > midpoint {
                Some(AxisSide::High)
            } else {
                Some(AxisSide::Low)
            }
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
