//! Rendering for stimband reports.
//!
//! Reports are fixed-format plain text, written once and never mutated:
//! rendering the same report twice yields byte-identical output.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use stimband_types::{BandReport, Quadrant, QuadrantGrouping, QuadrantPolicy};

/// Identifier column width when no scale annotation is shown.
pub const ID_WIDTH_BARE: usize = 43;

/// Identifier column width when a scale annotation is appended.
pub const ID_WIDTH_ANNOTATED: usize = 30;

#[derive(Debug, Clone)]
pub struct BandReportOptions {
    /// Wording of the scale's low endpoint, e.g. "Not possible at all".
    pub min_label: String,

    /// Wording of the scale's high endpoint.
    pub max_label: String,

    /// Optional per-identifier scale annotation, rendered as `id (scale),`.
    pub annotations: Option<BTreeMap<String, String>>,

    pub id_width: usize,
}

impl BandReportOptions {
    pub fn new(min_label: impl Into<String>, max_label: impl Into<String>) -> Self {
        Self {
            min_label: min_label.into(),
            max_label: max_label.into(),
            annotations: None,
            id_width: ID_WIDTH_BARE,
        }
    }

    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = Some(annotations);
        self.id_width = ID_WIDTH_ANNOTATED;
        self
    }
}

/// Render the sorted band report as text.
///
/// Entries appear in the report's (ascending) order, one per line; a single
/// blank line marks each point where the band changes from the previous
/// entry. Band membership is compared by value, never by identity. The
/// trailing summary lists each band with its member count in the report's
/// first-seen order.
pub fn render_band_report(report: &BandReport, opts: &BandReportOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Stimuli, {} ({}) => {} ({})",
        opts.min_label, report.scale.likert_min, opts.max_label, report.scale.likert_max
    );
    out.push('\n');

    let mut last_band = None;
    for entry in &report.entries {
        if let Some(last) = last_band {
            if last != entry.band {
                out.push('\n');
            }
        }
        last_band = Some(entry.band);

        let shown = match opts.annotations.as_ref().and_then(|a| a.get(&entry.id)) {
            Some(scale) => format!("{} ({scale}),", entry.id),
            None => format!("{},", entry.id),
        };
        let _ = writeln!(out, "{} {:.2}", pad_id(&shown, opts.id_width), entry.value);
    }

    if !report.entries.is_empty() {
        out.push('\n');
    }
    out.push_str("Number of stimuli in groups:\n");
    for count in &report.counts {
        let _ = writeln!(out, "{}: {}", report.scale.label(count.band), count.count);
    }

    out
}

#[derive(Debug, Clone)]
pub struct QuadrantReportOptions {
    /// Display name of the statistic on the first axis, e.g. "Poss".
    pub primary_name: String,

    /// Display name of the statistic on the second axis, e.g. "real".
    pub secondary_name: String,
}

/// Render a quadrant grouping as text: a header naming the statistics and
/// cutoffs, the count per quadrant, then the full member listing of each
/// quadrant in discovery order, blank-line separated.
///
/// Discarded stimuli (ExtremesOnly middle band) are not counted and not
/// listed; there is no fifth group.
pub fn render_quadrant_report(grouping: &QuadrantGrouping, opts: &QuadrantReportOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Statistics: {} & {}",
        opts.primary_name, opts.secondary_name
    );
    match grouping.policy {
        QuadrantPolicy::ExtremesOnly {
            high_above,
            low_below,
        } => {
            let _ = writeln!(out, "Cutoff points: high > {high_above}, low < {low_below}.");
        }
        QuadrantPolicy::FullSplit { midpoint } => {
            let _ = writeln!(out, "Cutoff points: high > {midpoint}, low <= {midpoint}.");
        }
    }
    out.push('\n');

    out.push_str("Number of Stimuli:\n");
    for quadrant in Quadrant::ALL {
        let _ = writeln!(
            out,
            "{}: {}",
            quadrant_label(quadrant, opts),
            grouping.count(quadrant)
        );
    }

    for quadrant in Quadrant::ALL {
        out.push('\n');
        let _ = writeln!(out, "{}:", quadrant_label(quadrant, opts));
        if let Some(members) = grouping.members.get(&quadrant) {
            for m in members {
                let _ = writeln!(out, "{}, {}, {}", m.id, m.primary, m.secondary);
            }
        }
    }

    out
}

fn quadrant_label(quadrant: Quadrant, opts: &QuadrantReportOptions) -> String {
    let (p, s) = match quadrant {
        Quadrant::HighHigh => ("high", "high"),
        Quadrant::HighLow => ("high", "low"),
        Quadrant::LowHigh => ("low", "high"),
        Quadrant::LowLow => ("low", "low"),
    };
    format!(
        "{} {p}, {} {s}",
        opts.primary_name, opts.secondary_name
    )
}

/// Pad the identifier column to a fixed width; identifiers longer than the
/// column are truncated.
fn pad_id(shown: &str, width: usize) -> String {
    if shown.chars().count() > width {
        shown.chars().take(width).collect()
    } else {
        format!("{shown:<width$}")
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use stimband_types::{
        Band, BandCount, BandEntry, BandReport, BandScale, BAND_REPORT_SCHEMA_V1,
    };

    fn entry_vec() -> impl Strategy<Value = Vec<BandEntry>> {
        proptest::collection::vec(1.0f64..=5.0, 0..30).prop_map(|mut values| {
            values.sort_by(f64::total_cmp);
            let scale = BandScale::default();
            let [t1, t2, t3] = scale.partition();
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| BandEntry {
                    id: format!("stim{i:03}"),
                    value: v,
                    band: if v <= t1 {
                        Band::Low
                    } else if v <= t2 {
                        Band::MidLow
                    } else if v <= t3 {
                        Band::MidHigh
                    } else {
                        Band::High
                    },
                })
                .collect()
        })
    }

    fn report_strategy() -> impl Strategy<Value = BandReport> {
        entry_vec().prop_map(|entries| {
            let mut counts: Vec<BandCount> = Vec::new();
            for e in &entries {
                match counts.iter_mut().find(|c| c.band == e.band) {
                    Some(c) => c.count += 1,
                    None => counts.push(BandCount {
                        band: e.band,
                        count: 1,
                    }),
                }
            }
            BandReport {
                schema: BAND_REPORT_SCHEMA_V1.to_string(),
                scale: BandScale::default(),
                entries,
                counts,
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Rendering twice yields byte-identical text.
        #[test]
        fn rendering_is_deterministic(report in report_strategy()) {
            let opts = BandReportOptions::new("lo", "hi");
            prop_assert_eq!(
                render_band_report(&report, &opts),
                render_band_report(&report, &opts)
            );
        }

        /// Every entry produces exactly one report line, and blank separator
        /// lines equal the number of band transitions.
        #[test]
        fn line_structure_matches_entries(report in report_strategy()) {
            let opts = BandReportOptions::new("lo", "hi");
            let text = render_band_report(&report, &opts);

            let transitions = report
                .entries
                .windows(2)
                .filter(|w| w[0].band != w[1].band)
                .count();
            let blank_lines = text.lines().filter(|l| l.is_empty()).count();
            // one blank after the header, one before the summary (when any
            // entries exist), plus one per band transition
            let expected = if report.entries.is_empty() {
                1
            } else {
                2 + transitions
            };
            prop_assert_eq!(blank_lines, expected);
        }
    }
}
