//! Application layer for stimband.
//!
//! The app layer coordinates domain logic and rendering.
//! It does not parse CLI flags and it does not do filesystem I/O.

use anyhow::Context;
use std::collections::BTreeMap;
use stimband_domain::{band_report, group_quadrants};
use stimband_render::{
    render_band_report, render_quadrant_report, BandReportOptions, QuadrantReportOptions,
};
use stimband_types::{BandReport, BandScale, QuadrantGrouping, QuadrantPolicy, StimulusStat};

/// Wording of a rating scale's endpoints, e.g. "Not possible at all" /
/// "Extremely possible".
#[derive(Debug, Clone)]
pub struct ScaleLabels {
    pub min_label: String,
    pub max_label: String,
}

#[derive(Debug, Clone)]
pub struct BandReportRequest {
    pub stats: Vec<StimulusStat>,
    pub scale: BandScale,
    pub labels: ScaleLabels,

    /// Optional per-identifier scale annotations (viewpoint-averaged reports).
    pub annotations: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct BandReportOutcome {
    pub report: BandReport,
    pub text: String,
}

/// Use case for generating a sorted band report.
pub struct BandReportUseCase;

impl BandReportUseCase {
    /// Build the report and render it.
    ///
    /// Deterministic: identical requests produce byte-identical text.
    pub fn execute(req: BandReportRequest) -> BandReportOutcome {
        let report = band_report(&req.stats, &req.scale);

        let mut opts = BandReportOptions::new(req.labels.min_label, req.labels.max_label);
        if let Some(annotations) = req.annotations {
            opts = opts.with_annotations(annotations);
        }
        let text = render_band_report(&report, &opts);

        BandReportOutcome { report, text }
    }
}

#[derive(Debug, Clone)]
pub struct QuadrantRequest {
    pub primary_name: String,
    pub secondary_name: String,
    pub primary: Vec<StimulusStat>,
    pub secondary: Vec<StimulusStat>,
    pub policy: QuadrantPolicy,
}

#[derive(Debug, Clone)]
pub struct QuadrantOutcome {
    pub grouping: QuadrantGrouping,
    pub text: String,
}

/// Use case for bivariate quadrant grouping.
pub struct QuadrantUseCase;

impl QuadrantUseCase {
    /// Group and render. Integrity violations in the input (missing or
    /// duplicated counterparts) abort the run.
    pub fn execute(req: QuadrantRequest) -> anyhow::Result<QuadrantOutcome> {
        let grouping = group_quadrants(&req.primary, &req.secondary, &req.policy)
            .with_context(|| {
                format!(
                    "cannot group '{}' against '{}'",
                    req.primary_name, req.secondary_name
                )
            })?;

        let text = render_quadrant_report(
            &grouping,
            &QuadrantReportOptions {
                primary_name: req.primary_name,
                secondary_name: req.secondary_name,
            },
        );

        Ok(QuadrantOutcome { grouping, text })
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use stimband_types::QuadrantPolicy;

    fn stat_vec() -> impl Strategy<Value = Vec<StimulusStat>> {
        proptest::collection::vec(1.0f64..=5.0, 0..25).prop_map(|values| {
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| StimulusStat::new(format!("stim{i:03}"), v))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The rendered quadrant report is deterministic and its counts sum
        /// to the number of non-discarded stimuli.
        #[test]
        fn quadrant_use_case_is_deterministic(primary in stat_vec()) {
            let secondary: Vec<StimulusStat> = primary
                .iter()
                .map(|s| StimulusStat::new(s.id.clone(), 6.0 - s.value))
                .collect();
            let req = QuadrantRequest {
                primary_name: "Poss".into(),
                secondary_name: "real".into(),
                primary: primary.clone(),
                secondary,
                policy: QuadrantPolicy::extremes_only(),
            };
            let a = QuadrantUseCase::execute(req.clone()).unwrap();
            let b = QuadrantUseCase::execute(req).unwrap();
            prop_assert_eq!(&a.text, &b.text);
            prop_assert_eq!(
                a.grouping.grouped_total() + a.grouping.discarded,
                primary.len() as u32
            );
        }
    }
}
