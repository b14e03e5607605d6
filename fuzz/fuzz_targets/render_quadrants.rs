#![no_main]

use libfuzzer_sys::fuzz_target;
use stimband_render::{render_quadrant_report, QuadrantReportOptions};
use stimband_types::QuadrantGrouping;

fuzz_target!(|data: &[u8]| {
    if let Ok(grouping) = serde_json::from_slice::<QuadrantGrouping>(data) {
        let _ = render_quadrant_report(
            &grouping,
            &QuadrantReportOptions {
                primary_name: "Poss".to_string(),
                secondary_name: "real".to_string(),
            },
        );
    }
});
