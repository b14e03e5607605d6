#![no_main]

use libfuzzer_sys::fuzz_target;
use stimband_render::{render_band_report, BandReportOptions};
use stimband_types::BandReport;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = serde_json::from_slice::<BandReport>(data) {
        let _ = render_band_report(&report, &BandReportOptions::new("low", "high"));
    }
});
