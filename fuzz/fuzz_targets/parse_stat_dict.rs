#![no_main]

use libfuzzer_sys::fuzz_target;
use stimband_render::{render_band_report, BandReportOptions};
use stimband_types::BandScale;

fuzz_target!(|data: &[u8]| {
    if let Ok(dict) = stimband_ingest::parse_stat_dict(data) {
        if let Ok(stats) = stimband_ingest::stimulus_means(&dict) {
            let report = stimband_domain::band_report(&stats, &BandScale::default());
            let _ = render_band_report(&report, &BandReportOptions::new("low", "high"));
        }
        let _ = stimband_ingest::viewpoint_averaged_means(&dict);
    }
});
