#![no_main]

use libfuzzer_sys::fuzz_target;
use stimband_types::BandScale;

fuzz_target!(|value: f64| {
    if !value.is_finite() {
        return;
    }
    let scale = BandScale::default();
    let band = stimband_domain::assign_band(value, &scale);
    // Every band has a printable label.
    let _ = scale.label(band);
});
