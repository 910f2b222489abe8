#![no_main]

use libfuzzer_sys::fuzz_target;
use population_growth_simulator::{analysis::SeriesSummary, io::read_csv_from_bytes};

fuzz_target!(|data: &[u8]| {
    if let Ok(dataset) = read_csv_from_bytes(data, "fuzz") {
        let _ = SeriesSummary::compute(&dataset.series);
    }
});
