#![no_main]

use libfuzzer_sys::fuzz_target;
use population_growth_simulator::io::read_parameters_from_bytes;

fuzz_target!(|data: &[u8]| {
    if let Ok(params) = read_parameters_from_bytes(data) {
        // validation must never panic on whatever was parsed
        let _ = params.validate();
    }
});
