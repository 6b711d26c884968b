#![no_main]

use drone_fleet_sim::{step, FleetState, SimConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any snapshot that decodes must step without panicking
    if let Ok(state) = postcard::from_bytes::<FleetState>(data) {
        let config = SimConfig::test_config(state.len().max(1));
        let next = step(&state, &config);
        let _ = postcard::to_allocvec(&next);
    }
});
