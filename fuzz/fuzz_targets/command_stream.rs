#![no_main]

use drone_fleet_sim::swarm::SwarmEngine;
use drone_fleet_sim::{apply_command, Command, FleetState, SimConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decode a stream of commands and run a few ticks after each one
    let config = SimConfig::test_config(6);
    let (Ok(mut state), Ok(engine)) = (FleetState::new(&config), SwarmEngine::new(config.clone()))
    else {
        return;
    };

    let mut rest = data;
    while let Ok((command, tail)) = postcard::take_from_bytes::<Command>(rest) {
        if let Ok((next, _)) = apply_command(&state, &command, &config) {
            state = next;
        }
        for _ in 0..4 {
            state = engine.step(&state);
        }
        for unit in state.units.iter() {
            assert!(unit.position.is_finite());
            assert!(unit.position.z >= 0.0);
            assert!(unit.speed() <= config.max_velocity + 1e-3);
        }
        rest = tail;
    }
});
