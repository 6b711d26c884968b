//! Fleet Simulation Demo
//!
//! Runs a twelve-unit fleet through a full sortie at the real 60Hz cadence:
//! - Arm and takeoff
//! - Ant-colony chain formation with periodic leader elections
//! - Broadcast waypoint mission
//! - Landing and disarm
//!
//! # Running
//! `cargo run --example fleet_demo`

use drone_fleet_sim::advisory::{Advisor, FleetSummary, RuleAdvisor};
use drone_fleet_sim::time_abstraction::StdTimeSource;
use drone_fleet_sim::*;

/// Sink printing each event and keeping a history
#[derive(Default)]
struct ConsoleSink {
    history: EventLog,
}

impl EventSink for ConsoleSink {
    fn record(&mut self, event: &FleetEvent) {
        println!("   {}", event);
        self.history.record(event);
    }
}

fn print_fleet(state: &FleetState) {
    let centroid = state.centroid();
    println!(
        "   t={:>6.2}s  tick={:<6} centroid=({:.1}, {:.1}, {:.1}) leader={}",
        state.simulation_time,
        state.tick,
        centroid.x,
        centroid.y,
        centroid.z,
        state
            .leader_id
            .map_or_else(|| "none".to_string(), |id| id.to_string())
    );
    for unit in state.units.iter().take(4) {
        println!(
            "     {} {:<8} {:<10} pos=({:>6.1}, {:>6.1}, {:>5.1}) |v|={:>4.1} batt={:>6.2}% score={:.3}",
            unit.callsign,
            unit.status,
            unit.flight_mode,
            unit.position.x,
            unit.position.y,
            unit.position.z,
            unit.speed(),
            unit.battery_percent(),
            unit.score
        );
    }
}

fn main() -> Result<()> {
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║                 DRONE FLEET SIMULATION DEMO                ║");
    println!("╚════════════════════════════════════════════════════════════╝");

    let config = SimConfig::default();
    let mut sched = TickScheduler::new(config, ConsoleSink::default())?;
    let clock = StdTimeSource::new();

    println!("\n[1] Arm and takeoff");
    sched.dispatch(Command::Arm)?;
    sched.dispatch(Command::Takeoff)?;
    let stats = sched.run_paced(&clock, 5 * 60);
    print_fleet(sched.snapshot());
    println!("   paced {} ticks, {} overruns", stats.ticks, stats.overruns);

    println!("\n[2] Chain formation (accelerated, 30s simulated)");
    sched.run(30 * 60);
    print_fleet(sched.snapshot());

    println!("\n[3] Broadcast mission");
    let mission = [
        Position::new(20.0, 0.0, 15.0),
        Position::new(20.0, 20.0, 15.0),
        Position::new(0.0, 20.0, 15.0),
        Position::new(0.0, 0.0, 15.0),
    ];
    sched.dispatch(Command::fleet_mission(&mission))?;
    sched.run(40 * 60);
    print_fleet(sched.snapshot());

    println!("\n[4] Advisory");
    let summary = FleetSummary::from_state(sched.snapshot());
    let mut reply = String::new();
    if RuleAdvisor::default()
        .advise(&summary, "status report", &mut reply)
        .is_ok()
    {
        for line in reply.lines() {
            println!("   {}", line);
        }
    }

    println!("\n[5] Land and disarm");
    sched.dispatch(Command::Land)?;
    sched.run(30 * 60);
    sched.dispatch(Command::Disarm)?;
    print_fleet(sched.snapshot());

    let sink = sched.into_sink();
    println!(
        "\nDone: {} events recorded, {} kept",
        sink.history.total_recorded(),
        sink.history.len()
    );
    Ok(())
}
