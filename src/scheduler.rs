//! Fixed-rate tick scheduler
//!
//! Owns the current snapshot and replaces it wholesale every tick. Commands
//! are either applied immediately (`dispatch`) or queued (`submit`) and
//! drained at the start of the next tick, so a command never lands inside
//! a tick computation.

use crate::command::{apply_command, Command};
use crate::consensus::ElectionOutcome;
use crate::fleet::FleetState;
use crate::swarm::SwarmEngine;
use crate::system::config::SimConfig;
use crate::telemetry::{EventSink, FleetEvent};
use crate::time_abstraction::TimeSource;
use crate::types::*;
use heapless::Deque;
use log::{trace, warn};

/// Commands that can wait for the next tick
pub const COMMAND_QUEUE_CAPACITY: usize = 16;

/// Result of a paced run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacingStats {
    /// Ticks executed
    pub ticks: u64,
    /// Ticks that finished after their deadline
    pub overruns: u64,
}

/// Drives the fleet one tick at a time and reports events to a sink
pub struct TickScheduler<S: EventSink> {
    engine: SwarmEngine,
    state: FleetState,
    queue: Deque<Command, COMMAND_QUEUE_CAPACITY>,
    sink: S,
}

impl<S: EventSink> TickScheduler<S> {
    /// Create scheduler over the startup fleet described by `config`
    pub fn new(config: SimConfig, sink: S) -> Result<Self> {
        let state = FleetState::new(&config)?;
        Self::with_state(config, state, sink)
    }

    /// Create scheduler resuming from an existing snapshot
    pub fn with_state(config: SimConfig, state: FleetState, sink: S) -> Result<Self> {
        Ok(Self {
            engine: SwarmEngine::new(config)?,
            state,
            queue: Deque::new(),
            sink,
        })
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &FleetState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &SimConfig {
        self.engine.config()
    }

    /// Event sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give back the sink, dropping the scheduler
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Commands waiting for the next tick
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply a command now and record its event
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        let (next, event) = apply_command(&self.state, &command, self.engine.config())?;
        self.state = next;
        self.sink.record(&event);
        Ok(())
    }

    /// Queue a command for the start of the next tick
    pub fn submit(&mut self, command: Command) -> Result<()> {
        self.queue
            .push_back(command)
            .map_err(|_| SimError::BufferFull)
    }

    /// Drain queued commands, then advance one tick
    pub fn tick(&mut self) -> &FleetState {
        while let Some(command) = self.queue.pop_front() {
            if let Err(e) = self.dispatch(command) {
                warn!("Queued command rejected: {}", e);
            }
        }

        let (next, outcome) = self.engine.step_with_outcome(&self.state);
        if let ElectionOutcome::HotSwap {
            previous,
            leader,
            score,
        } = outcome
        {
            self.sink.record(&FleetEvent::LeaderHotSwap {
                previous,
                leader,
                score,
            });
        }
        self.state = next;
        trace!("Tick {} at t={:.3}s", self.state.tick, self.state.simulation_time);
        &self.state
    }

    /// Run `ticks` ticks back to back
    pub fn run(&mut self, ticks: u64) -> &FleetState {
        for _ in 0..ticks {
            self.tick();
        }
        &self.state
    }

    /// Run `ticks` ticks at the configured rate
    ///
    /// Waits out the remainder of each period after a tick. A tick that
    /// finishes past its deadline counts as an overrun and the schedule
    /// restarts from that moment; late ticks are never run back to back
    /// to catch up.
    pub fn run_paced<T: TimeSource>(&mut self, source: &T, ticks: u64) -> PacingStats {
        let period = self.engine.config().tick_period_us();
        let mut stats = PacingStats::default();
        let mut deadline = source.now_us().saturating_add(period);

        for _ in 0..ticks {
            self.tick();
            stats.ticks += 1;

            let now = source.now_us();
            if now < deadline {
                source.delay_us(deadline - now);
                deadline = deadline.saturating_add(period);
            } else {
                stats.overruns += 1;
                warn!("Tick {} overran by {}us", self.state.tick, now - deadline);
                deadline = now.saturating_add(period);
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::EventLog;
    use crate::time_abstraction::ManualTimeSource;

    fn scheduler(size: usize) -> TickScheduler<EventLog> {
        TickScheduler::new(SimConfig::test_config(size), EventLog::new()).unwrap()
    }

    #[test]
    fn test_dispatch_applies_and_records() {
        let mut sched = scheduler(3);
        sched.dispatch(Command::Arm).unwrap();
        assert!(sched.snapshot().is_armed());
        assert_eq!(sched.sink().latest(), Some(&FleetEvent::Armed));
    }

    #[test]
    fn test_submitted_commands_apply_at_next_tick() {
        let mut sched = scheduler(2);
        sched.submit(Command::Arm).unwrap();
        sched.submit(Command::Takeoff).unwrap();
        assert_eq!(sched.pending(), 2);
        assert!(!sched.snapshot().is_armed());

        let state = sched.tick();
        assert!(state.is_armed());
        assert!(state.units.iter().all(|u| u.flight_mode == FlightMode::Takeoff));
        assert!(state.units.iter().all(|u| u.position.z > 0.0));
        assert_eq!(sched.pending(), 0);
        assert_eq!(sched.sink().len(), 2);
    }

    #[test]
    fn test_queue_full() {
        let mut sched = scheduler(1);
        for _ in 0..COMMAND_QUEUE_CAPACITY {
            sched.submit(Command::Land).unwrap();
        }
        assert_eq!(sched.submit(Command::Land), Err(SimError::BufferFull));
    }

    #[test]
    fn test_rejected_queued_command_is_skipped() {
        let mut sched = scheduler(1);
        sched
            .submit(Command::RepositionUnit {
                unit: UnitId::new(7),
                point: Position::ZERO,
            })
            .unwrap();
        sched.submit(Command::Arm).unwrap();
        sched.tick();
        assert!(sched.snapshot().is_armed());
        assert_eq!(sched.sink().len(), 1);
    }

    #[test]
    fn test_run_paced_holds_cadence() {
        let mut sched = scheduler(1);
        let clock = ManualTimeSource::new();
        let stats = sched.run_paced(&clock, 60);
        assert_eq!(stats, PacingStats { ticks: 60, overruns: 0 });
        assert_eq!(clock.now_us(), 60 * sched.config().tick_period_us());
        assert_eq!(sched.snapshot().tick, 60);
    }

    /// Clock where every read costs 20ms, longer than a 60Hz period
    struct SlowClock(ManualTimeSource);

    impl TimeSource for SlowClock {
        fn now_us(&self) -> u64 {
            self.0.advance_us(20_000);
            self.0.now_us()
        }

        fn delay_us(&self, us: u64) {
            self.0.delay_us(us);
        }
    }

    #[test]
    fn test_run_paced_counts_overruns() {
        let mut sched = scheduler(1);
        let stats = sched.run_paced(&SlowClock(ManualTimeSource::new()), 5);
        assert_eq!(stats.ticks, 5);
        assert_eq!(stats.overruns, 5);
    }
}
