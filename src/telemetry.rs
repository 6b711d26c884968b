//! Fleet events and log sinks
//!
//! The core reports what happened as `FleetEvent` values; formatting into
//! operator log lines is the event's `Display`. Sinks decide what to do
//! with them: keep a bounded history, forward to `log`, or both.

use crate::types::*;
use core::fmt;
use heapless::Deque;
use log::info;
use serde::{Deserialize, Serialize};

/// Events retained by `EventLog`
pub const EVENT_LOG_CAPACITY: usize = 100;

/// Something the fleet did in response to a command or election
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FleetEvent {
    /// Fleet armed
    Armed,
    /// Fleet disarmed, motors killed
    Disarmed,
    /// Global takeoff commanded
    Takeoff {
        /// Target altitude (meters)
        altitude: f32,
    },
    /// Global landing commanded
    Landing,
    /// Coordination algorithm changed
    AlgorithmChanged(SwarmAlgorithm),
    /// Mission broadcast to every unit
    FleetMissionUploaded {
        /// Waypoints accepted per unit
        waypoints: usize,
    },
    /// Mission sent to one unit
    UnitMissionUploaded {
        /// Receiving unit
        unit: UnitId,
        /// Waypoints accepted
        waypoints: usize,
    },
    /// Every unit teleported
    FleetRepositioned(Position),
    /// One unit teleported
    UnitRepositioned {
        /// Moved unit
        unit: UnitId,
        /// New position
        point: Position,
    },
    /// Ambient conditions replaced
    EnvironmentUpdated(Environment),
    /// Election moved the lead
    LeaderHotSwap {
        /// Replaced leader
        previous: Option<UnitId>,
        /// New leader
        leader: UnitId,
        /// New leader's score
        score: f32,
    },
}

impl fmt::Display for FleetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FleetEvent::Armed => write!(f, "[SYSTEM] FLEET ARMED: MOTORS IDLE"),
            FleetEvent::Disarmed => write!(f, "[SYSTEM] FLEET DISARMED: MOTORS KILLED"),
            FleetEvent::Takeoff { .. } => write!(f, "[COMMAND] EXECUTING GLOBAL TAKEOFF"),
            FleetEvent::Landing => write!(f, "[COMMAND] EXECUTING GLOBAL LANDING"),
            FleetEvent::AlgorithmChanged(algorithm) => {
                write!(f, "[SYSTEM] SWARM ALGORITHM SET: {}", algorithm)
            }
            FleetEvent::FleetMissionUploaded { waypoints } => {
                write!(f, "[MAVLINK] BROADCAST MISSION UPLOAD: {} WAYPOINTS", waypoints)
            }
            FleetEvent::UnitMissionUploaded { unit, waypoints } => {
                write!(f, "[MAVLINK] MISSION UPLOAD {}: {} WAYPOINTS", unit, waypoints)
            }
            FleetEvent::FleetRepositioned(p) => {
                write!(f, "[SYSTEM] FLEET REDEPLOYED TO {:.1}, {:.1}", p.x, p.y)
            }
            FleetEvent::UnitRepositioned { unit, point } => write!(
                f,
                "[SYSTEM] {} REDEPLOYED TO {:.1}, {:.1}, {:.1}",
                unit, point.x, point.y, point.z
            ),
            FleetEvent::EnvironmentUpdated(env) => write!(
                f,
                "[DATA] ENVIRONMENT: WIND {:.1} M/S, RAIN {:.0}%, RF {:.0}%",
                env.wind_speed,
                env.rain * 100.0,
                env.interference * 100.0
            ),
            FleetEvent::LeaderHotSwap {
                previous: Some(previous),
                leader,
                score,
            } => write!(
                f,
                "[CONSENSUS] LEADER HOT-SWAP: {} -> {} (F_S {:.3})",
                previous, leader, score
            ),
            FleetEvent::LeaderHotSwap {
                previous: None,
                leader,
                score,
            } => write!(f, "[CONSENSUS] LEADER ELECTED: {} (F_S {:.3})", leader, score),
        }
    }
}

/// Receiver of fleet events
pub trait EventSink {
    /// Record one event
    fn record(&mut self, event: &FleetEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &FleetEvent) {
        (**self).record(event);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &FleetEvent) {}
}

/// Forwards events to the `log` facade at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: &FleetEvent) {
        info!("{}", event);
    }
}

/// Bounded in-memory history, newest first
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Deque<FleetEvent, EVENT_LOG_CAPACITY>,
    total: u64,
}

impl EventLog {
    /// Create empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Events held, newest first
    pub fn iter(&self) -> impl Iterator<Item = &FleetEvent> {
        self.events.iter()
    }

    /// Most recent event
    pub fn latest(&self) -> Option<&FleetEvent> {
        self.events.front()
    }

    /// Number of events held
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events recorded since creation, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    /// Drop all held events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: &FleetEvent) {
        if self.events.is_full() {
            self.events.pop_back();
        }
        let _ = self.events.push_front(*event);
        self.total += 1;
    }
}
