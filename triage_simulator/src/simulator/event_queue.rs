//! Event queue and simulation clock for the triage simulator

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use triage_shared::{PatientId, SimTime};

/// Simulation event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimEventType {
    Arrival,
    Triage,
    FreeRoom,
    Timeout,
    Treated,
    Tick,
}

impl fmt::Display for SimEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SimEventType::Arrival => "ARRIVAL",
            SimEventType::Triage => "TRIAGE",
            SimEventType::FreeRoom => "FREE_ROOM",
            SimEventType::Timeout => "TIMEOUT",
            SimEventType::Treated => "TREATED",
            SimEventType::Tick => "TICK",
        };
        f.write_str(name)
    }
}

/// Simulation event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimEvent {
    pub timestamp: SimTime,
    pub event_type: SimEventType,
    pub patient: Option<PatientId>,
    /// Insertion order, breaks ties between equal timestamps.
    pub seq: u64,
}

// BinaryHeap is a max-heap: the earliest (timestamp, seq) must compare greatest.
impl PartialOrd for SimEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SimEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Event queue for simulation
#[derive(Debug, Default)]
pub struct SimEventQueue {
    queue: BinaryHeap<SimEvent>,
    next_seq: u64,
}

impl SimEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timestamp: SimTime, event_type: SimEventType, patient: Option<PatientId>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(SimEvent {
            timestamp,
            event_type,
            patient,
            seq,
        });
    }

    pub fn pop(&mut self) -> Option<SimEvent> {
        self.queue.pop()
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|e| e.timestamp)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Simulation clock
#[derive(Debug, Clone)]
pub struct SimClock {
    pub current_time: SimTime,
}

impl SimClock {
    pub fn new(start: SimTime) -> Self {
        Self { current_time: start }
    }

    /// Move to `to`; the clock never runs backwards.
    pub fn advance_to(&mut self, to: SimTime) {
        debug_assert!(to >= self.current_time, "clock moved backwards: {} -> {}", self.current_time, to);
        self.current_time = self.current_time.max(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_time_order() {
        let mut q = SimEventQueue::new();
        q.push(SimTime::from_hm(8, 10), SimEventType::Tick, None);
        q.push(SimTime::from_hm(8, 0), SimEventType::Arrival, Some(PatientId(0)));
        q.push(SimTime::from_hm(8, 5), SimEventType::Triage, Some(PatientId(0)));
        let times: Vec<_> = std::iter::from_fn(|| q.pop()).map(|e| e.timestamp).collect();
        assert_eq!(
            times,
            vec![SimTime::from_hm(8, 0), SimTime::from_hm(8, 5), SimTime::from_hm(8, 10)]
        );
    }

    #[test]
    fn test_equal_timestamps_are_fifo() {
        let mut q = SimEventQueue::new();
        let t = SimTime::from_hm(8, 0);
        for i in 0..5 {
            q.push(t, SimEventType::Arrival, Some(PatientId(i)));
        }
        q.push(t, SimEventType::Tick, None);
        let order: Vec<_> = std::iter::from_fn(|| q.pop()).map(|e| (e.event_type, e.patient)).collect();
        assert_eq!(order.len(), 6);
        for (i, (kind, patient)) in order.iter().take(5).enumerate() {
            assert_eq!(*kind, SimEventType::Arrival);
            assert_eq!(*patient, Some(PatientId(i)));
        }
        assert_eq!(order[5], (SimEventType::Tick, None));
    }

    #[test]
    fn test_later_push_with_earlier_time_jumps_ahead() {
        let mut q = SimEventQueue::new();
        q.push(SimTime::from_hm(9, 0), SimEventType::Timeout, Some(PatientId(1)));
        q.push(SimTime::from_hm(8, 30), SimEventType::FreeRoom, None);
        assert_eq!(q.peek_time(), Some(SimTime::from_hm(8, 30)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop().map(|e| e.event_type), Some(SimEventType::FreeRoom));
        assert_eq!(q.pop().map(|e| e.event_type), Some(SimEventType::Timeout));
        assert!(q.pop().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn test_clock_advances() {
        let mut clock = SimClock::new(SimTime::from_hm(8, 0));
        clock.advance_to(SimTime::from_hm(8, 5));
        assert_eq!(clock.current_time, SimTime::from_hm(8, 5));
    }
}
