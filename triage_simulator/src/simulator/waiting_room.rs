//! Severity-ordered waiting room.
//!
//! Patients are kept in a `BTreeMap` keyed by `(priority, arrival, id)` so the
//! next admission is always the first entry, and a side index maps each
//! patient to its key so timeouts can pull a patient out from anywhere.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use triage_shared::{Patient, PatientId, SimTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct WaitKey {
    priority: Reverse<u8>,
    arrival: SimTime,
    id: PatientId,
}

#[derive(Debug, Default)]
pub struct WaitingRoom {
    queue: BTreeMap<WaitKey, PatientId>,
    index: HashMap<PatientId, WaitKey>,
}

impl WaitingRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a triaged patient. Returns false if the patient is not in a
    /// waiting color or is already seated.
    pub fn insert(&mut self, patient: &Patient) -> bool {
        let Some(priority) = patient.color.priority() else {
            debug_assert!(false, "patient {} cannot wait as {}", patient.id, patient.color);
            return false;
        };
        if self.index.contains_key(&patient.id) {
            debug_assert!(false, "patient {} is already waiting", patient.id);
            return false;
        }
        let key = WaitKey {
            priority: Reverse(priority),
            arrival: patient.arrival,
            id: patient.id,
        };
        self.queue.insert(key, patient.id);
        self.index.insert(patient.id, key);
        true
    }

    /// Take the most urgent, longest-waiting patient.
    pub fn pop_first(&mut self) -> Option<PatientId> {
        let (_, id) = self.queue.pop_first()?;
        self.index.remove(&id);
        Some(id)
    }

    pub fn peek_first(&self) -> Option<PatientId> {
        self.queue.first_key_value().map(|(_, id)| *id)
    }

    pub fn remove(&mut self, id: PatientId) -> bool {
        match self.index.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_shared::ColorCode;

    fn patient(id: usize, minute: u64, color: ColorCode) -> Patient {
        let mut p = Patient::new(PatientId(id), SimTime::from_minutes(8 * 60 + minute));
        p.color = color;
        p
    }

    #[test]
    fn test_red_before_yellow_before_white() {
        let mut room = WaitingRoom::new();
        room.insert(&patient(0, 0, ColorCode::White));
        room.insert(&patient(1, 5, ColorCode::Yellow));
        room.insert(&patient(2, 10, ColorCode::Red));
        assert_eq!(room.pop_first(), Some(PatientId(2)));
        assert_eq!(room.pop_first(), Some(PatientId(1)));
        assert_eq!(room.pop_first(), Some(PatientId(0)));
        assert_eq!(room.pop_first(), None);
    }

    #[test]
    fn test_fifo_within_a_color() {
        let mut room = WaitingRoom::new();
        room.insert(&patient(4, 20, ColorCode::White));
        room.insert(&patient(1, 5, ColorCode::White));
        room.insert(&patient(3, 15, ColorCode::White));
        assert_eq!(room.pop_first(), Some(PatientId(1)));
        assert_eq!(room.pop_first(), Some(PatientId(3)));
        assert_eq!(room.pop_first(), Some(PatientId(4)));
    }

    #[test]
    fn test_remove_from_middle() {
        let mut room = WaitingRoom::new();
        room.insert(&patient(0, 0, ColorCode::White));
        room.insert(&patient(1, 5, ColorCode::Yellow));
        room.insert(&patient(2, 10, ColorCode::White));
        assert!(room.remove(PatientId(1)));
        assert!(!room.remove(PatientId(1)));
        assert!(!room.contains(PatientId(1)));
        assert_eq!(room.len(), 2);
        assert_eq!(room.peek_first(), Some(PatientId(0)));
    }

    #[test]
    fn test_escalated_patient_is_reordered() {
        let mut room = WaitingRoom::new();
        let mut yellow = patient(1, 5, ColorCode::Yellow);
        room.insert(&patient(0, 0, ColorCode::Red));
        room.insert(&yellow);
        room.insert(&patient(2, 10, ColorCode::Red));
        assert!(room.remove(yellow.id));
        yellow.color = ColorCode::Red;
        room.insert(&yellow);
        // Among reds, earlier arrival goes first.
        assert_eq!(room.pop_first(), Some(PatientId(0)));
        assert_eq!(room.pop_first(), Some(PatientId(1)));
        assert_eq!(room.pop_first(), Some(PatientId(2)));
        assert!(room.is_empty());
    }
}
