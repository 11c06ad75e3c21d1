use serde::Serialize;
use triage_shared::SimTime;

/// Terminal outcomes counted during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub treated: u32,
    pub abandoned: u32,
    pub dead: u32,
}

impl Counters {
    pub fn resolved(&self) -> u32 {
        self.treated + self.abandoned + self.dead
    }
}

/// Final statistics of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub rooms: u32,
    pub num_patients: u32,
    pub treated: u32,
    pub abandoned: u32,
    pub dead: u32,
    /// Patients without a terminal outcome: `not_arrived + stranded`.
    pub unresolved: u32,
    /// Arrival slots that fell at or after closing time.
    pub not_arrived: u32,
    /// Patients that arrived but never reached OUT or BLACK.
    pub stranded: u32,
    pub events_processed: u64,
    pub finished_at: SimTime,
}

impl SimulationReport {
    /// Every configured patient is accounted for exactly once.
    pub fn is_conserved(&self) -> bool {
        self.treated + self.abandoned + self.dead + self.unresolved == self.num_patients
            && self.not_arrived + self.stranded == self.unresolved
    }
}
