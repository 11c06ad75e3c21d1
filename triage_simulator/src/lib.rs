//! Discrete-event simulator for emergency-department triage.
//!
//! Patients arrive at a fixed interval, are triaged into WHITE, YELLOW or RED,
//! and wait for one of a fixed number of treatment rooms. A periodic tick
//! offers free rooms to the waiting room; waiting too long makes a patient
//! leave (WHITE), escalate (YELLOW to RED) or die (RED).
//!
//! ```text
//! SimEventQueue (BinaryHeap, ordered by time then insertion)
//!        │ pop
//!        ▼
//! Simulator::process_event ──► patients: Vec<Patient>
//!        │                     waiting_room: BTreeMap by (color, arrival)
//!        │                     free_rooms, counters
//!        ▼
//! follow-up events pushed back onto the queue
//! ```
//!
//! The run ends when the queue is empty. The tick stops rescheduling itself
//! at closing time, and every other event chain is finite.

pub mod report;
pub mod simulator;
pub mod sink;

pub use report::{Counters, SimulationReport};
pub use simulator::Simulator;
pub use simulator::event_queue::{SimClock, SimEvent, SimEventQueue, SimEventType};
pub use simulator::triage::ColorRotation;
pub use simulator::waiting_room::WaitingRoom;
pub use sink::{EventRecord, EventSink, NullSink, TracingSink};

use triage_shared::{Config, ConfigError};

/// Run one simulation with `config`, logging each event at trace level.
pub fn simulate(config: Config) -> Result<SimulationReport, ConfigError> {
    let mut sim = Simulator::new(config)?;
    Ok(sim.run(&mut TracingSink))
}
