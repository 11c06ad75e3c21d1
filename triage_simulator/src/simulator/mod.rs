pub mod event_queue;
pub mod triage;
pub mod waiting_room;

use crate::report::{Counters, SimulationReport};
use crate::sink::{EventRecord, EventSink};
use crate::simulator::event_queue::{SimClock, SimEvent, SimEventQueue, SimEventType};
use crate::simulator::triage::ColorRotation;
use crate::simulator::waiting_room::WaitingRoom;
use triage_shared::{ColorCode, Config, ConfigError, Patient, PatientId, SimTime};

/// Discrete-event model of an emergency department.
///
/// Owns every piece of mutable run state. Patients live in `patients` and are
/// referenced by [`PatientId`] from both the event queue and the waiting room.
pub struct Simulator {
    config: Config,
    event_queue: SimEventQueue,
    clock: SimClock,
    patients: Vec<Patient>,
    waiting_room: WaitingRoom,
    rotation: ColorRotation,
    free_rooms: u32,
    counters: Counters,
    events_processed: u64,
}

impl Simulator {
    /// Validate `config` and seed the queue with every arrival and the first tick.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = config.start();
        let mut sim = Self {
            event_queue: SimEventQueue::new(),
            clock: SimClock::new(start),
            patients: Vec::new(),
            waiting_room: WaitingRoom::new(),
            rotation: ColorRotation::new(),
            free_rooms: config.emergency.rooms,
            counters: Counters::default(),
            events_processed: 0,
            config,
        };
        sim.seed();
        tracing::info!(
            "Simulator initialized at {}: {} rooms, {} of {} patients arriving, {} events queued",
            start,
            sim.config.emergency.rooms,
            sim.patients.len(),
            sim.config.emergency.patients,
            sim.event_queue.len()
        );
        Ok(sim)
    }

    fn seed(&mut self) {
        let end = self.config.end();
        let interval = self.config.arrival_interval();
        let mut time = self.config.start();
        while time < end && self.patients.len() < self.config.emergency.patients as usize {
            let id = PatientId(self.patients.len());
            self.patients.push(Patient::new(id, time));
            self.event_queue.push(time, SimEventType::Arrival, Some(id));
            time = time + interval;
        }
        // Queued after the arrivals so that, at the start time, they go first.
        self.event_queue.push(self.config.start(), SimEventType::Tick, None);
    }

    /// Drain the event queue and report the outcome.
    pub fn run(&mut self, sink: &mut dyn EventSink) -> SimulationReport {
        while self.step(sink).is_some() {}
        let report = self.report();
        tracing::info!(
            "Simulation finished at {} after {} events: treated={}, abandoned={}, dead={}, unresolved={}",
            report.finished_at,
            report.events_processed,
            report.treated,
            report.abandoned,
            report.dead,
            report.unresolved
        );
        report
    }

    /// Process the earliest pending event. `None` once the queue is empty.
    pub fn step(&mut self, sink: &mut dyn EventSink) -> Option<SimEvent> {
        let event = self.event_queue.pop()?;
        self.clock.advance_to(event.timestamp);
        sink.record(&EventRecord::from(&event));
        self.process_event(&event);
        self.events_processed += 1;
        debug_assert!(self.free_rooms <= self.config.emergency.rooms);
        Some(event)
    }

    fn process_event(&mut self, event: &SimEvent) {
        let ora = event.timestamp;
        match event.event_type {
            SimEventType::Arrival => {
                if let Some(id) = self.patient_of(event) {
                    self.event_queue
                        .push(ora + self.config.triage_duration(), SimEventType::Triage, Some(id));
                }
            }
            SimEventType::Triage => {
                if let Some(id) = self.patient_of(event) {
                    self.on_triage(ora, id);
                }
            }
            SimEventType::FreeRoom => self.on_free_room(ora),
            SimEventType::Timeout => {
                if let Some(id) = self.patient_of(event) {
                    self.on_timeout(ora, id);
                }
            }
            SimEventType::Treated => {
                if let Some(id) = self.patient_of(event) {
                    self.on_treated(ora, id);
                }
            }
            SimEventType::Tick => self.on_tick(ora),
        }
    }

    fn patient_of(&self, event: &SimEvent) -> Option<PatientId> {
        let id = event.patient.filter(|id| id.0 < self.patients.len());
        debug_assert!(id.is_some(), "{} event without a known patient", event.event_type);
        id
    }

    fn on_triage(&mut self, ora: SimTime, id: PatientId) {
        let patient = &mut self.patients[id.0];
        if patient.color != ColorCode::New {
            debug_assert!(false, "patient {} triaged twice", id);
            return;
        }
        patient.color = self.rotation.next();
        self.waiting_room.insert(patient);
        if let Some(timeout) = self.config.timeout(patient.color) {
            self.event_queue.push(ora + timeout, SimEventType::Timeout, Some(id));
        }
    }

    fn on_free_room(&mut self, ora: SimTime) {
        if self.free_rooms == 0 {
            return;
        }
        let Some(id) = self.waiting_room.pop_first() else {
            return;
        };
        let patient = &mut self.patients[id.0];
        let Some(service) = self.config.service_duration(patient.color) else {
            debug_assert!(false, "patient {} admitted as {}", id, patient.color);
            return;
        };
        tracing::debug!("{} admitting {} ({})", ora, id, patient.color);
        patient.color = ColorCode::Treating;
        self.free_rooms -= 1;
        self.event_queue.push(ora + service, SimEventType::Treated, Some(id));
    }

    fn on_timeout(&mut self, ora: SimTime, id: PatientId) {
        let patient = &mut self.patients[id.0];
        match patient.color {
            ColorCode::White => {
                self.waiting_room.remove(id);
                patient.color = ColorCode::Out;
                self.counters.abandoned += 1;
                tracing::debug!("{} patient {} left without being seen", ora, id);
            }
            ColorCode::Yellow => {
                self.waiting_room.remove(id);
                patient.color = ColorCode::Red;
                self.waiting_room.insert(patient);
                if let Some(timeout) = self.config.timeout(ColorCode::Red) {
                    self.event_queue.push(ora + timeout, SimEventType::Timeout, Some(id));
                }
                tracing::debug!("{} patient {} escalated to RED", ora, id);
            }
            ColorCode::Red => {
                self.waiting_room.remove(id);
                patient.color = ColorCode::Black;
                self.counters.dead += 1;
                tracing::debug!("{} patient {} died while waiting", ora, id);
            }
            // Admitted or gone before the timeout fired.
            _ => {}
        }
    }

    fn on_treated(&mut self, ora: SimTime, id: PatientId) {
        let patient = &mut self.patients[id.0];
        if patient.color != ColorCode::Treating {
            debug_assert!(false, "patient {} finished treatment as {}", id, patient.color);
            return;
        }
        patient.color = ColorCode::Out;
        self.counters.treated += 1;
        self.free_rooms += 1;
        self.event_queue.push(ora, SimEventType::FreeRoom, None);
    }

    fn on_tick(&mut self, ora: SimTime) {
        if self.free_rooms > 0 && !self.waiting_room.is_empty() {
            self.event_queue.push(ora, SimEventType::FreeRoom, None);
        }
        // The only thing that stops the periodic poll.
        if ora < self.config.end() {
            self.event_queue
                .push(ora + self.config.tick_interval(), SimEventType::Tick, None);
        }
    }

    pub fn report(&self) -> SimulationReport {
        let num_patients = self.config.emergency.patients;
        let arrived = self.patients.len() as u32;
        let stranded = self.patients.iter().filter(|p| !p.color.is_terminal()).count() as u32;
        SimulationReport {
            rooms: self.config.emergency.rooms,
            num_patients,
            treated: self.counters.treated,
            abandoned: self.counters.abandoned,
            dead: self.counters.dead,
            unresolved: num_patients - self.counters.resolved(),
            not_arrived: num_patients - arrived,
            stranded,
            events_processed: self.events_processed,
            finished_at: self.clock.current_time,
        }
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(id.0)
    }

    pub fn free_rooms(&self) -> u32 {
        self.free_rooms
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting_room.len()
    }

    pub fn is_waiting(&self, id: PatientId) -> bool {
        self.waiting_room.contains(id)
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn now(&self) -> SimTime {
        self.clock.current_time
    }

    pub fn next_event_time(&self) -> Option<SimTime> {
        self.event_queue.peek_time()
    }

    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_finished(&self) -> bool {
        self.event_queue.is_empty()
    }
}
