use std::ops::RangeInclusive;
use triage_shared::{Config, ConfigError};
use triage_simulator::{NullSink, SimulationReport, Simulator};

/// Run one independent simulation per room count, everything else from `base`.
pub fn sweep_rooms(base: &Config, rooms: RangeInclusive<u32>) -> Result<Vec<SimulationReport>, ConfigError> {
    let mut reports = Vec::new();
    for count in rooms {
        let mut config = base.clone();
        config.emergency.rooms = count;
        let mut sim = Simulator::new(config)?;
        let report = sim.run(&mut NullSink);
        tracing::info!(
            "rooms={}: treated={}, abandoned={}, dead={}",
            count,
            report.treated,
            report.abandoned,
            report.dead
        );
        reports.push(report);
    }
    Ok(reports)
}
