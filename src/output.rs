// src/output.rs - CSV summaries and JSONL event traces
use csv::Writer;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use triage_simulator::{EventRecord, SimulationReport};

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One header row, then one row per report.
pub fn write_summary_csv(path: &Path, reports: &[SimulationReport]) -> Result<(), OutputError> {
    let mut wtr = Writer::from_path(path)?;
    for report in reports {
        wtr.serialize(report)?;
    }
    wtr.flush()?;
    tracing::info!("Wrote {} run(s) to {}", reports.len(), path.display());
    Ok(())
}

/// Write one JSON object per line. Returns the number of records written.
pub fn write_trace_jsonl<W: Write>(
    mut out: W,
    records: impl IntoIterator<Item = EventRecord>,
) -> Result<usize, OutputError> {
    let mut written = 0;
    for record in records {
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use triage_shared::{PatientId, SimTime};
    use triage_simulator::SimEventType;

    #[test]
    fn test_trace_lines() {
        let records = vec![
            EventRecord {
                time: SimTime::from_hm(8, 0),
                kind: SimEventType::Arrival,
                patient: Some(PatientId(0)),
            },
            EventRecord {
                time: SimTime::from_hm(8, 0),
                kind: SimEventType::Tick,
                patient: None,
            },
        ];
        let mut buf = Vec::new();
        assert_eq!(write_trace_jsonl(&mut buf, records).unwrap(), 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], r#"{"time":"08:00","kind":"ARRIVAL","patient":0}"#);
        assert_eq!(lines[1], r#"{"time":"08:00","kind":"TICK","patient":null}"#);
    }

    #[test]
    fn test_summary_csv_has_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let report = SimulationReport {
            rooms: 1,
            num_patients: 2,
            treated: 2,
            abandoned: 0,
            dead: 0,
            unresolved: 0,
            not_arrived: 0,
            stranded: 0,
            events_processed: 30,
            finished_at: SimTime::from_hm(20, 0),
        };
        write_summary_csv(&path, &[report.clone(), report]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "rooms,num_patients,treated,abandoned,dead,unresolved,not_arrived,stranded,events_processed,finished_at"
        );
        assert_eq!(lines[1], "1,2,2,0,0,0,0,0,30,20:00");
    }
}
