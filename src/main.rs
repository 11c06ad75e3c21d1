//! CLI entry point: single runs, room-count sweeps, and config inspection.

use clap::{Parser, Subcommand};
use crossbeam_channel::unbounded;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use triage_rs::config::{Config, load_layered};
use triage_rs::output::{write_summary_csv, write_trace_jsonl};
use triage_rs::sweep::sweep_rooms;
use triage_simulator::{EventRecord, SimulationReport, Simulator, TracingSink};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Emergency department triage simulator
#[derive(Parser, Debug)]
#[command(name = "triage-sim", about = "Discrete-event simulation of an emergency department triage process.")]
pub struct Cli {
    /// Path to a TOML config file (overrides defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output directory for CSV/JSONL files
    #[arg(short, long, global = true, default_value = "./sim_output")]
    output: PathBuf,

    /// Parameter override (e.g. --param emergency.rooms=2)
    #[arg(long, global = true, value_parser = parse_key_val, num_args = 1)]
    param: Vec<(String, String)>,

    /// Log admissions, timeouts and escalations
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single simulation (default)
    Run {
        /// Also write every processed event to trace.jsonl
        #[arg(long)]
        trace: bool,
    },
    /// Run one simulation per room count
    Sweep {
        #[arg(long, default_value_t = 1)]
        min_rooms: u32,
        #[arg(long, default_value_t = 6)]
        max_rooms: u32,
    },
    /// Print the effective configuration as TOML
    ShowConfig,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => Ok((key.trim().to_string(), val.trim().to_string())),
        _ => Err(format!("Invalid KEY=VAL: no `=` found in '{}'.", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    if let Err(e) = run(cli) {
        tracing::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), BoxError> {
    let config = load_layered(cli.config.as_deref(), &cli.param)?;

    match cli.command.unwrap_or(Commands::Run { trace: false }) {
        Commands::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Sweep { min_rooms, max_rooms } => {
            std::fs::create_dir_all(&cli.output)?;
            let reports = sweep_rooms(&config, min_rooms..=max_rooms)?;
            for report in &reports {
                print_report(report);
            }
            write_summary_csv(&cli.output.join("sweep.csv"), &reports)?;
        }
        Commands::Run { trace } => {
            std::fs::create_dir_all(&cli.output)?;
            let report = if trace {
                run_traced(config, &cli.output)?
            } else {
                Simulator::new(config)?.run(&mut TracingSink)
            };
            print_report(&report);
            write_summary_csv(&cli.output.join("summary.csv"), std::slice::from_ref(&report))?;
        }
    }
    Ok(())
}

/// Run with an event bus: the simulator publishes, a writer thread drains to trace.jsonl.
fn run_traced(config: Config, output: &std::path::Path) -> Result<SimulationReport, BoxError> {
    let mut sim = Simulator::new(config)?;
    let path = output.join("trace.jsonl");
    let file = BufWriter::new(File::create(&path)?);
    let (event_tx, event_rx) = unbounded::<EventRecord>();
    let writer = std::thread::spawn(move || write_trace_jsonl(file, event_rx.iter()));

    let mut sink = event_tx;
    let report = sim.run(&mut sink);
    drop(sink);

    let written = writer
        .join()
        .map_err(|_| "trace writer thread panicked")??;
    tracing::info!("Wrote {} events to {}", written, path.display());
    Ok(report)
}

fn print_report(report: &SimulationReport) {
    println!(
        "rooms={} patients={} treated={} abandoned={} dead={} unresolved={} (not arrived={}, stranded={})",
        report.rooms,
        report.num_patients,
        report.treated,
        report.abandoned,
        report.dead,
        report.unresolved,
        report.not_arrived,
        report.stranded
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("emergency.rooms=2"),
            Ok(("emergency.rooms".to_string(), "2".to_string()))
        );
        assert_eq!(
            parse_key_val("emergency.end_time=12:00"),
            Ok(("emergency.end_time".to_string(), "12:00".to_string()))
        );
        assert!(parse_key_val("emergency.rooms").is_err());
        assert!(parse_key_val("=2").is_err());
    }

    #[test]
    fn test_cli_parses_sweep() {
        let cli = Cli::try_parse_from([
            "triage-sim",
            "sweep",
            "--min-rooms",
            "2",
            "--max-rooms",
            "4",
            "--param",
            "emergency.patients=30",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Sweep { min_rooms: 2, max_rooms: 4 })));
        assert_eq!(cli.param.len(), 1);
    }
}
