//! CivSim Headless Driver
//!
//! Runs the simulation in-process, no rendering. Logs population at the
//! configured interval and reports the final population and tick count.
//!
//! Usage:
//!   cargo run -p civsim-cli -- run
//!   cargo run -p civsim-cli -- run --config sim.json --ticks 1000 --report out.json
//!   RUST_LOG=debug cargo run -p civsim-cli -- run

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use civsim_core::config::validate_config;
use civsim_core::{RunSummary, SimConfig, SimulationEngine};
use clap::{Parser, Subcommand};
use log::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "civsim")]
#[command(about = "Grid civilization simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation to its tick budget or extinction
    Run {
        /// Path to config file (JSON); missing fields use defaults
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the tick budget
        #[arg(long)]
        ticks: Option<u64>,

        /// Override the RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the initial agent count
        #[arg(long)]
        agents: Option<usize>,

        /// Write the run summary and per-tick history as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn load_config(path: &Path) -> Result<SimConfig> {
    let file =
        File::open(path).with_context(|| format!("failed to open config {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn build_config(
    path: Option<&Path>,
    ticks: Option<u64>,
    seed: Option<u64>,
    agents: Option<usize>,
) -> Result<SimConfig> {
    let mut config = match path {
        Some(p) => load_config(p)?,
        None => SimConfig::default(),
    };
    if let Some(t) = ticks {
        config.max_ticks = t;
    }
    if let Some(s) = seed {
        config.seed = s;
    }
    if let Some(n) = agents {
        config.initial_agents = n;
    }

    let errors = validate_config(&config);
    if !errors.is_empty() {
        let list = errors
            .iter()
            .map(|e| format!("  - {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("invalid configuration:\n{list}");
    }
    Ok(config)
}

fn write_report(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    writer.flush()?;
    info!("Wrote run report to {}", path.display());
    Ok(())
}

fn run(config: SimConfig, report: Option<&Path>) -> Result<RunSummary> {
    let mut engine = SimulationEngine::new(config)?;
    let summary = engine.run();

    println!(
        "Simulation complete. Final population: {}",
        summary.final_population
    );
    println!(
        "Ticks run: {}{}",
        summary.ticks_run,
        if summary.extinct { " (extinct)" } else { "" }
    );
    println!(
        "Peak population: {}, births: {}, deaths: {}",
        summary.peak_population(),
        summary.total_births(),
        summary.total_deaths()
    );

    if let Some(path) = report {
        write_report(path, &summary)?;
    }
    Ok(summary)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            agents,
            report,
        } => {
            let config = build_config(config.as_deref(), ticks, seed, agents)?;
            run(config, report.as_deref())?;
        }
        Commands::DumpDefaultConfig => {
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("civsim-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "civsim", "run", "--ticks", "10", "--seed", "5", "--agents", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                ticks,
                seed,
                agents,
                config,
                report,
            } => {
                assert_eq!(ticks, Some(10));
                assert_eq!(seed, Some(5));
                assert_eq!(agents, Some(3));
                assert!(config.is_none());
                assert!(report.is_none());
            }
            Commands::DumpDefaultConfig => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = build_config(None, Some(7), Some(9), Some(11)).unwrap();
        assert_eq!(config.max_ticks, 7);
        assert_eq!(config.seed, 9);
        assert_eq!(config.initial_agents, 11);
        assert_eq!(config.world_width, 64);
    }

    #[test]
    fn test_config_file_then_flags() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{ "world_width": 12, "max_ticks": 3 }"#).unwrap();
        let config = build_config(Some(path.as_path()), None, Some(1), None).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.world_width, 12);
        assert_eq!(config.max_ticks, 3);
        assert_eq!(config.seed, 1);
    }

    #[test]
    fn test_invalid_config_lists_errors() {
        let path = temp_path("bad.json");
        std::fs::write(&path, r#"{ "world_width": 0, "share_fraction": 3.0 }"#).unwrap();
        let err = build_config(Some(path.as_path()), None, None, None).unwrap_err();
        std::fs::remove_file(&path).ok();
        let msg = err.to_string();
        assert!(msg.contains("grid dimensions"));
        assert!(msg.contains("share_fraction"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = build_config(Some(Path::new("/nonexistent/civsim.json")), None, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("failed to open config"));
    }

    #[test]
    fn test_run_writes_report() {
        let report = temp_path("report.json");
        let config = SimConfig {
            world_width: 8,
            world_height: 8,
            initial_agents: 10,
            max_ticks: 5,
            ..Default::default()
        };
        let summary = run(config, Some(report.as_path())).unwrap();
        let written: RunSummary =
            serde_json::from_reader(File::open(&report).unwrap()).unwrap();
        std::fs::remove_file(&report).ok();
        assert_eq!(written.ticks_run, summary.ticks_run);
        assert_eq!(written.final_population, summary.final_population);
        assert_eq!(written.history.len(), summary.history.len());
        assert!(summary.ticks_run <= 5);
    }
}
