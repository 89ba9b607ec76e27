use alerter::{AlertStore, InMemoryAlertStore};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use configuration::Config;
use core_types::format_variance_pct;
use engine::{FleetAnalyticsEngine, FleetAnalyticsSnapshot, FleetInput};
use risk::RiskBand;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the fleet analytics application.
fn main() {
    // Load FLEET__* overrides from a .env file when one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
    };
    if let Err(e) = result {
        tracing::error!(error = ?e, "Command failed.");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Fuel economy and driver risk analytics for a vehicle fleet.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a fleet snapshot and reconcile fuel economy alerts.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// JSON file with vehicles, consumption history, drivers, fines and damages.
    #[arg(long)]
    input: PathBuf,

    /// Threshold configuration. Missing files fall back to defaults.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// JSON alert store, read before the run and written after it.
    #[arg(long)]
    alerts: Option<PathBuf>,

    /// Overrides the input's `as_of` timestamp (RFC 3339).
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Print the snapshot as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config_from(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let engine = FleetAnalyticsEngine::new(&config)?;

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("reading fleet input {}", args.input.display()))?;
    let mut input: FleetInput = serde_json::from_str(&raw).context("parsing fleet input")?;
    if let Some(as_of) = args.as_of {
        input.as_of = as_of;
    }

    let snapshot = match &args.alerts {
        Some(path) => {
            let mut store = InMemoryAlertStore::load_json(path)
                .with_context(|| format!("loading alert store {}", path.display()))?;
            let snapshot = engine.compute_with_store(input, &mut store)?;
            store
                .save_json(path)
                .with_context(|| format!("saving alert store {}", path.display()))?;
            tracing::info!(open = store.open_alerts().len(), path = %path.display(), "Alert store updated.");
            snapshot
        }
        None => engine.compute(&input),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_report(&snapshot, &config);
    }
    Ok(())
}

fn print_report(snapshot: &FleetAnalyticsSnapshot, config: &Config) {
    let mut vehicles = Table::new();
    vehicles.set_header(vec!["Vehicle", "Type", "Baseline", "Current", "vs Mfr", "vs Baseline", "Trend", "Attention"]);
    for status in &snapshot.vehicle_statuses {
        let attention = if status.degraded {
            "n/a (degraded)".to_string()
        } else if status.needs_attention {
            "yes".to_string()
        } else {
            "no".to_string()
        };
        vehicles.add_row(vec![
            Cell::new(&status.vehicle_id),
            Cell::new(status.vehicle_type.consumption_unit()),
            Cell::new(format!("{:.2}", status.baseline_consumption)),
            Cell::new(format!("{:.2}", status.current_consumption)),
            Cell::new(format_variance_pct(status.manufacturer_vs_baseline)),
            Cell::new(format_variance_pct(status.current_vs_baseline)),
            Cell::new(status.trend),
            Cell::new(attention),
        ]);
    }
    println!("Fuel economy as of {}\n{}", snapshot.generated_at.format("%Y-%m-%d %H:%M UTC"), vehicles);

    let delta = &snapshot.alerts;
    if !delta.is_empty() {
        let mut alerts = Table::new();
        alerts.set_header(vec!["Change", "Vehicle", "Severity", "Variance", "Notes"]);
        let changes = delta
            .created
            .iter()
            .map(|a| ("created", a))
            .chain(delta.updated.iter().map(|a| ("updated", a)))
            .chain(delta.resolved.iter().map(|a| ("resolved", a)));
        for (change, alert) in changes {
            alerts.add_row(vec![
                Cell::new(change),
                Cell::new(&alert.vehicle_id),
                Cell::new(alert.severity),
                Cell::new(format_variance_pct(alert.variance_percentage)),
                Cell::new(&alert.notes),
            ]);
        }
        println!("\nAlert changes\n{}", alerts);
    }

    let mut drivers = Table::new();
    drivers.set_header(vec!["Driver", "Fines", "Fine total", "Unpaid", "Damages", "Damage cost", "Risk", "Band", "Training"]);
    for summary in &snapshot.driver_summaries {
        drivers.add_row(vec![
            Cell::new(&summary.driver_name),
            Cell::new(summary.total_fines),
            Cell::new(summary.total_fine_amount.round_dp(2)),
            Cell::new(summary.unpaid_amount.round_dp(2)),
            Cell::new(summary.total_damages),
            Cell::new(summary.total_damages_cost.round_dp(2)),
            Cell::new(summary.risk_score),
            Cell::new(RiskBand::from_score(summary.risk_score, &config.risk_bands).label()),
            Cell::new(if summary.needs_training { "yes" } else { "no" }),
        ]);
    }
    println!("\nDriver risk\n{}", drivers);

    if !snapshot.diagnostics.is_empty() {
        println!("\nDiagnostics");
        for diagnostic in &snapshot.diagnostics {
            println!("  [{:?}] {}: {}", diagnostic.kind, diagnostic.entity, diagnostic.message);
        }
    }
}
