//! NetFleet CLI - Network Device Automation
//!
//! Configures, exports, inspects and right-sizes a fleet of network devices.

use clap::Parser;
use netfleet::config::{CliArgs, Commands, FleetConfig, OutputFormat};
use netfleet::core::AutomationEngine;
use netfleet::error::{NetFleetError, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_JSON_EXPORT: &str = "network_config.json";
const DEFAULT_XML_EXPORT: &str = "network_config.xml";

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v/-q
    let level = match (args.quiet, args.verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = FleetConfig::from_cli(&args)?;

    // Print configuration if verbose
    if args.verbose > 0 && !args.quiet {
        print_config(&config);
    }

    if config.threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(config.effective_threads())
            .build_global()
        {
            tracing::warn!("Could not size worker pool: {}", e);
        }
    }

    let engine = AutomationEngine::from_config(config);

    match &args.command {
        Some(command) => handle_command(command, &engine, &args),
        None => cmd_demo(&engine, &args),
    }
}

fn handle_command(command: &Commands, engine: &AutomationEngine, args: &CliArgs) -> Result<()> {
    match command {
        Commands::Show => cmd_show(engine, args),
        Commands::Configure => cmd_configure(engine, args),
        Commands::Export { json, xml } => cmd_export(engine, json.clone(), xml.clone(), args),
        Commands::Optimize { .. } => cmd_optimize(engine, args),
        Commands::FetchConfig { device, .. } => cmd_fetch_config(engine, device, args),
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_show(engine: &AutomationEngine, args: &CliArgs) -> Result<()> {
    let snapshots = engine.export_configs();

    if args.output_format == OutputFormat::Json {
        return print_json(&serde_json::to_value(&snapshots)?);
    }

    println!("=== Devices ({}) ===", snapshots.len());
    for snapshot in &snapshots {
        println!("{:<20} {:<16} {}", snapshot.name, snapshot.ip, snapshot.kind);
    }
    Ok(())
}

fn cmd_configure(engine: &AutomationEngine, args: &CliArgs) -> Result<()> {
    let report = engine.configure_all();

    if args.output_format == OutputFormat::Json {
        let failures: Vec<_> = report
            .failures
            .iter()
            .map(|f| serde_json::json!({ "device": f.device, "error": f.error.to_string() }))
            .collect();
        print_json(&serde_json::json!({
            "configured": report.configured,
            "failures": failures,
            "duration_ms": report.duration.as_millis() as u64,
        }))?;
    } else if !args.quiet {
        report.print_summary();
    }

    report.into_result().map(|_| ())
}

fn cmd_export(engine: &AutomationEngine, json: Option<PathBuf>, xml: Option<PathBuf>, args: &CliArgs) -> Result<()> {
    let (json, xml) = match (json, xml) {
        (None, None) => (
            Some(PathBuf::from(DEFAULT_JSON_EXPORT)),
            Some(PathBuf::from(DEFAULT_XML_EXPORT)),
        ),
        targets => targets,
    };

    let summary = engine.export(json, xml)?;

    if args.output_format == OutputFormat::Json {
        let written: Vec<_> = summary
            .written
            .iter()
            .map(|(format, path)| serde_json::json!({ "format": format, "path": path }))
            .collect();
        return print_json(&serde_json::json!({ "devices": summary.devices, "written": written }));
    }

    if !args.quiet {
        for (format, path) in &summary.written {
            println!("Exported {} device(s) as {:?} to {}", summary.devices, format, path.display());
        }
    }
    Ok(())
}

fn cmd_optimize(engine: &AutomationEngine, args: &CliArgs) -> Result<()> {
    let run = engine.optimize()?;

    if args.output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "samples": run.samples,
            "report": run.report,
        }));
    }

    if args.verbose > 0 {
        println!("=== Telemetry ===");
        for sample in &run.samples {
            println!(
                "{:<20} traffic {:>4}  cpu {:>3}%  memory {:>3}%",
                sample.device_name, sample.traffic, sample.cpu_usage, sample.memory_usage
            );
        }
    }
    run.report.print_summary();
    Ok(())
}

fn cmd_fetch_config(engine: &AutomationEngine, device: &str, args: &CliArgs) -> Result<()> {
    let payload = engine.fetch_config(device)?;

    if args.output_format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "device": device, "config": payload }));
    }

    println!("{}", payload);
    Ok(())
}

/// Configure the fleet, export both documents and print scaling advice
fn cmd_demo(engine: &AutomationEngine, args: &CliArgs) -> Result<()> {
    let report = engine.configure_all();
    if !args.quiet {
        report.print_summary();
    }

    let summary = engine.export(
        Some(PathBuf::from(DEFAULT_JSON_EXPORT)),
        Some(PathBuf::from(DEFAULT_XML_EXPORT)),
    )?;
    if !args.quiet {
        for (_, path) in &summary.written {
            println!("Exported configuration to {}", path.display());
        }
    }

    match engine.optimize() {
        Ok(run) => {
            println!("\nSuggested optimizations:");
            for message in run.report.messages() {
                println!("  {}", message);
            }
        }
        // The two-device demo fleet is smaller than the default tier count
        Err(e @ NetFleetError::InsufficientSamples { .. }) => {
            println!("\nNo optimization advice: {}", e);
        }
        Err(e) => return Err(e),
    }

    report.into_result().map(|_| ())
}

fn print_config(config: &FleetConfig) {
    println!("=== Configuration ===");
    println!("Devices:     {}", config.devices.len());
    println!("Threads:     {}", config.effective_threads());
    println!("Parallel:    {}", config.parallel_configure);
    println!("Seed:        {:?}", config.sampler_seed);
    println!("Clusters:    {}", config.advisor.clusters);
    println!("Max iter:    {}", config.advisor.max_iter);

    println!("\n=== Transport ===");
    println!("Port:        {}", config.transport.port);
    println!("User:        {}", config.transport.username);
    println!("Timeout:     {}", humantime::format_duration(config.transport.timeout));

    println!();
}
