//! trafficgen CLI entry point

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use trafficgen::config::{cli::Cli, cli_convert, validator};
use trafficgen::distribution::EmpiricalDistribution;
use trafficgen::output::{json, text};
use trafficgen::TrafficGenerator;

fn main() -> Result<()> {
    println!("trafficgen v{}", env!("CARGO_PKG_VERSION"));
    println!("Poisson flow trace generator");
    println!();

    // Parse CLI arguments
    let cli = Cli::parse_args();
    cli.validate()?;
    init_logging(cli.debug)?;

    // Build and validate configuration before touching the CDF or the output
    let mut config = cli_convert::build_config(&cli)?;
    if config.workload.seed.is_none() {
        config.workload.seed = Some(rand::random());
    }
    validator::validate_config(&config).context("Configuration validation failed")?;
    tracing::debug!(?config, "effective configuration");

    let sizes = EmpiricalDistribution::from_file(&config.workload.cdf, config.workload.cdf_scale)?;
    tracing::debug!(
        points = sizes.points().len(),
        min = sizes.min_size(),
        max = sizes.max_size(),
        "loaded flow size CDF"
    );

    let generator = TrafficGenerator::from_config(&config, sizes)
        .context("Failed to set up traffic generator")?;

    text::print_configuration(&config, &generator);

    if cli.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    println!("Generating trace...");
    println!();

    let trace_path = config.output.trace_path();
    let start = Instant::now();
    let stats = generator.write_trace(&trace_path)?;
    let elapsed = start.elapsed();

    text::print_results(&generator, &stats, &trace_path, elapsed);

    if let Some(ref json_path) = config.output.json {
        let summary = json::build_summary(&config, &generator, &stats, &trace_path, elapsed);
        json::write_json_summary(json_path, &summary, true)
            .with_context(|| format!("Failed to write JSON summary: {}", json_path.display()))?;
        println!("JSON summary written to {}", json_path.display());
    }

    Ok(())
}

/// Install the global tracing subscriber (stderr, INFO or DEBUG)
fn init_logging(debug: bool) -> Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}
