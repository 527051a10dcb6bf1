//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// trafficgen - Poisson flow trace generator for datacenter network simulation
///
/// Options left unset keep the value from --config (if given) or the built-in
/// default shown in each description.
#[derive(Parser, Debug)]
#[command(name = "trafficgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file; command-line options override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === Workload Options ===
    /// Flow size CDF file (default: uniform_distribution.txt)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub cdf: Option<PathBuf>,

    /// Probabilities in the CDF file are percentages (0-100) instead of fractions
    #[arg(long)]
    pub cdf_percent: bool,

    /// Fraction of host link capacity to load, in (0, 1] (default: 0.3)
    #[arg(short = 'l', long)]
    pub load: Option<f64>,

    /// Host link bandwidth with optional K/M/G suffix, e.g. 10G, 100M (default: 10G)
    #[arg(short = 'b', long)]
    pub bandwidth: Option<String>,

    /// Arrival window in seconds (default: 10)
    #[arg(short = 't', long)]
    pub time: Option<f64>,

    /// Simulated start of the arrival window, in nanoseconds (default: 2000000000)
    #[arg(long, value_name = "NS")]
    pub base_time: Option<u64>,

    /// RNG seed for reproducible traces (default: random, reported at start)
    #[arg(long, env = "TRAFFICGEN_SEED")]
    pub seed: Option<u64>,

    // === Topology Options ===
    /// Total number of hosts
    #[arg(short = 'n', long)]
    pub nhost: Option<u32>,

    /// Number of datacenters (default: 1)
    #[arg(short = 'd', long)]
    pub dc_count: Option<u32>,

    /// Hosts per datacenter
    #[arg(short = 'm', long)]
    pub dc_nnodes: Option<u32>,

    /// Only generate flows originating in this datacenter (requires --dst-dc)
    #[arg(long, requires = "dst_dc")]
    pub src_dc: Option<u32>,

    /// Only generate flows destined to this datacenter (requires --src-dc)
    #[arg(long, requires = "src_dc")]
    pub dst_dc: Option<u32>,

    /// With --src-dc/--dst-dc, also generate flows in the reverse direction
    #[arg(long)]
    pub bidirectional: bool,

    // === Output Options ===
    /// Trace file name (default: tmp_traffic.txt)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Directory receiving the trace (default: output_traffic_load)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    // === Runtime Options ===
    /// Validate configuration and print derived quantities without writing a trace
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bidirectional && self.src_dc.is_none() {
            anyhow::bail!("--bidirectional requires --src-dc and --dst-dc");
        }

        if let Some(name) = &self.output {
            if name.trim().is_empty() {
                anyhow::bail!("--output must not be empty");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_options() {
        let cli = Cli::try_parse_from([
            "trafficgen", "-c", "web.txt", "-n", "16", "-l", "0.5", "-b", "25G", "-t", "0.1", "-o", "out.txt",
        ])
        .unwrap();

        assert_eq!(cli.cdf, Some(PathBuf::from("web.txt")));
        assert_eq!(cli.nhost, Some(16));
        assert_eq!(cli.load, Some(0.5));
        assert_eq!(cli.bandwidth.as_deref(), Some("25G"));
        assert_eq!(cli.time, Some(0.1));
        assert_eq!(cli.output.as_deref(), Some("out.txt"));
        cli.validate().unwrap();
    }

    #[test]
    fn test_dc_pair_requires_both() {
        assert!(Cli::try_parse_from(["trafficgen", "-m", "4", "-d", "8", "--src-dc", "0"]).is_err());

        let cli = Cli::try_parse_from(["trafficgen", "-m", "4", "-d", "8", "--src-dc", "0", "--dst-dc", "7"])
            .unwrap();
        assert_eq!((cli.src_dc, cli.dst_dc), (Some(0), Some(7)));
    }

    #[test]
    fn test_bidirectional_needs_pair() {
        let cli = Cli::try_parse_from(["trafficgen", "-n", "8", "--bidirectional"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
