//! TOML configuration file parsing
//!
//! ```toml
//! [topology]
//! dc_count = 8
//! dc_hosts = 16
//! cross_dc = { src_dc = 0, dst_dc = 7 }
//!
//! [workload]
//! cdf = "cdf/WebSearch_distribution.txt"
//! cdf_scale = "percent"
//! load = 0.5
//! bandwidth = "100G"
//! duration_secs = 0.1
//! seed = 42
//!
//! [output]
//! dir = "output_traffic_load"
//! file = "websearch_dc0_dc7.txt"
//! ```

use super::*;
use crate::config::cli::Cli;
use crate::distribution::ProbabilityScale;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Workload
    if let Some(ref cdf) = cli.cdf {
        config.workload.cdf = cdf.clone();
    }
    if cli.cdf_percent {
        config.workload.cdf_scale = ProbabilityScale::Percent;
    }
    if let Some(load) = cli.load {
        config.workload.load = load;
    }
    if let Some(ref bandwidth) = cli.bandwidth {
        config.workload.bandwidth = Bandwidth::Text(bandwidth.clone());
    }
    if let Some(time) = cli.time {
        config.workload.duration_secs = time;
    }
    if let Some(base_time) = cli.base_time {
        config.workload.base_time_ns = base_time;
    }
    if let Some(seed) = cli.seed {
        config.workload.seed = Some(seed);
    }

    // Topology
    if let Some(hosts) = cli.nhost {
        config.topology.hosts = Some(hosts);
    }
    if let Some(dc_count) = cli.dc_count {
        config.topology.dc_count = dc_count;
    }
    if let Some(dc_hosts) = cli.dc_nnodes {
        config.topology.dc_hosts = Some(dc_hosts);
    }
    if let (Some(src_dc), Some(dst_dc)) = (cli.src_dc, cli.dst_dc) {
        config.topology.cross_dc = Some(CrossDcConfig {
            src_dc,
            dst_dc,
            bidirectional: cli.bidirectional,
        });
    } else if cli.bidirectional {
        match config.topology.cross_dc.as_mut() {
            Some(cross) => cross.bidirectional = true,
            None => anyhow::bail!("--bidirectional requires a datacenter pair"),
        }
    }

    // Output
    if let Some(ref name) = cli.output {
        config.output.file = name.clone();
    }
    if let Some(ref dir) = cli.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(ref json) = cli.json_output {
        config.output.json = Some(json.clone());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const SAMPLE: &str = r#"
[topology]
dc_count = 8
dc_hosts = 16
cross_dc = { src_dc = 0, dst_dc = 7 }

[workload]
cdf = "cdf/WebSearch_distribution.txt"
cdf_scale = "percent"
load = 0.5
bandwidth = "100G"
duration_secs = 0.1
seed = 42

[output]
file = "websearch.txt"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_toml_string(SAMPLE).unwrap();

        assert_eq!(config.topology.host_count(), Some(128));
        assert_eq!(
            config.topology.cross_dc,
            Some(CrossDcConfig { src_dc: 0, dst_dc: 7, bidirectional: false })
        );
        assert_eq!(config.workload.cdf_scale, ProbabilityScale::Percent);
        assert_eq!(config.workload.bandwidth.bits_per_sec().unwrap(), 100e9);
        assert_eq!(config.workload.seed, Some(42));
        assert_eq!(config.output.file, "websearch.txt");
        assert_eq!(config.output.dir, PathBuf::from("output_traffic_load"));
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config.workload.load, 0.3);
        assert_eq!(config.workload.base_time_ns, 2_000_000_000);
        assert!(config.topology.cross_dc.is_none());
    }

    #[test]
    fn test_parse_numeric_bandwidth() {
        let config = parse_toml_string("[workload]\nbandwidth = 25000000000\n").unwrap();
        assert_eq!(config.workload.bandwidth.bits_per_sec().unwrap(), 25e9);
    }

    #[test]
    fn test_parse_rejects_unknown_scale() {
        assert!(parse_toml_string("[workload]\ncdf_scale = \"permille\"\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = parse_toml_string(SAMPLE).unwrap();
        let cli = Cli::try_parse_from([
            "trafficgen", "-l", "0.7", "-b", "40G", "--src-dc", "1", "--dst-dc", "2", "--bidirectional",
        ])
        .unwrap();

        let merged = merge_cli_with_config(&cli, config).unwrap();
        assert_eq!(merged.workload.load, 0.7);
        assert_eq!(merged.workload.bandwidth, Bandwidth::Text("40G".into()));
        assert_eq!(
            merged.topology.cross_dc,
            Some(CrossDcConfig { src_dc: 1, dst_dc: 2, bidirectional: true })
        );
        // Untouched file values survive
        assert_eq!(merged.workload.seed, Some(42));
        assert_eq!(merged.topology.dc_hosts, Some(16));
    }

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("gen.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = parse_toml_file(&path).unwrap();
        assert_eq!(config.workload.duration_secs, 0.1);

        assert!(parse_toml_file(&temp_dir.path().join("missing.toml")).is_err());
    }
}
