//! CLI to Config conversion utilities

use crate::config::cli::Cli;
use crate::config::toml::{merge_cli_with_config, parse_toml_file};
use crate::config::Config;
use crate::error::GenError;
use anyhow::Result;

/// Parse a bandwidth string (e.g., "10G", "100M", "1.5K") to bits per second
///
/// Suffixes are decimal: K = 1e3, M = 1e6, G = 1e9. A plain number is taken
/// as raw bits per second.
///
/// # Examples
///
/// ```
/// use trafficgen::config::cli_convert::parse_bandwidth;
///
/// assert_eq!(parse_bandwidth("10G").unwrap(), 10e9);
/// assert_eq!(parse_bandwidth("2500").unwrap(), 2500.0);
/// ```
pub fn parse_bandwidth(s: &str) -> Result<f64, GenError> {
    let s = s.trim();

    let (num_str, multiplier) = match s.chars().last() {
        Some('G') | Some('g') => (&s[..s.len() - 1], 1e9),
        Some('M') | Some('m') => (&s[..s.len() - 1], 1e6),
        Some('K') | Some('k') => (&s[..s.len() - 1], 1e3),
        _ => (s, 1.0),
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| GenError::config(format!("bandwidth format incorrect: '{}'", s)))?;

    Ok(num * multiplier)
}

/// Build the effective configuration: TOML file (if any) overridden by CLI options
pub fn build_config(cli: &Cli) -> Result<Config> {
    let base = match &cli.config {
        Some(path) => parse_toml_file(path)?,
        None => Config::default(),
    };

    merge_cli_with_config(cli, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_bandwidth_suffixes() {
        assert_eq!(parse_bandwidth("10G").unwrap(), 10e9);
        assert_eq!(parse_bandwidth("100M").unwrap(), 100e6);
        assert_eq!(parse_bandwidth("5K").unwrap(), 5e3);
        assert_eq!(parse_bandwidth("25g").unwrap(), 25e9);
        assert_eq!(parse_bandwidth(" 40G ").unwrap(), 40e9);
    }

    #[test]
    fn test_parse_bandwidth_raw() {
        assert_eq!(parse_bandwidth("1000000").unwrap(), 1e6);
        assert_eq!(parse_bandwidth("1e9").unwrap(), 1e9);
    }

    #[test]
    fn test_parse_bandwidth_invalid() {
        assert!(matches!(parse_bandwidth(""), Err(GenError::Configuration(_))));
        assert!(matches!(parse_bandwidth("G"), Err(GenError::Configuration(_))));
        assert!(matches!(parse_bandwidth("10Gbps"), Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_build_config_without_file() {
        let cli = Cli::try_parse_from(["trafficgen", "-n", "4", "-t", "1"]).unwrap();
        let config = build_config(&cli).unwrap();

        assert_eq!(config.topology.hosts, Some(4));
        assert_eq!(config.workload.duration_secs, 1.0);
        assert_eq!(config.workload.load, 0.3);
    }
}
