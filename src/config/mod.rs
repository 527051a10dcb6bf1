//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::distribution::ProbabilityScale;
use crate::error::GenError;
use crate::util::time::secs_to_nanos;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete generator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub topology: TopologyConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Host layout and traffic pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Total number of hosts (derived from the datacenter layout when absent)
    pub hosts: Option<u32>,
    /// Number of datacenters
    #[serde(default = "default_dc_count")]
    pub dc_count: u32,
    /// Hosts per datacenter
    pub dc_hosts: Option<u32>,
    /// Restrict traffic to one datacenter pair
    pub cross_dc: Option<CrossDcConfig>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            hosts: None,
            dc_count: default_dc_count(),
            dc_hosts: None,
            cross_dc: None,
        }
    }
}

impl TopologyConfig {
    /// Total host count, explicit or `dc_hosts * dc_count`
    pub fn host_count(&self) -> Option<u32> {
        self.hosts
            .or_else(|| self.dc_hosts.map(|per_dc| per_dc.saturating_mul(self.dc_count)))
    }
}

fn default_dc_count() -> u32 {
    1
}

/// Source and destination datacenter of restricted traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossDcConfig {
    pub src_dc: u32,
    pub dst_dc: u32,
    /// Also generate flows from the destination datacenter back to the source
    #[serde(default)]
    pub bidirectional: bool,
}

/// Flow size and arrival parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadConfig {
    /// Flow size CDF file
    #[serde(default = "default_cdf")]
    pub cdf: PathBuf,
    /// Scale of the CDF probability column
    #[serde(default)]
    pub cdf_scale: ProbabilityScale,
    /// Fraction of host link capacity to load, in (0, 1]
    #[serde(default = "default_load")]
    pub load: f64,
    /// Host link bandwidth
    #[serde(default)]
    pub bandwidth: Bandwidth,
    /// Arrival window length in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    /// Simulated time of the start of the arrival window, in nanoseconds
    #[serde(default = "default_base_time_ns")]
    pub base_time_ns: u64,
    /// RNG seed; a random one is chosen and reported when absent
    pub seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            cdf: default_cdf(),
            cdf_scale: ProbabilityScale::default(),
            load: default_load(),
            bandwidth: Bandwidth::default(),
            duration_secs: default_duration_secs(),
            base_time_ns: default_base_time_ns(),
            seed: None,
        }
    }
}

impl WorkloadConfig {
    pub fn duration_ns(&self) -> u64 {
        secs_to_nanos(self.duration_secs)
    }
}

fn default_cdf() -> PathBuf {
    PathBuf::from("uniform_distribution.txt")
}

fn default_load() -> f64 {
    0.3
}

fn default_duration_secs() -> f64 {
    10.0
}

fn default_base_time_ns() -> u64 {
    2_000_000_000
}

/// Link bandwidth, either a string with a K/M/G suffix or raw bits per second
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bandwidth {
    BitsPerSec(f64),
    Text(String),
}

impl Default for Bandwidth {
    fn default() -> Self {
        Self::Text("10G".to_string())
    }
}

impl Bandwidth {
    pub fn bits_per_sec(&self) -> Result<f64, GenError> {
        match self {
            Self::BitsPerSec(bps) => Ok(*bps),
            Self::Text(text) => cli_convert::parse_bandwidth(text),
        }
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BitsPerSec(bps) => write!(f, "{}", bps),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the trace
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Trace file name
    #[serde(default = "default_output_file")]
    pub file: String,
    /// Optional JSON summary path
    pub json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file: default_output_file(),
            json: None,
        }
    }
}

impl OutputConfig {
    pub fn trace_path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output_traffic_load")
}

fn default_output_file() -> String {
    "tmp_traffic.txt".to_string()
}
