//! JSON output formatting
//!
//! This module writes a machine-readable summary of a generation run:
//! - The effective configuration
//! - Derived quantities (mean flow size, mean inter-arrival time, estimate)
//! - Trace statistics (flows, bytes, sizes, time span, per-source counts)
//! - Requested versus realised load

use crate::config::Config;
use crate::generator::destination::HostId;
use crate::generator::{DerivedQuantities, TrafficGenerator};
use crate::stats::TraceStats;
use crate::util::time::format_trace_seconds;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Load figures for one run
#[derive(Debug, Clone, Serialize)]
pub struct JsonLoad {
    pub requested: f64,
    pub realised: f64,
}

/// Statistics of the emitted trace
#[derive(Debug, Clone, Serialize)]
pub struct JsonTrace {
    pub path: PathBuf,
    pub flows: u64,
    pub total_bytes: u64,
    pub mean_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_start_time: Option<String>,
    pub flows_per_source: BTreeMap<HostId, u64>,
}

/// Complete run summary
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub version: String,
    pub generated_at: String,
    pub elapsed_secs: f64,
    pub policy: String,
    pub seed: u64,
    pub config: Config,
    pub derived: DerivedQuantities,
    pub load: JsonLoad,
    pub trace: JsonTrace,
}

/// Assemble the summary of a finished run
pub fn build_summary(
    config: &Config,
    generator: &TrafficGenerator,
    stats: &TraceStats,
    trace_path: &Path,
    elapsed: Duration,
) -> JsonSummary {
    let params = generator.params();
    let derived = generator.derived();

    JsonSummary {
        version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: chrono::Local::now().to_rfc3339(),
        elapsed_secs: elapsed.as_secs_f64(),
        policy: generator.policy().describe(),
        seed: params.seed,
        config: config.clone(),
        derived,
        load: JsonLoad {
            requested: params.load,
            realised: stats.realised_load(params.bandwidth_bps, params.duration_ns, derived.source_hosts),
        },
        trace: JsonTrace {
            path: trace_path.to_path_buf(),
            flows: stats.flows(),
            total_bytes: stats.total_bytes(),
            mean_size: stats.mean_size(),
            min_size: stats.min_size(),
            max_size: stats.max_size(),
            first_start_time: stats.first_ns().map(format_trace_seconds),
            last_start_time: stats.last_ns().map(format_trace_seconds),
            flows_per_source: stats.per_source().clone(),
        },
    }
}

/// Write JSON summary to file
pub fn write_json_summary(output_path: &Path, summary: &JsonSummary, pretty: bool) -> Result<()> {
    let file = File::create(output_path)?;

    if pretty {
        serde_json::to_writer_pretty(file, summary)?;
    } else {
        serde_json::to_writer(file, summary)?;
    }

    Ok(())
}
