//! Trace generation
//!
//! [`TrafficGenerator`] ties the pieces together: it derives the Poisson
//! arrival rate from link bandwidth, target load and the mean flow size, picks
//! a destination policy, and drives a seeded [`FlowEventScheduler`] into a
//! [`TraceWriter`].
//!
//! # Example
//!
//! ```
//! use trafficgen::distribution::EmpiricalDistribution;
//! use trafficgen::generator::{destination::FullMesh, GeneratorParams, TrafficGenerator};
//!
//! let sizes = EmpiricalDistribution::from_pairs(&[(100.0, 0.0), (100.0, 1.0)]).unwrap();
//! let params = GeneratorParams {
//!     bandwidth_bps: 10e9,
//!     load: 0.3,
//!     base_time_ns: 2_000_000_000,
//!     duration_ns: 1_000_000,
//!     seed: 1,
//! };
//! let generator = TrafficGenerator::new(sizes, Box::new(FullMesh::new(4).unwrap()), params).unwrap();
//!
//! assert!(generator.events().all(|e| e.size == 100 && e.src != e.dst));
//! ```

pub mod destination;
pub mod scheduler;

use crate::config::Config;
use crate::distribution::{ArrivalProcess, EmpiricalDistribution};
use crate::error::GenError;
use crate::output::trace::TraceWriter;
use crate::stats::TraceStats;
use anyhow::Context;
use destination::{CrossDatacenter, DestinationPolicy, FullMesh};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::path::Path;

pub use scheduler::{FlowEvent, FlowEventScheduler, HostCursor};

/// Numeric inputs of a generation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    /// Host link bandwidth in bits per second
    pub bandwidth_bps: f64,
    /// Target fraction of link capacity, in (0, 1]
    pub load: f64,
    /// Simulated time of the first possible arrival, in nanoseconds
    pub base_time_ns: u64,
    /// Length of the arrival window, in nanoseconds
    pub duration_ns: u64,
    /// RNG seed
    pub seed: u64,
}

/// Quantities derived from the inputs, reported for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedQuantities {
    pub mean_flow_size: f64,
    pub mean_inter_arrival_ns: f64,
    pub source_hosts: usize,
    pub estimated_flows: u64,
}

/// Seeded Poisson flow trace generator
pub struct TrafficGenerator {
    sizes: EmpiricalDistribution,
    arrivals: ArrivalProcess,
    policy: Box<dyn DestinationPolicy>,
    params: GeneratorParams,
}

impl TrafficGenerator {
    /// Validate the inputs and derive the arrival process
    ///
    /// # Errors
    ///
    /// - [`GenError::InvalidRate`] for non-positive bandwidth, load, or mean size
    /// - [`GenError::Configuration`] for a zero duration or a policy without sources
    pub fn new(
        sizes: EmpiricalDistribution,
        policy: Box<dyn DestinationPolicy>,
        params: GeneratorParams,
    ) -> Result<Self, GenError> {
        let arrivals = ArrivalProcess::from_load(params.bandwidth_bps, params.load, sizes.mean())?;

        if params.duration_ns == 0 {
            return Err(GenError::config("duration must be positive"));
        }
        if policy.sources().is_empty() {
            return Err(GenError::config(format!("{} has no source hosts", policy.describe())));
        }

        Ok(Self {
            sizes,
            arrivals,
            policy,
            params,
        })
    }

    /// Build a generator from a validated configuration
    pub fn from_config(config: &Config, sizes: EmpiricalDistribution) -> Result<Self, GenError> {
        let params = GeneratorParams {
            bandwidth_bps: config.workload.bandwidth.bits_per_sec()?,
            load: config.workload.load,
            base_time_ns: config.workload.base_time_ns,
            duration_ns: config.workload.duration_ns(),
            seed: config.workload.seed.unwrap_or_default(),
        };

        Self::new(sizes, build_policy(config)?, params)
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    pub fn sizes(&self) -> &EmpiricalDistribution {
        &self.sizes
    }

    pub fn arrivals(&self) -> ArrivalProcess {
        self.arrivals
    }

    pub fn policy(&self) -> &dyn DestinationPolicy {
        self.policy.as_ref()
    }

    pub fn derived(&self) -> DerivedQuantities {
        let source_hosts = self.policy.sources().len();
        DerivedQuantities {
            mean_flow_size: self.sizes.mean(),
            mean_inter_arrival_ns: self.arrivals.mean_inter_arrival_ns(),
            source_hosts,
            estimated_flows: self.arrivals.estimate_arrivals(self.params.duration_ns, source_hosts),
        }
    }

    /// A fresh event stream; every call replays the same seeded sequence
    pub fn events(&self) -> FlowEventScheduler<'_, Xoshiro256PlusPlus> {
        FlowEventScheduler::new(
            &self.sizes,
            self.arrivals,
            self.policy.as_ref(),
            self.params.base_time_ns,
            self.params.duration_ns,
            Xoshiro256PlusPlus::seed_from_u64(self.params.seed),
        )
    }

    /// Generate the full trace into `path` and return its statistics
    ///
    /// The file at `path` only appears once every event is written and the
    /// flow count header is final.
    pub fn write_trace(&self, path: &Path) -> crate::Result<TraceStats> {
        let derived = self.derived();
        tracing::info!(
            mean_flow_size = derived.mean_flow_size,
            mean_inter_arrival_ns = derived.mean_inter_arrival_ns,
            estimated_flows = derived.estimated_flows,
            source_hosts = derived.source_hosts,
            seed = self.params.seed,
            "generating trace"
        );

        let mut writer = TraceWriter::create(path)
            .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
        let mut stats = TraceStats::new();

        for event in self.events() {
            writer.write_event(&event)?;
            stats.record(&event);
        }

        let written = writer
            .finish()
            .with_context(|| format!("Failed to finalize trace file: {}", path.display()))?;
        debug_assert_eq!(written, stats.flows());

        tracing::info!(flows = written, path = %path.display(), "trace written");
        Ok(stats)
    }
}

/// Destination policy selected by the topology configuration
pub fn build_policy(config: &Config) -> Result<Box<dyn DestinationPolicy>, GenError> {
    let topology = &config.topology;

    match &topology.cross_dc {
        Some(cross) => {
            let hosts_per_dc = topology.dc_hosts.ok_or_else(|| {
                GenError::config("cross-datacenter traffic requires hosts per datacenter (-m)")
            })?;
            let policy = CrossDatacenter::between_datacenters(
                cross.src_dc,
                cross.dst_dc,
                topology.dc_count,
                hosts_per_dc,
            )?
            .with_bidirectional(cross.bidirectional);
            Ok(Box::new(policy))
        }
        None => {
            let hosts = topology
                .host_count()
                .ok_or_else(|| GenError::config("number of hosts is required (-n, or -m with -d)"))?;
            Ok(Box::new(FullMesh::new(hosts)?))
        }
    }
}
