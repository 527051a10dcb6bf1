//! trafficgen - Poisson flow trace generator
//!
//! trafficgen produces the flow input file of a packet-level datacenter network
//! simulator: for N hosts it emits a reproducible, globally time-ordered stream
//! of flows whose arrivals follow a Poisson process and whose sizes follow an
//! empirical CDF.
//!
//! # Architecture
//!
//! - **Distributions**: piecewise-linear CDF sampling, exponential inter-arrivals
//! - **Scheduler**: per-host arrival cursors in a min-heap, drained in time order
//! - **Destination policies**: full mesh, or a fixed datacenter pair
//! - **Trace writer**: two-phase write so the flow count header is always exact
//! - **Summaries**: console report, statistics, and optional JSON

pub mod config;
pub mod distribution;
pub mod error;
pub mod generator;
pub mod output;
pub mod stats;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use error::GenError;
pub use generator::TrafficGenerator;

/// Result type used throughout trafficgen
pub type Result<T> = anyhow::Result<T>;
