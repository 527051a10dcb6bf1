//! Poisson arrival process
//!
//! Inter-arrival gaps of a Poisson process are exponentially distributed. The
//! gap for a uniform draw `u` is `-ln(1 - u) * mean`, so each call is
//! independent of every earlier one (memoryless).
//!
//! # Example
//!
//! ```
//! use trafficgen::distribution::arrival::ArrivalProcess;
//!
//! // 10 Gbps host links at 30% load carrying 1 KB flows on average
//! let arrivals = ArrivalProcess::from_load(10e9, 0.3, 1000.0).unwrap();
//! assert!((arrivals.mean_inter_arrival_ns() - 2666.666).abs() < 0.01);
//! ```

use crate::error::GenError;
use crate::util::time::NANOS_PER_SEC;
use rand::Rng;

/// Exponential inter-arrival generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrivalProcess {
    /// Mean gap between arrivals, in nanoseconds
    mean_ns: f64,
}

impl ArrivalProcess {
    /// Create a process with the given mean inter-arrival time (nanoseconds)
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidRate`] if the mean is not a positive finite number.
    pub fn new(mean_inter_arrival_ns: f64) -> Result<Self, GenError> {
        if !mean_inter_arrival_ns.is_finite() || mean_inter_arrival_ns <= 0.0 {
            return Err(GenError::rate(format!(
                "mean inter-arrival time must be positive, got {} ns",
                mean_inter_arrival_ns
            )));
        }
        Ok(Self {
            mean_ns: mean_inter_arrival_ns,
        })
    }

    /// Derive the process that loads a host link to `load` of its capacity
    ///
    /// A link of `bandwidth_bps` at `load` carries `bandwidth * load / 8` bytes
    /// per second, i.e. that many bytes divided by the mean flow size in flows
    /// per second. The mean gap is the reciprocal, in nanoseconds.
    pub fn from_load(bandwidth_bps: f64, load: f64, mean_flow_bytes: f64) -> Result<Self, GenError> {
        if !(bandwidth_bps > 0.0) || !bandwidth_bps.is_finite() {
            return Err(GenError::rate(format!("bandwidth must be positive, got {}", bandwidth_bps)));
        }
        if !(load > 0.0 && load <= 1.0) {
            return Err(GenError::rate(format!("load must be in (0, 1], got {}", load)));
        }
        if !(mean_flow_bytes > 0.0) || !mean_flow_bytes.is_finite() {
            return Err(GenError::rate(format!(
                "mean flow size must be positive, got {}",
                mean_flow_bytes
            )));
        }

        let flows_per_sec = bandwidth_bps * load / 8.0 / mean_flow_bytes;
        Self::new(NANOS_PER_SEC as f64 / flows_per_sec)
    }

    /// Mean inter-arrival time in nanoseconds
    pub fn mean_inter_arrival_ns(&self) -> f64 {
        self.mean_ns
    }

    /// Exponential gap for a uniform draw `u` in [0, 1)
    pub fn gap(&self, u: f64) -> f64 {
        -(1.0 - u).ln() * self.mean_ns
    }

    /// Gap in whole nanoseconds, never less than 1
    ///
    /// Keeps each host's successive arrivals strictly increasing.
    pub fn gap_ns(&self, u: f64) -> u64 {
        let gap = self.gap(u);
        if gap < 1.0 {
            1
        } else {
            gap as u64
        }
    }

    /// Estimated number of arrivals of `sources` independent hosts in `duration_ns`
    pub fn estimate_arrivals(&self, duration_ns: u64, sources: usize) -> u64 {
        (duration_ns as f64 / self.mean_ns * sources as f64).ceil() as u64
    }
}

impl rand_distr::Distribution<f64> for ArrivalProcess {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.gap(rng.gen::<f64>())
    }
}
