//! Random distributions driving trace generation
//!
//! This module provides the two statistical primitives of the generator:
//!
//! - **Empirical**: flow sizes drawn from a piecewise-linear CDF table
//! - **Arrival**: exponential inter-arrival gaps of a Poisson process
//!
//! # Injected Randomness
//!
//! Both types are pure functions of a uniform draw `u` in [0, 1)
//! ([`EmpiricalDistribution::sample_at`], [`ArrivalProcess::gap`]), which makes
//! every call testable with fixed draws. Both also implement
//! [`rand_distr::Distribution<f64>`] for drawing from any `Rng`.
//!
//! # Example
//!
//! ```
//! use trafficgen::distribution::{ArrivalProcess, EmpiricalDistribution};
//!
//! let sizes = EmpiricalDistribution::from_pairs(&[(100.0, 0.0), (100.0, 1.0)]).unwrap();
//! let arrivals = ArrivalProcess::from_load(10e9, 0.3, sizes.mean()).unwrap();
//!
//! assert_eq!(sizes.flow_size_at(0.42), 100);
//! assert!(arrivals.gap(0.5) > 0.0);
//! ```

pub mod arrival;
pub mod empirical;

pub use arrival::ArrivalProcess;
pub use empirical::{CdfPoint, EmpiricalDistribution, ProbabilityScale};
