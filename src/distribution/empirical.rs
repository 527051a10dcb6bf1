//! Empirical flow size distribution
//!
//! This module provides a flow size distribution described by a piecewise-linear
//! cumulative distribution function (CDF), the format in which datacenter
//! workloads (web search, data mining, Hadoop, ...) are usually published.
//!
//! # CDF Format
//!
//! One point per line, two whitespace-separated numbers: the flow size in bytes
//! and the cumulative probability of a flow being at most that size.
//!
//! ```text
//! 6      0.0
//! 6      0.15
//! 13     0.2
//! 19     0.3
//! 33     0.4
//! 53     0.53
//! 133    0.6
//! 667    0.7
//! 1333   0.8
//! 3333   0.9
//! 6667   0.97
//! 20000  1.0
//! ```
//!
//! Consecutive points with the same size describe a point mass. Blank lines and
//! lines starting with `#` are ignored.
//!
//! # Sampling
//!
//! Inverse transform: draw `u ~ U[0,1)`, find the bounding segment by binary
//! search (O(log segments)), and interpolate linearly within it. Samples never
//! leave the `[min_size, max_size]` range of the table.
//!
//! # Example
//!
//! ```
//! use trafficgen::distribution::empirical::EmpiricalDistribution;
//!
//! let dist = EmpiricalDistribution::from_pairs(&[(1.0, 0.0), (2.0, 1.0)]).unwrap();
//! assert_eq!(dist.mean(), 1.5);
//! assert_eq!(dist.sample_at(0.5), 1.5);
//! ```

use crate::error::GenError;
use anyhow::Context;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tolerance when checking that a table ends at probability 1
const TERMINAL_EPSILON: f64 = 1e-9;

/// One point of a CDF table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CdfPoint {
    /// Flow size in bytes
    pub size: f64,
    /// Probability of a flow being at most `size`
    pub probability: f64,
}

/// Scale of the probability column in a CDF file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityScale {
    /// Probabilities in [0, 1]
    #[default]
    Fraction,
    /// Probabilities in [0, 100]
    Percent,
}

impl ProbabilityScale {
    fn divisor(self) -> f64 {
        match self {
            Self::Fraction => 1.0,
            Self::Percent => 100.0,
        }
    }
}

/// Flow size distribution backed by a piecewise-linear CDF
///
/// The table is validated once at construction and never changes afterwards.
/// The mean is computed eagerly and cached.
#[derive(Debug, Clone)]
pub struct EmpiricalDistribution {
    points: Vec<CdfPoint>,
    mean: f64,
}

impl EmpiricalDistribution {
    /// Build a distribution from a validated CDF table
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidDistribution`] if the table is empty, contains
    /// non-finite values, is not sorted by size, has probabilities outside
    /// [0, 1] or decreasing, or does not end at probability 1.
    pub fn new(points: Vec<CdfPoint>) -> Result<Self, GenError> {
        validate_table(&points)?;
        let mean = compute_mean(&points);
        Ok(Self { points, mean })
    }

    /// Build a distribution from `(size, probability)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, GenError> {
        Self::new(
            pairs
                .iter()
                .map(|&(size, probability)| CdfPoint { size, probability })
                .collect(),
        )
    }

    /// Parse a CDF table from its text form
    ///
    /// Lines with the wrong number of fields or non-numeric fields are fatal;
    /// the error names the offending (1-based) line.
    pub fn parse(contents: &str, scale: ProbabilityScale) -> Result<Self, GenError> {
        let mut points = Vec::new();

        for (index, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 2 {
                return Err(GenError::distribution(format!(
                    "line {}: expected 2 fields (size probability), found {}",
                    index + 1,
                    fields.len()
                )));
            }

            let size = parse_field(fields[0], index + 1)?;
            let probability = parse_field(fields[1], index + 1)? / scale.divisor();
            points.push(CdfPoint { size, probability });
        }

        Self::new(points)
    }

    /// Load a CDF table from a file
    pub fn from_file(path: &Path, scale: ProbabilityScale) -> crate::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read CDF file: {}", path.display()))?;

        let dist = Self::parse(&contents, scale)
            .with_context(|| format!("Failed to load CDF file: {}", path.display()))?;

        Ok(dist)
    }

    /// Exact mean of the distribution implied by the table
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Smallest size in the table
    pub fn min_size(&self) -> f64 {
        self.points[0].size
    }

    /// Largest size in the table
    pub fn max_size(&self) -> f64 {
        self.points[self.points.len() - 1].size
    }

    /// The validated CDF table
    pub fn points(&self) -> &[CdfPoint] {
        &self.points
    }

    /// Inverse-transform sample for a given uniform draw `u` in [0, 1)
    ///
    /// Locates the first point whose cumulative probability is at least `u`
    /// and interpolates between it and its predecessor.
    pub fn sample_at(&self, u: f64) -> f64 {
        let u = u.clamp(0.0, 1.0);
        let idx = self.points.partition_point(|p| p.probability < u);

        if idx == 0 {
            return self.min_size();
        }
        if idx == self.points.len() {
            return self.max_size();
        }

        let lo = self.points[idx - 1];
        let hi = self.points[idx];
        let width = hi.probability - lo.probability;
        if width <= 0.0 {
            return hi.size;
        }

        let value = lo.size + (hi.size - lo.size) * (u - lo.probability) / width;
        value.clamp(self.min_size(), self.max_size())
    }

    /// Flow size in whole bytes for a uniform draw `u`
    ///
    /// The interpolated value is truncated; results below 1 are clamped to 1.
    pub fn flow_size_at(&self, u: f64) -> u64 {
        let size = self.sample_at(u).floor();
        if size < 1.0 {
            1
        } else {
            size as u64
        }
    }
}

impl rand_distr::Distribution<f64> for EmpiricalDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample_at(rng.gen::<f64>())
    }
}

fn parse_field(field: &str, line: usize) -> Result<f64, GenError> {
    field.parse::<f64>().map_err(|_| {
        GenError::distribution(format!("line {}: '{}' is not a number", line, field))
    })
}

fn validate_table(points: &[CdfPoint]) -> Result<(), GenError> {
    if points.is_empty() {
        return Err(GenError::distribution("CDF table is empty"));
    }

    for (i, point) in points.iter().enumerate() {
        if !point.size.is_finite() || !point.probability.is_finite() {
            return Err(GenError::distribution(format!(
                "point {} has a non-finite value ({}, {})",
                i, point.size, point.probability
            )));
        }
        if !(0.0..=1.0).contains(&point.probability) {
            return Err(GenError::distribution(format!(
                "point {} has probability {} outside [0, 1]",
                i, point.probability
            )));
        }
    }

    for (i, pair) in points.windows(2).enumerate() {
        if pair[1].size < pair[0].size {
            return Err(GenError::distribution(format!(
                "sizes are not sorted: point {} ({}) is smaller than point {} ({})",
                i + 1,
                pair[1].size,
                i,
                pair[0].size
            )));
        }
        if pair[1].probability < pair[0].probability {
            return Err(GenError::distribution(format!(
                "probabilities decrease at point {} ({} < {})",
                i + 1,
                pair[1].probability,
                pair[0].probability
            )));
        }
    }

    let last = points[points.len() - 1].probability;
    if (last - 1.0).abs() > TERMINAL_EPSILON {
        return Err(GenError::distribution(format!(
            "not a valid cumulative distribution: last probability is {}, expected 1",
            last
        )));
    }

    Ok(())
}

/// Trapezoidal mean over every segment, plus the point mass that sampling
/// assigns to the first size when the table starts above probability 0.
fn compute_mean(points: &[CdfPoint]) -> f64 {
    let head = points[0].size * points[0].probability;

    head + points
        .windows(2)
        .map(|pair| (pair[0].size + pair[1].size) / 2.0 * (pair[1].probability - pair[0].probability))
        .sum::<f64>()
}
