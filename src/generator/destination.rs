//! Destination selection policies
//!
//! A policy decides which hosts originate flows and, for every flow, which
//! host receives it. Two policies exist:
//!
//! - **FullMesh**: every host sends; the destination is uniform over all other hosts
//! - **CrossDatacenter**: hosts of one datacenter send only to hosts of another
//!
//! Policies validate their inputs at construction, so `choose` is total.

use crate::error::GenError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Host index in the simulated topology
pub type HostId = u32;

/// Half-open range of host ids `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRange {
    pub start: HostId,
    pub end: HostId,
}

impl HostRange {
    pub fn new(start: HostId, end: HostId) -> Self {
        Self { start, end }
    }

    /// Hosts of datacenter `index` when every datacenter has `hosts_per_dc` hosts
    pub fn datacenter(index: u32, hosts_per_dc: u32) -> Self {
        let start = index.saturating_mul(hosts_per_dc);
        Self::new(start, start.saturating_add(hosts_per_dc))
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, host: HostId) -> bool {
        host >= self.start && host < self.end
    }

    pub fn overlaps(&self, other: &HostRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }

    pub fn hosts(&self) -> Range<HostId> {
        self.start..self.end.max(self.start)
    }

    fn pick(&self, rng: &mut dyn RngCore) -> HostId {
        rng.gen_range(self.start..self.end)
    }
}

impl fmt::Display for HostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else {
            write!(f, "[{}, {}]", self.start, self.end - 1)
        }
    }
}

/// Chooses flow sources and destinations
pub trait DestinationPolicy: Send + Sync {
    /// Hosts that originate flows, in ascending order
    fn sources(&self) -> Vec<HostId>;

    /// Destination for a flow from `src`; never returns `src`
    fn choose(&self, src: HostId, rng: &mut dyn RngCore) -> HostId;

    /// Short human-readable description
    fn describe(&self) -> String;
}

/// Uniform all-to-all traffic
#[derive(Debug, Clone)]
pub struct FullMesh {
    hosts: u32,
}

impl FullMesh {
    /// # Errors
    ///
    /// Returns [`GenError::Configuration`] with fewer than two hosts, since no
    /// flow could have a destination different from its source.
    pub fn new(hosts: u32) -> Result<Self, GenError> {
        if hosts < 2 {
            return Err(GenError::config(format!(
                "full-mesh traffic needs at least 2 hosts, got {}",
                hosts
            )));
        }
        Ok(Self { hosts })
    }

    pub fn hosts(&self) -> u32 {
        self.hosts
    }
}

impl DestinationPolicy for FullMesh {
    fn sources(&self) -> Vec<HostId> {
        (0..self.hosts).collect()
    }

    fn choose(&self, src: HostId, rng: &mut dyn RngCore) -> HostId {
        // Resample on self-collision
        loop {
            let dst = rng.gen_range(0..self.hosts);
            if dst != src {
                return dst;
            }
        }
    }

    fn describe(&self) -> String {
        format!("full mesh over {} hosts", self.hosts)
    }
}

/// Traffic restricted to one datacenter pair
///
/// Sources come from `src_range` and destinations from `dst_range`. With
/// `bidirectional` set, hosts of `dst_range` also send back to `src_range`.
#[derive(Debug, Clone)]
pub struct CrossDatacenter {
    src_range: HostRange,
    dst_range: HostRange,
    bidirectional: bool,
}

impl CrossDatacenter {
    /// # Errors
    ///
    /// Returns [`GenError::InvalidDcRange`] if either range is empty, the ranges
    /// overlap, or either range reaches past `host_count`.
    pub fn new(src_range: HostRange, dst_range: HostRange, host_count: u32) -> Result<Self, GenError> {
        if src_range.is_empty() {
            return Err(GenError::dc_range(format!("source range {} is empty", src_range)));
        }
        if dst_range.is_empty() {
            return Err(GenError::dc_range(format!("destination range {} is empty", dst_range)));
        }
        if src_range.overlaps(&dst_range) {
            return Err(GenError::dc_range(format!(
                "source range {} overlaps destination range {}",
                src_range, dst_range
            )));
        }
        for range in [src_range, dst_range] {
            if range.end > host_count {
                return Err(GenError::dc_range(format!(
                    "range {} exceeds host count {}",
                    range, host_count
                )));
            }
        }

        Ok(Self {
            src_range,
            dst_range,
            bidirectional: false,
        })
    }

    /// Build from datacenter indices in a topology of `dc_count` equal datacenters
    pub fn between_datacenters(src_dc: u32, dst_dc: u32, dc_count: u32, hosts_per_dc: u32) -> Result<Self, GenError> {
        if src_dc >= dc_count || dst_dc >= dc_count {
            return Err(GenError::dc_range(format!(
                "datacenter indices must be below {}, got src {} dst {}",
                dc_count, src_dc, dst_dc
            )));
        }
        if src_dc == dst_dc {
            return Err(GenError::dc_range(format!(
                "source and destination datacenter must differ, both are {}",
                src_dc
            )));
        }

        Self::new(
            HostRange::datacenter(src_dc, hosts_per_dc),
            HostRange::datacenter(dst_dc, hosts_per_dc),
            dc_count.saturating_mul(hosts_per_dc),
        )
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    pub fn src_range(&self) -> HostRange {
        self.src_range
    }

    pub fn dst_range(&self) -> HostRange {
        self.dst_range
    }

    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }
}

impl DestinationPolicy for CrossDatacenter {
    fn sources(&self) -> Vec<HostId> {
        let mut hosts: Vec<HostId> = self.src_range.hosts().collect();
        if self.bidirectional {
            hosts.extend(self.dst_range.hosts());
            hosts.sort_unstable();
        }
        hosts
    }

    fn choose(&self, src: HostId, rng: &mut dyn RngCore) -> HostId {
        if self.bidirectional && self.dst_range.contains(src) {
            self.src_range.pick(rng)
        } else {
            self.dst_range.pick(rng)
        }
    }

    fn describe(&self) -> String {
        let arrow = if self.bidirectional { "<->" } else { "->" };
        format!("cross-datacenter {} {} {}", self.src_range, arrow, self.dst_range)
    }
}
