//! Trace statistics
//!
//! [`TraceStats`] is fed every emitted [`FlowEvent`] and summarises the
//! trace: flow and byte totals, size extremes, time span and per-source flow
//! counts. The realised load lets users compare what was generated against
//! what was requested.

use crate::generator::destination::HostId;
use crate::generator::FlowEvent;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running summary of an emitted trace
#[derive(Debug, Clone, Default, Serialize)]
pub struct TraceStats {
    flows: u64,
    total_bytes: u64,
    min_size: Option<u64>,
    max_size: Option<u64>,
    first_ns: Option<u64>,
    last_ns: Option<u64>,
    per_source: BTreeMap<HostId, u64>,
}

impl TraceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one emitted flow
    pub fn record(&mut self, event: &FlowEvent) {
        self.flows += 1;
        self.total_bytes += event.size;
        self.min_size = Some(self.min_size.map_or(event.size, |m| m.min(event.size)));
        self.max_size = Some(self.max_size.map_or(event.size, |m| m.max(event.size)));
        self.first_ns.get_or_insert(event.timestamp_ns);
        self.last_ns = Some(event.timestamp_ns);
        *self.per_source.entry(event.src).or_insert(0) += 1;
    }

    pub fn flows(&self) -> u64 {
        self.flows
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn min_size(&self) -> Option<u64> {
        self.min_size
    }

    pub fn max_size(&self) -> Option<u64> {
        self.max_size
    }

    /// Timestamp of the first emitted flow
    pub fn first_ns(&self) -> Option<u64> {
        self.first_ns
    }

    /// Timestamp of the last emitted flow
    pub fn last_ns(&self) -> Option<u64> {
        self.last_ns
    }

    pub fn per_source(&self) -> &BTreeMap<HostId, u64> {
        &self.per_source
    }

    pub fn mean_size(&self) -> f64 {
        if self.flows == 0 {
            0.0
        } else {
            self.total_bytes as f64 / self.flows as f64
        }
    }

    /// Offered load actually generated, as a fraction of source link capacity
    ///
    /// `total_bytes * 8 / (duration * bandwidth * sources)`; 0 when any
    /// denominator term is zero.
    pub fn realised_load(&self, bandwidth_bps: f64, duration_ns: u64, sources: usize) -> f64 {
        let capacity_bits = bandwidth_bps * (duration_ns as f64 / 1e9) * sources as f64;
        if capacity_bits > 0.0 {
            self.total_bytes as f64 * 8.0 / capacity_bits
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(src: HostId, size: u64, timestamp_ns: u64) -> FlowEvent {
        FlowEvent {
            src,
            dst: src + 1,
            size,
            timestamp_ns,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = TraceStats::new();
        assert_eq!(stats.flows(), 0);
        assert_eq!(stats.mean_size(), 0.0);
        assert_eq!(stats.min_size(), None);
        assert_eq!(stats.first_ns(), None);
        assert_eq!(stats.realised_load(10e9, 1_000_000_000, 4), 0.0);
    }

    #[test]
    fn test_record() {
        let mut stats = TraceStats::new();
        stats.record(&event(0, 100, 10));
        stats.record(&event(2, 300, 20));
        stats.record(&event(0, 200, 30));

        assert_eq!(stats.flows(), 3);
        assert_eq!(stats.total_bytes(), 600);
        assert_eq!(stats.mean_size(), 200.0);
        assert_eq!(stats.min_size(), Some(100));
        assert_eq!(stats.max_size(), Some(300));
        assert_eq!(stats.first_ns(), Some(10));
        assert_eq!(stats.last_ns(), Some(30));
        assert_eq!(stats.per_source().get(&0), Some(&2));
        assert_eq!(stats.per_source().get(&2), Some(&1));
        assert_eq!(stats.per_source().get(&1), None);
    }

    #[test]
    fn test_realised_load() {
        let mut stats = TraceStats::new();
        // 1.25 MB over 1s on one 10 Mbps link = 100%
        stats.record(&event(0, 1_250_000, 1));
        assert!((stats.realised_load(10e6, 1_000_000_000, 1) - 1.0).abs() < 1e-12);
        assert!((stats.realised_load(10e6, 1_000_000_000, 4) - 0.25).abs() < 1e-12);
        assert_eq!(stats.realised_load(10e6, 0, 4), 0.0);
    }
}
