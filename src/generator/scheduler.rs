//! Flow event scheduler
//!
//! Every source host owns one arrival cursor. The cursors live in a min-heap
//! keyed by `(next_arrival_ns, host)`, so popping always yields the globally
//! earliest pending arrival; ties resolve to the lower host id.
//!
//! Each step pops the earliest cursor. A cursor past the horizon is dropped
//! for good; otherwise the scheduler emits a flow at that instant, advances the
//! cursor by one exponential gap and pushes it back. Generation ends when the
//! heap is empty.
//!
//! The random draws of a step are made in a fixed order (gap, size,
//! destination) so a seeded RNG fully determines the output.

use super::destination::{DestinationPolicy, HostId};
use crate::distribution::{ArrivalProcess, EmpiricalDistribution};
use crate::util::time::format_trace_seconds;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Next arrival of one source host
///
/// Field order defines the heap ordering: time first, host id as tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostCursor {
    pub next_arrival_ns: u64,
    pub host: HostId,
}

/// One generated flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowEvent {
    pub src: HostId,
    pub dst: HostId,
    /// Flow size in bytes, at least 1
    pub size: u64,
    /// Start time in nanoseconds of simulated time
    pub timestamp_ns: u64,
}

impl FlowEvent {
    /// Start time as seconds with 9 decimals
    pub fn start_time(&self) -> String {
        format_trace_seconds(self.timestamp_ns)
    }
}

/// Time-ordered flow event stream
pub struct FlowEventScheduler<'a, R: Rng> {
    sizes: &'a EmpiricalDistribution,
    arrivals: ArrivalProcess,
    policy: &'a dyn DestinationPolicy,
    rng: R,
    queue: BinaryHeap<Reverse<HostCursor>>,
    horizon_ns: u64,
}

impl<'a, R: Rng> FlowEventScheduler<'a, R> {
    /// Seed one cursor per source host at `base_time_ns` plus one Poisson gap
    ///
    /// Cursors are seeded in ascending host order. No event is later than
    /// `base_time_ns + duration_ns`.
    pub fn new(
        sizes: &'a EmpiricalDistribution,
        arrivals: ArrivalProcess,
        policy: &'a dyn DestinationPolicy,
        base_time_ns: u64,
        duration_ns: u64,
        mut rng: R,
    ) -> Self {
        let sources = policy.sources();
        let mut queue = BinaryHeap::with_capacity(sources.len());

        for host in sources {
            let gap = arrivals.gap_ns(rng.gen());
            queue.push(Reverse(HostCursor {
                next_arrival_ns: base_time_ns.saturating_add(gap),
                host,
            }));
        }

        Self {
            sizes,
            arrivals,
            policy,
            rng,
            queue,
            horizon_ns: base_time_ns.saturating_add(duration_ns),
        }
    }

    /// Hosts whose cursor has not yet passed the horizon
    pub fn active_hosts(&self) -> usize {
        self.queue.len()
    }

    pub fn horizon_ns(&self) -> u64 {
        self.horizon_ns
    }
}

impl<'a, R: Rng> Iterator for FlowEventScheduler<'a, R> {
    type Item = FlowEvent;

    fn next(&mut self) -> Option<FlowEvent> {
        loop {
            let Reverse(cursor) = self.queue.pop()?;
            if cursor.next_arrival_ns > self.horizon_ns {
                // Host is done; its cursor is not re-inserted
                continue;
            }

            let now = cursor.next_arrival_ns;
            let gap = self.arrivals.gap_ns(self.rng.gen());
            let size = self.sizes.flow_size_at(self.rng.gen());
            let dst = self.policy.choose(cursor.host, &mut self.rng);

            self.queue.push(Reverse(HostCursor {
                next_arrival_ns: now.saturating_add(gap),
                host: cursor.host,
            }));

            return Some(FlowEvent {
                src: cursor.host,
                dst,
                size,
                timestamp_ns: now,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::destination::{CrossDatacenter, FullMesh, HostRange};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::collections::HashMap;

    const BASE: u64 = 2_000_000_000;

    fn constant_sizes() -> EmpiricalDistribution {
        EmpiricalDistribution::from_pairs(&[(100.0, 0.0), (100.0, 1.0)]).unwrap()
    }

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    #[test]
    fn test_cursor_ordering() {
        let early = HostCursor { next_arrival_ns: 5, host: 9 };
        let late = HostCursor { next_arrival_ns: 6, host: 0 };
        let tie = HostCursor { next_arrival_ns: 5, host: 2 };
        assert!(early < late);
        assert!(tie < early);
    }

    #[test]
    fn test_global_time_order() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(10_000.0).unwrap();
        let policy = FullMesh::new(8).unwrap();
        let events: Vec<FlowEvent> =
            FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 10_000_000, rng(11)).collect();

        assert!(!events.is_empty());
        for pair in events.windows(2) {
            assert!(pair[0].timestamp_ns <= pair[1].timestamp_ns);
        }
    }

    #[test]
    fn test_per_host_strictly_increasing() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(50.0).unwrap();
        let policy = FullMesh::new(3).unwrap();
        let mut last: HashMap<HostId, u64> = HashMap::new();

        for event in FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 1_000_000, rng(12)) {
            if let Some(prev) = last.insert(event.src, event.timestamp_ns) {
                assert!(event.timestamp_ns > prev);
            }
        }
    }

    #[test]
    fn test_events_within_horizon() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(1_000.0).unwrap();
        let policy = FullMesh::new(4).unwrap();
        let scheduler = FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 500_000, rng(13));
        let horizon = scheduler.horizon_ns();

        for event in scheduler {
            assert!(event.timestamp_ns > BASE && event.timestamp_ns <= horizon);
            assert_ne!(event.src, event.dst);
            assert_eq!(event.size, 100);
        }
    }

    #[test]
    fn test_terminates_and_drains() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(1_000.0).unwrap();
        let policy = FullMesh::new(4).unwrap();
        let mut scheduler = FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 100_000, rng(14));
        assert_eq!(scheduler.active_hosts(), 4);

        let count = scheduler.by_ref().count();
        assert!(count > 0);
        assert_eq!(scheduler.active_hosts(), 0);
        assert!(scheduler.next().is_none());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let sizes = EmpiricalDistribution::from_pairs(&[(10.0, 0.0), (1000.0, 1.0)]).unwrap();
        let arrivals = ArrivalProcess::new(2_000.0).unwrap();
        let policy = FullMesh::new(6).unwrap();

        let a: Vec<FlowEvent> =
            FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 2_000_000, rng(77)).collect();
        let b: Vec<FlowEvent> =
            FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 2_000_000, rng(77)).collect();
        let c: Vec<FlowEvent> =
            FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 2_000_000, rng(78)).collect();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_flow_count_matches_rate() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(1_000.0).unwrap();
        let policy = FullMesh::new(4).unwrap();
        let count = FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 10_000_000, rng(15)).count();

        // 4 hosts * 10ms / 1us = 40000 expected arrivals
        let expected = 40_000.0;
        assert!((count as f64 - expected).abs() / expected < 0.03, "count {}", count);
    }

    #[test]
    fn test_restricted_sources_only() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(1_000.0).unwrap();
        let policy = CrossDatacenter::new(HostRange::new(0, 4), HostRange::new(4, 8), 12).unwrap();

        for event in FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 1_000_000, rng(16)) {
            assert!(event.src < 4);
            assert!((4..8).contains(&event.dst));
        }
    }

    #[test]
    fn test_zero_duration_emits_nothing_past_base() {
        let sizes = constant_sizes();
        let arrivals = ArrivalProcess::new(1_000.0).unwrap();
        let policy = FullMesh::new(4).unwrap();

        // Every seeded cursor is at least 1ns after base, past a zero-length horizon
        let count = FlowEventScheduler::new(&sizes, arrivals, &policy, BASE, 0, rng(17)).count();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_start_time_format() {
        let event = FlowEvent {
            src: 0,
            dst: 1,
            size: 10,
            timestamp_ns: 2_000_012_345,
        };
        assert_eq!(event.start_time(), "2.000012345");
    }
}
