//! Human-readable text output

use crate::config::Config;
use crate::generator::TrafficGenerator;
use crate::stats::TraceStats;
use crate::util::time::{format_bandwidth, format_bytes, format_duration, format_trace_seconds};
use std::path::Path;
use std::time::Duration;

/// Print the effective configuration and derived quantities
pub fn print_configuration(config: &Config, generator: &TrafficGenerator) {
    let params = generator.params();
    let derived = generator.derived();

    println!("Configuration:");
    println!("  CDF file:      {}", config.workload.cdf.display());
    println!("  Traffic:       {}", generator.policy().describe());
    println!("  Bandwidth:     {}", format_bandwidth(params.bandwidth_bps));
    println!("  Load:          {:.1}%", params.load * 100.0);
    println!("  Duration:      {}", format_duration(Duration::from_nanos(params.duration_ns)));
    println!("  Base time:     {}s", format_trace_seconds(params.base_time_ns));
    println!("  Seed:          {}", params.seed);
    println!("  Output:        {}", config.output.trace_path().display());
    println!();
    println!("Derived:");
    println!("  Mean flow size:      {:.2} bytes", derived.mean_flow_size);
    println!(
        "  Mean inter-arrival:  {}",
        format_duration(Duration::from_nanos(derived.mean_inter_arrival_ns.round() as u64))
    );
    println!("  Source hosts:        {}", derived.source_hosts);
    println!("  Estimated flows:     {}", format_number(derived.estimated_flows));
}

/// Print statistics of a written trace
pub fn print_results(generator: &TrafficGenerator, stats: &TraceStats, trace_path: &Path, elapsed: Duration) {
    let params = generator.params();
    let derived = generator.derived();

    println!("═══════════════════════════════════════════════════════════");
    println!("                    TRACE SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Generated in {:.3}s", elapsed.as_secs_f64());
    println!("Trace: {}", trace_path.display());
    println!();

    println!("Flows:");
    println!(
        "  Count:     {} (estimated {})",
        format_number(stats.flows()),
        format_number(derived.estimated_flows)
    );
    println!("  Bytes:     {}", format_bytes(stats.total_bytes() as f64));

    if let (Some(min), Some(max)) = (stats.min_size(), stats.max_size()) {
        println!("  Size:      min {} / mean {:.2} / max {} bytes", min, stats.mean_size(), max);
    }
    if let (Some(first), Some(last)) = (stats.first_ns(), stats.last_ns()) {
        println!("  Span:      {}s .. {}s", format_trace_seconds(first), format_trace_seconds(last));
    }
    println!();

    let realised = stats.realised_load(params.bandwidth_bps, params.duration_ns, derived.source_hosts);
    println!("Load:");
    println!("  Requested: {:.2}%", params.load * 100.0);
    println!("  Realised:  {:.2}%", realised * 100.0);
    println!();

    let per_source = stats.per_source();
    if !per_source.is_empty() {
        let busiest = per_source.iter().max_by_key(|(_, n)| **n);
        let quietest = per_source.iter().min_by_key(|(_, n)| **n);
        if let (Some((bh, bn)), Some((qh, qn))) = (busiest, quietest) {
            println!("Sources:");
            println!("  Active:    {}", per_source.len());
            println!("  Busiest:   host {} ({} flows)", bh, format_number(*bn));
            println!("  Quietest:  host {} ({} flows)", qh, format_number(*qn));
            println!();
        }
    }

    println!("═══════════════════════════════════════════════════════════");
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(15_000_000), "15,000,000");
    }
}
