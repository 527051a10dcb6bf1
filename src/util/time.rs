//! Simulated-time and rate utilities
//!
//! The generator keeps every timestamp in integer nanoseconds so that heap
//! ordering is exact. These helpers convert at the edges: seconds from the
//! configuration in, 9-decimal seconds out to the trace.

use std::time::Duration;

/// Nanoseconds per second
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Convert fractional seconds to whole nanoseconds (truncating)
///
/// # Examples
///
/// ```
/// use trafficgen::util::time::secs_to_nanos;
///
/// assert_eq!(secs_to_nanos(1.5), 1_500_000_000);
/// assert_eq!(secs_to_nanos(0.000_000_001), 1);
/// ```
pub fn secs_to_nanos(secs: f64) -> u64 {
    (secs * NANOS_PER_SEC as f64).round() as u64
}

/// Render a nanosecond timestamp as seconds with exactly 9 decimals
///
/// Integer arithmetic keeps the rendering exact for any `u64` input.
///
/// # Examples
///
/// ```
/// use trafficgen::util::time::format_trace_seconds;
///
/// assert_eq!(format_trace_seconds(2_000_000_123), "2.000000123");
/// assert_eq!(format_trace_seconds(5), "0.000000005");
/// ```
pub fn format_trace_seconds(nanos: u64) -> String {
    format!("{}.{:09}", nanos / NANOS_PER_SEC, nanos % NANOS_PER_SEC)
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use trafficgen::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Format a bit rate (bits per second) with decimal units
///
/// # Examples
///
/// ```
/// use trafficgen::util::time::format_bandwidth;
///
/// assert_eq!(format_bandwidth(500.0), "500 bps");
/// assert_eq!(format_bandwidth(10e9), "10.00 Gbps");
/// ```
pub fn format_bandwidth(bits_per_sec: f64) -> String {
    if bits_per_sec < 1e3 {
        format!("{:.0} bps", bits_per_sec)
    } else if bits_per_sec < 1e6 {
        format!("{:.2} Kbps", bits_per_sec / 1e3)
    } else if bits_per_sec < 1e9 {
        format!("{:.2} Mbps", bits_per_sec / 1e6)
    } else {
        format!("{:.2} Gbps", bits_per_sec / 1e9)
    }
}

/// Format a byte count with decimal units
pub fn format_bytes(bytes: f64) -> String {
    if bytes >= 1e9 {
        format!("{:.2} GB", bytes / 1e9)
    } else if bytes >= 1e6 {
        format!("{:.2} MB", bytes / 1e6)
    } else if bytes >= 1e3 {
        format!("{:.2} KB", bytes / 1e3)
    } else {
        format!("{:.0} B", bytes)
    }
}
