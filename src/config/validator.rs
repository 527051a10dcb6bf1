//! Configuration validation
//!
//! Every check runs before the CDF is sampled or any output is created, so an
//! invalid configuration never produces a partial trace.

use super::*;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<(), GenError> {
    validate_topology(&config.topology)?;
    validate_workload(&config.workload)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate host layout and traffic pattern
pub fn validate_topology(topology: &TopologyConfig) -> Result<(), GenError> {
    if topology.dc_count == 0 {
        return Err(GenError::config("dc_count must be at least 1"));
    }

    let host_count = topology
        .host_count()
        .ok_or_else(|| GenError::config("number of hosts is required (-n, or -m with -d)"))?;

    if let (Some(hosts), Some(per_dc)) = (topology.hosts, topology.dc_hosts) {
        let layout = per_dc.saturating_mul(topology.dc_count);
        if hosts != layout {
            return Err(GenError::config(format!(
                "host count {} does not match {} datacenters x {} hosts",
                hosts, topology.dc_count, per_dc
            )));
        }
    }

    match &topology.cross_dc {
        Some(cross) => validate_cross_dc(cross, topology),
        None => {
            if host_count < 2 {
                return Err(GenError::config(format!(
                    "at least 2 hosts are required, got {}",
                    host_count
                )));
            }
            Ok(())
        }
    }
}

fn validate_cross_dc(cross: &CrossDcConfig, topology: &TopologyConfig) -> Result<(), GenError> {
    let per_dc = topology.dc_hosts.ok_or_else(|| {
        GenError::config("cross-datacenter traffic requires hosts per datacenter (-m)")
    })?;

    if per_dc == 0 {
        return Err(GenError::dc_range("datacenters have no hosts"));
    }
    if cross.src_dc >= topology.dc_count || cross.dst_dc >= topology.dc_count {
        return Err(GenError::dc_range(format!(
            "src_dc {} and dst_dc {} must be below dc_count {}",
            cross.src_dc, cross.dst_dc, topology.dc_count
        )));
    }
    if cross.src_dc == cross.dst_dc {
        return Err(GenError::dc_range(format!(
            "src_dc and dst_dc must differ, both are {}",
            cross.src_dc
        )));
    }

    Ok(())
}

/// Validate rate and duration parameters
pub fn validate_workload(workload: &WorkloadConfig) -> Result<(), GenError> {
    if !(workload.load > 0.0 && workload.load <= 1.0) {
        return Err(GenError::rate(format!("load must be in (0, 1], got {}", workload.load)));
    }

    let bandwidth = workload.bandwidth.bits_per_sec()?;
    if !(bandwidth > 0.0) || !bandwidth.is_finite() {
        return Err(GenError::rate(format!(
            "bandwidth must be positive, got {}",
            workload.bandwidth
        )));
    }

    if !(workload.duration_secs > 0.0) || !workload.duration_secs.is_finite() {
        return Err(GenError::config(format!(
            "duration must be positive, got {}s",
            workload.duration_secs
        )));
    }
    if workload.duration_ns() == 0 {
        return Err(GenError::config(format!(
            "duration {}s is shorter than 1ns",
            workload.duration_secs
        )));
    }

    if workload
        .base_time_ns
        .checked_add(workload.duration_ns())
        .is_none()
    {
        return Err(GenError::config("base_time + duration overflows the nanosecond clock"));
    }

    Ok(())
}

/// Validate output locations
pub fn validate_output(output: &OutputConfig) -> Result<(), GenError> {
    if output.file.trim().is_empty() {
        return Err(GenError::config("output file name must not be empty"));
    }

    if let Some(json) = &output.json {
        if json == &output.trace_path() {
            return Err(GenError::config("JSON summary path must differ from the trace path"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.topology.hosts = Some(4);
        config
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_missing_hosts() {
        let config = Config::default();
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_single_host_rejected() {
        let mut config = valid_config();
        config.topology.hosts = Some(1);
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_host_count_mismatch() {
        let mut config = valid_config();
        config.topology.dc_count = 2;
        config.topology.dc_hosts = Some(4);
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));

        config.topology.hosts = Some(8);
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_invalid_rates() {
        for load in [0.0, -0.2, 1.01, f64::NAN] {
            let mut config = valid_config();
            config.workload.load = load;
            assert!(matches!(validate_config(&config), Err(GenError::InvalidRate(_))), "load {}", load);
        }

        let mut config = valid_config();
        config.workload.bandwidth = Bandwidth::BitsPerSec(0.0);
        assert!(matches!(validate_config(&config), Err(GenError::InvalidRate(_))));

        config.workload.bandwidth = Bandwidth::Text("-10G".into());
        assert!(matches!(validate_config(&config), Err(GenError::InvalidRate(_))));
    }

    #[test]
    fn test_malformed_bandwidth() {
        let mut config = valid_config();
        config.workload.bandwidth = Bandwidth::Text("ten gig".into());
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_invalid_duration() {
        let mut config = valid_config();
        config.workload.duration_secs = 0.0;
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));

        config.workload.duration_secs = 1e-12;
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_cross_dc_valid() {
        let mut config = Config::default();
        config.topology.dc_count = 8;
        config.topology.dc_hosts = Some(4);
        config.topology.cross_dc = Some(CrossDcConfig {
            src_dc: 0,
            dst_dc: 7,
            bidirectional: false,
        });
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_cross_dc_invalid_ranges() {
        let mut config = Config::default();
        config.topology.dc_count = 4;
        config.topology.dc_hosts = Some(4);

        for (src_dc, dst_dc) in [(1, 1), (0, 4), (5, 0)] {
            config.topology.cross_dc = Some(CrossDcConfig {
                src_dc,
                dst_dc,
                bidirectional: false,
            });
            assert!(
                matches!(validate_config(&config), Err(GenError::InvalidDcRange(_))),
                "src {} dst {}",
                src_dc,
                dst_dc
            );
        }

        config.topology.dc_hosts = Some(0);
        config.topology.cross_dc = Some(CrossDcConfig {
            src_dc: 0,
            dst_dc: 1,
            bidirectional: false,
        });
        assert!(matches!(validate_config(&config), Err(GenError::InvalidDcRange(_))));
    }

    #[test]
    fn test_cross_dc_requires_dc_hosts() {
        let mut config = valid_config();
        config.topology.dc_count = 2;
        config.topology.cross_dc = Some(CrossDcConfig {
            src_dc: 0,
            dst_dc: 1,
            bidirectional: false,
        });
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_output_paths() {
        let mut config = valid_config();
        config.output.file = "  ".into();
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));

        let mut config = valid_config();
        config.output.json = Some(config.output.trace_path());
        assert!(matches!(validate_config(&config), Err(GenError::Configuration(_))));
    }
}
