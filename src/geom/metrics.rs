//! Opt-in timing hooks for ring generation.
//!
//! Timing is only collected when the `mesh_engine_metrics` feature is enabled
//! and the target is not `wasm32` (`std::time::Instant` is unavailable there).
//! Otherwise every call compiles down to running the closure.
//!
//! ```ignore
//! use ring_engine::geom::{GeomMetrics, TimingBucket};
//!
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let profile = metrics.time(TimingBucket::Profile, || build_profile(&params));
//! if let Some(report) = metrics.end() {
//!     println!("profile: {} ns", report.profile_ns);
//! }
//! ```

/// Phases of one regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Cross-section sampling.
    Profile,
    /// Revolution of the profile into the vertex buffer.
    Revolve,
    /// Face normal computation.
    Normals,
    /// Vertex welding into indexed geometry.
    Welding,
    /// Topology and orientation checks.
    Diagnostics,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeomTimingReport {
    pub profile_ns: u64,
    pub revolve_ns: u64,
    pub normals_ns: u64,
    pub welding_ns: u64,
    pub diagnostics_ns: u64,
}

impl GeomTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.profile_ns
            .saturating_add(self.revolve_ns)
            .saturating_add(self.normals_ns)
            .saturating_add(self.welding_ns)
            .saturating_add(self.diagnostics_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }

    /// Adds every bucket of `other` to this report.
    pub fn merge(&mut self, other: &Self) {
        self.profile_ns = self.profile_ns.saturating_add(other.profile_ns);
        self.revolve_ns = self.revolve_ns.saturating_add(other.revolve_ns);
        self.normals_ns = self.normals_ns.saturating_add(other.normals_ns);
        self.welding_ns = self.welding_ns.saturating_add(other.welding_ns);
        self.diagnostics_ns = self.diagnostics_ns.saturating_add(other.diagnostics_ns);
    }
}

/// Accumulator for timing a regeneration.
///
/// When metrics are disabled all methods are no-ops and [`end`](Self::end)
/// returns `None`.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times `f` and adds the elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Profile => &mut self.report.profile_ns,
            TimingBucket::Revolve => &mut self.report.revolve_ns,
            TimingBucket::Normals => &mut self.report.normals_ns,
            TimingBucket::Welding => &mut self.report.welding_ns,
            TimingBucket::Diagnostics => &mut self.report.diagnostics_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_report_total() {
        let report = GeomTimingReport {
            profile_ns: 1000,
            revolve_ns: 2000,
            welding_ns: 3000,
            ..Default::default()
        };
        assert_eq!(report.total_ns(), 6000);
        assert!((report.total_ms() - 0.006).abs() < 1e-9);
    }

    #[test]
    fn test_total_saturates() {
        let report = GeomTimingReport {
            profile_ns: u64::MAX,
            revolve_ns: 5,
            ..Default::default()
        };
        assert_eq!(report.total_ns(), u64::MAX);
    }

    #[test]
    fn test_merge_adds_buckets() {
        let mut report = GeomTimingReport {
            profile_ns: 10,
            welding_ns: 7,
            ..Default::default()
        };
        report.merge(&GeomTimingReport {
            profile_ns: 5,
            normals_ns: 3,
            diagnostics_ns: u64::MAX,
            ..Default::default()
        });
        assert_eq!(report.profile_ns, 15);
        assert_eq!(report.normals_ns, 3);
        assert_eq!(report.welding_ns, 7);
        assert_eq!(report.diagnostics_ns, u64::MAX);
    }

    #[test]
    fn test_time_returns_closure_result() {
        let mut metrics = GeomMetrics::default();
        metrics.begin();
        let result = metrics.time(TimingBucket::Revolve, || 42);
        assert_eq!(result, 42);
        let report = metrics.end();
        #[cfg(not(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32"))))]
        assert!(report.is_none());
        #[cfg(all(feature = "mesh_engine_metrics", not(target_arch = "wasm32")))]
        assert!(report.is_some());
    }
}
