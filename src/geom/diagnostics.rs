//! Quality report for a generated ring.
//!
//! The ring buffer is unindexed, so topology is checked on the welded form:
//! a well-formed ring welds into a closed manifold with positive volume.
//!
//! ```ignore
//! use ring_engine::geom::{diagnose_ring_mesh, generate_ring, ShapeParameters, Tolerance};
//!
//! let mesh = generate_ring(&ShapeParameters::default())?;
//! let diagnostics = diagnose_ring_mesh(&mesh, Tolerance::WELD);
//! if !diagnostics.is_clean() {
//!     for warning in &diagnostics.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//! }
//! ```

use std::fmt;

use serde::Serialize;

use super::mesh::{count_edge_topology, is_degenerate_triangle, signed_volume, weld_ring_mesh};
use super::metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
use super::ring::{RingMesh, seam_gap};
use super::Tolerance;

/// Diagnostics collected for one ring mesh.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingMeshDiagnostics {
    /// Vertex entries in the unindexed buffer.
    pub vertex_count: usize,

    pub triangle_count: usize,

    /// Vertex entries merged while welding.
    ///
    /// Every interior grid vertex is shared by six triangle corners, so this is
    /// expected to be most of `vertex_count`.
    pub welded_vertex_count: usize,

    /// Zero-area triangles, e.g. from repeated profile points or a zero radius.
    pub degenerate_triangle_count: usize,

    /// Edges of the welded mesh with only one adjacent triangle.
    pub open_edge_count: usize,

    /// Edges of the welded mesh with more than two adjacent triangles.
    pub non_manifold_edge_count: usize,

    /// Positive when triangles face out of the solid.
    pub signed_volume: f64,

    /// Distance between the first and the last angular step where they meet.
    /// `None` when the buffer layout is unknown.
    pub seam_gap: Option<f64>,

    /// Only populated with the `mesh_engine_metrics` feature on native targets.
    pub timing: Option<GeomTimingReport>,

    pub warnings: Vec<String>,
}

impl RingMeshDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the welded mesh has no open edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Watertight, manifold and outward facing.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold() && self.signed_volume > 0.0
    }

    /// Returns `true` if the mesh is a valid solid without degenerate
    /// triangles or warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.is_valid_solid() && self.degenerate_triangle_count == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the total number of topology issues (open + non-manifold edges).
    #[must_use]
    pub fn topology_issue_count(&self) -> usize {
        self.open_edge_count + self.non_manifold_edge_count
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Returns a short summary string suitable for logging.
    ///
    /// Format: `"V:{vertices} T:{triangles} vol:{volume} [issues...]"`
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "V:{} T:{} vol:{:.6}",
            self.vertex_count, self.triangle_count, self.signed_volume
        )];

        if self.welded_vertex_count > 0 {
            parts.push(format!("welded:{}", self.welded_vertex_count));
        }
        if self.degenerate_triangle_count > 0 {
            parts.push(format!("degenerate:{}", self.degenerate_triangle_count));
        }
        if self.open_edge_count > 0 {
            parts.push(format!("open:{}", self.open_edge_count));
        }
        if self.non_manifold_edge_count > 0 {
            parts.push(format!("non-manifold:{}", self.non_manifold_edge_count));
        }
        if let Some(gap) = self.seam_gap.filter(|gap| *gap > 0.0) {
            parts.push(format!("seam:{gap:.3e}"));
        }

        parts.join(" ")
    }
}

impl fmt::Display for RingMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ring Diagnostics:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Triangles: {}", self.triangle_count)?;
        writeln!(f, "  Welded vertices: {}", self.welded_vertex_count)?;
        writeln!(f, "  Signed volume: {:.6}", self.signed_volume)?;

        if let Some(gap) = self.seam_gap {
            writeln!(f, "  Seam gap: {gap:e}")?;
        }

        if self.degenerate_triangle_count > 0 {
            writeln!(f, "  Degenerate triangles: {}", self.degenerate_triangle_count)?;
        }

        if self.topology_issue_count() > 0 {
            writeln!(f, "  Topology issues:")?;
            if self.open_edge_count > 0 {
                writeln!(f, "    - Open edges: {}", self.open_edge_count)?;
            }
            if self.non_manifold_edge_count > 0 {
                writeln!(f, "    - Non-manifold edges: {}", self.non_manifold_edge_count)?;
            }
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() {
            "CLEAN"
        } else if self.is_valid_solid() {
            "VALID (with degenerates)"
        } else {
            "ISSUES DETECTED"
        };
        writeln!(f, "  Status: {status}")?;

        Ok(())
    }
}

/// Weld `mesh` and check it for holes, inverted winding and collapsed
/// triangles.
#[must_use]
pub fn diagnose_ring_mesh(mesh: &RingMesh, tol: Tolerance) -> RingMeshDiagnostics {
    let mut metrics = GeomMetrics::default();
    metrics.begin();

    let (indexed, welded_vertex_count) =
        metrics.time(TimingBucket::Welding, || weld_ring_mesh(mesh, tol));

    let mut diagnostics = metrics.time(TimingBucket::Diagnostics, || {
        let (open_edge_count, non_manifold_edge_count) = count_edge_topology(&indexed.indices);
        RingMeshDiagnostics {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            welded_vertex_count,
            degenerate_triangle_count: mesh
                .triangles()
                .filter(|&[a, b, c]| is_degenerate_triangle(a, b, c, tol))
                .count(),
            open_edge_count,
            non_manifold_edge_count,
            signed_volume: signed_volume(mesh),
            seam_gap: seam_gap(mesh),
            ..RingMeshDiagnostics::default()
        }
    });

    if mesh.is_empty() {
        diagnostics.add_warning("ring mesh is empty");
    }
    if diagnostics.open_edge_count > 0 {
        diagnostics.add_warning("ring mesh has open edges");
    }
    if diagnostics.non_manifold_edge_count > 0 {
        diagnostics.add_warning("ring mesh has non-manifold edges");
    }
    if !mesh.is_empty() && diagnostics.signed_volume <= 0.0 {
        diagnostics.add_warning("ring mesh does not enclose a positive volume");
    }
    if diagnostics.seam_gap.is_some_and(|gap| gap > Tolerance::LOOSE.eps) {
        diagnostics.add_warning("ring seam does not close");
    }

    diagnostics.timing = metrics.end();
    diagnostics
}
