mod core;
mod diagnostics;
mod mesh;
mod metrics;
mod profile;
mod ring;

pub use core::{BBox, Point3, Tolerance, Vec3};
pub use diagnostics::{RingMeshDiagnostics, diagnose_ring_mesh};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use mesh::{
    GeomMesh, compute_face_normals, compute_smooth_normals, count_edge_topology,
    face_normals_flat, is_degenerate_triangle, signed_volume, triangle_normal, weld_ring_mesh,
};
pub use profile::{
    MIN_RADIAL_SUBDIVISIONS, ProfilePoint, ShapeError, ShapeParameters, build_profile,
    interpolate, quadratic_curvature,
};
pub use ring::{
    FLOATS_PER_QUAD, FLOATS_PER_TRIANGLE, FLOATS_PER_VERTEX, RingBuild, RingError, RingMesh,
    build_ring, build_ring_mesh, generate_ring, ring_buffer_len, seam_gap,
};
