use super::mesh::face_normals_flat;
use super::metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
use super::{BBox, Point3};
use super::profile::{MIN_RADIAL_SUBDIVISIONS, ProfilePoint, ShapeError, ShapeParameters, build_profile};
use std::f64::consts::PI;

/// Floats per emitted vertex.
pub const FLOATS_PER_VERTEX: usize = 3;
/// Floats per emitted triangle.
pub const FLOATS_PER_TRIANGLE: usize = 3 * FLOATS_PER_VERTEX;
/// Floats per profile segment per angular step (two triangles).
pub const FLOATS_PER_QUAD: usize = 2 * FLOATS_PER_TRIANGLE;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RingError {
    #[error("ring requires at least {min} radial subdivisions, got {got}")]
    InvalidSubdivisions { min: usize, got: usize },
    #[error("profile requires at least 2 points, got {got}")]
    ProfileTooShort { got: usize },
    #[error("profile point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("ring with {radial_subdivisions} subdivisions and {segments} segments does not fit in memory")]
    TooLarge {
        radial_subdivisions: usize,
        segments: usize,
    },
}

/// Unindexed triangle soup of a revolved profile.
///
/// Every triangle owns its three vertices: `[x0, y0, z0, x1, y1, z1, ...]`.
/// Neighbouring quads repeat the coordinates they share.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RingMesh {
    positions: Vec<f64>,
    /// 0 when the quad layout is unknown (see [`RingMesh::from_flat`]).
    radial_subdivisions: usize,
}

impl RingMesh {
    /// Wrap an existing flat buffer of unknown layout.
    ///
    /// Fails when the length is not a whole number of triangles.
    pub fn from_flat(positions: Vec<f64>) -> Result<Self, String> {
        if positions.len() % FLOATS_PER_TRIANGLE != 0 {
            return Err(format!(
                "buffer length {} is not a multiple of {FLOATS_PER_TRIANGLE}",
                positions.len()
            ));
        }
        Ok(Self {
            positions,
            radial_subdivisions: 0,
        })
    }

    /// Angular steps the buffer was built with, if known.
    #[must_use]
    pub fn radial_subdivisions(&self) -> Option<usize> {
        (self.radial_subdivisions > 0).then_some(self.radial_subdivisions)
    }

    /// Profile segments per angular step, if the layout is known.
    #[must_use]
    pub fn segments_per_step(&self) -> Option<usize> {
        let steps = self.radial_subdivisions()?;
        Some(self.positions.len() / FLOATS_PER_QUAD / steps)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.positions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / FLOATS_PER_VERTEX
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / FLOATS_PER_TRIANGLE
    }

    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Point3> {
        let start = index.checked_mul(FLOATS_PER_VERTEX)?;
        let end = start.checked_add(FLOATS_PER_VERTEX)?;
        let v = self.positions.get(start..end)?;
        Some(Point3::new(v[0], v[1], v[2]))
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point3> + '_ {
        self.positions
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|v| Point3::new(v[0], v[1], v[2]))
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.positions.chunks_exact(FLOATS_PER_TRIANGLE).map(|t| {
            [
                Point3::new(t[0], t[1], t[2]),
                Point3::new(t[3], t[4], t[5]),
                Point3::new(t[6], t[7], t[8]),
            ]
        })
    }

    /// Axis-aligned extent of the emitted vertices.
    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_points(self.vertices())
    }

    /// Single-precision copy for GPU upload.
    #[must_use]
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.positions.iter().map(|&v| v as f32).collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.positions.len() % FLOATS_PER_TRIANGLE != 0 {
            return Err("ring buffer is not a triangle list (len % 9 != 0)".to_string());
        }
        if self.positions.iter().any(|v| !v.is_finite()) {
            return Err("ring buffer has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        Ok(())
    }

    fn push_vertex(&mut self, p: Point3) {
        self.positions.extend_from_slice(&[p.x, p.y, p.z]);
    }
}

/// Number of floats `build_ring_mesh` emits, or `None` when the buffer
/// could not be allocated on this target (more than `isize::MAX` bytes).
#[must_use]
pub fn ring_buffer_len(profile_len: usize, radial_subdivisions: usize) -> Option<usize> {
    let len = radial_subdivisions
        .checked_mul(profile_len.checked_sub(1)?)?
        .checked_mul(FLOATS_PER_QUAD)?;
    let bytes = len.checked_mul(std::mem::size_of::<f64>())?;
    (bytes <= isize::MAX as usize).then_some(len)
}

/// Revolve `profile` around the Z axis in `radial_subdivisions` equal steps.
///
/// For each step and each consecutive profile pair `(current, next)` the quad
///
/// ```text
///   d ---- c      angle_next
///   |    / |
///   |  /   |
///   a ---- b      angle
/// current  next
/// ```
///
/// is emitted as triangles `(a, c, b)` and `(a, d, c)`. With a profile that
/// climbs the near face, runs along the outer wall towards `+axial` and comes
/// back down the far face (the order [`build_profile`] emits) this winding
/// faces out of the enclosed solid.
pub fn build_ring_mesh(
    profile: &[ProfilePoint],
    radial_subdivisions: usize,
) -> Result<RingMesh, RingError> {
    if radial_subdivisions < MIN_RADIAL_SUBDIVISIONS {
        return Err(RingError::InvalidSubdivisions {
            min: MIN_RADIAL_SUBDIVISIONS,
            got: radial_subdivisions,
        });
    }
    if profile.len() < 2 {
        return Err(RingError::ProfileTooShort { got: profile.len() });
    }
    if let Some(index) = profile.iter().position(|p| !p.is_finite()) {
        return Err(RingError::NonFinitePoint { index });
    }

    let too_large = || RingError::TooLarge {
        radial_subdivisions,
        segments: profile.len() - 1,
    };
    let capacity = ring_buffer_len(profile.len(), radial_subdivisions).ok_or_else(too_large)?;

    let mut positions: Vec<f64> = Vec::new();
    positions
        .try_reserve_exact(capacity)
        .map_err(|_| too_large())?;

    let angle_per_subdivision = 2.0 * PI / radial_subdivisions as f64;
    let mut mesh = RingMesh {
        positions,
        radial_subdivisions,
    };

    for radial_index in 0..radial_subdivisions {
        let angle = radial_index as f64 * angle_per_subdivision;
        let angle_next = (radial_index + 1) as f64 * angle_per_subdivision;

        for pair in profile.windows(2) {
            let (current, next) = (pair[0], pair[1]);

            let a = Point3::from_cylindrical(current.radial, angle, current.axial);
            let b = Point3::from_cylindrical(next.radial, angle, next.axial);
            let c = Point3::from_cylindrical(next.radial, angle_next, next.axial);
            let d = Point3::from_cylindrical(current.radial, angle_next, current.axial);

            for p in [a, c, b, a, d, c] {
                mesh.push_vertex(p);
            }
        }
    }

    debug_assert_eq!(mesh.positions.len(), capacity);
    Ok(mesh)
}

/// Largest distance between the leading edge of the first angular step and
/// the trailing edge of the last one. `None` for buffers of unknown layout.
#[must_use]
pub fn seam_gap(mesh: &RingMesh) -> Option<f64> {
    let steps = mesh.radial_subdivisions()?;
    let segments = mesh.segments_per_step()?;
    let last_step = (steps - 1) * segments;

    let mut gap: f64 = 0.0;
    for segment in 0..segments {
        let first = segment * 6;
        let last = (last_step + segment) * 6;
        // first quad: a at +0, b at +2; last quad: c at +1, d at +4
        for (lead, trail) in [(first, last + 4), (first + 2, last + 1)] {
            gap = gap.max(mesh.vertex(lead)?.distance_to(mesh.vertex(trail)?));
        }
    }
    Some(gap)
}

/// Profile + revolution in one call.
pub fn generate_ring(params: &ShapeParameters) -> Result<RingMesh, ShapeError> {
    let profile = build_profile(params)?;
    Ok(build_ring_mesh(&profile, params.radial_subdivisions)?)
}

/// Everything the host needs after one regeneration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingBuild {
    pub mesh: RingMesh,
    /// Flat face normals aligned with `mesh`.
    pub normals: Vec<f64>,
    /// Profile, revolve and normals timing; `None` unless metrics are enabled.
    pub timing: Option<GeomTimingReport>,
}

/// [`generate_ring`] plus face normals, timed per phase.
pub fn build_ring(params: &ShapeParameters) -> Result<RingBuild, ShapeError> {
    let mut metrics = GeomMetrics::default();
    metrics.begin();

    let profile = metrics.time(TimingBucket::Profile, || build_profile(params))?;
    let mesh = metrics.time(TimingBucket::Revolve, || {
        build_ring_mesh(&profile, params.radial_subdivisions)
    })?;
    let normals = metrics.time(TimingBucket::Normals, || face_normals_flat(&mesh));

    Ok(RingBuild {
        mesh,
        normals,
        timing: metrics.end(),
    })
}
