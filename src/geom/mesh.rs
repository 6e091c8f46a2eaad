use std::collections::HashMap;

use super::ring::RingMesh;
use super::{Point3, Tolerance, Vec3};

/// Indexed triangle mesh obtained by welding a [`RingMesh`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.positions.iter().any(|p| !p.iter().all(|c| c.is_finite())) {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self.normals.as_ref().is_some_and(|n| n.len() != self.positions.len()) {
            return Err("mesh normal buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    /// Fill `normals` with area-weighted vertex normals.
    #[must_use]
    pub fn with_smooth_normals(mut self) -> Self {
        self.normals = Some(compute_smooth_normals(&self));
        self
    }
}

/// Unit normal of triangle `(a, b, c)` with counter-clockwise front faces,
/// or `None` when the triangle has no area.
#[must_use]
pub fn triangle_normal(a: Point3, b: Point3, c: Point3) -> Option<Vec3> {
    (b - a).cross(c - a).normalized()
}

/// One normal per vertex entry of `mesh`, equal to the normal of the triangle
/// that owns it. Degenerate triangles fall back to `+Z`.
#[must_use]
pub fn compute_face_normals(mesh: &RingMesh) -> Vec<[f64; 3]> {
    let mut normals = Vec::with_capacity(mesh.vertex_count());
    for [a, b, c] in mesh.triangles() {
        let n = triangle_normal(a, b, c).unwrap_or(Vec3::Z).to_array();
        normals.extend_from_slice(&[n, n, n]);
    }
    normals
}

/// Flat `[nx, ny, nz, ...]` variant of [`compute_face_normals`] aligned with
/// the ring buffer.
#[must_use]
pub fn face_normals_flat(mesh: &RingMesh) -> Vec<f64> {
    compute_face_normals(mesh).into_iter().flatten().collect()
}

/// Merge coincident vertices of the ring buffer within `tol`.
///
/// Returns the indexed mesh and the number of vertex entries that were merged
/// into an earlier one.
#[must_use]
pub fn weld_ring_mesh(mesh: &RingMesh, tol: Tolerance) -> (GeomMesh, usize) {
    let points: Vec<Point3> = mesh.vertices().collect();
    let (positions, indices) = weld_points(&points, tol);
    let welded = points.len().saturating_sub(positions.len());
    (
        GeomMesh::new(positions.into_iter().map(Point3::to_array).collect(), indices),
        welded,
    )
}

fn weld_points(points: &[Point3], tol: Tolerance) -> (Vec<Point3>, Vec<u32>) {
    if !tol.eps.is_finite() || tol.eps <= 0.0 {
        return (points.to_vec(), (0..points.len() as u32).collect());
    }

    let inv = 1.0 / tol.eps;

    /// Grid cell of a coordinate; `None` for NaN/Inf so those never weld.
    fn quantize(value: f64, inv: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let q = (value * inv).floor();
        Some(q.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    }

    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut out_points: Vec<Point3> = Vec::with_capacity(points.len());
    let mut indices: Vec<u32> = Vec::with_capacity(points.len());

    for &p in points {
        let key = match (quantize(p.x, inv), quantize(p.y, inv), quantize(p.z, inv)) {
            (Some(kx), Some(ky), Some(kz)) => Some((kx, ky, kz)),
            _ => None,
        };

        // Neighbouring cells too: two points within tolerance can straddle a cell border.
        let found = key.and_then(|key| {
            (-1i64..=1)
                .flat_map(|dx| (-1i64..=1).flat_map(move |dy| (-1i64..=1).map(move |dz| (dx, dy, dz))))
                .filter_map(|(dx, dy, dz)| buckets.get(&(key.0 + dx, key.1 + dy, key.2 + dz)))
                .flatten()
                .copied()
                .find(|&cand| tol.approx_eq_point3(out_points[cand as usize], p))
        });

        let index = match found {
            Some(existing) => existing,
            None => {
                let new_index = out_points.len() as u32;
                out_points.push(p);
                if let Some(key) = key {
                    buckets.entry(key).or_default().push(new_index);
                }
                new_index
            }
        };
        indices.push(index);
    }

    (out_points, indices)
}

/// Area-weighted vertex normals for an indexed mesh. Vertices without any
/// non-degenerate neighbour get `+Z`.
#[must_use]
pub fn compute_smooth_normals(mesh: &GeomMesh) -> Vec<[f64; 3]> {
    let positions = &mesh.positions;
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (
            positions.get(tri[0] as usize),
            positions.get(tri[1] as usize),
            positions.get(tri[2] as usize),
        ) else {
            continue;
        };
        let (a, b, c) = (Point3::from_array(*a), Point3::from_array(*b), Point3::from_array(*c));
        let n = (b - a).cross(c - a);
        for &i in tri {
            sums[i as usize] = sums[i as usize] + n;
        }
    }

    sums.into_iter()
        .map(|n| n.normalized().unwrap_or(Vec3::Z).to_array())
        .collect()
}

/// Count edges used by exactly one triangle (open) and by more than two
/// (non-manifold). Triangles with repeated indices are skipped.
#[must_use]
pub fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }
        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let edge = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(edge).or_insert(0) += 1;
        }
    }

    edge_counts
        .values()
        .fold((0, 0), |(open, non_manifold), &count| match count {
            1 => (open + 1, non_manifold),
            c if c > 2 => (open, non_manifold + 1),
            _ => (open, non_manifold),
        })
}

/// Signed volume enclosed by the triangle soup; positive when the triangles
/// face outward.
#[must_use]
pub fn signed_volume(mesh: &RingMesh) -> f64 {
    mesh.triangles()
        .map(|[a, b, c]| a.to_vec3().dot(b.to_vec3().cross(c.to_vec3())))
        .sum::<f64>()
        / 6.0
}

/// Whether the triangle has (near) zero area.
#[must_use]
pub fn is_degenerate_triangle(a: Point3, b: Point3, c: Point3, tol: Tolerance) -> bool {
    if tol.approx_eq_point3(a, b) || tol.approx_eq_point3(b, c) || tol.approx_eq_point3(a, c) {
        return true;
    }
    let area2 = (b - a).cross(c - a).length_squared();
    !area2.is_finite() || area2 <= tol.eps_squared() * tol.eps_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::profile::ProfilePoint;
    use crate::geom::ring::build_ring_mesh;

    fn box_ring(subdivisions: usize) -> RingMesh {
        let profile = [
            ProfilePoint::new(-0.5, 1.0),
            ProfilePoint::new(-0.5, 2.0),
            ProfilePoint::new(0.5, 2.0),
            ProfilePoint::new(0.5, 1.0),
            ProfilePoint::new(-0.5, 1.0),
        ];
        build_ring_mesh(&profile, subdivisions).unwrap()
    }

    #[test]
    fn welding_shares_grid_vertices() {
        let mesh = box_ring(8);
        let (indexed, welded) = weld_ring_mesh(&mesh, Tolerance::WELD);

        // Four distinct profile points at eight angles.
        assert_eq!(indexed.vertex_count(), 4 * 8);
        assert_eq!(welded, mesh.vertex_count() - 32);
        assert_eq!(indexed.triangle_count(), mesh.triangle_count());
        assert!(indexed.validate().is_ok());
    }

    #[test]
    fn welded_ring_is_closed_manifold() {
        let (indexed, _) = weld_ring_mesh(&box_ring(5), Tolerance::WELD);
        assert_eq!(count_edge_topology(&indexed.indices), (0, 0));
    }

    #[test]
    fn open_strip_reports_open_edges() {
        let mesh = build_ring_mesh(
            &[ProfilePoint::new(0.0, 1.0), ProfilePoint::new(1.0, 1.0)],
            4,
        )
        .unwrap();
        let (indexed, _) = weld_ring_mesh(&mesh, Tolerance::WELD);
        let (open, non_manifold) = count_edge_topology(&indexed.indices);
        // Top and bottom circles, four edges each.
        assert_eq!(open, 8);
        assert_eq!(non_manifold, 0);
    }

    #[test]
    fn face_normals_are_unit_and_repeated_per_triangle() {
        let mesh = box_ring(6);
        let normals = compute_face_normals(&mesh);
        assert_eq!(normals.len(), mesh.vertex_count());
        for tri in normals.chunks_exact(3) {
            assert_eq!(tri[0], tri[1]);
            assert_eq!(tri[1], tri[2]);
            let len = (tri[0][0].powi(2) + tri[0][1].powi(2) + tri[0][2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-12);
        }
        assert_eq!(face_normals_flat(&mesh).len(), mesh.len());
    }

    #[test]
    fn degenerate_triangle_normal_falls_back_to_z() {
        let mesh = RingMesh::from_flat(vec![0.0; 9]).unwrap();
        assert_eq!(compute_face_normals(&mesh), vec![[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn box_ring_volume_is_positive() {
        let volume = signed_volume(&box_ring(64));
        // Annulus area π(2² − 1²) times depth 1, approached from below.
        let exact = std::f64::consts::PI * 3.0;
        assert!(volume > 0.0);
        assert!((volume - exact).abs() / exact < 0.01);
    }

    #[test]
    fn smooth_normals_on_outer_wall_point_outward() {
        let (indexed, _) = weld_ring_mesh(&box_ring(16), Tolerance::WELD);
        let indexed = indexed.with_smooth_normals();
        let normals = indexed.normals.as_ref().unwrap();
        for (p, n) in indexed.positions.iter().zip(normals) {
            let radial = (p[0] * p[0] + p[1] * p[1]).sqrt();
            if (radial - 2.0).abs() < 1e-9 {
                assert!(p[0] * n[0] + p[1] * n[1] > 0.0);
            }
        }
    }

    #[test]
    fn detects_degenerate_triangles() {
        let tol = Tolerance::WELD;
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        assert!(is_degenerate_triangle(a, b, Point3::new(2.0, 0.0, 0.0), tol));
        assert!(is_degenerate_triangle(a, a, b, tol));
        assert!(!is_degenerate_triangle(a, b, Point3::new(0.0, 1.0, 0.0), tol));
    }
}
