//! Cross-section profile of a ring.
//!
//! A profile is an ordered polyline in the (axial, radial) plane. It starts on
//! the near face at the base radius, follows the curved outer wall sampled from
//! a downward parabola, drops back to the base radius on the far face and
//! closes at its starting point:
//!
//! ```text
//!  radial
//!    ^        . - ~ - .          <- outer wall, bulge = curvature_magnitude
//!    |     .             .
//!    |    |               |      <- faces at axial = ±depth/2
//!    |    +---------------+      <- inner wall at inner_radius
//!    +-------------------------> axial
//! ```

use serde::{Deserialize, Serialize};

use super::ring::{RingError, ring_buffer_len};

/// Smallest number of angular steps that still encloses a ring.
pub const MIN_RADIAL_SUBDIVISIONS: usize = 3;

/// Shape parameters of one ring.
///
/// Instances are plain values: the engine replaces the whole record on every
/// slider change instead of mutating it in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeParameters {
    /// Number of angular steps around the revolution axis.
    pub radial_subdivisions: usize,
    /// Axial extent of the ring.
    pub depth: f64,
    /// Number of samples along the curved outer wall.
    pub num_samples: usize,
    /// Base radius of the inner wall and of both face edges.
    pub inner_radius: f64,
    /// Added to `inner_radius` to get the outer wall radius at the faces.
    pub thickness: f64,
    /// Extra radius of the outer wall at the axial center.
    pub curvature_magnitude: f64,
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self {
            radial_subdivisions: 30,
            depth: 2.0,
            num_samples: 5,
            inner_radius: 2.0,
            thickness: 0.3,
            curvature_magnitude: 0.2,
        }
    }
}

impl ShapeParameters {
    /// Checks every field against its domain.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.radial_subdivisions < MIN_RADIAL_SUBDIVISIONS {
            return Err(ShapeError::invalid(
                "radialSubdivisions",
                format!(
                    "must be at least {MIN_RADIAL_SUBDIVISIONS}, got {}",
                    self.radial_subdivisions
                ),
            ));
        }

        for (name, value) in [
            ("depth", self.depth),
            ("innerRadius", self.inner_radius),
            ("thickness", self.thickness),
        ] {
            if !value.is_finite() {
                return Err(ShapeError::invalid(name, "must be finite"));
            }
            if value < 0.0 {
                return Err(ShapeError::invalid(
                    name,
                    format!("must not be negative, got {value}"),
                ));
            }
        }

        if !self.curvature_magnitude.is_finite() {
            return Err(ShapeError::invalid("curvatureMagnitude", "must be finite"));
        }

        // the full ring buffer has to be addressable before anything is allocated
        self.profile_len()
            .and_then(|len| ring_buffer_len(len, self.radial_subdivisions))
            .ok_or_else(|| self.too_large())?;

        Ok(())
    }

    /// Number of points `build_profile` emits for these parameters, or `None`
    /// when that count does not fit in `usize`.
    #[must_use]
    pub const fn profile_len(&self) -> Option<usize> {
        self.num_samples.checked_add(3)
    }

    fn too_large(&self) -> RingError {
        RingError::TooLarge {
            radial_subdivisions: self.radial_subdivisions,
            segments: self.num_samples.saturating_add(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShapeError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error(transparent)]
    Ring(#[from] RingError),
}

impl ShapeError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// One vertex of the cross-section: `axial` runs along the revolution axis,
/// `radial` is the distance from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub axial: f64,
    pub radial: f64,
}

impl ProfilePoint {
    #[must_use]
    pub const fn new(axial: f64, radial: f64) -> Self {
        Self { axial, radial }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.axial.is_finite() && self.radial.is_finite()
    }
}

/// Downward parabola through `(±1, 0)` peaking at `(0, magnitude)`.
#[must_use]
pub fn quadratic_curvature(x: f64, magnitude: f64) -> f64 {
    -magnitude * x * x + magnitude
}

/// Linearly remap `n` from `[start1, stop1]` to `[start2, stop2]`.
///
/// A collapsed source range maps to the middle of the target range.
#[must_use]
pub fn interpolate(n: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    let span = stop1 - start1;
    if span == 0.0 {
        return (start2 + stop2) * 0.5;
    }
    ((n - start1) / span) * (stop2 - start2) + start2
}

/// Build the closed cross-section polyline for `params`.
///
/// Always returns `params.num_samples + 3` points; the first and the last
/// point are identical.
pub fn build_profile(params: &ShapeParameters) -> Result<Vec<ProfilePoint>, ShapeError> {
    params.validate()?;

    let half_depth = params.depth / 2.0;
    let outer_radius = params.thickness + params.inner_radius;
    let last_sample = params.num_samples.saturating_sub(1) as f64;

    let start = ProfilePoint::new(-half_depth, params.inner_radius);

    let capacity = params.profile_len().ok_or_else(|| params.too_large())?;
    let mut profile: Vec<ProfilePoint> = Vec::new();
    profile
        .try_reserve_exact(capacity)
        .map_err(|_| params.too_large())?;
    profile.push(start);

    for i in 0..params.num_samples {
        let t = interpolate(i as f64, 0.0, last_sample, -1.0, 1.0);
        profile.push(ProfilePoint::new(
            t * half_depth,
            outer_radius + quadratic_curvature(t, params.curvature_magnitude),
        ));
    }

    profile.push(ProfilePoint::new(half_depth, params.inner_radius));
    profile.push(start);

    Ok(profile)
}
