//! Axis-aligned bounds of a vertex set and per-axis normalization.

use bevy::math::DVec3;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Axis, BinError};

/// What to do when a bounding-box axis has no usable extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegenerateAxisPolicy {
    /// Fail with [`BinError::DegenerateBounds`].
    #[default]
    Reject,
    /// Treat every point as lying at normalized coordinate `0` on that axis.
    Collapse,
}

/// Axis-aligned minimum and maximum extents enclosing a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Creates bounds from explicit corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Computes the tightest bounds around `points`.
    ///
    /// Points with a non-finite coordinate are ignored. Returns `None` when no
    /// finite point remains.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let mut finite = points.iter().copied().filter(|p| p.is_finite());
        let first = finite.next()?;
        let (min, max) = finite.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Size of the box along each axis.
    ///
    /// Computed in `f32`, so a finite box spanning more than `f32::MAX`
    /// reports an infinite extent here; normalization itself works in `f64`.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint between the two corners.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the first axis whose extent cannot be used as a divisor.
    pub fn degenerate_axis(&self) -> Option<Axis> {
        let extents = self.extents_f64();
        Axis::ALL
            .into_iter()
            .find(|&axis| !is_usable_extent(component(extents, axis)))
    }

    /// Builds a [`Normalizer`] mapping this box onto the unit cube.
    ///
    /// An axis is degenerate when its extent is zero or negative, or when a
    /// corner is non-finite. Degenerate axes are rejected or collapsed
    /// according to `policy`.
    pub fn normalizer(&self, policy: DegenerateAxisPolicy) -> Result<Normalizer, BinError> {
        let extents = self.extents_f64();
        let mut normalizer = Normalizer {
            origin: self.min.as_dvec3(),
            extent: extents,
            keep: DVec3::ONE,
        };
        for axis in Axis::ALL {
            if is_usable_extent(component(extents, axis)) {
                continue;
            }
            match policy {
                DegenerateAxisPolicy::Reject => {
                    return Err(BinError::DegenerateBounds { axis });
                }
                DegenerateAxisPolicy::Collapse => {
                    // Neutral origin and divisor: a non-finite min must not leak a NaN.
                    *component_mut(&mut normalizer.origin, axis) = 0.0;
                    *component_mut(&mut normalizer.extent, axis) = 1.0;
                    *component_mut(&mut normalizer.keep, axis) = 0.0;
                }
            }
        }

        Ok(normalizer)
    }

    // Differences of two finite `f32` values are always finite in `f64`.
    fn extents_f64(&self) -> DVec3 {
        self.max.as_dvec3() - self.min.as_dvec3()
    }
}

/// Linear rescaling from a [`BoundingBox`] onto `[0, 1]` per axis.
///
/// Every coordinate on a collapsed axis normalizes to exactly `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    origin: DVec3,
    extent: DVec3,
    keep: DVec3,
}

impl Normalizer {
    /// Normalizes a point. The result is finite for every finite input, and
    /// the box's max corner maps to exactly `1` on every kept axis.
    #[inline]
    pub fn normalize(&self, point: Vec3) -> Vec3 {
        ((point.as_dvec3() - self.origin) / self.extent * self.keep).as_vec3()
    }
}

fn is_usable_extent(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

fn component(v: DVec3, axis: Axis) -> f64 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
        Axis::Z => v.z,
    }
}

fn component_mut(v: &mut DVec3, axis: Axis) -> &mut f64 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
        Axis::Z => &mut v.z,
    }
}
