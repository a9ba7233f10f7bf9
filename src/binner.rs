//! Vertex-to-heightmap binning.
//!
//! Each point is normalized against a [`BoundingBox`], its X and Z coordinates
//! pick a grid cell, and its normalized Y becomes a height sample. Every cell
//! ends up holding the arithmetic mean of the samples that landed in it.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bounds::{BoundingBox, DegenerateAxisPolicy, Normalizer};
use crate::error::BinError;
use crate::grid::{CellAccumulator, HeightGrid};

/// How a normalized coordinate scaled to `[0, resolution - 1]` snaps to a
/// cell index when it lies exactly between two cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Halves round to the nearest even index (`0.5 → 0`, `1.5 → 2`).
    #[default]
    TiesToEven,
    /// Halves round towards positive infinity (`0.5 → 1`, `1.5 → 2`).
    HalfUp,
}

impl RoundingMode {
    #[inline]
    fn apply(self, value: f32) -> f32 {
        match self {
            RoundingMode::TiesToEven => value.round_ties_even(),
            RoundingMode::HalfUp => (value + 0.5).floor(),
        }
    }
}

/// Bins 3D points into a square [`HeightGrid`].
///
/// # Example
///
/// ```
/// use bevy::math::Vec3;
/// use bevy_mesh_terrain::{BoundingBox, HeightmapBinner, RoundingMode};
///
/// let points = [Vec3::ZERO, Vec3::ONE, Vec3::splat(0.5)];
/// let bounds = BoundingBox::from_points(&points).unwrap();
/// let grid = HeightmapBinner::new()
///     .with_rounding(RoundingMode::HalfUp)
///     .bin(&points, &bounds, 2)
///     .unwrap();
///
/// assert_eq!(grid.get(0, 0), 0.0);
/// assert_eq!(grid.get(1, 1), 0.75);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeightmapBinner {
    degenerate_policy: DegenerateAxisPolicy,
    rounding: RoundingMode,
}

impl HeightmapBinner {
    /// Creates a binner that rejects degenerate bounds and rounds ties to even.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how axes with zero extent are handled.
    pub fn with_degenerate_policy(mut self, policy: DegenerateAxisPolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    /// Sets the rounding rule used to place points in cells.
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn degenerate_policy(&self) -> DegenerateAxisPolicy {
        self.degenerate_policy
    }

    pub fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Bins `points` into a `resolution × resolution` grid.
    ///
    /// Points with a non-finite coordinate are skipped. Heights are not
    /// clamped, so points outside `bounds` may yield values outside `[0, 1]`.
    ///
    /// # Errors
    ///
    /// - [`BinError::InvalidResolution`] if `resolution` is `0`.
    /// - [`BinError::DegenerateBounds`] if an axis of `bounds` has no usable
    ///   extent and the policy is [`DegenerateAxisPolicy::Reject`].
    pub fn bin(
        &self,
        points: &[Vec3],
        bounds: &BoundingBox,
        resolution: usize,
    ) -> Result<HeightGrid, BinError> {
        let placer = self.placer(bounds, resolution)?;
        let mut accumulator = CellAccumulator::new(resolution);
        let mut skipped = 0usize;

        for &point in points {
            match placer.place(point) {
                Some((row, col, height)) => accumulator.add(row, col, height),
                None => skipped += 1,
            }
        }

        report_skipped(skipped);
        Ok(accumulator.finish())
    }

    /// Same as [`bin`](Self::bin), but accumulates on the rayon thread pool.
    ///
    /// Each worker fills its own [`CellAccumulator`]; partials are merged
    /// before averaging. Results match [`bin`](Self::bin) up to
    /// floating-point summation order.
    #[cfg(feature = "parallel")]
    pub fn bin_parallel(
        &self,
        points: &[Vec3],
        bounds: &BoundingBox,
        resolution: usize,
    ) -> Result<HeightGrid, BinError> {
        use rayon::prelude::*;

        let placer = self.placer(bounds, resolution)?;

        let (accumulator, skipped) = points
            .par_iter()
            .fold(
                || (CellAccumulator::new(resolution), 0usize),
                |(mut acc, skipped), &point| match placer.place(point) {
                    Some((row, col, height)) => {
                        acc.add(row, col, height);
                        (acc, skipped)
                    }
                    None => (acc, skipped + 1),
                },
            )
            .reduce(
                || (CellAccumulator::new(resolution), 0usize),
                |(a, skipped_a), (b, skipped_b)| (a.merge(b), skipped_a + skipped_b),
            );

        report_skipped(skipped);
        Ok(accumulator.finish())
    }

    fn placer(&self, bounds: &BoundingBox, resolution: usize) -> Result<CellPlacer, BinError> {
        if resolution == 0 {
            return Err(BinError::InvalidResolution {
                resolution,
                minimum: 1,
            });
        }
        let normalizer = bounds.normalizer(self.degenerate_policy)?;
        Ok(CellPlacer {
            normalizer,
            rounding: self.rounding,
            last_index: resolution - 1,
        })
    }
}

/// Bins `points` with the default [`HeightmapBinner`].
pub fn bin(
    points: &[Vec3],
    bounds: &BoundingBox,
    resolution: usize,
) -> Result<HeightGrid, BinError> {
    HeightmapBinner::new().bin(points, bounds, resolution)
}

#[derive(Debug, Clone, Copy)]
struct CellPlacer {
    normalizer: Normalizer,
    rounding: RoundingMode,
    last_index: usize,
}

impl CellPlacer {
    /// Returns `(row, col, normalized_height)` for a finite point.
    #[inline]
    fn place(&self, point: Vec3) -> Option<(usize, usize, f32)> {
        if !point.is_finite() {
            return None;
        }
        let n = self.normalizer.normalize(point);
        Some((self.index(n.z), self.index(n.x), n.y))
    }

    #[inline]
    fn index(&self, normalized: f32) -> usize {
        let scaled = self.rounding.apply(normalized * self.last_index as f32);
        // Negative values land on 0; `as` saturates at the top end.
        (scaled.max(0.0) as usize).min(self.last_index)
    }
}

fn report_skipped(skipped: usize) {
    if skipped > 0 {
        warn!("Skipped {skipped} vertices with non-finite coordinates");
    }
}
