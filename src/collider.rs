//! Avian3D physics collider generation from `HeightGrid` data.
//!
//! Provides [`build_heightfield_collider`] which converts a [`HeightGrid`] into
//! an Avian3D `Collider::heightfield`, the cheapest shape for static terrain.

use avian3d::prelude::Collider;
use bevy::prelude::*;

use crate::grid::HeightGrid;

/// Builds an Avian3D `Collider::heightfield` from a [`HeightGrid`].
///
/// `terrain_size` is the same world extent passed to the mesh builder: X and Z
/// span the grid and Y scales the normalized heights.
///
/// The collider is centered at the origin of its local space, spanning
/// `[-size.x/2, size.x/2]` × `[-size.z/2, size.z/2]`. The terrain mesh starts
/// at `(0, 0, 0)`, so offset the collider by `(size.x/2, 0, size.z/2)` in a
/// child entity if they should line up.
///
/// # Panics
///
/// Panics if the grid resolution is less than 2.
pub fn build_heightfield_collider(grid: &HeightGrid, terrain_size: Vec3) -> Collider {
    let n = grid.resolution();
    assert!(n >= 2, "HeightGrid must be at least 2×2 to build a collider");

    // Avian's heightfield is indexed `heights[x][z]`; the grid is `[row = z][col = x]`.
    let heights: Vec<Vec<f32>> = (0..n)
        .map(|col| (0..n).map(|row| grid.get(row, col)).collect())
        .collect();

    Collider::heightfield(heights, terrain_size)
}
