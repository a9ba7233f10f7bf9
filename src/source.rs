//! Reading vertex positions out of Bevy meshes.

use bevy::prelude::*;

use crate::binner::HeightmapBinner;
use crate::bounds::BoundingBox;
use crate::error::BinError;
use crate::grid::HeightGrid;

/// Copies the `POSITION` attribute of `mesh` into a list of points.
///
/// # Errors
///
/// [`BinError::MissingInput`] if the mesh has no position attribute or stores
/// it in a format other than `Float32x3`.
pub fn mesh_positions(mesh: &Mesh) -> Result<Vec<Vec3>, BinError> {
    let attribute = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .ok_or_else(|| BinError::MissingInput("mesh has no vertex positions".into()))?;

    let positions = attribute.as_float3().ok_or_else(|| {
        BinError::MissingInput("mesh vertex positions are not Float32x3".into())
    })?;

    Ok(positions.iter().copied().map(Vec3::from).collect())
}

/// Bins the vertices of `mesh` into a heightmap, using the mesh's own bounds.
///
/// # Errors
///
/// [`BinError::MissingInput`] if the mesh has no usable vertices, plus any
/// error returned by [`HeightmapBinner::bin`].
pub fn mesh_to_heightmap(
    mesh: &Mesh,
    resolution: usize,
    binner: &HeightmapBinner,
) -> Result<HeightGrid, BinError> {
    let points = mesh_positions(mesh)?;
    let bounds = BoundingBox::from_points(&points)
        .ok_or_else(|| BinError::MissingInput("mesh has no finite vertices".into()))?;

    debug!(
        "Binning {} vertices into {resolution}x{resolution} heightmap (bounds {:?} .. {:?})",
        points.len(),
        bounds.min,
        bounds.max
    );

    binner.bin(&points, &bounds, resolution)
}
