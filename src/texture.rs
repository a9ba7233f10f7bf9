//! Heightmap to GPU texture conversion and sync.
//!
//! Provides [`heightmap_to_image`] to turn a [`HeightGrid`] into a single
//! channel `R32Float` [`Image`], and a Bevy system that keeps that texture in
//! sync when the heightmap is replaced.

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::grid::HeightGrid;

/// Converts a [`HeightGrid`] into an `R32Float` [`Image`].
///
/// Texel `(u, v)` holds the height of cell (row `v`, column `u`). The image
/// samples with `ClampToEdge` so border heights do not bleed across edges.
pub fn heightmap_to_image(grid: &HeightGrid) -> Image {
    let mut image = Image::new(
        heightmap_extent(grid),
        TextureDimension::D2,
        heightmap_bytes(grid),
        TextureFormat::R32Float,
        RenderAssetUsages::default(),
    );

    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::ClampToEdge,
        address_mode_v: ImageAddressMode::ClampToEdge,
        ..default()
    });

    image
}

/// Resource holding the current terrain heightmap and whether it has changed.
///
/// Replace `grid` and call [`mark_dirty`] to have the next
/// [`sync_heightmap_texture`] pass re-upload the GPU texture.
///
/// [`mark_dirty`]: TerrainHeightmap::mark_dirty
#[derive(Resource)]
pub struct TerrainHeightmap {
    pub grid: HeightGrid,
    dirty: bool,
}

impl TerrainHeightmap {
    /// The texture will be uploaded on the next [`sync_heightmap_texture`] run.
    pub fn new(grid: HeightGrid) -> Self {
        Self { grid, dirty: true }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Resource holding the GPU-side heightmap texture handle.
///
/// Insert alongside [`TerrainHeightmap`] before running
/// [`sync_heightmap_texture`].
#[derive(Resource)]
pub struct HeightmapTexture {
    pub handle: Handle<Image>,
}

/// Re-uploads the heightmap texture when [`TerrainHeightmap`] is dirty.
///
/// Safe to run every frame; does nothing while the data is unchanged.
pub fn sync_heightmap_texture(
    mut heightmap: ResMut<TerrainHeightmap>,
    texture: Res<HeightmapTexture>,
    mut images: ResMut<Assets<Image>>,
) {
    if !heightmap.dirty {
        return;
    }
    heightmap.dirty = false;

    let Some(image) = images.get_mut(&texture.handle) else {
        warn!("Heightmap texture handle does not point at a loaded image");
        return;
    };

    image.texture_descriptor.size = heightmap_extent(&heightmap.grid);
    image.data = Some(heightmap_bytes(&heightmap.grid));
}

fn heightmap_extent(grid: &HeightGrid) -> Extent3d {
    let side = grid.resolution() as u32;
    Extent3d {
        width: side,
        height: side,
        depth_or_array_layers: 1,
    }
}

fn heightmap_bytes(grid: &HeightGrid) -> Vec<u8> {
    grid.as_slice()
        .iter()
        .flat_map(|height| height.to_le_bytes())
        .collect()
}
