//! Terrain conversion settings.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::binner::{HeightmapBinner, RoundingMode};
use crate::bounds::DegenerateAxisPolicy;

/// Heightmap resolution used when none is configured.
pub const DEFAULT_RESOLUTION: usize = 513;

/// World-space extent of the generated terrain when none is configured.
pub const DEFAULT_TERRAIN_SIZE: Vec3 = Vec3::new(100.0, 20.0, 100.0);

/// Parameters for converting a mesh into terrain.
///
/// Deserializes from partial documents: any missing field takes its default.
///
/// ```
/// use bevy_mesh_terrain::TerrainSettings;
///
/// let settings: TerrainSettings = serde_json::from_str(r#"{ "resolution": 129 }"#).unwrap();
/// assert_eq!(settings.resolution, 129);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Cells along each side of the heightmap.
    pub resolution: usize,
    /// World extent of the terrain: X and Z span the grid, Y scales heights.
    pub size: Vec3,
    pub degenerate_policy: DegenerateAxisPolicy,
    pub rounding: RoundingMode,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            size: DEFAULT_TERRAIN_SIZE,
            degenerate_policy: DegenerateAxisPolicy::default(),
            rounding: RoundingMode::default(),
        }
    }
}

impl TerrainSettings {
    /// Builds the binner described by these settings.
    pub fn binner(&self) -> HeightmapBinner {
        HeightmapBinner::new()
            .with_degenerate_policy(self.degenerate_policy)
            .with_rounding(self.rounding)
    }
}
