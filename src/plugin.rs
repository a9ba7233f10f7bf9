//! Bevy plugin that turns source meshes into terrain entities.

use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::error::BinError;
use crate::grid::HeightGrid;
use crate::mesher::HeightGridMeshBuilder;
use crate::settings::TerrainSettings;
use crate::source::mesh_to_heightmap;

/// Registers [`convert_meshes_to_terrain`] in the `Update` schedule.
pub struct MeshToTerrainPlugin;

impl Plugin for MeshToTerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, convert_meshes_to_terrain);
    }
}

/// Request to build terrain on this entity from the vertices of `source`.
///
/// Removed once the request is handled, whether it succeeded or failed.
#[derive(Component, Debug, Clone)]
pub struct MeshToTerrain {
    pub source: Option<Handle<Mesh>>,
    pub settings: TerrainSettings,
}

impl MeshToTerrain {
    pub fn new(source: Handle<Mesh>) -> Self {
        Self {
            source: Some(source),
            settings: TerrainSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TerrainSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// The finalized heightmap of a terrain entity, heights normalized to `[0, 1]`.
#[derive(Component, Debug, Clone, Deref)]
pub struct TerrainHeights(pub HeightGrid);

/// Whether a source mesh that is not in `Assets<Mesh>` may still arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// The asset server is still loading it.
    Pending,
    /// It will never arrive; the request should be dropped.
    Missing(String),
}

impl SourceStatus {
    /// Classifies an absent source from its asset server load state.
    ///
    /// `None` means the server does not track the handle, so nothing will
    /// ever fill it.
    pub fn from_load_state(state: Option<LoadState>) -> Self {
        match state {
            Some(LoadState::NotLoaded | LoadState::Loading) => SourceStatus::Pending,
            Some(LoadState::Failed(err)) => {
                SourceStatus::Missing(format!("source mesh failed to load: {err}"))
            }
            Some(LoadState::Loaded) => {
                SourceStatus::Missing("source mesh was unloaded".into())
            }
            None => SourceStatus::Missing("no mesh found for the source handle".into()),
        }
    }
}

/// Converts every pending [`MeshToTerrain`] request whose source mesh is loaded.
///
/// On success the entity gains a [`Mesh3d`] with the terrain surface and a
/// [`TerrainHeights`] component. Requests stay queued while the asset server
/// is loading their source. Requests without a source, whose source failed
/// to load or is unknown, or whose mesh cannot be converted are logged and
/// dropped.
pub fn convert_meshes_to_terrain(
    mut commands: Commands,
    requests: Query<(Entity, &MeshToTerrain)>,
    mut meshes: ResMut<Assets<Mesh>>,
    asset_server: Option<Res<AssetServer>>,
) {
    for (entity, request) in &requests {
        let Some(source) = &request.source else {
            error!("Terrain {entity}: no source mesh assigned");
            commands.entity(entity).remove::<MeshToTerrain>();
            continue;
        };

        let Some(mesh) = meshes.get(source) else {
            let state = asset_server
                .as_ref()
                .and_then(|server| server.get_load_state(source));
            match SourceStatus::from_load_state(state) {
                SourceStatus::Pending => {}
                SourceStatus::Missing(reason) => {
                    error!("Terrain {entity}: {}", BinError::MissingInput(reason));
                    commands.entity(entity).remove::<MeshToTerrain>();
                }
            }
            continue;
        };

        match build_terrain(mesh, &request.settings) {
            Ok((grid, terrain_mesh)) => {
                let handle = meshes.add(terrain_mesh);
                commands
                    .entity(entity)
                    .insert((Mesh3d(handle), TerrainHeights(grid)))
                    .remove::<MeshToTerrain>();
                info!("Terrain {entity}: generation completed");
            }
            Err(err) => {
                error!("Terrain {entity}: {err}");
                commands.entity(entity).remove::<MeshToTerrain>();
            }
        }
    }
}

fn build_terrain(mesh: &Mesh, settings: &TerrainSettings) -> Result<(HeightGrid, Mesh), BinError> {
    // A single-cell grid has no quad to triangulate.
    if settings.resolution < 2 {
        return Err(BinError::InvalidResolution {
            resolution: settings.resolution,
            minimum: 2,
        });
    }
    let grid = mesh_to_heightmap(mesh, settings.resolution, &settings.binner())?;
    let terrain_mesh = HeightGridMeshBuilder::new()
        .with_terrain_size(settings.size)
        .build(&grid);
    Ok((grid, terrain_mesh))
}
