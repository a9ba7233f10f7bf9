//! Bevy integration for turning mesh vertices into terrain heightmaps.
//!
//! Bins the vertex positions of any mesh into a square [`HeightGrid`] and
//! hands the result to Bevy as a terrain mesh, a GPU height texture, and an
//! optional physics collider.
//!
//! # Features
//!
//! - **Binning**: [`HeightmapBinner`] normalizes points against a
//!   [`BoundingBox`], places them in grid cells by their X and Z coordinates,
//!   and averages their normalized heights per cell. Pure, no ECS required.
//! - **Mesh input**: [`mesh_positions`] and [`mesh_to_heightmap`] read vertex
//!   positions straight from a Bevy [`Mesh`](bevy::prelude::Mesh).
//! - **Terrain mesh**: [`HeightGridMeshBuilder`] turns a grid back into a
//!   renderable surface scaled to the terrain size.
//! - **Height textures**: [`heightmap_to_image`] and [`sync_heightmap_texture`]
//!   expose the grid to shaders as an `R32Float` texture.
//! - **Plugin**: [`MeshToTerrainPlugin`] converts entities carrying a
//!   [`MeshToTerrain`] request once their source mesh is loaded.
//!
//! # Feature Flags
//!
//! - `parallel`: Enables [`HeightmapBinner::bin_parallel`] on the rayon pool.
//! - `physics`: Enables [`collider::build_heightfield_collider`] for Avian3D.
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_mesh_terrain::{MeshToTerrain, MeshToTerrainPlugin, TerrainSettings};
//!
//! fn setup(mut commands: Commands, assets: Res<AssetServer>) {
//!     let source: Handle<Mesh> = assets.load("landscape.glb#Mesh0/Primitive0");
//!     commands.spawn((
//!         MeshToTerrain::new(source).with_settings(TerrainSettings {
//!             resolution: 257,
//!             ..default()
//!         }),
//!         MeshMaterial3d::<StandardMaterial>::default(),
//!     ));
//! }
//!
//! App::new()
//!     .add_plugins((DefaultPlugins, MeshToTerrainPlugin))
//!     .add_systems(Startup, setup)
//!     .run();
//! ```

pub mod binner;
pub mod bounds;
pub mod error;
pub mod grid;
pub mod mesher;
pub mod plugin;
pub mod settings;
pub mod source;
pub mod texture;

#[cfg(feature = "physics")]
pub mod collider;

pub use binner::{HeightmapBinner, RoundingMode, bin};
pub use bounds::{BoundingBox, DegenerateAxisPolicy, Normalizer};
pub use error::{Axis, BinError};
pub use grid::{CellAccumulator, HeightGrid};
pub use mesher::{HeightGridMeshBuilder, NormalMethod};
pub use plugin::{
    MeshToTerrain, MeshToTerrainPlugin, SourceStatus, TerrainHeights, convert_meshes_to_terrain,
};
pub use settings::{DEFAULT_RESOLUTION, DEFAULT_TERRAIN_SIZE, TerrainSettings};
pub use source::{mesh_positions, mesh_to_heightmap};
pub use texture::{HeightmapTexture, TerrainHeightmap, heightmap_to_image, sync_heightmap_texture};

#[cfg(feature = "physics")]
pub use collider::build_heightfield_collider;
