//! Terrain mesh generation from `HeightGrid` data.
//!
//! Converts a [`HeightGrid`] into a Bevy [`Mesh`] with:
//! - `TriangleList` topology
//! - Smooth per-vertex normals (area-weighted or Sobel, see [`NormalMethod`])
//! - Tiling UV coordinates (world-space scaled by `uv_tile_size`)

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::grid::HeightGrid;
use crate::settings::DEFAULT_TERRAIN_SIZE;

/// How per-vertex normals are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalMethod {
    /// Area-weighted average of the adjacent triangle normals.
    #[default]
    AreaWeighted,
    /// 3×3 Sobel gradient of the height field, edges clamped.
    Sobel,
}

/// Converts a [`HeightGrid`] into a Bevy [`Mesh`].
///
/// The mesh covers world space `[0, size.x] × [0, size.z]` in the XZ plane.
/// Grid columns run along X and rows along Z; a cell height `h` becomes
/// `h * size.y` on the Y axis, so a grid normalized to `[0, 1]` fills the
/// terrain's full vertical extent.
///
/// # UV Mapping
///
/// UVs are world-space coordinates divided by `uv_tile_size`:
/// `u = world_x / uv_tile_size`, `v = world_z / uv_tile_size`.
///
/// # Example
///
/// ```ignore
/// use bevy::math::Vec3;
/// use bevy_mesh_terrain::{HeightGrid, HeightGridMeshBuilder};
///
/// let grid = HeightGrid::flat(64);
/// let mesh = HeightGridMeshBuilder::new()
///     .with_terrain_size(Vec3::new(64.0, 10.0, 64.0))
///     .with_uv_tile_size(4.0)
///     .build(&grid);
/// ```
pub struct HeightGridMeshBuilder {
    terrain_size: Vec3,
    uv_tile_size: f32,
    normal_method: NormalMethod,
}

impl Default for HeightGridMeshBuilder {
    fn default() -> Self {
        Self {
            terrain_size: DEFAULT_TERRAIN_SIZE,
            uv_tile_size: 1.0,
            normal_method: NormalMethod::default(),
        }
    }
}

impl HeightGridMeshBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the world extent of the terrain.
    pub fn with_terrain_size(mut self, size: Vec3) -> Self {
        self.terrain_size = size;
        self
    }

    /// Sets the world-space size of one UV tile.
    ///
    /// Clamped to a positive minimum to avoid division by zero.
    pub fn with_uv_tile_size(mut self, size: f32) -> Self {
        self.uv_tile_size = size.max(f32::EPSILON);
        self
    }

    pub fn with_normal_method(mut self, method: NormalMethod) -> Self {
        self.normal_method = method;
        self
    }

    /// Builds the mesh from the given grid.
    ///
    /// Produces a `TriangleList` mesh with positions, normals, and UV_0.
    ///
    /// # Panics
    ///
    /// Panics if the grid resolution is less than 2, as at least one quad is
    /// required to produce valid triangle geometry.
    pub fn build(&self, grid: &HeightGrid) -> Mesh {
        let n = grid.resolution();
        assert!(
            n >= 2,
            "HeightGrid must be at least 2×2 to generate a mesh (got {n}×{n})"
        );

        let step_x = self.terrain_size.x / (n - 1) as f32;
        let step_z = self.terrain_size.z / (n - 1) as f32;

        let vertex_count = n * n;
        let mut positions: Vec<[f32; 3]> = Vec::with_capacity(vertex_count);
        let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(vertex_count);

        for row in 0..n {
            for col in 0..n {
                let world_x = col as f32 * step_x;
                let world_z = row as f32 * step_z;
                let world_y = grid.get(row, col) * self.terrain_size.y;

                positions.push([world_x, world_y, world_z]);
                uvs.push([world_x / self.uv_tile_size, world_z / self.uv_tile_size]);
            }
        }

        // CCW triangles, normal +Y on flat terrain:
        //   tl──tr
        //   │╲  │     Triangle 1: tl, bl, tr
        //   │ ╲ │     Triangle 2: tr, bl, br
        //   bl──br
        let quad_count = (n - 1) * (n - 1);
        let mut indices: Vec<u32> = Vec::with_capacity(quad_count * 6);

        for row in 0..(n - 1) {
            for col in 0..(n - 1) {
                let tl = (row * n + col) as u32;
                let tr = (row * n + col + 1) as u32;
                let bl = ((row + 1) * n + col) as u32;
                let br = ((row + 1) * n + col + 1) as u32;

                indices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
            }
        }

        let normals = match self.normal_method {
            NormalMethod::AreaWeighted => area_weighted_normals(&positions, &indices),
            NormalMethod::Sobel => sobel_normals(grid, self.terrain_size.y, step_x, step_z),
        };

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }
}

/// Accumulates each triangle's unnormalized face normal (length proportional
/// to its area) at its three vertices, then normalizes.
fn area_weighted_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals: Vec<Vec3> = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let p0 = Vec3::from(positions[i0]);
        let p1 = Vec3::from(positions[i1]);
        let p2 = Vec3::from(positions[i2]);
        let face_normal = (p1 - p0).cross(p2 - p0);
        normals[i0] += face_normal;
        normals[i1] += face_normal;
        normals[i2] += face_normal;
    }

    normals.into_iter().map(unit_or_up).collect()
}

fn sobel_normals(grid: &HeightGrid, height_scale: f32, step_x: f32, step_z: f32) -> Vec<[f32; 3]> {
    let n = grid.resolution();
    let last = (n - 1) as isize;
    let h = |row: isize, col: isize| {
        grid.get(row.clamp(0, last) as usize, col.clamp(0, last) as usize) * height_scale
    };

    let mut normals = Vec::with_capacity(n * n);
    for row in 0..n as isize {
        for col in 0..n as isize {
            let gx = (h(row - 1, col + 1) + 2.0 * h(row, col + 1) + h(row + 1, col + 1))
                - (h(row - 1, col - 1) + 2.0 * h(row, col - 1) + h(row + 1, col - 1));
            let gz = (h(row + 1, col - 1) + 2.0 * h(row + 1, col) + h(row + 1, col + 1))
                - (h(row - 1, col - 1) + 2.0 * h(row - 1, col) + h(row - 1, col + 1));

            let dh_dx = gx / (8.0 * step_x);
            let dh_dz = gz / (8.0 * step_z);
            normals.push(unit_or_up(Vec3::new(-dh_dx, 1.0, -dh_dz)));
        }
    }
    normals
}

fn unit_or_up(n: Vec3) -> [f32; 3] {
    let len = n.length();
    // Degenerate vertex (zero contributions or zero-size terrain): default to +Y.
    if len > f32::EPSILON && len.is_finite() {
        (n / len).into()
    } else {
        [0.0, 1.0, 0.0]
    }
}
