//! Error types for heightmap binning and mesh extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A coordinate axis of the input point set.
///
/// `Y` is the vertical (height) axis; `X` and `Z` span the terrain grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in `x, y, z` order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Errors produced while turning vertex positions into a [`HeightGrid`].
///
/// [`HeightGrid`]: crate::HeightGrid
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BinError {
    /// Required input data (a mesh, its vertex positions) is absent.
    #[error("missing input: {0}")]
    MissingInput(String),
    /// A bounding-box axis has zero, negative, or non-finite extent.
    #[error("bounding box has degenerate extent on the {axis} axis")]
    DegenerateBounds { axis: Axis },
    /// The requested grid resolution is too small for the operation.
    #[error("heightmap resolution must be at least {minimum} (got {resolution})")]
    InvalidResolution { resolution: usize, minimum: usize },
}
