//! Square height grids and the accumulator that fills them.

/// A `resolution × resolution` grid of averaged heights.
///
/// Stored row-major: the row index follows the Z axis and the column index
/// follows the X axis, so `data[row * resolution + col]` is the cell covering
/// planar position `(x = col, z = row)`.
///
/// Produced by [`CellAccumulator::finish`] or built directly with
/// [`from_fn`](Self::from_fn); read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    resolution: usize,
    data: Vec<f32>,
}

impl HeightGrid {
    /// Creates a grid with every cell at height `0`.
    pub fn flat(resolution: usize) -> Self {
        Self {
            resolution,
            data: vec![0.0; resolution * resolution],
        }
    }

    /// Creates a grid whose cell (`row`, `col`) holds `height(row, col)`.
    pub fn from_fn(resolution: usize, mut height: impl FnMut(usize, usize) -> f32) -> Self {
        let data = (0..resolution)
            .flat_map(|row| (0..resolution).map(move |col| (row, col)))
            .map(|(row, col)| height(row, col))
            .collect();
        Self { resolution, data }
    }

    /// Number of cells along each side.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Height of the cell at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= resolution`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.resolution && col < self.resolution,
            "cell ({row}, {col}) out of range for resolution {}",
            self.resolution
        );
        self.data[row * self.resolution + col]
    }

    /// Row-major view of every cell.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Iterates over the grid one row (constant Z) at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // `max(1)` keeps `chunks_exact` valid for an empty grid.
        self.data.chunks_exact(self.resolution.max(1))
    }

    /// Copies the grid into nested vectors indexed `[row][col]`.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        self.rows().map(<[f32]>::to_vec).collect()
    }

    /// Lowest cell height, or `None` for a zero-resolution grid.
    pub fn min_height(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }

    /// Highest cell height, or `None` for a zero-resolution grid.
    pub fn max_height(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }
}

/// Running per-cell height sums and contribution counts.
///
/// Lives only for the accumulation phase: [`finish`](Self::finish) consumes it
/// and returns the averaged [`HeightGrid`].
#[derive(Debug, Clone)]
pub struct CellAccumulator {
    resolution: usize,
    sums: Vec<f64>,
    counts: Vec<u64>,
}

impl CellAccumulator {
    pub fn new(resolution: usize) -> Self {
        let cells = resolution * resolution;
        Self {
            resolution,
            sums: vec![0.0; cells],
            counts: vec![0; cells],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Adds one height sample to the cell at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= resolution`.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, height: f32) {
        assert!(
            row < self.resolution && col < self.resolution,
            "cell ({row}, {col}) out of range for resolution {}",
            self.resolution
        );
        let index = row * self.resolution + col;
        self.sums[index] += f64::from(height);
        self.counts[index] += 1;
    }

    /// Number of samples accumulated in the cell at (`row`, `col`).
    pub fn count(&self, row: usize, col: usize) -> u64 {
        self.counts[row * self.resolution + col]
    }

    /// Total number of samples across all cells.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Folds another partial accumulation of the same resolution into this one.
    ///
    /// # Panics
    ///
    /// Panics if the resolutions differ.
    pub fn merge(mut self, other: CellAccumulator) -> Self {
        assert_eq!(
            self.resolution, other.resolution,
            "cannot merge accumulators of different resolution"
        );
        for (sum, other_sum) in self.sums.iter_mut().zip(&other.sums) {
            *sum += other_sum;
        }
        for (count, other_count) in self.counts.iter_mut().zip(&other.counts) {
            *count += other_count;
        }
        self
    }

    /// Averages every populated cell. Cells without samples stay at `0`.
    pub fn finish(self) -> HeightGrid {
        let data = self
            .sums
            .iter()
            .zip(&self.counts)
            .map(|(&sum, &count)| {
                if count > 0 {
                    (sum / count as f64) as f32
                } else {
                    0.0
                }
            })
            .collect();

        HeightGrid {
            resolution: self.resolution,
            data,
        }
    }
}
