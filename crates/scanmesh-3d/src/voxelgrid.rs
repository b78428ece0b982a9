use glam::DVec3;
use ndarray::Array3;

/// A dense grid of occupancy values over an axis-aligned region.
///
/// Cell `[0, 0, 0]` has its minimum corner at `origin`; all cells are cubes
/// with edge length `voxel_size`.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    origin: DVec3,
    voxel_size: f64,
    data: Array3<f32>,
}

impl VoxelGrid {
    /// Create a grid of `dims` cells filled with zero.
    ///
    /// PRECONDITION: `voxel_size` is finite and positive.
    pub fn new(dims: [usize; 3], origin: DVec3, voxel_size: f64) -> Self {
        debug_assert!(voxel_size.is_finite() && voxel_size > 0.0);
        Self {
            origin,
            voxel_size,
            data: Array3::zeros((dims[0], dims[1], dims[2])),
        }
    }

    /// Get the number of cells along each axis.
    pub fn dims(&self) -> [usize; 3] {
        let (nx, ny, nz) = self.data.dim();
        [nx, ny, nz]
    }

    /// Get the world position of the minimum corner of cell `[0, 0, 0]`.
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the edge length of a cell.
    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Read the value of a cell, `None` if out of range.
    pub fn get(&self, cell: [usize; 3]) -> Option<f32> {
        self.data.get(cell).copied()
    }

    /// Write the value of a cell. Out of range cells are ignored.
    pub fn set(&mut self, cell: [usize; 3], value: f32) {
        if let Some(v) = self.data.get_mut(cell) {
            *v = value;
        }
    }

    /// Find the cell containing a world position, `None` if outside the grid.
    pub fn cell_of(&self, position: DVec3) -> Option<[usize; 3]> {
        let local = ((position - self.origin) / self.voxel_size).floor();
        if local.cmplt(DVec3::ZERO).any() {
            return None;
        }
        let cell = [local.x as usize, local.y as usize, local.z as usize];
        let dims = self.dims();
        (cell[0] < dims[0] && cell[1] < dims[1] && cell[2] < dims[2]).then_some(cell)
    }

    /// Get the world position of the minimum corner of a cell.
    pub fn cell_origin(&self, cell: [usize; 3]) -> DVec3 {
        self.origin
            + DVec3::new(cell[0] as f64, cell[1] as f64, cell[2] as f64) * self.voxel_size
    }

    /// Count the cells holding a value above zero.
    pub fn occupied_count(&self) -> usize {
        self.iter().filter(|&(_, v)| v > 0.0).count()
    }

    /// Iterate over all cells and their values in x-major order.
    pub fn iter(&self) -> impl Iterator<Item = ([usize; 3], f32)> + '_ {
        self.data
            .indexed_iter()
            .map(|((i, j, k), &v)| ([i, j, k], v))
    }
}
