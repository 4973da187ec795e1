use serde::{Deserialize, Serialize};

use crate::EtchError;

/// Row-major index of a cell, `x + dimension * y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(pub usize);

impl CellIndex {
    pub fn from_coords(x: u16, y: u16, dimension: u16) -> Option<Self> {
        if x >= dimension || y >= dimension {
            return None;
        }
        Some(Self(usize::from(x) + usize::from(dimension) * usize::from(y)))
    }

    /// Column and row of this index within a grid of the given side length.
    pub fn coords(self, dimension: u16) -> (u16, u16) {
        let dimension = usize::from(dimension.max(1));
        ((self.0 % dimension) as u16, (self.0 / dimension) as u16)
    }
}

/// Measured pixel layout of the grid currently on screen.
///
/// The dimension travels with the cell sizes: a geometry is only ever replaced
/// as a whole, so resolution never mixes sizes from one grid with the side
/// length of another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub cell_width: f32,
    pub cell_height: f32,
    pub dimension: u16,
    /// Distance from the viewport top to the top edge of the grid.
    pub vertical_offset: f32,
}

impl GridGeometry {
    pub fn new(
        cell_width: f32,
        cell_height: f32,
        dimension: u16,
        vertical_offset: f32,
    ) -> Result<Self, EtchError> {
        if !(cell_width.is_finite() && cell_width > 0.0) {
            return Err(EtchError::InvalidGeometry("cell width must be positive"));
        }
        if !(cell_height.is_finite() && cell_height > 0.0) {
            return Err(EtchError::InvalidGeometry("cell height must be positive"));
        }
        if !vertical_offset.is_finite() {
            return Err(EtchError::InvalidGeometry("vertical offset must be finite"));
        }

        Ok(Self { cell_width, cell_height, dimension, vertical_offset })
    }

    pub fn cell_count(&self) -> usize {
        usize::from(self.dimension) * usize::from(self.dimension)
    }

    pub fn resolve(&self, client_x: f32, client_y: f32) -> Option<CellIndex> {
        resolve_cell(client_x, client_y, self)
    }
}

/// Map a viewport-relative pointer position to the cell underneath it.
///
/// Positions left of, above, right of or below the grid yield `None`.
pub fn resolve_cell(client_x: f32, client_y: f32, geometry: &GridGeometry) -> Option<CellIndex> {
    let x = (client_x / geometry.cell_width).floor();
    let y = ((client_y - geometry.vertical_offset) / geometry.cell_height).floor();
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    let dimension = f32::from(geometry.dimension);
    if x < 0.0 || y < 0.0 || x >= dimension || y >= dimension {
        return None;
    }

    CellIndex::from_coords(x as u16, y as u16, geometry.dimension)
}

/// Window the grid is laid out in, plus the widgets stacked above it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub header_heights: Vec<f32>,
}

impl Viewport {
    pub fn new(width: f32, height: f32, header_heights: Vec<f32>) -> Self {
        Self { width, height, header_heights }
    }

    pub fn vertical_offset(&self) -> f32 {
        self.header_heights.iter().sum()
    }

    /// Side length in pixels of the square grid that fits below the headers.
    pub fn grid_side(&self) -> f32 {
        self.width.min(self.height - self.vertical_offset())
    }

    /// Measure the cells of a square grid with `dimension` cells per side.
    ///
    /// An empty grid still gets a positive cell size so the geometry stays valid;
    /// nothing resolves against it.
    pub fn geometry(&self, dimension: u16) -> Result<GridGeometry, EtchError> {
        let side = self.grid_side();
        if !(side.is_finite() && side > 0.0) {
            return Err(EtchError::InvalidGeometry("viewport leaves no room for the grid"));
        }

        let cell = side / f32::from(dimension.max(1));
        GridGeometry::new(cell, cell, dimension, self.vertical_offset())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 900.0, header_heights: vec![100.0] }
    }
}
