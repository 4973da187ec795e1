use crate::layout::geometry::CellIndex;

use super::color::Rgb;

/// Live cell state of the sketch, row-major. `None` marks a cell that was never painted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    dimension: u16,
    cells: Vec<Option<Rgb>>,
}

impl CellGrid {
    pub fn blank(dimension: u16) -> Self {
        let len = usize::from(dimension) * usize::from(dimension);
        Self { dimension, cells: vec![None; len] }
    }

    pub fn filled(dimension: u16, color: Rgb) -> Self {
        let len = usize::from(dimension) * usize::from(dimension);
        Self { dimension, cells: vec![Some(color); len] }
    }

    pub fn dimension(&self) -> u16 {
        self.dimension
    }

    pub fn get(&self, index: CellIndex) -> Option<Rgb> {
        self.cells.get(index.0).copied().flatten()
    }

    /// Paint a cell. Returns `false` when the index lies outside the grid.
    pub fn set(&mut self, index: CellIndex, color: Rgb) -> bool {
        match self.cells.get_mut(index.0) {
            Some(cell) => {
                *cell = Some(color);
                true
            },
            None => false,
        }
    }

    pub fn clear_all(&mut self, background: Rgb) {
        self.cells.fill(Some(background));
    }

    /// Recolor unpainted cells and cells still showing the old background.
    pub fn replace_background(&mut self, old: Rgb, new: Rgb) -> usize {
        let mut replaced = 0;
        for cell in &mut self.cells {
            if cell.map_or(true, |color| color == old) {
                *cell = Some(new);
                replaced += 1;
            }
        }
        replaced
    }

    /// One color per cell, row-major, with unpainted cells reported as white.
    pub fn logical_colors(&self) -> Vec<Rgb> {
        self.cells.iter().map(|cell| cell.unwrap_or(Rgb::WHITE)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<Rgb>]> + '_ {
        self.cells.chunks(usize::from(self.dimension).max(1))
    }
}
