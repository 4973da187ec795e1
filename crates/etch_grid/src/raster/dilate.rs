use std::iter;

use crate::layout::geometry::GridGeometry;
use crate::EtchError;

/// Upper bound on exported pixels, keeping the pixel buffer within a few hundred MiB.
pub const MAX_IMAGE_PIXELS: usize = 1 << 26;

/// Whole-pixel size of one exported cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelScale {
    pub width: u32,
    pub height: u32,
}

impl PixelScale {
    /// Truncate measured cell sizes, which are often fractional after layout.
    pub fn from_geometry(geometry: &GridGeometry) -> Self {
        Self {
            width: geometry.cell_width.floor() as u32,
            height: geometry.cell_height.floor() as u32,
        }
    }

    /// Image width and height for a grid of `dimension` cells per side, or `None` when
    /// the image would not fit in [`MAX_IMAGE_PIXELS`].
    pub fn image_size(&self, dimension: u16) -> Option<(u32, u32)> {
        let dimension = u32::from(dimension);
        let width = dimension.checked_mul(self.width)?;
        let height = dimension.checked_mul(self.height)?;
        let pixels = (width as usize).checked_mul(height as usize)?;
        (pixels <= MAX_IMAGE_PIXELS).then_some((width, height))
    }
}

/// Nearest-neighbor upscale of a row-major `dimension x dimension` color grid.
///
/// Every color becomes a `cell_width x cell_height` block; the result is the
/// row-major pixel sequence of a `dimension * cell_width` wide image.
pub fn dilate<T: Clone>(
    colors: &[T],
    dimension: usize,
    cell_width: usize,
    cell_height: usize,
) -> Result<Vec<T>, EtchError> {
    let expected = dimension.checked_mul(dimension).ok_or(EtchError::ImageTooLarge)?;
    if colors.len() != expected {
        return Err(EtchError::ColorCountMismatch { expected, actual: colors.len() });
    }

    let total = expected
        .checked_mul(cell_width)
        .and_then(|pixels| pixels.checked_mul(cell_height))
        .filter(|&pixels| pixels <= MAX_IMAGE_PIXELS)
        .ok_or(EtchError::ImageTooLarge)?;

    let mut pixels = Vec::with_capacity(total);
    if dimension == 0 || cell_width == 0 || cell_height == 0 {
        return Ok(pixels);
    }

    let row_len = dimension * cell_width;
    for row in colors.chunks(dimension) {
        let start = pixels.len();
        for color in row {
            pixels.extend(iter::repeat(color).take(cell_width).cloned());
        }

        for _ in 1..cell_height {
            pixels.extend_from_within(start..start + row_len);
        }
    }

    Ok(pixels)
}
