mod config;
mod layout;
mod paint;
mod raster;
mod session;

pub use config::EtchConfig;
pub use layout::{
    dimension::{clamp_dimension, DimensionPolicy, MAX_DIMENSION},
    geometry::{resolve_cell, CellIndex, GridGeometry, Viewport},
    slider::Slider,
};
pub use paint::{
    canvas::CellGrid,
    color::Rgb,
    painter::{PaintMode, Painter},
};
pub use raster::{
    dilate::{dilate, PixelScale, MAX_IMAGE_PIXELS},
    ppm::{format_as_text_image, write_text_image, PixelImage, DEFAULT_EXPORT_NAME},
};
pub use session::{
    events::{ControlChange, ResizeRequest, SketchEvent},
    sketch::SketchSession,
};

use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum EtchError {
    #[error("unparseable color: {0:?}")]
    UnparseableColor(String),
    #[error("invalid grid geometry: {0}")]
    InvalidGeometry(&'static str),
    #[error("invalid dimension policy (min {min}, max {max}, default {default})")]
    InvalidDimensionPolicy { min: u16, max: u16, default: u16 },
    #[error("expected {expected} colors for the grid, got {actual}")]
    ColorCountMismatch { expected: usize, actual: usize },
    #[error("geometry was measured for a {geometry}x{geometry} grid, canvas is {grid}x{grid}")]
    StaleGeometry { geometry: u16, grid: u16 },
    #[error("exported image would have no pixels")]
    EmptyImage,
    #[error("exported image would exceed {} pixels", MAX_IMAGE_PIXELS)]
    ImageTooLarge,
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Rasterize the current canvas into a pixel image, one `cell_width x cell_height`
/// block per cell.
pub fn export_grid(grid: &CellGrid, geometry: &GridGeometry) -> Result<PixelImage, EtchError> {
    if grid.dimension() != geometry.dimension {
        return Err(EtchError::StaleGeometry {
            geometry: geometry.dimension,
            grid: grid.dimension(),
        });
    }

    let scale = PixelScale::from_geometry(geometry);
    let dimension = usize::from(grid.dimension());
    let (width, height) = scale.image_size(grid.dimension()).ok_or(EtchError::ImageTooLarge)?;
    if width == 0 || height == 0 {
        return Err(EtchError::EmptyImage);
    }

    let colors = grid.logical_colors();
    let pixels = dilate(&colors, dimension, scale.width as usize, scale.height as usize)?;
    debug!("exported {}x{} grid as {width}x{height} pixels", dimension, dimension);

    PixelImage::new(width, height, pixels)
}
