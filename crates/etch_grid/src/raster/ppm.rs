use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::{Rgb as ImageRgb, RgbImage};
use log::debug;

use crate::paint::color::Rgb;
use crate::EtchError;

pub const DEFAULT_EXPORT_NAME: &str = "image_file.ppm";

const MAX_CHANNEL_VALUE: u16 = 255;

/// Plain-text P3 rendering of a pixel sequence, one `r g b` line per pixel.
struct TextImage<'a> {
    pixels: &'a [Rgb],
    width: u32,
    height: u32,
    max_value: u16,
}

impl fmt::Display for TextImage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "P3")?;
        writeln!(f, "{} {}", self.width, self.height)?;
        writeln!(f, "{}", self.max_value)?;
        for pixel in self.pixels {
            writeln!(f, "{} {} {}", pixel.r, pixel.g, pixel.b)?;
        }
        Ok(())
    }
}

pub fn format_as_text_image(pixels: &[Rgb], width: u32, height: u32, max_value: u16) -> String {
    TextImage { pixels, width, height, max_value }.to_string()
}

pub fn write_text_image<W: Write>(
    writer: &mut W,
    pixels: &[Rgb],
    width: u32,
    height: u32,
    max_value: u16,
) -> io::Result<()> {
    write!(writer, "{}", TextImage { pixels, width, height, max_value })
}

/// Exported raster, row-major. Built once and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelImage {
    pub fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Result<Self, EtchError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(EtchError::ColorCountMismatch { expected, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn to_text(&self) -> String {
        format_as_text_image(&self.pixels, self.width, self.height, MAX_CHANNEL_VALUE)
    }

    pub fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_text_image(writer, &self.pixels, self.width, self.height, MAX_CHANNEL_VALUE)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            ImageRgb(self.pixels[y as usize * width + x as usize].channels())
        })
    }

    /// Write P3 text for `.ppm` paths; any other extension goes through `image`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EtchError> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let mut writer = BufWriter::new(File::create(path)?);
            self.write_text(&mut writer)?;
            writer.flush()?;
        } else {
            self.to_rgb_image().save(path)?;
        }

        debug!("saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}
