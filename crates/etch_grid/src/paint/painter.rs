use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::layout::geometry::CellIndex;

use super::canvas::CellGrid;
use super::color::Rgb;

pub const DEFAULT_LIGHTNESS_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintMode {
    /// Paint with the pen color (or a fresh random color when psychedelic).
    Pen,
    Lighten,
    Darken,
}

/// Where the pen color currently comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PenSource {
    Custom,
    Background,
    Fixed,
}

/// Pen state: which color goes down and how existing colors are adjusted.
#[derive(Debug)]
pub struct Painter {
    pen: Rgb,
    background: Rgb,
    custom_foreground: Rgb,
    source: PenSource,
    mode: PaintMode,
    psychedelic: bool,
    lightness_step: f32,
    rng: StdRng,
}

impl Painter {
    pub fn new(pen: Rgb, background: Rgb, lightness_step: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            pen,
            background,
            custom_foreground: pen,
            source: PenSource::Custom,
            mode: PaintMode::Pen,
            psychedelic: false,
            lightness_step: lightness_step.clamp(0.0, 1.0),
            rng,
        }
    }

    pub fn pen(&self) -> Rgb {
        self.pen
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn custom_foreground(&self) -> Rgb {
        self.custom_foreground
    }

    pub fn mode(&self) -> PaintMode {
        self.mode
    }

    pub fn is_psychedelic(&self) -> bool {
        self.psychedelic
    }

    /// Back to plain pen painting; every control selection starts here.
    pub fn reset_mode(&mut self) {
        self.mode = PaintMode::Pen;
        self.psychedelic = false;
    }

    pub fn use_background(&mut self) {
        self.source = PenSource::Background;
        self.pen = self.background;
    }

    pub fn use_custom_foreground(&mut self) {
        self.source = PenSource::Custom;
        self.pen = self.custom_foreground;
    }

    pub fn set_custom_foreground(&mut self, color: Rgb) {
        self.custom_foreground = color;
        if self.source == PenSource::Custom {
            self.pen = color;
        }
    }

    /// Swap the background color, returning the previous one.
    pub fn set_background(&mut self, color: Rgb) -> Rgb {
        let previous = std::mem::replace(&mut self.background, color);
        if self.source == PenSource::Background {
            self.pen = color;
        }
        previous
    }

    /// Fix the pen to one random color.
    pub fn lucky_pick(&mut self) -> Rgb {
        let color = self.random_color();
        self.source = PenSource::Fixed;
        self.pen = color;
        color
    }

    /// Paint every cell with a fresh random color.
    pub fn psychedelic(&mut self) {
        self.mode = PaintMode::Pen;
        self.psychedelic = true;
    }

    pub fn lighten_mode(&mut self) {
        self.mode = PaintMode::Lighten;
    }

    pub fn darken_mode(&mut self) {
        self.mode = PaintMode::Darken;
    }

    /// Apply the current mode to one cell, returning the color it ends up with.
    pub fn paint(&mut self, grid: &mut CellGrid, cell: CellIndex) -> Option<Rgb> {
        let current = grid.get(cell).unwrap_or(Rgb::WHITE);
        let color = match self.mode {
            PaintMode::Pen if self.psychedelic => self.random_color(),
            PaintMode::Pen => self.pen,
            PaintMode::Lighten => self.lighten(current),
            PaintMode::Darken => self.darken(current),
        };

        if !grid.set(cell, color) {
            return None;
        }
        trace!("painted cell {} with {color}", cell.0);
        Some(color)
    }

    pub fn lighten(&self, color: Rgb) -> Rgb {
        // Scaling is multiplicative, so black needs a nonzero starting point.
        let color = if color.is_black() && self.lightness_step > 0.0 {
            let seed = (1.0 / self.lightness_step).round().min(255.0) as u8;
            Rgb::new(seed, seed, seed)
        } else {
            color
        };
        color.scaled(1.0 + self.lightness_step)
    }

    pub fn darken(&self, color: Rgb) -> Rgb {
        color.scaled(1.0 - self.lightness_step)
    }

    fn random_color(&mut self) -> Rgb {
        Rgb::from_u24(self.rng.gen_range(0..=0x00ff_ffff))
    }
}

impl Default for Painter {
    fn default() -> Self {
        Self::new(Rgb::BLACK, Rgb::WHITE, DEFAULT_LIGHTNESS_STEP, None)
    }
}
