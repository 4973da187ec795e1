use log::debug;

use crate::EtchError;

pub const MAX_DIMENSION: u16 = 100;

/// Keep a requested side length at or below [`MAX_DIMENSION`].
pub fn clamp_dimension(requested: u16) -> u16 {
    requested.min(MAX_DIMENSION)
}

/// Normalizes requested grid side lengths. `max` never exceeds [`MAX_DIMENSION`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DimensionPolicy {
    min: u16,
    max: u16,
    default: u16,
}

impl DimensionPolicy {
    pub fn new(min: u16, max: u16, default: u16) -> Result<Self, EtchError> {
        if max > MAX_DIMENSION || min > max || default < min || default > max {
            return Err(EtchError::InvalidDimensionPolicy { min, max, default });
        }
        Ok(Self { min, max, default })
    }

    pub fn min(&self) -> u16 {
        self.min
    }

    pub fn max(&self) -> u16 {
        self.max
    }

    pub fn default_dimension(&self) -> u16 {
        self.default
    }

    /// Clamp into `[min, max]`. A `min` of zero lets empty grids through.
    pub fn normalize(&self, requested: i64) -> u16 {
        requested.clamp(i64::from(self.min), i64::from(self.max)) as u16
    }

    /// Parse free-form input by its leading integer, so `"12.5"` and `"12px"` both
    /// request 12. Input without leading digits falls back to the default.
    pub fn parse(&self, input: &str) -> u16 {
        let text = input.trim_start();
        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            debug!("dimension input {input:?} has no leading integer, using {}", self.default);
            return self.default;
        }

        let sign = text.len() - unsigned.len();
        match text[..sign + digits].parse::<i64>() {
            Ok(requested) => self.normalize(requested),
            // Too many digits for an i64, clamp by sign.
            Err(_) if text.starts_with('-') => self.min,
            Err(_) => self.max,
        }
    }
}

impl Default for DimensionPolicy {
    fn default() -> Self {
        Self { min: 1, max: MAX_DIMENSION, default: 16 }
    }
}
