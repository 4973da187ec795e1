use serde::{Deserialize, Serialize};

use crate::layout::dimension::{DimensionPolicy, MAX_DIMENSION};
use crate::paint::color::Rgb;
use crate::paint::painter::{Painter, DEFAULT_LIGHTNESS_STEP};
use crate::EtchError;

/// Session tunables. Every field may be omitted from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtchConfig {
    /// Smallest accepted side length; requests below it are raised to it.
    pub min_dimension: u16,
    pub max_dimension: u16,
    /// Side length for fresh sessions and for unparseable resize input.
    pub default_dimension: u16,
    pub background: Rgb,
    pub pen: Rgb,
    /// Fractional change applied per lighten or darken stroke.
    pub lightness_step: f32,
    /// Seed for random pen colors; entropy when unset.
    pub seed: Option<u64>,
}

impl EtchConfig {
    pub fn dimension_policy(&self) -> Result<DimensionPolicy, EtchError> {
        DimensionPolicy::new(self.min_dimension, self.max_dimension, self.default_dimension)
    }

    pub fn painter(&self) -> Painter {
        Painter::new(self.pen, self.background, self.lightness_step, self.seed)
    }
}

impl Default for EtchConfig {
    fn default() -> Self {
        Self {
            min_dimension: 1,
            max_dimension: MAX_DIMENSION,
            default_dimension: 16,
            background: Rgb::WHITE,
            pen: Rgb::BLACK,
            lightness_step: DEFAULT_LIGHTNESS_STEP,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: EtchConfig =
            serde_json::from_str(r#"{ "background": "navy", "min_dimension": 0 }"#).unwrap();
        assert_eq!(config.background, Rgb::new(0, 0, 128));
        assert_eq!(config.min_dimension, 0);
        assert_eq!(config.default_dimension, 16);
        assert_eq!(config.dimension_policy().unwrap().normalize(0), 0);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_colors() {
        assert!(serde_json::from_str::<EtchConfig>(r#"{ "colour": "red" }"#).is_err());
        assert!(serde_json::from_str::<EtchConfig>(r#"{ "pen": "rgb(1, 2)" }"#).is_err());
    }

    #[test]
    fn inconsistent_dimensions_fail_policy() {
        let config = EtchConfig { default_dimension: 0, ..EtchConfig::default() };
        assert!(config.dimension_policy().is_err());
    }
}
