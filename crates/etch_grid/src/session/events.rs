use serde::{Deserialize, Serialize};

/// Discrete input the sketch reacts to. Coordinates are viewport-relative pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SketchEvent {
    PointerDown {
        x: f32,
        y: f32,
        #[serde(default)]
        button: u8,
    },
    /// `buttons` is the bitmask of held buttons; zero means the stroke was released
    /// somewhere the session never saw a pointer-up.
    PointerMove {
        x: f32,
        y: f32,
        #[serde(default = "primary_held")]
        buttons: u16,
    },
    PointerUp,
    TouchStart {
        x: f32,
        y: f32,
    },
    TouchMove {
        x: f32,
        y: f32,
    },
    TouchEnd,
    Control(ControlChange),
    OrientationChange {
        width: f32,
        height: f32,
    },
}

fn primary_held() -> u16 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "kebab-case")]
pub enum ControlChange {
    Resize { dimension: ResizeRequest },
    /// Pointer released over the resize slider.
    Slider { x: f32 },
    /// Custom foreground picker changed. Colors stay textual until the session
    /// normalizes them.
    PenColor { color: String },
    Background { color: String },
    UseBackground,
    UseCustom,
    LuckyPick,
    Psychedelic,
    Lighten,
    Darken,
    ClearAll,
}

/// Requested side length, either already numeric or raw text from an input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResizeRequest {
    Exact(i64),
    Text(String),
}

impl From<i64> for ResizeRequest {
    fn from(value: i64) -> Self {
        Self::Exact(value)
    }
}

impl From<&str> for ResizeRequest {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}
