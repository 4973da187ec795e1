use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EtchError;

/// Cell color as three 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("silver", Rgb::new(192, 192, 192)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("white", Rgb::new(255, 255, 255)),
    ("maroon", Rgb::new(128, 0, 0)),
    ("red", Rgb::new(255, 0, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("fuchsia", Rgb::new(255, 0, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("green", Rgb::new(0, 128, 0)),
    ("lime", Rgb::new(0, 255, 0)),
    ("olive", Rgb::new(128, 128, 0)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("navy", Rgb::new(0, 0, 128)),
    ("blue", Rgb::new(0, 0, 255)),
    ("teal", Rgb::new(0, 128, 128)),
    ("aqua", Rgb::new(0, 255, 255)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("orange", Rgb::new(255, 165, 0)),
];

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lower 24 bits as `0xRRGGBB`.
    pub const fn from_u24(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    /// Scale every channel by `factor`, rounding and saturating at the channel bounds.
    pub fn scaled(self, factor: f32) -> Self {
        let scale = |channel: u8| (f32::from(channel) * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn parse_hex(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            3 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                let expand = |nibble: u32| (nibble as u8) * 0x11;
                Some(Self::new(expand(value >> 8), expand((value >> 4) & 0xf), expand(value & 0xf)))
            },
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_u24),
            _ => None,
        }
    }

    /// Parses the body of `rgb(r, g, b)` or `rgba(r, g, b, a)`; alpha is dropped.
    fn parse_functional(body: &str, with_alpha: bool) -> Option<Self> {
        let mut parts = body.split(',').map(str::trim);
        let mut channel = || parts.next()?.parse::<u8>().ok();
        let color = Self::new(channel()?, channel()?, channel()?);

        if with_alpha {
            parts.next()?.parse::<f32>().ok()?;
        }
        parts.next().is_none().then_some(color)
    }
}

impl FromStr for Rgb {
    type Err = EtchError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim().to_ascii_lowercase();
        let unparseable = || EtchError::UnparseableColor(input.to_owned());

        let parsed = if let Some(digits) = text.strip_prefix('#') {
            Self::parse_hex(digits)
        } else if let Some(body) = text.strip_prefix("rgba(").and_then(|s| s.strip_suffix(')')) {
            Self::parse_functional(body, true)
        } else if let Some(body) = text.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            Self::parse_functional(body, false)
        } else {
            NAMED.iter().find(|(name, _)| *name == text).map(|&(_, color)| color)
        };

        parsed.ok_or_else(unparseable)
    }
}

impl TryFrom<String> for Rgb {
    type Error = EtchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
