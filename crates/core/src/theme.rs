//! Color themes, loadable from JSON.
//!
//! ```json
//! {
//!   "primary":       { "fg": "#f2e6d9", "bg": "#362a1f" },
//!   "button_normal": { "fg": "#dcdcdc", "bg": "#1a3c5a" },
//!   "button_hover":  { "fg": "#ffffff", "bg": "#2a5a8a" },
//!   "button_press":  { "fg": "#000000", "bg": "#e0b000" },
//!   "panel":         { "fg": "#dcdcdc", "bg": "#202020" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{ColorPair, Rgb};

/// Named color pairs used by the stock widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(with = "pair")]
    pub primary: ColorPair,
    #[serde(with = "pair")]
    pub button_normal: ColorPair,
    #[serde(with = "pair")]
    pub button_hover: ColorPair,
    #[serde(with = "pair")]
    pub button_press: ColorPair,
    #[serde(with = "pair")]
    pub panel: ColorPair,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: ColorPair::new(Rgb::new(0xf2, 0xe6, 0xd9), Rgb::new(0x36, 0x2a, 0x1f)),
            button_normal: ColorPair::new(Rgb::new(0xdc, 0xdc, 0xdc), Rgb::new(0x1a, 0x3c, 0x5a)),
            button_hover: ColorPair::new(Rgb::WHITE, Rgb::new(0x2a, 0x5a, 0x8a)),
            button_press: ColorPair::new(Rgb::BLACK, Rgb::new(0xe0, 0xb0, 0x00)),
            panel: ColorPair::new(Rgb::new(0xdc, 0xdc, 0xdc), Rgb::new(0x20, 0x20, 0x20)),
        }
    }
}

impl Theme {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parse `#rrggbb` (the leading `#` is optional).
pub fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

pub fn to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

mod pair {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{parse_hex, to_hex};
    use crate::types::ColorPair;

    #[derive(Serialize, Deserialize)]
    struct Hex {
        fg: String,
        bg: String,
    }

    pub fn serialize<S: Serializer>(pair: &ColorPair, s: S) -> Result<S::Ok, S::Error> {
        Hex {
            fg: to_hex(pair.fg),
            bg: to_hex(pair.bg),
        }
        .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ColorPair, D::Error> {
        let hex = Hex::deserialize(d)?;
        let color = |s: &str| parse_hex(s).ok_or_else(|| D::Error::custom(format!("invalid color {s:?}")));
        Ok(ColorPair::new(color(&hex.fg)?, color(&hex.bg)?))
    }
}
