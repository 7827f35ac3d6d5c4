use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGB color with channels in `0..=1`, used as a vec3 uniform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a color from normalized channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub fn from_hex(hex: u32) -> Self {
        let r = (hex >> 16) & 0xff;
        let g = (hex >> 8) & 0xff;
        let b = hex & 0xff;
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Pack back into `0xRRGGBB`, clamping out-of-range channels.
    pub fn to_hex(self) -> u32 {
        fn to_u8(x: f32) -> u32 {
            if x.is_nan() {
                return 0;
            }
            (x.clamp(0.0, 1.0) * 255.0).round() as u32
        }
        (to_u8(self.r) << 16) | (to_u8(self.g) << 8) | to_u8(self.b)
    }

    /// Channels clamped into `0..=1` with NaN mapped to 0, as written into uniforms.
    pub fn to_uniform(self) -> [f32; 3] {
        fn clean(x: f32) -> f32 {
            if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
        }
        [clean(self.r), clean(self.g), clean(self.b)]
    }
}

impl From<u32> for Rgb {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Packed(u32),
            Hex(String),
            Obj { r: f32, g: f32, b: f32 },
            Arr(Vec<f32>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Packed(v) => Ok(Self::from_hex(v)),
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b } => Ok(Self::new(r, g, b)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b)),
                _ => Err(serde::de::Error::custom(
                    "rgb array must have len 3 ([r,g,b])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgb, String> {
    let s = s.trim();
    let s = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if s.len() != 6 {
        return Err("hex color must be #RRGGBB (case-insensitive)".to_owned());
    }
    u32::from_str_radix(s, 16)
        .map(Rgb::from_hex)
        .map_err(|_| format!("invalid hex color \"{s}\""))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
