use std::fmt;
use std::str::FromStr;

use crate::error::PaintError;

/// Share of the original color kept by [`Color::blend_with`], in fifths
const BLEND_KEEP_FIFTHS: u32 = 4;

/// Colors at or below this alpha never contribute to a blend
const VISIBILITY_THRESHOLD: f32 = 0.01;

/// An RGBA color with 8-bit channels and a floating point alpha in `[0, 1]`.
///
/// Every setter clamps its input, so out-of-range values coming from
/// computed blends are normal and never fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl Color {
    pub const TRANSPARENT: Self = Self { red: 0, green: 0, blue: 0, alpha: 0.0 };
    pub const BLACK: Self = Self { red: 0, green: 0, blue: 0, alpha: 1.0 };
    pub const WHITE: Self = Self { red: 255, green: 255, blue: 255, alpha: 1.0 };

    /// Clamped construction from arbitrary channel values
    pub fn from_rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red: clip(red),
            green: clip(green),
            blue: clip(blue),
            alpha: clip_alpha(alpha),
        }
    }

    pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: 1.0 }
    }

    /// From a straight (non-premultiplied) RGBA8 pixel
    pub fn from_data(data: [u8; 4]) -> Self {
        Self {
            red: data[0],
            green: data[1],
            blue: data[2],
            alpha: data[3] as f32 / 255.0,
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_red(&mut self, value: f32) {
        self.red = clip(value);
    }

    pub fn set_green(&mut self, value: f32) {
        self.green = clip(value);
    }

    pub fn set_blue(&mut self, value: f32) {
        self.blue = clip(value);
    }

    pub fn set_alpha(&mut self, value: f32) {
        self.alpha = clip_alpha(value);
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.set_alpha(alpha);
        self
    }

    /// Multiplies the RGB channels by `constant`
    pub fn scale(&mut self, constant: f32) {
        self.red = clip(self.red as f32 * constant);
        self.green = clip(self.green as f32 * constant);
        self.blue = clip(self.blue as f32 * constant);
    }

    /// Weighted average keeping 80% of this color, skipped when `other` is
    /// effectively invisible.
    pub fn blend_with(&mut self, other: &Color) {
        if other.alpha <= VISIBILITY_THRESHOLD {
            return;
        }
        let mix = |a: u8, b: u8| -> u8 {
            ((a as u32 * BLEND_KEEP_FIFTHS + b as u32 * (5 - BLEND_KEEP_FIFTHS)) / 5) as u8
        };
        self.red = mix(self.red, other.red);
        self.green = mix(self.green, other.green);
        self.blue = mix(self.blue, other.blue);
        self.alpha = clip_alpha(self.alpha * 0.8 + other.alpha * 0.2);
    }

    /// Moves each channel `amount` of the way towards white
    pub fn lighten(&mut self, amount: f32) {
        let up = |c: u8| c.saturating_add(clip((255 - c) as f32 * amount));
        self.red = up(self.red);
        self.green = up(self.green);
        self.blue = up(self.blue);
    }

    /// Moves each channel `amount` of the way towards black
    pub fn darken(&mut self, amount: f32) {
        let down = |c: u8| c.saturating_sub(clip(c as f32 * amount));
        self.red = down(self.red);
        self.green = down(self.green);
        self.blue = down(self.blue);
    }

    /// Sum of the RGB channels, used to decide whether a color counts as dark
    pub fn brightness_sum(&self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32
    }

    /// Straight RGBA8 representation
    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.red, self.green, self.blue, clip(self.alpha * 255.0)]
    }

    pub fn to_skia(&self) -> tiny_skia::Color {
        let [r, g, b, a] = self.to_rgba8();
        tiny_skia::Color::from_rgba8(r, g, b, a)
    }
}

/// Rounds and clamps a channel value to `[0, 255]`; NaN becomes 0
pub fn clip(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Clamps an alpha value to `[0, 1]`.
///
/// Values above 1 are read as 8-bit alpha and rescaled; NaN and negatives become 0.
pub fn clip_alpha(alpha: f32) -> f32 {
    if alpha.is_nan() || alpha < 0.0 {
        0.0
    } else if alpha > 1.0 {
        clip(alpha) as f32 / 255.0
    } else {
        alpha
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.red, self.green, self.blue, self.alpha)
    }
}

impl FromStr for Color {
    type Err = PaintError;

    /// Accepts `rgba(r,g,b,a)`, `rgb(r,g,b)` and `#rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaintError::InvalidColor(s.to_owned());
        let s = s.trim();

        if let Some(body) = s.strip_prefix("rgba(").and_then(|rest| rest.strip_suffix(')')) {
            let parts = parse_components(body).ok_or_else(invalid)?;
            if parts.len() != 4 {
                return Err(invalid());
            }
            Ok(Self::from_rgba(parts[0], parts[1], parts[2], parts[3]))
        } else if let Some(body) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
            let parts = parse_components(body).ok_or_else(invalid)?;
            if parts.len() != 3 {
                return Err(invalid());
            }
            Ok(Self::from_rgba(parts[0], parts[1], parts[2], 1.0))
        } else if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
            };
            Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
        } else {
            Err(invalid())
        }
    }
}

/// Plain decimal numbers only; no exponents, signs other than `-`, or `NaN`
fn parse_components(body: &str) -> Option<Vec<f32>> {
    body.split(',')
        .map(|part| {
            let part = part.trim();
            if !part.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-') {
                return None;
            }
            part.parse::<f32>().ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_bounds() {
        assert_eq!(clip(-20.0), 0);
        assert_eq!(clip(300.0), 255);
        assert_eq!(clip(f32::NAN), 0);
        assert_eq!(clip(12.6), 13);
        assert_eq!(clip_alpha(f32::NAN), 0.0);
        assert_eq!(clip_alpha(-0.5), 0.0);
        assert_eq!(clip_alpha(255.0), 1.0);
        assert_eq!(clip_alpha(1e9), 1.0);
        assert_eq!(clip_alpha(0.25), 0.25);
    }

    #[test]
    fn test_blend_ignores_invisible_colors() {
        let mut color = Color::from_rgb(100, 100, 100);
        color.blend_with(&Color::from_rgba(255.0, 0.0, 0.0, 0.005));
        assert_eq!(color, Color::from_rgb(100, 100, 100));

        color.blend_with(&Color::from_rgb(200, 0, 50));
        assert_eq!((color.red(), color.green(), color.blue()), (120, 80, 90));
        assert!((color.alpha() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lighten_darken_scale() {
        let mut color = Color::from_rgb(100, 200, 0);
        color.lighten(0.5);
        assert_eq!((color.red(), color.green(), color.blue()), (178, 228, 128));
        color.darken(2.0);
        assert_eq!((color.red(), color.green(), color.blue()), (0, 0, 0));

        let mut color = Color::from_rgb(100, 200, 50);
        color.scale(2.0);
        assert_eq!((color.red(), color.green(), color.blue()), (200, 255, 100));
    }
}
