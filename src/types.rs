//! Strongly-typed numeric primitives for slide geometry (zero-cost newtypes).
//!
//! DrawingML measures every length in English Metric Units (EMU). Output
//! drawings are in CSS pixels. Conversions only happen through the named
//! constants below or through [`Scaler`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// English Metric Units per inch
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Typographic points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Output pixel resolution
pub const PIXELS_PER_INCH: f64 = 96.0;

/// English Metric Units per point
pub const EMU_PER_POINT: f64 = EMU_PER_INCH / POINTS_PER_INCH;

/// English Metric Units per output pixel
pub const EMU_PER_PIXEL: f64 = EMU_PER_INCH / PIXELS_PER_INCH;

/// Length in English Metric Units (the document's canonical unit)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Emu(pub f64);

impl Emu {
    pub const ZERO: Emu = Emu(0.0);

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Convert to typographic points
    #[inline]
    pub fn to_points(self) -> Points {
        Points(self.0 / EMU_PER_POINT)
    }

    /// Ratio of two lengths, `None` for a zero divisor (empty extents)
    #[inline]
    pub fn checked_div(self, rhs: Emu) -> Option<f64> {
        if rhs.0 == 0.0 {
            None
        } else {
            Some(self.0 / rhs.0)
        }
    }
}

/// Typographic points (line widths are declared in these)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Points(pub f64);

impl Points {
    #[inline]
    pub fn max(self, other: Points) -> Points {
        Points(self.0.max(other.0))
    }

    /// Convert to output pixels
    #[inline]
    pub fn to_px(self) -> Px {
        Px(self.0 * PIXELS_PER_INCH / POINTS_PER_INCH)
    }
}

/// Output pixels
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Px(pub f64);

/// Angle in degrees
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub f64);

impl Angle {
    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

/// Convert EMU → output pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaler {
    pub emu_per_px: f64,
}

impl Default for Scaler {
    fn default() -> Self {
        Scaler { emu_per_px: EMU_PER_PIXEL }
    }
}

impl Scaler {
    /// Convert a length to raw f64 pixels (convenience for SVG output).
    #[inline]
    pub fn px(&self, l: Emu) -> f64 {
        l.0 / self.emu_per_px
    }

    /// Pixel size of a slide
    pub fn size(&self, s: Size<Emu>) -> Size<Px> {
        Size { w: Px(self.px(s.w)), h: Px(self.px(s.h)) }
    }
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self { Point { x, y } }
}

/// 2D size
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size<T> {
    pub w: T,
    pub h: T,
}

impl<T> Size<T> {
    pub fn new(w: T, h: T) -> Self { Size { w, h } }
}

/// Convenient aliases
pub type PtEmu = Point<Emu>;
pub type SizeEmu = Size<Emu>;

pub fn pemu(x: f64, y: f64) -> PtEmu {
    Point::new(Emu(x), Emu(y))
}

/// 24-bit RGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Hex form used in SVG attributes (`#RRGGBB`, uppercase)
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channels scaled into `[0, 1]`
    pub fn to_unit(self) -> [f64; 3] {
        [self.r as f64 / 255.0, self.g as f64 / 255.0, self.b as f64 / 255.0]
    }
}

/// Error parsing a `RRGGBB` colour string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbParseError(pub String);

impl fmt::Display for RgbParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid RGB colour `{}` (expected RRGGBB)", self.0)
    }
}

impl std::error::Error for RgbParseError {}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(RgbParseError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| RgbParseError(s.to_string()))
        };
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = RgbParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> String {
        format!("{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
