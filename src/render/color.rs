//! Colour resolution.
//!
//! A [`ColorMap`] is built per slide from the shared theme and the slide
//! master's scheme-key aliases, then resolves document colour references to
//! concrete RGB. Modulation is applied in HLS space, then tint, then shade.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::model::{ColorReference, ColorValue};
use crate::theme::Theme;
use crate::types::Rgb;

/// A colour reference that cannot be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("theme has no colour `{0}`")]
    MissingSlot(String),
    #[error("unsupported colour kind `{0}`")]
    Unsupported(String),
}

/// Scheme slot → colour table for one slide
#[derive(Debug, Clone)]
pub struct ColorMap {
    colors: HashMap<String, Rgb>,
}

impl ColorMap {
    /// Each alias `key → slot` rebinds `key` to the theme's colour for `slot`.
    pub fn new(theme: &Theme, aliases: &BTreeMap<String, String>) -> Self {
        let mut colors: HashMap<String, Rgb> = theme
            .iter()
            .map(|(slot, rgb)| (slot.name().to_string(), rgb))
            .collect();
        for (key, slot) in aliases {
            if key == slot {
                continue;
            }
            match theme.get(slot) {
                Some(rgb) => {
                    colors.insert(key.clone(), rgb);
                }
                None => {
                    colors.remove(key);
                }
            }
        }
        Self { colors }
    }

    pub fn lookup(&self, slot: &str) -> Result<Rgb, ColorError> {
        self.colors
            .get(slot)
            .copied()
            .ok_or_else(|| ColorError::MissingSlot(slot.to_string()))
    }

    /// Resolve a colour reference, ignoring its alpha.
    pub fn resolve(&self, color: &ColorReference) -> Result<Rgb, ColorError> {
        let mut rgb = match &color.value {
            ColorValue::Rgb(rgb) => *rgb,
            ColorValue::Scheme(slot) => self.lookup(slot)?,
            ColorValue::Unsupported(kind) => return Err(ColorError::Unsupported(kind.clone())),
        };

        if color.is_modulated() {
            let [r, g, b] = rgb.to_unit();
            let (h, l, s) = rgb_to_hls(r, g, b);
            let l = (l * color.lum_mod + color.lum_off).clamp(0.0, 1.0);
            let s = (s * color.sat_mod).min(1.0);
            let (r, g, b) = hls_to_rgb(h, l, s);
            rgb = Rgb::new(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b));
        }

        if color.tint > 0.0 {
            let toward_white = |c: u8| (c as f64 + color.tint * (255.0 - c as f64)) as u8;
            rgb = Rgb::new(toward_white(rgb.r), toward_white(rgb.g), toward_white(rgb.b));
        }

        if color.shade != 1.0 {
            let darken = |c: u8| (color.shade * c as f64) as u8;
            rgb = Rgb::new(darken(rgb.r), darken(rgb.g), darken(rgb.b));
        }

        Ok(rgb)
    }
}

fn unit_to_byte(x: f64) -> u8 {
    (255.0 * x + 0.5) as u8
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let sumc = maxc + minc;
    let rangec = maxc - minc;
    let l = sumc / 2.0;
    if minc == maxc {
        return (0.0, l, 0.0);
    }
    let s = if l <= 0.5 { rangec / sumc } else { rangec / (2.0 - sumc) };
    let rc = (maxc - r) / rangec;
    let gc = (maxc - g) / rangec;
    let bc = (maxc - b) / rangec;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::SchemeSlot;

    fn theme() -> Theme {
        Theme::new()
            .with(SchemeSlot::Dk1, Rgb::BLACK)
            .with(SchemeSlot::Lt1, Rgb::WHITE)
            .with(SchemeSlot::Accent1, Rgb::new(0x44, 0x72, 0xC4))
            .with(SchemeSlot::Accent2, Rgb::new(0xED, 0x7D, 0x31))
    }

    fn aliases(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn explicit_rgb_passes_through() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let rgb = map.resolve(&ColorReference::rgb(Rgb::new(0x33, 0x66, 0x99))).unwrap();
        assert_eq!(rgb.to_hex(), "#336699");
    }

    #[test]
    fn alias_is_applied_before_lookup() {
        let map = ColorMap::new(&theme(), &aliases(&[("accent1", "accent2")]));
        let rgb = map.resolve(&ColorReference::scheme("accent1")).unwrap();
        assert_eq!(rgb, Rgb::new(0xED, 0x7D, 0x31));
    }

    #[test]
    fn aliases_resolve_a_single_level() {
        let map = ColorMap::new(
            &theme(),
            &aliases(&[("accent1", "accent2"), ("accent2", "accent1"), ("bg1", "lt1")]),
        );
        assert_eq!(map.lookup("accent1").unwrap(), Rgb::new(0xED, 0x7D, 0x31));
        assert_eq!(map.lookup("accent2").unwrap(), Rgb::new(0x44, 0x72, 0xC4));
        assert_eq!(map.lookup("bg1").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn missing_slot_is_reported() {
        let map = ColorMap::new(&theme(), &aliases(&[("tx2", "dk2")]));
        assert_eq!(
            map.resolve(&ColorReference::scheme("tx2")),
            Err(ColorError::MissingSlot("tx2".to_string()))
        );
        assert_eq!(
            map.resolve(&ColorReference::scheme("accent6")),
            Err(ColorError::MissingSlot("accent6".to_string()))
        );
    }

    #[test]
    fn unsupported_colour_kind_is_reported() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let colour = ColorReference::new(ColorValue::Unsupported("prst_clr".to_string()));
        assert_eq!(
            map.resolve(&colour),
            Err(ColorError::Unsupported("prst_clr".to_string()))
        );
    }

    #[test]
    fn luminance_modulation_matches_office_darker_25() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let darker = ColorReference::scheme("accent1").with_lum(0.75, 0.0);
        assert_eq!(map.resolve(&darker).unwrap().to_hex(), "#2F5597");
    }

    #[test]
    fn luminance_offset_matches_office_lighter_80() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let lighter = ColorReference::scheme("accent1").with_lum(0.2, 0.8);
        assert_eq!(map.resolve(&lighter).unwrap().to_hex(), "#DAE3F3");
    }

    #[test]
    fn tint_then_shade() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let base = Rgb::new(100, 0, 200);
        assert_eq!(
            map.resolve(&ColorReference::rgb(base).with_tint(0.5)).unwrap(),
            Rgb::new(177, 127, 227)
        );
        assert_eq!(
            map.resolve(&ColorReference::rgb(base).with_shade(0.5)).unwrap(),
            Rgb::new(50, 0, 100)
        );
        assert_eq!(
            map.resolve(&ColorReference::rgb(base).with_tint(0.5).with_shade(0.5)).unwrap(),
            Rgb::new(88, 63, 113)
        );
    }

    #[test]
    fn saturation_modulation_alone() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let base = Rgb::new(0x33, 0x66, 0x99);
        assert_eq!(
            map.resolve(&ColorReference::rgb(base).with_sat_mod(0.0)).unwrap().to_hex(),
            "#666666"
        );
        assert_eq!(map.resolve(&ColorReference::rgb(base).with_sat_mod(1.0)).unwrap(), base);
    }

    #[test]
    fn saturation_is_clamped_to_one() {
        let map = ColorMap::new(&theme(), &BTreeMap::new());
        let base = Rgb::new(0x33, 0x66, 0x99);
        // Saturation of the base is 0.5, so any factor of 2 or more is fully saturated
        let tripled = map.resolve(&ColorReference::rgb(base).with_sat_mod(3.0)).unwrap();
        assert_eq!(tripled.to_hex(), "#0066CC");
        assert_eq!(
            map.resolve(&ColorReference::rgb(base).with_sat_mod(10.0)).unwrap(),
            tripled
        );
    }

    #[test]
    fn hls_round_trip_of_grey() {
        let (h, l, s) = rgb_to_hls(0.5, 0.5, 0.5);
        assert_eq!((h, s), (0.0, 0.0));
        assert_eq!(hls_to_rgb(h, l, s), (0.5, 0.5, 0.5));
    }
}
