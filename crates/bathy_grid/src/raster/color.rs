//! Blue-to-red colour ramp used for elevation-shaded exports.
//!
//! A value `v` is normalised against `[cmin, cmax]` to `x` in `[0, 1]`, then
//! `red = 4x - 1`, `green = 1 - 4|x - 0.5|`, `blue = 3 - 4x`, each clamped to `[0, 1]`.
//! A flat range (`cmin == cmax`) maps every value to the midpoint colour.
use std::fmt;

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Position of `v` in `[cmin, cmax]`, clamped to `[0, 1]`; 0.5 for a flat range.
pub fn normalize(v: f64, cmin: f64, cmax: f64) -> f64 {
    let span = cmax - cmin;
    if span == 0.0 || !span.is_finite() {
        return 0.5;
    }
    ((v - cmin) / span).clamp(0.0, 1.0)
}

/// Channel amplitudes `[red, green, blue]` in `[0, 1]`.
pub fn ramp_unit(v: f64, cmin: f64, cmax: f64) -> [f64; 3] {
    let x = normalize(v, cmin, cmax);
    let red = (4.0 * x - 1.0).clamp(0.0, 1.0);
    let green = (1.0 - 4.0 * (x - 0.5).abs()).clamp(0.0, 1.0);
    let blue = (3.0 - 4.0 * x).clamp(0.0, 1.0);
    [red, green, blue]
}

/// 8-bit colour for `v`; channels are truncated after scaling by 255.
pub fn ramp_color(v: f64, cmin: f64, cmax: f64) -> Rgb {
    let [r, g, b] = ramp_unit(v, cmin, cmax);
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

#[inline]
fn to_channel(c: f64) -> u8 {
    (c * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_end_is_blue() {
        let [r, _, b] = ramp_unit(-50.0, -50.0, 0.0);
        assert_eq!((r, b), (0.0, 1.0));
        assert_eq!(ramp_color(-50.0, -50.0, 0.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn high_end_is_red() {
        let [r, _, b] = ramp_unit(0.0, -50.0, 0.0);
        assert_eq!((r, b), (1.0, 0.0));
        assert_eq!(ramp_color(0.0, -50.0, 0.0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn flat_range_uses_midpoint() {
        let mid = ramp_color(3.0, 7.0, 7.0);
        assert_eq!(mid, ramp_color(-100.0, 7.0, 7.0));
        assert_eq!(mid, Rgb::WHITE);
        assert_eq!(ramp_unit(1.0, 2.0, 2.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn values_outside_range_are_clamped() {
        assert_eq!(ramp_color(-1000.0, 0.0, 10.0), ramp_color(0.0, 0.0, 10.0));
        assert_eq!(ramp_color(1000.0, 0.0, 10.0), ramp_color(10.0, 0.0, 10.0));
    }

    #[test]
    fn quarter_points_peak_green() {
        assert_eq!(ramp_unit(0.25, 0.0, 1.0), [0.0, 0.0, 1.0]);
        assert_eq!(ramp_unit(0.5, 0.0, 1.0), [1.0, 1.0, 1.0]);
        assert_eq!(ramp_unit(0.75, 0.0, 1.0), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb::new(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Rgb::BLACK.to_string(), "#000000");
    }
}
