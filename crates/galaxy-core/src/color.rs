//! Color temperature mapping shared by generation and the orbital updater.
//!
//! Heat is a `[0, 1]` scalar derived from radius; it selects one of five fixed
//! bands. The bands are a step function: there is no blending across a
//! breakpoint, so a particle crossing `0.6` changes color abruptly.

use glam::Vec3;

/// Upper breakpoints of the heat bands, hottest first. A heat equal to a
/// breakpoint belongs to the cooler band below it.
pub const WHITE_ABOVE: f32 = 0.8;
pub const BLUE_WHITE_ABOVE: f32 = 0.6;
pub const YELLOW_WHITE_ABOVE: f32 = 0.4;
pub const ORANGE_ABOVE: f32 = 0.2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeatBand {
    White,
    BlueWhite,
    YellowWhite,
    Orange,
    RedOrange,
}

impl HeatBand {
    pub fn from_heat(heat: f32) -> Self {
        if heat > WHITE_ABOVE {
            HeatBand::White
        } else if heat > BLUE_WHITE_ABOVE {
            HeatBand::BlueWhite
        } else if heat > YELLOW_WHITE_ABOVE {
            HeatBand::YellowWhite
        } else if heat > ORANGE_ABOVE {
            HeatBand::Orange
        } else {
            HeatBand::RedOrange
        }
    }
}

/// Heat of a particle at `radius` inside `[inner, outer]`.
///
/// `(1 - (r - inner) / (outer - inner))^gamma`, clamped so radii outside the
/// bounds still map into `[0, 1]`.
pub fn heat_at(radius: f32, inner: f32, outer: f32, gamma: f32) -> f32 {
    let span = outer - inner;
    if span <= 0.0 {
        return 0.0;
    }
    let normalized = ((radius - inner) / span).clamp(0.0, 1.0);
    (1.0 - normalized).powf(gamma)
}

/// RGB for a heat value. Each band has its own channel formula.
pub fn heat_color(heat: f32) -> Vec3 {
    let heat = if heat.is_nan() { 0.0 } else { heat.clamp(0.0, 1.0) };
    let rgb = match HeatBand::from_heat(heat) {
        HeatBand::White => Vec3::ONE,
        HeatBand::BlueWhite => Vec3::new(0.7 + heat * 0.3, 0.8 + heat * 0.2, 1.0),
        HeatBand::YellowWhite => Vec3::new(1.0, 0.85 + heat * 0.15, 0.4 + heat * 0.5),
        HeatBand::Orange => Vec3::new(1.0, 0.4 + heat * 0.5, heat * 0.3),
        HeatBand::RedOrange => Vec3::new(1.0, 0.2 + heat, heat * 0.1),
    };
    rgb.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Hotter particles render larger: `base * (1 + heat * weight)`.
#[inline]
pub fn heat_size(base: f32, heat: f32, weight: f32) -> f32 {
    base * (1.0 + heat * weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_monotonic_in_radius() {
        let mut last = f32::INFINITY;
        for i in 0..=20 {
            let r = 5.0 + i as f32 * 7.0 / 20.0;
            let h = heat_at(r, 5.0, 12.0, 1.6);
            assert!(h <= last, "heat should not increase with radius");
            last = h;
        }
        assert_eq!(heat_at(5.0, 5.0, 12.0, 1.6), 1.0);
        assert_eq!(heat_at(12.0, 5.0, 12.0, 1.6), 0.0);
    }

    #[test]
    fn test_breakpoints_belong_to_cooler_band() {
        assert_eq!(HeatBand::from_heat(0.8), HeatBand::BlueWhite);
        assert_eq!(HeatBand::from_heat(0.6), HeatBand::YellowWhite);
        assert_eq!(HeatBand::from_heat(0.4), HeatBand::Orange);
        assert_eq!(HeatBand::from_heat(0.2), HeatBand::RedOrange);
        assert_eq!(HeatBand::from_heat(0.0), HeatBand::RedOrange);
        assert_eq!(HeatBand::from_heat(1.0), HeatBand::White);
    }

    #[test]
    fn test_nan_heat_is_coldest() {
        assert_eq!(heat_color(f32::NAN), heat_color(0.0));
    }

    #[test]
    fn test_heat_size_weighting() {
        assert_eq!(heat_size(0.5, 0.0, 1.5), 0.5);
        assert_eq!(heat_size(0.5, 1.0, 1.5), 1.25);
    }
}
