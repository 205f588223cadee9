use glam::Vec3;

use crate::animation::{DriftParams, PulseParams, TwinkleParams};
use crate::error::{ensure_finite, ensure_radii, ensure_range, ensure_sizes, FieldError, Result};

/// Spiral disk placement: `t = (i/N)^exponent`, `angle = t * turns * 2π + phase`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DiskParams {
    pub count: usize,
    pub inner: f32,
    pub outer: f32,
    /// Radial profile exponent in `(0, 1]`.
    pub exponent: f32,
    pub turns: f32,
    pub phase: f32,
    /// Maximum radial jitter either side of the spiral; the result is clamped to the bounds.
    pub radial_jitter: f32,
    /// Full height of the vertical perturbation at the rim.
    pub vertical_jitter: f32,
    pub heat_gamma: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub size_weight: f32,
}

impl DiskParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_radii(layer, self.inner, self.outer)?;
        ensure_finite(layer, "exponent", self.exponent)?;
        if self.exponent <= 0.0 || self.exponent > 1.0 {
            return Err(FieldError::OutOfRange {
                layer,
                what: "exponent",
                value: self.exponent,
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_finite(layer, "turns", self.turns)?;
        ensure_finite(layer, "phase", self.phase)?;
        ensure_range(layer, "radial jitter", 0.0, self.radial_jitter)?;
        ensure_range(layer, "vertical jitter", 0.0, self.vertical_jitter)?;
        ensure_finite(layer, "heat gamma", self.heat_gamma)?;
        if self.heat_gamma <= 0.0 {
            return Err(FieldError::OutOfRange {
                layer,
                what: "heat gamma",
                value: self.heat_gamma,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        ensure_sizes(layer, self.size_min, self.size_max)?;
        ensure_range(layer, "size weight", 0.0, self.size_weight)
    }
}

/// Keplerian motion of the accretion disk, per reference frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DiskMotion {
    /// Angular step at radius 1; actual step is `orbital_speed / sqrt(r)`.
    pub orbital_speed: f32,
    /// Radius lost per frame.
    pub inward_speed: f32,
    /// Extra inward speed at full progress: `inward * (1 + progress * boost)`.
    pub progress_boost: f32,
}

/// Sphere shell sampled uniformly in solid angle.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ShellParams {
    pub count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub tint: Vec3,
    /// Per-particle brightness spread around `tint`, in `[0, 1]`.
    pub tint_variance: f32,
}

impl ShellParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_radii(layer, self.radius_min, self.radius_max)?;
        ensure_sizes(layer, self.size_min, self.size_max)?;
        ensure_range(layer, "tint variance", 0.0, self.tint_variance)
    }
}

/// Polar sampling squashed toward the galactic plane (`y = r * sin(phi) * flatten`).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FlatDiskParams {
    pub count: usize,
    pub radius_min: f32,
    pub radius_max: f32,
    pub flatten: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Colors are mixed randomly between these two.
    pub palette: [Vec3; 2],
}

impl FlatDiskParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_radii(layer, self.radius_min, self.radius_max)?;
        ensure_range(layer, "flatten", 0.0, self.flatten)?;
        ensure_sizes(layer, self.size_min, self.size_max)
    }
}

/// Twin cones along ±y.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct JetParams {
    pub count: usize,
    pub length: f32,
    pub base_radius: f32,
    /// Cone radius gained per unit of height.
    pub spread: f32,
    pub size_min: f32,
    pub size_max: f32,
}

impl JetParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_range(layer, "length", 0.0, self.length)?;
        ensure_range(layer, "base radius", 0.0, self.base_radius)?;
        ensure_range(layer, "spread", 0.0, self.spread)?;
        ensure_sizes(layer, self.size_min, self.size_max)
    }
}

/// Thin flat ring (photon sphere).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RingParams {
    pub count: usize,
    pub inner: f32,
    pub outer: f32,
    pub thickness: f32,
    pub color: Vec3,
    pub size: f32,
}

impl RingParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_radii(layer, self.inner, self.outer)?;
        ensure_range(layer, "thickness", 0.0, self.thickness)?;
        ensure_finite(layer, "size", self.size)
    }
}

/// Spiral arms: `arm_count` disk placements evenly phased around the core.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ArmParams {
    pub arm_count: u8,
    pub disk: DiskParams,
    pub drift: DriftParams,
}

/// Every tuned constant of the galaxy scene.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldConfig {
    pub disk: DiskParams,
    pub disk_motion: DiskMotion,
    pub arms: ArmParams,
    pub nebula: FlatDiskParams,
    pub dust: FlatDiskParams,
    pub dust_drift: DriftParams,
    pub stars: ShellParams,
    pub twinkle: TwinkleParams,
    pub jets: JetParams,
    pub jet_pulse: PulseParams,
    pub core_glow: ShellParams,
    pub glow_pulse: PulseParams,
    pub photon_ring: RingParams,
    pub ring_pulse: PulseParams,
    /// Whole-galaxy spin around y, radians per second.
    pub galaxy_spin: f32,
    /// Frame gaps above this (seconds) are clamped, e.g. after a hidden tab resumes.
    pub max_frame_delta: f32,
    /// Camera zoom gained at full progress.
    pub zoom_intensity: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            disk: DiskParams {
                count: 2000,
                inner: 3.0,
                outer: 8.0,
                exponent: 0.6,
                turns: 4.0,
                phase: 0.0,
                radial_jitter: 0.3,
                vertical_jitter: 0.5,
                heat_gamma: 1.5,
                size_min: 0.2,
                size_max: 0.7,
                size_weight: 1.0,
            },
            disk_motion: DiskMotion {
                orbital_speed: 0.02,
                inward_speed: 0.004,
                progress_boost: 2.0,
            },
            arms: ArmParams {
                arm_count: 4,
                disk: DiskParams {
                    count: 1500,
                    inner: 8.5,
                    outer: 40.0,
                    exponent: 0.8,
                    turns: 1.25,
                    phase: 0.0,
                    radial_jitter: 1.5,
                    vertical_jitter: 1.0,
                    heat_gamma: 1.2,
                    size_min: 0.1,
                    size_max: 0.4,
                    size_weight: 0.8,
                },
                drift: DriftParams {
                    amplitude: 0.15,
                    frequency: 0.5,
                },
            },
            nebula: FlatDiskParams {
                count: 3000,
                radius_min: 10.0,
                radius_max: 60.0,
                flatten: 0.1,
                size_min: 0.5,
                size_max: 1.5,
                palette: [Vec3::new(0.5, 0.2, 0.8), Vec3::new(0.2, 0.4, 0.9)],
            },
            dust: FlatDiskParams {
                count: 2000,
                radius_min: 5.0,
                radius_max: 80.0,
                flatten: 0.2,
                size_min: 0.05,
                size_max: 0.2,
                palette: [Vec3::new(0.8, 0.7, 0.6), Vec3::new(0.6, 0.6, 0.7)],
            },
            dust_drift: DriftParams {
                amplitude: 0.3,
                frequency: 0.3,
            },
            stars: ShellParams {
                count: 5000,
                radius_min: 100.0,
                radius_max: 500.0,
                size_min: 0.5,
                size_max: 2.0,
                tint: Vec3::ONE,
                tint_variance: 0.4,
            },
            twinkle: TwinkleParams {
                cadence: 10,
                fraction: 0.02,
                min_factor: 0.5,
                max_factor: 1.5,
            },
            jets: JetParams {
                count: 800,
                length: 25.0,
                base_radius: 0.3,
                spread: 0.15,
                size_min: 0.1,
                size_max: 0.4,
            },
            jet_pulse: PulseParams {
                frequency: 2.0,
                scale_amplitude: 0.0,
                opacity_amplitude: 0.3,
            },
            core_glow: ShellParams {
                count: 400,
                radius_min: 2.0,
                radius_max: 2.5,
                size_min: 0.3,
                size_max: 0.6,
                tint: Vec3::new(1.0, 0.55, 0.2),
                tint_variance: 0.2,
            },
            glow_pulse: PulseParams {
                frequency: 1.5,
                scale_amplitude: 0.05,
                opacity_amplitude: 0.2,
            },
            photon_ring: RingParams {
                count: 600,
                inner: 2.8,
                outer: 3.2,
                thickness: 0.05,
                color: Vec3::ONE,
                size: 0.15,
            },
            ring_pulse: PulseParams {
                frequency: 3.0,
                scale_amplitude: 0.02,
                opacity_amplitude: 0.1,
            },
            galaxy_spin: 0.01,
            max_frame_delta: 0.1,
            zoom_intensity: 0.5,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        self.disk.validate("accretion-disk")?;
        ensure_finite("accretion-disk", "orbital speed", self.disk_motion.orbital_speed)?;
        ensure_range("accretion-disk", "inward speed", 0.0, self.disk_motion.inward_speed)?;
        ensure_finite("accretion-disk", "progress boost", self.disk_motion.progress_boost)?;
        self.arms.disk.validate("spiral-arm")?;
        self.arms.drift.validate("spiral-arm")?;
        self.nebula.validate("nebula")?;
        self.dust.validate("cosmic-dust")?;
        self.dust_drift.validate("cosmic-dust")?;
        self.stars.validate("star-field")?;
        self.twinkle.validate("star-field")?;
        self.jets.validate("jet")?;
        self.jet_pulse.validate("jet")?;
        self.core_glow.validate("core-glow")?;
        self.glow_pulse.validate("core-glow")?;
        self.photon_ring.validate("photon-ring")?;
        self.ring_pulse.validate("photon-ring")?;
        ensure_finite("field", "galaxy spin", self.galaxy_spin)?;
        ensure_range("field", "max frame delta", 0.0, self.max_frame_delta)?;
        ensure_finite("field", "zoom intensity", self.zoom_intensity)
    }

    /// Copy with every particle count multiplied by `factor` (rounded).
    pub fn scaled(&self, factor: f32) -> Self {
        let factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
        let scale = |n: usize| (n as f32 * factor).round() as usize;
        let mut cfg = self.clone();
        cfg.disk.count = scale(cfg.disk.count);
        cfg.arms.disk.count = scale(cfg.arms.disk.count);
        cfg.nebula.count = scale(cfg.nebula.count);
        cfg.dust.count = scale(cfg.dust.count);
        cfg.stars.count = scale(cfg.stars.count);
        cfg.jets.count = scale(cfg.jets.count);
        cfg.core_glow.count = scale(cfg.core_glow.count);
        cfg.photon_ring.count = scale(cfg.photon_ring.count);
        cfg
    }

    /// Sets the particle count of the layer called `name` (`"spiral-arm"` sets every arm).
    ///
    /// Counts arrive from JavaScript as signed numbers, so negatives are rejected here.
    pub fn set_count(&mut self, name: &str, count: i64) -> Result<()> {
        if count < 0 {
            return Err(FieldError::NegativeCount {
                layer: name.to_string(),
                count,
            });
        }
        let count = count as usize;
        let slot = match name {
            "accretion-disk" => &mut self.disk.count,
            "spiral-arm" => &mut self.arms.disk.count,
            "nebula" => &mut self.nebula.count,
            "cosmic-dust" => &mut self.dust.count,
            "star-field" => &mut self.stars.count,
            "jet" => &mut self.jets.count,
            "core-glow" => &mut self.core_glow.count,
            "photon-ring" => &mut self.photon_ring.count,
            other => return Err(FieldError::UnknownLayer(other.to_string())),
        };
        *slot = count;
        Ok(())
    }
}

/// Size of the drawing surface in CSS pixels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(FieldError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Particle density multiplier; phones and tablets get fewer particles.
    pub fn density_scale(&self) -> f32 {
        if self.width < 768.0 {
            0.5
        } else if self.width < 1200.0 {
            0.75
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(FieldConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_inverted_disk_fails_fast() {
        let mut cfg = FieldConfig::default();
        cfg.disk.inner = 9.0;
        assert!(matches!(
            cfg.validate(),
            Err(FieldError::InvalidRadius { layer: "accretion-disk", .. })
        ));
    }

    #[test]
    fn test_nonpositive_gamma_rejected() {
        let mut cfg = FieldConfig::default();
        for gamma in [0.0, -1.0] {
            cfg.disk.heat_gamma = gamma;
            assert!(
                matches!(
                    cfg.validate(),
                    Err(FieldError::OutOfRange { layer: "accretion-disk", what: "heat gamma", .. })
                ),
                "gamma {} should be rejected",
                gamma
            );
        }
    }

    #[test]
    fn test_negative_size_weight_rejected() {
        let mut cfg = FieldConfig::default();
        cfg.arms.disk.size_weight = -2.0;
        assert!(matches!(
            cfg.validate(),
            Err(FieldError::InvalidRange { layer: "spiral-arm", .. })
        ));
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut cfg = FieldConfig::default();
        let err = cfg.set_count("star-field", -5).unwrap_err();
        assert_eq!(
            err,
            FieldError::NegativeCount {
                layer: "star-field".into(),
                count: -5,
            }
        );
        assert_eq!(cfg.stars.count, 5000);
    }

    #[test]
    fn test_unknown_layer_rejected() {
        let mut cfg = FieldConfig::default();
        assert_eq!(cfg.set_count("comet", 3), Err(FieldError::UnknownLayer("comet".into())));
    }

    #[test]
    fn test_scaled_counts() {
        let cfg = FieldConfig::default().scaled(0.5);
        assert_eq!(cfg.disk.count, 1000);
        assert_eq!(cfg.stars.count, 2500);
    }

    #[test]
    fn test_viewport_density() {
        assert_eq!(Viewport::new(375.0, 812.0).map(|v| v.density_scale()), Ok(0.5));
        assert_eq!(Viewport::new(1920.0, 1080.0).map(|v| v.density_scale()), Ok(1.0));
        assert!(Viewport::new(0.0, 100.0).is_err());
    }
}
