//! Per-frame layer updates.
//!
//! Every layer carries an [`UpdatePolicy`]; [`update_layer`] dispatches on it.
//! Rates are tuned per 60 Hz reference frame and scaled by the real delta, so
//! the look is the same on 120 Hz displays.

use std::f32::consts::TAU;
use std::f64::consts::{PI, TAU as TAU_F64};

use glam::Vec3;
use rand::Rng;

use crate::color::{heat_at, heat_color, heat_size};
use crate::error::{ensure_finite, ensure_range, FieldError, Result};
use crate::math::{
    frames_elapsed, from_polar_xz, hash11, polar_xz, vertical_envelope, wrap_angles, wrapped_phase,
};
use crate::particle::ParticleLayer;

/// Keeps `1/sqrt(r)` bounded for particles sitting on the axis.
const MIN_ORBIT_RADIUS: f32 = 1.0e-3;

/// `sin(t)`, `cos(t)` and `sin(0.7 t)` all repeat after `20π`.
const DRIFT_CYCLE: f64 = 20.0 * PI;

/// Inputs for a single frame, supplied by the host's frame callback.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FrameInput {
    /// Seconds of animation since the field was built.
    pub time: f64,
    /// Seconds since the previous frame. Zero or negative means nothing happens.
    pub delta: f32,
    /// Index of this frame, counting only frames that advanced time.
    pub frame: u64,
    /// Scroll-derived intensity in `[0, 1]`.
    pub progress: f32,
}

impl FrameInput {
    pub fn advances(&self) -> bool {
        self.delta.is_finite() && self.delta > 0.0
    }
}

/// Keplerian inspiral with recycling at the inner edge.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct OrbitParams {
    pub inner: f32,
    pub outer: f32,
    pub heat_gamma: f32,
    pub size_weight: f32,
    pub orbital_speed: f32,
    pub inward_speed: f32,
    pub progress_boost: f32,
    /// Height range of a freshly respawned particle.
    pub vertical_jitter: f32,
}

impl OrbitParams {
    /// Vertical envelope at `radius`, normalized to the disk bounds.
    pub fn envelope_at(&self, radius: f32) -> f32 {
        let span = self.outer - self.inner;
        if span <= 0.0 {
            return 0.0;
        }
        vertical_envelope((radius - self.inner) / span)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DriftParams {
    pub amplitude: f32,
    /// Radians per second.
    pub frequency: f32,
}

impl DriftParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_finite(layer, "drift amplitude", self.amplitude)?;
        ensure_finite(layer, "drift frequency", self.frequency)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TwinkleParams {
    /// Twinkle on every `cadence`-th frame.
    pub cadence: u32,
    /// Share of the layer touched per twinkle, in `[0, 1]`.
    pub fraction: f32,
    pub min_factor: f32,
    pub max_factor: f32,
}

impl TwinkleParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        if self.cadence == 0 {
            return Err(FieldError::OutOfRange {
                layer,
                what: "twinkle cadence",
                value: 0.0,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        ensure_range(layer, "twinkle fraction", 0.0, self.fraction)?;
        ensure_range(layer, "twinkle fraction", self.fraction, 1.0)?;
        ensure_range(layer, "twinkle factor", self.min_factor, self.max_factor)?;
        ensure_range(layer, "twinkle factor", 0.0, self.min_factor)
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PulseParams {
    /// Radians per second.
    pub frequency: f32,
    pub scale_amplitude: f32,
    pub opacity_amplitude: f32,
}

impl PulseParams {
    pub fn validate(&self, layer: &'static str) -> Result<()> {
        ensure_finite(layer, "pulse frequency", self.frequency)?;
        ensure_finite(layer, "pulse scale amplitude", self.scale_amplitude)?;
        ensure_finite(layer, "pulse opacity amplitude", self.opacity_amplitude)
    }
}

/// How a layer changes from frame to frame.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum UpdatePolicy {
    /// Particles spiral inward and are recycled at the rim.
    Orbital(OrbitParams),
    /// Particles wobble around their rest position.
    Drift(DriftParams),
    /// A random subset flickers every few frames.
    Twinkle(TwinkleParams),
    /// Only the whole-layer scale and opacity breathe.
    Pulse(PulseParams),
    /// Nothing per particle; layer spin only.
    Static,
}

/// Outcome of advancing one orbital particle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrbitState {
    Orbiting,
    /// Fell through the inner edge and was reset to the outer edge.
    Respawned,
}

/// What an update did, for logging and tests.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct LayerStats {
    pub respawned: usize,
    pub twinkled: usize,
}

/// Advances one orbital particle by `frames` reference frames.
///
/// Radius and angle are re-derived from `(x, z)`. The angular step falls off
/// as `1/sqrt(r)`; the radius shrinks by the (progress boosted) inward speed
/// and the height shrinks with the vertical envelope of the new radius.
/// A particle that would end below `inner` is placed at exactly `outer` with
/// a random angle.
pub fn advance_orbit<R: Rng + ?Sized>(
    position: Vec3,
    orbit: &OrbitParams,
    frames: f32,
    progress: f32,
    rng: &mut R,
) -> (Vec3, OrbitState) {
    let (radius, angle) = polar_xz(position);
    let old_radius = radius.min(orbit.outer);
    let angle = angle + orbit.orbital_speed / old_radius.max(MIN_ORBIT_RADIUS).sqrt() * frames;
    let inward = orbit.inward_speed * (1.0 + progress * orbit.progress_boost) * frames;
    let radius = old_radius - inward;

    if radius < orbit.inner {
        let angle = rng.gen_range(0.0..TAU);
        let y = (rng.gen::<f32>() - 0.5) * orbit.vertical_jitter;
        return (from_polar_xz(orbit.outer, angle, y), OrbitState::Respawned);
    }

    let before = orbit.envelope_at(old_radius);
    let y = if before > 0.0 {
        position.y * (orbit.envelope_at(radius) / before).min(1.0)
    } else {
        0.0
    };
    (from_polar_xz(radius, angle, y), OrbitState::Orbiting)
}

/// Sinusoidal offset of particle `index` at `time`.
#[inline]
pub fn drift_offset(drift: &DriftParams, time: f64, index: usize) -> Vec3 {
    let phase = hash11(index as f32) * TAU;
    let t = wrapped_phase(time, drift.frequency, DRIFT_CYCLE) + phase;
    Vec3::new(t.sin(), (t * 0.7 + phase).sin() * 0.5, t.cos()) * drift.amplitude
}

/// Advances `layer` by one frame. Frames that do not advance time leave the
/// layer untouched.
pub fn update_layer<R: Rng + ?Sized>(
    layer: &mut ParticleLayer,
    input: &FrameInput,
    rng: &mut R,
) -> LayerStats {
    let mut stats = LayerStats::default();
    if !input.advances() {
        return stats;
    }

    layer.rotation = wrap_angles(layer.rotation + layer.spin * input.delta);

    match layer.policy {
        UpdatePolicy::Orbital(orbit) => {
            let frames = frames_elapsed(input.delta);
            for i in 0..layer.count {
                let (p, state) =
                    advance_orbit(layer.position[i], &orbit, frames, input.progress, rng);
                if state == OrbitState::Respawned {
                    stats.respawned += 1;
                }
                layer.position[i] = p;
                let (radius, _) = polar_xz(p);
                let heat = heat_at(radius, orbit.inner, orbit.outer, orbit.heat_gamma);
                layer.color[i] = heat_color(heat);
                layer.size[i] = heat_size(layer.base_size[i], heat, orbit.size_weight);
            }
        }
        UpdatePolicy::Drift(drift) => apply_drift(layer, &drift, input.time),
        UpdatePolicy::Twinkle(twinkle) => {
            stats.twinkled = apply_twinkle(layer, &twinkle, input.frame, rng);
        }
        UpdatePolicy::Pulse(pulse) => {
            let wave = wrapped_phase(input.time, pulse.frequency, TAU_F64).sin();
            layer.scale = 1.0 + pulse.scale_amplitude * wave;
            let opacity = layer.style.opacity * (1.0 + pulse.opacity_amplitude * wave);
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
        UpdatePolicy::Static => {}
    }

    stats
}

fn apply_drift(layer: &mut ParticleLayer, drift: &DriftParams, time: f64) {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        layer
            .position
            .par_iter_mut()
            .zip(layer.base_position.par_iter())
            .enumerate()
            .for_each(|(i, (p, base))| *p = *base + drift_offset(drift, time, i));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for i in 0..layer.count {
            layer.position[i] = layer.base_position[i] + drift_offset(drift, time, i);
        }
    }
}

/// Re-tints a random subset on cadence frames. Returns how many were touched.
fn apply_twinkle<R: Rng + ?Sized>(
    layer: &mut ParticleLayer,
    twinkle: &TwinkleParams,
    frame: u64,
    rng: &mut R,
) -> usize {
    if layer.count == 0 || frame % u64::from(twinkle.cadence.max(1)) != 0 {
        return 0;
    }
    let picks = ((layer.count as f32 * twinkle.fraction).ceil() as usize).min(layer.count);
    for _ in 0..picks {
        let i = rng.gen_range(0..layer.count);
        let factor = rng.gen_range(twinkle.min_factor..=twinkle.max_factor);
        layer.color[i] = (layer.base_color[i] * factor).clamp(Vec3::ZERO, Vec3::ONE);
    }
    picks
}
