//! Cursor trail: a fixed pool of 2D sparks drawn on an overlay canvas.
//!
//! Sparks are emitted at the pointer, coast with drag and fade out. The pool
//! never grows; when it is full the oldest spark is overwritten.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{ensure_range, ensure_sizes, FieldError, Result};
use crate::math::frames_elapsed;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TrailConfig {
    pub capacity: usize,
    pub sparks_per_move: usize,
    /// Initial speed range in pixels per second.
    pub speed_min: f32,
    pub speed_max: f32,
    /// Share of velocity kept per reference frame.
    pub drag: f32,
    /// Seconds a spark lives.
    pub lifetime: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Sparks inherit this share of the pointer's own velocity.
    pub inherit: f32,
    pub colors: [Vec3; 2],
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            sparks_per_move: 3,
            speed_min: 10.0,
            speed_max: 60.0,
            drag: 0.94,
            lifetime: 0.8,
            size_min: 1.0,
            size_max: 3.0,
            inherit: 0.1,
            colors: [Vec3::new(0.4, 0.8, 1.0), Vec3::new(0.7, 0.4, 1.0)],
        }
    }
}

impl TrailConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_range("cursor-trail", "speed", self.speed_min, self.speed_max)?;
        ensure_sizes("cursor-trail", self.size_min, self.size_max)?;
        ensure_range("cursor-trail", "drag", 0.0, self.drag)?;
        ensure_range("cursor-trail", "drag", self.drag, 1.0)?;
        if !(self.lifetime.is_finite() && self.lifetime > 0.0) {
            return Err(FieldError::OutOfRange {
                layer: "cursor-trail",
                what: "lifetime",
                value: self.lifetime,
                min: 0.0,
                max: f32::INFINITY,
            });
        }
        ensure_range("cursor-trail", "inherit", 0.0, self.inherit)
    }
}

/// GPU/canvas-friendly spark: 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TrailSpark {
    pub position: [f32; 2], //  8 bytes
    pub size: f32,          //  4 bytes
    pub alpha: f32,         //  4 bytes
    pub color: [f32; 3],    // 12 bytes
    _pad: f32,              //  4 bytes
}

pub struct CursorTrail<R: Rng = SmallRng> {
    config: TrailConfig,
    position: Vec<Vec2>,
    velocity: Vec<Vec2>,
    /// Remaining seconds; `<= 0` is a free slot.
    life: Vec<f32>,
    size: Vec<f32>,
    color: Vec<Vec3>,
    next: usize,
    last_pointer: Option<(Vec2, f64)>,
    output: Vec<TrailSpark>,
    rng: R,
}

impl CursorTrail<SmallRng> {
    pub fn with_seed(config: TrailConfig, seed: u64) -> Result<Self> {
        Self::new(config, SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: TrailConfig) -> Result<Self> {
        Self::new(config, SmallRng::from_entropy())
    }
}

impl<R: Rng> CursorTrail<R> {
    pub fn new(config: TrailConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let n = config.capacity;
        Ok(Self {
            config,
            position: vec![Vec2::ZERO; n],
            velocity: vec![Vec2::ZERO; n],
            life: vec![0.0; n],
            size: vec![0.0; n],
            color: vec![Vec3::ZERO; n],
            next: 0,
            last_pointer: None,
            output: Vec::with_capacity(n),
            rng,
        })
    }

    /// Emits sparks at the pointer. `timestamp_ms` is used to estimate the
    /// pointer velocity the sparks inherit.
    pub fn emit(&mut self, x: f32, y: f32, timestamp_ms: f64) {
        let n = self.config.capacity;
        if n == 0 || !(x.is_finite() && y.is_finite()) {
            return;
        }
        let at = Vec2::new(x, y);
        let pointer_velocity = match self.last_pointer {
            Some((prev, t)) if timestamp_ms > t => {
                (at - prev) / ((timestamp_ms - t) / 1000.0) as f32
            }
            _ => Vec2::ZERO,
        };
        self.last_pointer = Some((at, timestamp_ms));

        let [a, b] = self.config.colors;
        for _ in 0..self.config.sparks_per_move {
            let i = self.next;
            self.next = (self.next + 1) % n;

            let angle = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(self.config.speed_min..=self.config.speed_max);
            self.position[i] = at;
            self.velocity[i] =
                Vec2::from_angle(angle) * speed + pointer_velocity * self.config.inherit;
            self.life[i] = self.config.lifetime;
            self.size[i] = self.rng.gen_range(self.config.size_min..=self.config.size_max);
            self.color[i] = a.lerp(b, self.rng.gen::<f32>());
        }
    }

    /// Moves and fades live sparks; non-positive deltas do nothing.
    pub fn update(&mut self, delta: f32) {
        if !(delta.is_finite() && delta > 0.0) {
            return;
        }
        let keep = self.config.drag.powf(frames_elapsed(delta));
        for i in 0..self.config.capacity {
            if self.life[i] <= 0.0 {
                continue;
            }
            self.position[i] += self.velocity[i] * delta;
            self.velocity[i] *= keep;
            self.life[i] -= delta;
        }
    }

    pub fn live_count(&self) -> usize {
        self.life.iter().filter(|l| **l > 0.0).count()
    }

    /// Live sparks packed for drawing; alpha and size shrink with remaining life.
    pub fn sparks(&mut self) -> &[TrailSpark] {
        self.output.clear();
        for i in 0..self.config.capacity {
            let life = self.life[i];
            if life <= 0.0 {
                continue;
            }
            let alpha = (life / self.config.lifetime).clamp(0.0, 1.0);
            self.output.push(TrailSpark {
                position: self.position[i].to_array(),
                size: self.size[i] * alpha,
                alpha,
                color: self.color[i].to_array(),
                _pad: 0.0,
            });
        }
        &self.output
    }

    /// Sparks as of the last [`sparks`](Self::sparks) call.
    pub fn packed(&self) -> &[TrailSpark] {
        &self.output
    }

    pub fn clear(&mut self) {
        self.life.iter_mut().for_each(|l| *l = 0.0);
        self.last_pointer = None;
        self.output.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_never_grows() {
        let config = TrailConfig {
            capacity: 8,
            sparks_per_move: 3,
            ..TrailConfig::default()
        };
        let mut trail = CursorTrail::with_seed(config, 1).unwrap();
        for i in 0..10 {
            trail.emit(i as f32, 0.0, i as f64 * 16.0);
        }
        assert_eq!(trail.live_count(), 8);
        assert_eq!(trail.sparks().len(), 8);
    }

    #[test]
    fn test_sparks_fade_and_die() {
        let mut trail = CursorTrail::with_seed(TrailConfig::default(), 1).unwrap();
        trail.emit(100.0, 100.0, 0.0);
        let fresh = trail.sparks()[0].alpha;
        trail.update(0.4);
        let faded = trail.sparks()[0].alpha;
        assert!(faded < fresh);
        trail.update(0.5);
        assert_eq!(trail.live_count(), 0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut trail = CursorTrail::with_seed(TrailConfig::default(), 1).unwrap();
        trail.emit(10.0, 10.0, 0.0);
        let before = trail.sparks().to_vec();
        trail.update(0.0);
        trail.update(-1.0);
        assert_eq!(trail.sparks(), &before[..]);
    }

    #[test]
    fn test_invalid_lifetime_rejected() {
        let config = TrailConfig {
            lifetime: 0.0,
            ..TrailConfig::default()
        };
        assert!(CursorTrail::with_seed(config, 1).is_err());
    }
}
