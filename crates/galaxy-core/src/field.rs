use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::animation::{update_layer, FrameInput};
use crate::config::{FieldConfig, Viewport};
use crate::error::Result;
use crate::particle::ParticleLayer;
use crate::shapes::dispatcher::build_layers;

/// Totals for one frame across all layers.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct FrameStats {
    pub respawned: usize,
    pub twinkled: usize,
    /// Seconds actually simulated (after clamping); zero when the frame was skipped.
    pub delta: f32,
}

/// Fraction of the page scrolled, in `[0, 1]`. Pages that do not scroll read as zero.
pub fn scroll_progress(scroll_top: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let range = scroll_height - viewport_height;
    if !(range.is_finite() && range > 0.0) || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0)
}

/// The galaxy background: owns every layer and the random source, and
/// advances them once per display frame.
///
/// Pausing keeps all state; the next [`tick`](Self::tick) after
/// [`resume`](Self::resume) re-anchors the clock instead of replaying the gap.
pub struct ParticleField<R: Rng = SmallRng> {
    config: FieldConfig,
    viewport: Viewport,
    layers: Vec<ParticleLayer>,
    rng: R,
    time: f64,
    frame: u64,
    progress: f32,
    last_timestamp_ms: Option<f64>,
    paused: bool,
    total_respawns: u64,
}

impl ParticleField<SmallRng> {
    /// Reproducible field for tests and screenshots.
    pub fn with_seed(config: FieldConfig, viewport: Viewport, seed: u64) -> Result<Self> {
        Self::new(config, viewport, SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: FieldConfig, viewport: Viewport) -> Result<Self> {
        Self::new(config, viewport, SmallRng::from_entropy())
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn new(config: FieldConfig, viewport: Viewport, rng: R) -> Result<Self> {
        let mut field = Self {
            config,
            viewport,
            layers: Vec::new(),
            rng,
            time: 0.0,
            frame: 0,
            progress: 0.0,
            last_timestamp_ms: None,
            paused: false,
            total_respawns: 0,
        };
        field.regenerate()?;
        Ok(field)
    }

    /// Discards every layer and generates fresh ones for the current viewport.
    ///
    /// On error the previous layers are kept.
    pub fn regenerate(&mut self) -> Result<()> {
        let scale = self.viewport.density_scale();
        let scaled = self.config.scaled(scale);
        let layers = build_layers(&scaled, &mut self.rng)?;
        debug!(
            layers = layers.len(),
            particles = layers.iter().map(|l| l.count).sum::<usize>(),
            width = self.viewport.width,
            height = self.viewport.height,
            density = scale,
            "generated particle field"
        );
        self.layers = layers;
        Ok(())
    }

    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let previous = self.viewport;
        self.viewport = viewport;
        if let Err(err) = self.regenerate() {
            self.viewport = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Replaces the configuration and regenerates. The old one stays on error.
    pub fn reconfigure(&mut self, config: FieldConfig) -> Result<()> {
        let previous = std::mem::replace(&mut self.config, config);
        if let Err(err) = self.regenerate() {
            self.config = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Scroll-derived intensity; clamped to `[0, 1]`, NaN reads as zero.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    }

    /// Advances every layer by `delta` seconds.
    ///
    /// Zero, negative or non-finite deltas (and paused fields) change nothing.
    /// Gaps longer than `max_frame_delta` are clamped.
    pub fn step(&mut self, delta: f32) -> FrameStats {
        let mut stats = FrameStats::default();
        if self.paused || !delta.is_finite() || delta <= 0.0 {
            return stats;
        }

        let max = self.config.max_frame_delta;
        let delta = if max > 0.0 && delta > max {
            warn!(delta, max, "clamping long frame gap");
            max
        } else {
            delta
        };

        self.frame += 1;
        self.time += f64::from(delta);
        let input = FrameInput {
            time: self.time,
            delta,
            frame: self.frame,
            progress: self.progress,
        };

        for layer in &mut self.layers {
            let layer_stats = update_layer(layer, &input, &mut self.rng);
            stats.respawned += layer_stats.respawned;
            stats.twinkled += layer_stats.twinkled;
        }
        stats.delta = delta;
        self.total_respawns += stats.respawned as u64;

        if stats.respawned > 0 {
            trace!(frame = self.frame, respawned = stats.respawned, "recycled disk particles");
        }
        stats
    }

    /// Advances using a frame-callback timestamp in milliseconds.
    ///
    /// The first tick (and the first after `resume`) only records the clock.
    pub fn tick(&mut self, timestamp_ms: f64) -> FrameStats {
        if self.paused || !timestamp_ms.is_finite() {
            return FrameStats::default();
        }
        match self.last_timestamp_ms.replace(timestamp_ms) {
            Some(last) => self.step(((timestamp_ms - last) / 1000.0) as f32),
            None => FrameStats::default(),
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.last_timestamp_ms = None;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn layers(&self) -> &[ParticleLayer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&ParticleLayer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|l| l.count).sum()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Camera zoom factor the renderer should apply for the current progress.
    pub fn zoom(&self) -> f32 {
        1.0 + self.progress * self.config.zoom_intensity
    }

    pub fn total_respawns(&self) -> u64 {
        self.total_respawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;

    fn small_field() -> ParticleField {
        let config = FieldConfig::default().scaled(0.05);
        let viewport = Viewport::new(1920.0, 1080.0).unwrap();
        ParticleField::with_seed(config, viewport, 42).unwrap()
    }

    #[test]
    fn test_scroll_progress() {
        assert_eq!(scroll_progress(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(1000.0, 3000.0, 1000.0), 0.5);
        assert_eq!(scroll_progress(5000.0, 3000.0, 1000.0), 1.0);
        assert_eq!(scroll_progress(10.0, 800.0, 1000.0), 0.0);
    }

    #[test]
    fn test_resize_regenerates_for_density() {
        let mut field = small_field();
        let desktop = field.particle_count();
        field.resize(Viewport::new(400.0, 800.0).unwrap()).unwrap();
        assert!(field.particle_count() < desktop);
        assert_eq!(field.viewport().width, 400.0);
    }

    #[test]
    fn test_failed_reconfigure_keeps_layers() {
        let mut field = small_field();
        let before = field.particle_count();
        let mut bad = field.config().clone();
        bad.disk.outer = 1.0;
        assert!(matches!(field.reconfigure(bad), Err(FieldError::InvalidRadius { .. })));
        assert_eq!(field.particle_count(), before);
        assert_eq!(field.config().disk.outer, 8.0);
    }

    #[test]
    fn test_progress_clamped() {
        let mut field = small_field();
        field.set_progress(3.0);
        assert_eq!(field.progress(), 1.0);
        assert!((field.zoom() - 1.5).abs() < 1e-6);
        field.set_progress(f32::NAN);
        assert_eq!(field.progress(), 0.0);
    }

    #[test]
    fn test_long_gap_clamped() {
        let mut field = small_field();
        let stats = field.step(5.0);
        assert_eq!(stats.delta, 0.1);
        assert!((field.time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_tick_anchors_then_steps() {
        let mut field = small_field();
        assert_eq!(field.tick(1000.0).delta, 0.0);
        assert_eq!(field.frame(), 0);
        let stats = field.tick(1016.0);
        assert!((stats.delta - 0.016).abs() < 1e-6);
        assert_eq!(field.frame(), 1);
    }

    #[test]
    fn test_pause_resume_skips_hidden_time() {
        let mut field = small_field();
        field.tick(0.0);
        field.tick(16.0);
        field.pause();
        assert_eq!(field.step(0.016).delta, 0.0);
        assert_eq!(field.tick(5_000.0).delta, 0.0);
        field.resume();
        assert_eq!(field.tick(60_000.0).delta, 0.0, "first tick after resume only re-anchors");
        assert!((field.tick(60_016.0).delta - 0.016).abs() < 1e-6);
        assert_eq!(field.frame(), 2);
    }
}
