//! Spiral disk and ring placement (accretion disk, spiral arms, photon ring).

use std::f32::consts::TAU;

use rand::Rng;

use crate::animation::UpdatePolicy;
use crate::color::{heat_at, heat_color, heat_size};
use crate::config::{DiskParams, RingParams};
use crate::error::Result;
use crate::math::{from_polar_xz, vertical_envelope};
use crate::particle::{LayerKind, ParticleLayer, RenderStyle};

/// Places `params.count` particles along a logarithmic-looking spiral.
///
/// `t = (i/N)^exponent` sets the radial profile, the angle winds
/// `turns` times, and jittered radii are clamped back into `[inner, outer]`.
/// Height, color and size follow the final radius.
pub fn disk_layer<R: Rng + ?Sized>(
    kind: LayerKind,
    params: &DiskParams,
    style: RenderStyle,
    policy: UpdatePolicy,
    rng: &mut R,
) -> Result<ParticleLayer> {
    params.validate(kind.label())?;

    let n = params.count;
    let span = params.outer - params.inner;
    let mut layer = ParticleLayer::new(kind, n, style, policy);

    for i in 0..n {
        let t = (i as f32 / n as f32).powf(params.exponent);
        let angle = t * params.turns * TAU + params.phase;
        let jitter = rng.gen_range(-params.radial_jitter..=params.radial_jitter);
        let radius = (params.inner + t * span + jitter).clamp(params.inner, params.outer);
        let envelope = vertical_envelope((radius - params.inner) / span);
        let y = (rng.gen::<f32>() - 0.5) * params.vertical_jitter * envelope;

        let heat = heat_at(radius, params.inner, params.outer, params.heat_gamma);
        let base_size = rng.gen_range(params.size_min..=params.size_max);
        layer.place(
            i,
            from_polar_xz(radius, angle, y),
            heat_color(heat),
            base_size,
            heat_size(base_size, heat, params.size_weight),
        );
    }

    Ok(layer)
}

/// Thin flat ring of uniform color, evenly spread in angle.
pub fn ring_layer<R: Rng + ?Sized>(
    kind: LayerKind,
    params: &RingParams,
    style: RenderStyle,
    policy: UpdatePolicy,
    rng: &mut R,
) -> Result<ParticleLayer> {
    params.validate(kind.label())?;

    let n = params.count;
    let mut layer = ParticleLayer::new(kind, n, style, policy);
    let half = params.thickness * 0.5;
    let slot = TAU / n.max(1) as f32;

    for i in 0..n {
        let angle = i as f32 * slot + rng.gen_range(0.0..=slot);
        let radius = rng.gen_range(params.inner..=params.outer);
        let y = rng.gen_range(-half..=half);
        layer.place(i, from_polar_xz(radius, angle, y), params.color, params.size, params.size);
    }

    Ok(layer)
}
