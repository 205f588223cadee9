//! Spherical shells (star field, core glow).

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::animation::UpdatePolicy;
use crate::config::ShellParams;
use crate::error::Result;
use crate::particle::{LayerKind, ParticleLayer, RenderStyle};

/// Uniform direction on the unit sphere, y up.
///
/// `phi = acos(2u - 1)` is what keeps the density even; sampling `phi`
/// uniformly would crowd the poles.
pub fn uniform_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin())
}

/// Fills a shell between `radius_min` and `radius_max` with uniformly
/// scattered particles of randomized brightness.
pub fn shell_layer<R: Rng + ?Sized>(
    kind: LayerKind,
    params: &ShellParams,
    style: RenderStyle,
    policy: UpdatePolicy,
    rng: &mut R,
) -> Result<ParticleLayer> {
    params.validate(kind.label())?;

    let mut layer = ParticleLayer::new(kind, params.count, style, policy);
    for i in 0..params.count {
        let radius = rng.gen_range(params.radius_min..=params.radius_max);
        let position = uniform_direction(rng) * radius;
        let brightness = 1.0 - params.tint_variance * rng.gen::<f32>();
        let color = (params.tint * brightness).clamp(Vec3::ZERO, Vec3::ONE);
        let size = rng.gen_range(params.size_min..=params.size_max);
        layer.place(i, position, color, size, size);
    }

    Ok(layer)
}
