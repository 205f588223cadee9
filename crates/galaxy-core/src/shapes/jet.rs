//! Relativistic jets: two opposed cones along the spin axis.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::animation::UpdatePolicy;
use crate::config::JetParams;
use crate::error::Result;
use crate::math::smoothstep;
use crate::particle::{LayerKind, ParticleLayer, RenderStyle};

const JET_BASE: Vec3 = Vec3::new(0.6, 0.8, 1.0);
const JET_TIP: Vec3 = Vec3::new(0.1, 0.2, 0.6);

/// Even indices fire up (+y), odd indices down.
pub fn jet_layer<R: Rng + ?Sized>(
    kind: LayerKind,
    params: &JetParams,
    style: RenderStyle,
    policy: UpdatePolicy,
    rng: &mut R,
) -> Result<ParticleLayer> {
    params.validate(kind.label())?;

    let mut layer = ParticleLayer::new(kind, params.count, style, policy);
    for i in 0..params.count {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        let t = rng.gen::<f32>();
        let height = t * params.length;
        let cone = params.base_radius + height * params.spread;
        let r = cone * rng.gen::<f32>().sqrt();
        let angle = rng.gen_range(0.0..TAU);

        let fade = smoothstep(0.0, 1.0, t);
        let base_size = rng.gen_range(params.size_min..=params.size_max);
        layer.place(
            i,
            Vec3::new(r * angle.cos(), side * height, r * angle.sin()),
            JET_BASE.lerp(JET_TIP, fade),
            base_size,
            base_size * (1.0 - 0.5 * fade),
        );
    }

    Ok(layer)
}
