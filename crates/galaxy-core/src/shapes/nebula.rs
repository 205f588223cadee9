//! Flattened disks hugging the galactic plane (nebula clouds, cosmic dust).

use std::f32::consts::TAU;

use rand::Rng;

use crate::animation::UpdatePolicy;
use crate::config::FlatDiskParams;
use crate::error::Result;
use crate::particle::{LayerKind, ParticleLayer, RenderStyle};

pub fn flat_disk_layer<R: Rng + ?Sized>(
    kind: LayerKind,
    params: &FlatDiskParams,
    style: RenderStyle,
    policy: UpdatePolicy,
    rng: &mut R,
) -> Result<ParticleLayer> {
    params.validate(kind.label())?;

    let [near, far] = params.palette;
    let mut layer = ParticleLayer::new(kind, params.count, style, policy);
    for i in 0..params.count {
        let radius = rng.gen_range(params.radius_min..=params.radius_max);
        let theta = rng.gen_range(0.0..TAU);
        let phi = rng.gen_range(0.0..TAU);
        let position = glam::Vec3::new(
            radius * theta.cos(),
            radius * phi.sin() * params.flatten,
            radius * theta.sin(),
        );
        let color = near.lerp(far, rng.gen::<f32>());
        let size = rng.gen_range(params.size_min..=params.size_max);
        layer.place(i, position, color, size, size);
    }

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::error::FieldError;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_height_bounded_by_flatten() {
        let mut rng = SmallRng::seed_from_u64(9);
        let params = FieldConfig::default().nebula;
        let style = RenderStyle::default();
        let policy = UpdatePolicy::Static;
        let layer = flat_disk_layer(LayerKind::Nebula, &params, style, policy, &mut rng).unwrap();
        assert_eq!(layer.count, params.count);
        for p in &layer.position {
            let planar = p.x.hypot(p.z);
            assert!(p.y.abs() <= planar * params.flatten + 1e-3, "{:?} too far off the plane", p);
            assert!(planar >= params.radius_min - 1e-3 && planar <= params.radius_max + 1e-3);
        }
    }

    #[test]
    fn test_degenerate_radii_rejected() {
        let mut rng = SmallRng::seed_from_u64(9);
        let base = FieldConfig::default().dust;
        for (min, max) in [(20.0, 20.0), (-50.0, -10.0), (-5.0, 10.0)] {
            let params = FlatDiskParams {
                radius_min: min,
                radius_max: max,
                ..base
            };
            let style = RenderStyle::default();
            let policy = UpdatePolicy::Static;
            let result = flat_disk_layer(LayerKind::CosmicDust, &params, style, policy, &mut rng);
            assert!(
                matches!(result, Err(FieldError::InvalidRadius { layer: "cosmic-dust", .. })),
                "[{}, {}] should be rejected",
                min,
                max
            );
        }
    }
}
