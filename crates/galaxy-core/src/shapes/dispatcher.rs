//! Scene assembly: picks a generator, style and update policy per layer.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::animation::{OrbitParams, UpdatePolicy};
use crate::config::FieldConfig;
use crate::error::Result;
use crate::particle::{Blending, LayerKind, ParticleLayer, RenderStyle};
use crate::shapes::disk::{disk_layer, ring_layer};
use crate::shapes::jet::jet_layer;
use crate::shapes::nebula::flat_disk_layer;
use crate::shapes::sphere::shell_layer;

/// Orbital policy of the accretion disk, combining its shape and motion settings.
pub fn disk_orbit(config: &FieldConfig) -> OrbitParams {
    OrbitParams {
        inner: config.disk.inner,
        outer: config.disk.outer,
        heat_gamma: config.disk.heat_gamma,
        size_weight: config.disk.size_weight,
        orbital_speed: config.disk_motion.orbital_speed,
        inward_speed: config.disk_motion.inward_speed,
        progress_boost: config.disk_motion.progress_boost,
        vertical_jitter: config.disk.vertical_jitter,
    }
}

/// Material per layer kind.
pub fn style_for(kind: LayerKind) -> RenderStyle {
    let (point_size, blending, opacity) = match kind {
        LayerKind::AccretionDisk => (0.3, Blending::Additive, 0.9),
        LayerKind::SpiralArm(_) => (0.2, Blending::Additive, 0.8),
        LayerKind::Nebula => (1.0, Blending::Additive, 0.35),
        LayerKind::StarField => (0.7, Blending::Normal, 0.8),
        LayerKind::CosmicDust => (0.1, Blending::Normal, 0.5),
        LayerKind::Jet => (0.25, Blending::Additive, 0.6),
        LayerKind::CoreGlow => (0.5, Blending::Additive, 0.7),
        LayerKind::PhotonRing => (0.15, Blending::Additive, 0.9),
    };
    RenderStyle {
        point_size,
        blending,
        opacity,
        size_attenuation: true,
    }
}

/// Generates one layer of the given kind.
pub fn build_layer<R: Rng + ?Sized>(
    kind: LayerKind,
    config: &FieldConfig,
    rng: &mut R,
) -> Result<ParticleLayer> {
    let style = style_for(kind);
    let spin = Vec3::Y * config.galaxy_spin;

    let layer = match kind {
        LayerKind::AccretionDisk => disk_layer(
            kind,
            &config.disk,
            style,
            UpdatePolicy::Orbital(disk_orbit(config)),
            rng,
        )?,
        LayerKind::SpiralArm(arm) => {
            let arms = config.arms.arm_count.max(1) as f32;
            let mut params = config.arms.disk;
            params.phase += arm as f32 / arms * TAU;
            let policy = UpdatePolicy::Drift(config.arms.drift);
            disk_layer(kind, &params, style, policy, rng)?.with_spin(spin)
        }
        LayerKind::Nebula => {
            let policy = UpdatePolicy::Static;
            flat_disk_layer(kind, &config.nebula, style, policy, rng)?.with_spin(spin * 0.5)
        }
        LayerKind::CosmicDust => {
            let policy = UpdatePolicy::Drift(config.dust_drift);
            flat_disk_layer(kind, &config.dust, style, policy, rng)?.with_spin(spin)
        }
        LayerKind::StarField => {
            let policy = UpdatePolicy::Twinkle(config.twinkle);
            shell_layer(kind, &config.stars, style, policy, rng)?.with_spin(spin * 0.1)
        }
        LayerKind::Jet => {
            let policy = UpdatePolicy::Pulse(config.jet_pulse);
            jet_layer(kind, &config.jets, style, policy, rng)?
        }
        LayerKind::CoreGlow => {
            let policy = UpdatePolicy::Pulse(config.glow_pulse);
            shell_layer(kind, &config.core_glow, style, policy, rng)?
        }
        LayerKind::PhotonRing => {
            let policy = UpdatePolicy::Pulse(config.ring_pulse);
            ring_layer(kind, &config.photon_ring, style, policy, rng)?
        }
    };

    Ok(layer)
}

/// Layer kinds of the full scene, back to front.
pub fn scene_kinds(config: &FieldConfig) -> Vec<LayerKind> {
    let mut kinds = vec![LayerKind::StarField, LayerKind::Nebula, LayerKind::CosmicDust];
    kinds.extend((0..config.arms.arm_count).map(LayerKind::SpiralArm));
    kinds.extend([
        LayerKind::Jet,
        LayerKind::AccretionDisk,
        LayerKind::PhotonRing,
        LayerKind::CoreGlow,
    ]);
    kinds
}

/// Validates `config` and generates every layer of the scene.
pub fn build_layers<R: Rng + ?Sized>(
    config: &FieldConfig,
    rng: &mut R,
) -> Result<Vec<ParticleLayer>> {
    config.validate()?;
    scene_kinds(config)
        .into_iter()
        .map(|kind| build_layer(kind, config, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_scene_has_one_layer_per_kind() {
        let config = FieldConfig::default();
        let kinds = scene_kinds(&config);
        assert_eq!(kinds.len(), 3 + config.arms.arm_count as usize + 4);
        let names: std::collections::HashSet<String> = kinds.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), kinds.len(), "layer names must be unique");
    }

    #[test]
    fn test_policies_match_roles() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut config = FieldConfig::default().scaled(0.05);
        config.arms.arm_count = 2;
        let layers = build_layers(&config, &mut rng).unwrap();
        for layer in &layers {
            let ok = match (layer.kind, layer.policy) {
                (LayerKind::AccretionDisk, UpdatePolicy::Orbital(_)) => true,
                (LayerKind::SpiralArm(_) | LayerKind::CosmicDust, UpdatePolicy::Drift(_)) => true,
                (LayerKind::StarField, UpdatePolicy::Twinkle(_)) => true,
                (LayerKind::Nebula, UpdatePolicy::Static) => true,
                (
                    LayerKind::Jet | LayerKind::CoreGlow | LayerKind::PhotonRing,
                    UpdatePolicy::Pulse(_),
                ) => true,
                _ => false,
            };
            assert!(ok, "{} has unexpected policy {:?}", layer.name(), layer.policy);
        }
    }

    #[test]
    fn test_arms_are_phase_shifted() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut config = FieldConfig::default();
        config.arms.disk.radial_jitter = 0.0;
        config.arms.disk.count = 10;
        let a = build_layer(LayerKind::SpiralArm(0), &config, &mut rng).unwrap();
        let b = build_layer(LayerKind::SpiralArm(1), &config, &mut rng).unwrap();
        let (ra, _) = crate::math::polar_xz(a.position[0]);
        let (rb, _) = crate::math::polar_xz(b.position[0]);
        assert!((ra - rb).abs() < 1e-4);
        assert!((a.position[0] - b.position[0]).length() > 1.0);
    }
}
