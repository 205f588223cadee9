use galaxy_core::config::{FieldConfig, Viewport};
use galaxy_core::particle::ParticleLayer;
use galaxy_core::{FieldError, ParticleField};

fn desktop() -> Viewport {
    Viewport::new(1920.0, 1080.0).unwrap()
}

fn field(seed: u64) -> ParticleField {
    ParticleField::with_seed(FieldConfig::default().scaled(0.1), desktop(), seed).unwrap()
}

fn snapshot(layer: &ParticleLayer) -> Vec<u32> {
    layer
        .positions_flat()
        .iter()
        .chain(layer.colors_flat())
        .chain(layer.sizes())
        .chain(layer.rotation.to_array().iter())
        .chain([layer.scale, layer.opacity].iter())
        .map(|v| v.to_bits())
        .collect()
}

#[test]
fn test_all_layers_have_parallel_arrays() {
    let field = field(1);
    assert!(!field.layers().is_empty());
    for layer in field.layers() {
        assert!(layer.is_consistent(), "{} arrays out of step", layer.name());
        assert_eq!(layer.positions_flat().len(), layer.count * 3);
        assert_eq!(layer.colors_flat().len(), layer.count * 3);
    }
}

#[test]
fn test_zero_delta_changes_nothing() {
    let mut field = field(2);
    for _ in 0..30 {
        field.step(1.0 / 60.0);
    }
    let before: Vec<Vec<u32>> = field.layers().iter().map(snapshot).collect();
    let frame = field.frame();

    let stats = field.step(0.0);
    field.step(-0.016);
    field.step(f32::NAN);

    assert_eq!(stats.delta, 0.0);
    assert_eq!(field.frame(), frame);
    let after: Vec<Vec<u32>> = field.layers().iter().map(snapshot).collect();
    assert_eq!(before, after, "zero-delta update must be bit-for-bit idempotent");
}

#[test]
fn test_counts_stable_over_many_frames() {
    let mut field = field(3);
    let counts: Vec<usize> = field.layers().iter().map(|l| l.count).collect();
    field.set_progress(0.8);
    for _ in 0..600 {
        field.step(1.0 / 60.0);
    }
    let after: Vec<usize> = field.layers().iter().map(|l| l.count).collect();
    assert_eq!(counts, after);
    assert!(field.layers().iter().all(|l| l.is_consistent()));
    assert!(field.total_respawns() > 0);
}

#[test]
fn test_same_seed_same_field() {
    let mut a = field(9);
    let mut b = field(9);
    for _ in 0..20 {
        a.step(0.016);
        b.step(0.016);
    }
    let sa: Vec<Vec<u32>> = a.layers().iter().map(snapshot).collect();
    let sb: Vec<Vec<u32>> = b.layers().iter().map(snapshot).collect();
    assert_eq!(sa, sb);
}

#[test]
fn test_lookup_by_name_and_uniform() {
    let mut field = field(4);
    field.step(0.5);
    let ring = field.layer("photon-ring").expect("photon ring layer");
    let uniform = ring.uniform();
    assert_eq!(uniform.point_size, ring.style.point_size);
    assert!(uniform.opacity > 0.0 && uniform.opacity <= 1.0);
    assert_eq!(bytemuck::bytes_of(&uniform).len(), 32);
    assert!(field.layer("spiral-arm-0").is_some());
    assert!(field.layer("comet").is_none());
}

#[test]
fn test_spinning_layers_rotate_with_time() {
    let mut field = field(5);
    field.step(0.05);
    let nebula = field.layer("nebula").unwrap();
    assert!(nebula.rotation.y > 0.0);
    let disk = field.layer("accretion-disk").unwrap();
    assert_eq!(disk.rotation.y, 0.0, "the disk moves its particles, not its frame");
}

#[test]
fn test_invalid_config_fails_at_construction() {
    let mut config = FieldConfig::default();
    config.arms.disk.inner = 50.0;
    let err = ParticleField::with_seed(config, desktop(), 1).err();
    assert_eq!(
        err,
        Some(FieldError::InvalidRadius {
            layer: "spiral-arm",
            inner: 50.0,
            outer: 40.0,
        })
    );
}

#[test]
fn test_empty_layers_are_tolerated() {
    let mut config = FieldConfig::default().scaled(0.0);
    config.arms.arm_count = 0;
    let mut field = ParticleField::with_seed(config, desktop(), 6).unwrap();
    assert_eq!(field.particle_count(), 0);
    let stats = field.step(1.0 / 60.0);
    assert_eq!(stats.respawned, 0);
    assert_eq!(field.frame(), 1);
}
