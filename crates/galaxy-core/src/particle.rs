use glam::Vec3;

use crate::animation::UpdatePolicy;

/// Visual role of a layer. Determines its name and, through the generator,
/// its update policy.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum LayerKind {
    AccretionDisk,
    SpiralArm(u8),
    Nebula,
    StarField,
    CosmicDust,
    Jet,
    CoreGlow,
    PhotonRing,
}

impl LayerKind {
    /// Name shared by every layer of this kind (all arms are `spiral-arm`).
    pub fn label(&self) -> &'static str {
        match self {
            LayerKind::AccretionDisk => "accretion-disk",
            LayerKind::SpiralArm(_) => "spiral-arm",
            LayerKind::Nebula => "nebula",
            LayerKind::StarField => "star-field",
            LayerKind::CosmicDust => "cosmic-dust",
            LayerKind::Jet => "jet",
            LayerKind::CoreGlow => "core-glow",
            LayerKind::PhotonRing => "photon-ring",
        }
    }

    /// Unique layer name, e.g. `spiral-arm-2`.
    pub fn name(&self) -> String {
        match self {
            LayerKind::SpiralArm(n) => format!("spiral-arm-{n}"),
            other => other.label().to_string(),
        }
    }
}

/// One particle, copied out of a layer's parallel arrays.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Particle {
    pub position: Vec3,
    pub color: Vec3,
    pub size: f32,
}

/// Compositing mode, numbered to match the renderer's blend enum.
#[repr(u32)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Blending {
    Normal = 0,
    Additive = 1,
}

/// Material settings shared by every particle in a layer.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RenderStyle {
    pub point_size: f32,
    pub blending: Blending,
    pub opacity: f32,
    pub size_attenuation: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            point_size: 0.3,
            blending: Blending::Additive,
            opacity: 0.9,
            size_attenuation: true,
        }
    }
}

/// SoA particle storage for one visual layer.
///
/// All per-particle vectors have `count` entries; index `i` is the same
/// particle in every one of them.
pub struct ParticleLayer {
    pub kind: LayerKind,
    pub count: usize,
    pub position: Vec<Vec3>,
    pub color: Vec<Vec3>,
    pub size: Vec<f32>,
    /// Rest position drift offsets are measured from.
    pub base_position: Vec<Vec3>,
    /// Untwinkled color.
    pub base_color: Vec<Vec3>,
    /// Random size before heat weighting.
    pub base_size: Vec<f32>,
    pub style: RenderStyle,
    pub policy: UpdatePolicy,
    /// Whole-layer spin in radians per second, applied as a rotation, never to particles.
    pub spin: Vec3,
    /// Accumulated whole-layer Euler rotation in radians.
    pub rotation: Vec3,
    /// Whole-layer uniform scale (pulse target).
    pub scale: f32,
    /// Current opacity; starts at `style.opacity`, pulse layers modulate it.
    pub opacity: f32,
}

impl ParticleLayer {
    pub fn new(kind: LayerKind, count: usize, style: RenderStyle, policy: UpdatePolicy) -> Self {
        Self {
            kind,
            count,
            position: vec![Vec3::ZERO; count],
            color: vec![Vec3::ONE; count],
            size: vec![style.point_size; count],
            base_position: vec![Vec3::ZERO; count],
            base_color: vec![Vec3::ONE; count],
            base_size: vec![style.point_size; count],
            style,
            policy,
            spin: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            opacity: style.opacity,
        }
    }

    pub fn with_spin(mut self, spin: Vec3) -> Self {
        self.spin = spin;
        self
    }

    pub fn name(&self) -> String {
        self.kind.name()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Writes particle `i` and records it as that particle's rest state.
    pub fn place(&mut self, i: usize, position: Vec3, color: Vec3, base_size: f32, size: f32) {
        self.position[i] = position;
        self.base_position[i] = position;
        self.color[i] = color;
        self.base_color[i] = color;
        self.base_size[i] = base_size;
        self.size[i] = size;
    }

    pub fn get(&self, i: usize) -> Option<Particle> {
        if i >= self.count {
            return None;
        }
        Some(Particle {
            position: self.position[i],
            color: self.color[i],
            size: self.size[i],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.count).filter_map(|i| self.get(i))
    }

    /// True when every per-particle vector has `count` entries.
    pub fn is_consistent(&self) -> bool {
        let n = self.count;
        self.position.len() == n
            && self.color.len() == n
            && self.size.len() == n
            && self.base_position.len() == n
            && self.base_color.len() == n
            && self.base_size.len() == n
    }

    /// Positions as a flat `[x, y, z, x, y, z, ...]` slice for the renderer.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.position)
    }

    /// Colors as a flat `[r, g, b, ...]` slice.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.color)
    }

    pub fn sizes(&self) -> &[f32] {
        &self.size
    }

    /// Per-layer uniform block for the renderer.
    pub fn uniform(&self) -> LayerUniform {
        LayerUniform {
            rotation: self.rotation.to_array(),
            scale: self.scale,
            opacity: self.opacity,
            point_size: self.style.point_size,
            blending: self.style.blending as u32,
            size_attenuation: self.style.size_attenuation as u32,
        }
    }
}

/// GPU-compatible layer transform: 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LayerUniform {
    pub rotation: [f32; 3], // 12 bytes
    pub scale: f32,         //  4 bytes
    pub opacity: f32,       //  4 bytes
    pub point_size: f32,    //  4 bytes
    pub blending: u32,      //  4 bytes
    pub size_attenuation: u32, //  4 bytes
}
