use std::f32::consts::TAU;

use glam::Vec3;

/// Animation rates are tuned per frame at this refresh rate.
pub const REFERENCE_FPS: f32 = 60.0;

/// Fractional part, always in `[0, 1)` (GLSL `fract`, not `f32::fract`).
#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Hash float to [0,1] - port of GLSL hash11
pub fn hash11(p: f32) -> f32 {
    let mut p = fract(p * 0.1031);
    p *= p + 33.33;
    p *= p + p;
    fract(p)
}

/// Smooth interpolation - port of GLSL smoothstep
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Radius and angle of `p` projected onto the xz (disk) plane.
#[inline]
pub fn polar_xz(p: Vec3) -> (f32, f32) {
    (p.x.hypot(p.z), p.z.atan2(p.x))
}

/// Inverse of [`polar_xz`], keeping the given height.
#[inline]
pub fn from_polar_xz(radius: f32, angle: f32, y: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(cos * radius, y, sin * radius)
}

/// Vertical spread multiplier at normalized disk radius `t`: zero at the
/// inner edge, one at the rim.
#[inline]
pub fn vertical_envelope(t: f32) -> f32 {
    1.0 - (1.0 - t.clamp(0.0, 1.0)).powi(2)
}

/// `time * frequency` reduced modulo `period` before narrowing to f32, so a
/// phase keeps sub-frame resolution however long the clock has run.
#[inline]
pub fn wrapped_phase(time: f64, frequency: f32, period: f64) -> f32 {
    (time * f64::from(frequency)).rem_euclid(period) as f32
}

/// Euler angles folded into `[0, 2π)`.
#[inline]
pub fn wrap_angles(v: Vec3) -> Vec3 {
    Vec3::new(v.x.rem_euclid(TAU), v.y.rem_euclid(TAU), v.z.rem_euclid(TAU))
}

/// Converts a wall-clock delta into reference frames (1.0 == one 60 Hz frame).
#[inline]
pub fn frames_elapsed(delta_seconds: f32) -> f32 {
    delta_seconds * REFERENCE_FPS
}
