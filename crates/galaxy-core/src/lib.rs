//! Procedural galaxy / black hole particle field for a web page background.
//!
//! Layers are generated once from closed-form placement formulas
//! ([`shapes`]) and then mutated in place every display frame
//! ([`animation`]). [`field::ParticleField`] ties them together; the
//! renderer reads flat buffers straight out of each [`particle::ParticleLayer`].

pub mod animation;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod math;
pub mod particle;
pub mod shapes;
pub mod trail;

pub use error::{FieldError, Result};
pub use field::ParticleField;
