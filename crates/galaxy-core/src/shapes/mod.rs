//! Layer generators.
//!
//! Spiral disks and rings, spherical shells, flattened plane clouds and twin
//! jets, plus a dispatcher that assembles the full galaxy scene from a
//! [`FieldConfig`](crate::config::FieldConfig).
pub mod disk;
pub mod sphere;
pub mod nebula;
pub mod jet;
pub mod dispatcher;
