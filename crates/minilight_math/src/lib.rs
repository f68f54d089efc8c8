//! MiniLight math - vectors, rays and bounding boxes.
//!
//! Radiance accumulates over thousands of samples, so the whole pipeline
//! works in double precision: `glam`'s `DVec3` is re-exported as the
//! workspace-wide `Vec3`.

pub use glam::DVec3 as Vec3;

mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;

/// Numerical slack for bounding volumes and containment tests.
pub const TOLERANCE: f64 = 1.0 / 1024.0;

/// Determinant cutoff below which a ray counts as parallel to a triangle.
pub const EPSILON: f64 = 1.0 / 1_048_576.0;
