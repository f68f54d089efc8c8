//! MiniLight renderer - progressive Monte Carlo path tracing.
//!
//! The engine implements unbiased global illumination over a triangle
//! soup with:
//! - Octree-accelerated ray/triangle intersection
//! - Recursive radiance estimation with next-event emitter sampling
//! - Cosine-weighted diffuse sampling and Russian-roulette termination
//! - Log-mean-luminance tone mapping to 8-bit PPM output

mod camera;
mod image;
mod rng;
mod scene;
mod spatial;
mod surface;
mod tracer;
mod triangle;

pub use camera::Camera;
pub use image::Image;
pub use rng::{real01, Lfsr113};
pub use scene::Scene;
pub use spatial::SpatialIndex;
pub use surface::SurfacePoint;
pub use tracer::RayTracer;
pub use triangle::Triangle;

/// Re-export the math types the engine's API speaks in.
pub use minilight_math::{Aabb, Ray, Vec3, EPSILON, TOLERANCE};

/// Color type alias (linear RGB radiance per channel).
pub type Color = Vec3;
