//! Local surface shading at a ray hit.

use minilight_math::Vec3;
use rand::RngCore;
use std::f64::consts::PI;

use crate::rng::real01;
use crate::triangle::Triangle;
use crate::Color;

/// An ephemeral (triangle, position) pair with the local shading model.
///
/// Carries the triangle's scene index so callers can thread hit identity
/// back into intersection queries as `last_hit`.
pub struct SurfacePoint<'a> {
    triangle: &'a Triangle,
    id: usize,
    position: Vec3,
}

impl<'a> SurfacePoint<'a> {
    pub fn new(triangle: &'a Triangle, id: usize, position: Vec3) -> Self {
        Self {
            triangle,
            id,
            position,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn triangle_id(&self) -> usize {
        self.id
    }

    /// Emitted radiance toward `to_position` along `out_direction` (unit,
    /// from this surface). Only the front face emits.
    ///
    /// With `is_solid_angle` the emission is weighted by the solid angle
    /// this triangle subtends at `to_position`, which is what an
    /// area-sampled emitter query needs.
    pub fn emission(&self, to_position: Vec3, out_direction: Vec3, is_solid_angle: bool) -> Color {
        let separation = to_position - self.position;
        let distance2 = separation.dot(separation);
        let cos_area = out_direction.dot(self.triangle.normal()) * self.triangle.area();

        if cos_area <= 0.0 {
            return Vec3::ZERO;
        }

        let solid_angle = if is_solid_angle {
            // Bounded below to keep very near queries finite
            cos_area / distance2.max(1e-6)
        } else {
            1.0
        };
        self.triangle.emissivity() * solid_angle
    }

    /// Diffuse reflection of `in_radiance` arriving along `in_direction`
    /// back out along `out_direction` (both unit).
    pub fn reflection(&self, in_direction: Vec3, in_radiance: Color, out_direction: Vec3) -> Color {
        let normal = self.triangle.normal();
        let in_dot = in_direction.dot(normal);
        let out_dot = out_direction.dot(normal);

        // Directions on opposite sides would be transmission, which a
        // diffuse surface does not do
        if (in_dot < 0.0) != (out_dot < 0.0) {
            return Vec3::ZERO;
        }

        in_radiance * self.triangle.reflectivity() * (in_dot.abs() / PI)
    }

    /// Sample the direction of the next path segment, or `None` when
    /// Russian roulette terminates the path.
    ///
    /// Returns the unit direction and the path throughput scale. The
    /// cosine-weighted density cancels the BRDF's cosine and 1/pi terms,
    /// leaving reflectivity over its mean as the scale.
    pub fn next_direction(
        &self,
        in_direction: Vec3,
        rng: &mut dyn RngCore,
    ) -> Option<(Vec3, Color)> {
        let reflectivity = self.triangle.reflectivity();
        let mean = (reflectivity.x + reflectivity.y + reflectivity.z) / 3.0;

        // Russian roulette: continue with probability `mean`
        if real01(rng) >= mean {
            return None;
        }
        let color = reflectivity / mean;

        // Cosine-weighted hemisphere sample
        let (u1, u2) = (real01(rng), real01(rng));
        let phi = 2.0 * PI * u1;
        let s = u2.sqrt();
        let (x, y, z) = (phi.cos() * s, phi.sin() * s, (1.0 - u2).sqrt());

        // Frame about the normal oriented to the incoming side
        let normal = self.triangle.normal();
        let normal = if normal.dot(in_direction) >= 0.0 {
            normal
        } else {
            -normal
        };
        let tangent = self.triangle.tangent();
        let out_direction = tangent * x + normal.cross(tangent) * y + normal * z;

        if out_direction == Vec3::ZERO {
            return None;
        }
        Some((out_direction, color))
    }
}
