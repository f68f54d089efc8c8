//! Triangle primitive with its diffuse material.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use minilight_math::{Aabb, Ray, Vec3, EPSILON, TOLERANCE};
use rand::RngCore;

use crate::rng::real01;
use crate::Color;

/// A triangle with flat diffuse reflectivity and emissivity.
///
/// Reflectivity is clamped to [0,1] per channel and emissivity to >= 0
/// on construction, so every triangle in a scene satisfies the material
/// invariants regardless of what the model file said.
#[derive(Debug, Clone)]
pub struct Triangle {
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    reflectivity: Color,
    emissivity: Color,
}

impl Triangle {
    /// Create a new triangle from three vertices and its material.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, reflectivity: Vec3, emissivity: Vec3) -> Self {
        Self {
            v0,
            v1,
            v2,
            reflectivity: reflectivity.clamp(Vec3::ZERO, Vec3::ONE),
            emissivity: emissivity.max(Vec3::ZERO),
        }
    }

    /// Diffuse albedo per channel, in [0,1].
    pub fn reflectivity(&self) -> Color {
        self.reflectivity
    }

    /// Emitted radiance per channel, >= 0.
    pub fn emissivity(&self) -> Color {
        self.emissivity
    }

    fn edge0(&self) -> Vec3 {
        self.v1 - self.v0
    }

    fn edge1(&self) -> Vec3 {
        self.v2 - self.v1
    }

    fn edge3(&self) -> Vec3 {
        self.v2 - self.v0
    }

    /// Unit face normal, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        self.edge0().cross(self.edge1()).normalize_or_zero()
    }

    /// Unit tangent along the first edge.
    pub fn tangent(&self) -> Vec3 {
        self.edge0().normalize_or_zero()
    }

    /// Surface area; zero for colinear or coincident vertices.
    pub fn area(&self) -> f64 {
        0.5 * self.edge0().cross(self.edge1()).length()
    }

    /// An emitter has non-zero emissivity and non-zero area.
    pub fn is_emitter(&self) -> bool {
        self.emissivity != Vec3::ZERO && self.area() > 0.0
    }

    /// Axis-aligned bound, inflated by TOLERANCE on every face.
    pub fn bound(&self) -> Aabb {
        Aabb::new(
            self.v0.min(self.v1).min(self.v2),
            self.v0.max(self.v1).max(self.v2),
        )
        .expand(TOLERANCE)
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns the non-negative distance along the ray, or `None`.
    pub fn intersection(&self, ray: &Ray) -> Option<f64> {
        let e0 = self.edge0();
        let e3 = self.edge3();

        let p = ray.direction.cross(e3);
        let det = e0.dot(p);

        // Ray is parallel to the triangle plane
        if det.abs() < EPSILON {
            return None;
        }

        let inv = 1.0 / det;
        let to_origin = ray.origin - self.v0;
        let u = to_origin.dot(p) * inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = to_origin.cross(e0);
        let v = ray.direction.dot(q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e3.dot(q) * inv;
        if t < 0.0 {
            return None;
        }

        Some(t)
    }

    /// Sample a point uniformly over the triangle's area.
    pub fn sample_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let (r1, r2) = (real01(rng), real01(rng));
        let s = r1.sqrt();
        self.v0 + self.edge0() * (1.0 - s) + self.edge3() * ((1.0 - r2) * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Lfsr113;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::splat(0.5),
            Vec3::ZERO,
        )
    }

    #[test]
    fn test_material_clamping() {
        let triangle = Triangle::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(-0.5, 0.5, 7.0),
            Vec3::new(-3.0, 100.0, 0.0),
        );

        assert_eq!(triangle.reflectivity(), Vec3::new(0.0, 0.5, 1.0));
        assert_eq!(triangle.emissivity(), Vec3::new(0.0, 100.0, 0.0));
    }

    #[test]
    fn test_derived_geometry() {
        let triangle = unit_triangle();

        assert_eq!(triangle.normal(), Vec3::Z);
        assert_eq!(triangle.tangent(), Vec3::X);
        assert!((triangle.area() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bound_is_inflated() {
        let bound = unit_triangle().bound();

        assert!(bound.min.x < 0.0 && bound.min.x >= -TOLERANCE - 1e-12);
        assert!(bound.max.x > 1.0 && bound.max.x <= 1.0 + TOLERANCE + 1e-12);
        assert!(bound.contains(Vec3::ZERO));
    }

    #[test]
    fn test_intersection_hit() {
        let triangle = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let t = triangle.intersection(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_intersection_miss() {
        let triangle = unit_triangle();

        // Pointing away
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        assert!(triangle.intersection(&ray).is_none());

        // Outside the triangle (u + v > 1)
        let ray = Ray::new(Vec3::new(0.9, 0.9, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle.intersection(&ray).is_none());
    }

    #[test]
    fn test_edge_rule_is_consistent() {
        let triangle = unit_triangle();

        // v = 0 exactly: accepted (only v < 0 rejects)
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle.intersection(&ray).is_some());

        // u + v = 1 exactly on the diagonal edge: accepted
        let ray = Ray::new(Vec3::new(0.5, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle.intersection(&ray).is_some());

        // Just past the diagonal: rejected
        let ray = Ray::new(Vec3::new(0.5 + 1e-9, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle.intersection(&ray).is_none());
    }

    #[test]
    fn test_grazing_ray_rejected_without_nan() {
        // Ray lying in the triangle's plane, aimed along an edge
        let triangle = unit_triangle();
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X);

        assert!(triangle.intersection(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_is_not_emitter() {
        let triangle = Triangle::new(
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::Y,
            Vec3::splat(0.5),
            Vec3::splat(10.0),
        );

        assert_eq!(triangle.area(), 0.0);
        assert!(!triangle.is_emitter());

        let ray = Ray::new(Vec3::new(0.0, 0.5, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(triangle.intersection(&ray).is_none());
    }

    #[test]
    fn test_sample_point_stays_in_triangle() {
        let triangle = Triangle::new(
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(3.0, 1.0, 0.5),
            Vec3::new(0.0, 2.0, 1.0),
            Vec3::splat(0.5),
            Vec3::ZERO,
        );
        let mut rng = Lfsr113::new();

        for _ in 0..200 {
            let p = triangle.sample_point(&mut rng);

            // Solve for barycentric coordinates against the two edges
            let d = p - triangle.v0;
            let e0 = triangle.edge0();
            let e3 = triangle.edge3();
            let d00 = e0.dot(e0);
            let d03 = e0.dot(e3);
            let d33 = e3.dot(e3);
            let inv = 1.0 / (d00 * d33 - d03 * d03);
            let a = (d33 * d.dot(e0) - d03 * d.dot(e3)) * inv;
            let b = (d00 * d.dot(e3) - d03 * d.dot(e0)) * inv;
            let c = 1.0 - a - b;

            for coord in [a, b, c] {
                assert!((-1e-12..=1.0 + 1e-12).contains(&coord), "coord {coord}");
            }
        }
    }
}
