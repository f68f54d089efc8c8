//! Recursive radiance estimator.
//!
//! Combines BRDF-sampled recursion with explicit emitter sampling
//! (next-event estimation). Russian roulette in the surface sampler
//! terminates paths, so there is no fixed depth cap.

use minilight_math::{Ray, Vec3};
use rand::RngCore;

use crate::scene::Scene;
use crate::surface::SurfacePoint;
use crate::Color;

/// Path-tracing radiance estimator over a scene.
pub struct RayTracer<'a> {
    scene: &'a Scene,
}

impl<'a> RayTracer<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }

    /// Estimate the radiance arriving at `origin` from `-direction`.
    ///
    /// `last_hit` is the triangle the ray originates on, if any; it is
    /// excluded from intersection and switches emitter accounting to the
    /// explicit sample (counting surface emission again here would
    /// double it).
    pub fn radiance(
        &self,
        origin: Vec3,
        direction: Vec3,
        rng: &mut dyn RngCore,
        last_hit: Option<usize>,
    ) -> Color {
        let ray = Ray::new(origin, direction);
        let (id, position) = match self.scene.intersection(&ray, last_hit) {
            Some(hit) => hit,
            None => return self.scene.default_emission(-direction),
        };
        let surface = SurfacePoint::new(self.scene.triangle(id), id, position);

        let local_emission = match last_hit {
            None => surface.emission(origin, -direction, false),
            Some(_) => Vec3::ZERO,
        };

        let illumination = self.emitter_sample(direction, &surface, rng);

        let reflection = match surface.next_direction(-direction, rng) {
            Some((next_direction, color)) => {
                color * self.radiance(surface.position(), next_direction, rng, Some(id))
            }
            None => Vec3::ZERO,
        };

        reflection + illumination + local_emission
    }

    /// Direct lighting at `surface` from one uniformly chosen emitter.
    fn emitter_sample(
        &self,
        direction: Vec3,
        surface: &SurfacePoint,
        rng: &mut dyn RngCore,
    ) -> Color {
        let (emitter_id, emitter_position) = match self.scene.emitter(rng) {
            Some(emitter) => emitter,
            None => return Vec3::ZERO,
        };
        let emit_direction = (emitter_position - surface.position()).normalize_or_zero();
        if emit_direction == Vec3::ZERO {
            return Vec3::ZERO;
        }

        // The shadow ray must reach the chosen emitter, or nothing at all
        let shadow_ray = Ray::new(surface.position(), emit_direction);
        let unshadowed = match self
            .scene
            .intersection(&shadow_ray, Some(surface.triangle_id()))
        {
            None => true,
            Some((hit_id, _)) => hit_id == emitter_id,
        };
        if !unshadowed {
            return Vec3::ZERO;
        }

        let emitter = SurfacePoint::new(self.scene.triangle(emitter_id), emitter_id, emitter_position);
        let emission_in = emitter.emission(surface.position(), -emit_direction, true);

        // Scaling by the emitter count unbiases the uniform selection
        surface.reflection(
            emit_direction,
            emission_in * self.scene.emitters_count() as f64,
            -direction,
        )
    }
}
