//! Scene ownership: triangles, the emitter sublist, the spatial index,
//! and the sky/ground background.

use minilight_math::{Ray, Vec3};
use rand::RngCore;

use crate::rng::real01;
use crate::spatial::SpatialIndex;
use crate::triangle::Triangle;
use crate::Color;

/// A complete scene, immutable once constructed.
pub struct Scene {
    sky_emission: Color,
    ground_reflection: Color,
    triangles: Vec<Triangle>,
    emitters: Vec<usize>,
    index: SpatialIndex,
}

impl Scene {
    /// Build a scene. `eye` is the camera position, folded into the
    /// spatial index bound so eye rays always start inside the octree.
    pub fn new(
        eye: Vec3,
        sky_emission: Vec3,
        ground_reflection: Vec3,
        triangles: Vec<Triangle>,
    ) -> Self {
        let sky_emission = sky_emission.max(Vec3::ZERO);
        let ground_reflection = ground_reflection.clamp(Vec3::ZERO, Vec3::ONE) * sky_emission;

        let emitters: Vec<usize> = triangles
            .iter()
            .enumerate()
            .filter(|(_, triangle)| triangle.is_emitter())
            .map(|(i, _)| i)
            .collect();
        let index = SpatialIndex::new(eye, &triangles);

        log::info!(
            "scene: {} triangles, {} emitters",
            triangles.len(),
            emitters.len()
        );

        Self {
            sky_emission,
            ground_reflection,
            triangles,
            emitters,
            index,
        }
    }

    /// Nearest triangle hit along `ray`, excluding `last_hit`.
    pub fn intersection(&self, ray: &Ray, last_hit: Option<usize>) -> Option<(usize, Vec3)> {
        self.index.intersection(ray, last_hit, &self.triangles)
    }

    /// Triangle lookup by the stable index used as hit identity.
    pub fn triangle(&self, id: usize) -> &Triangle {
        &self.triangles[id]
    }

    /// Pick an emitter uniformly and sample a point on it.
    pub fn emitter(&self, rng: &mut dyn RngCore) -> Option<(usize, Vec3)> {
        if self.emitters.is_empty() {
            return None;
        }
        let choice = (real01(rng) * self.emitters.len() as f64) as usize;
        let id = self.emitters[choice.min(self.emitters.len() - 1)];
        Some((id, self.triangles[id].sample_point(rng)))
    }

    /// Number of emitters, the weight of the uniform-selection estimator.
    pub fn emitters_count(&self) -> usize {
        self.emitters.len()
    }

    /// Background radiance seen along a missed ray.
    ///
    /// `back_direction` points from the miss toward the viewer, so a
    /// downward back-direction means the ray itself went up into the sky.
    pub fn default_emission(&self, back_direction: Vec3) -> Color {
        if back_direction.y < 0.0 {
            self.sky_emission
        } else {
            self.ground_reflection
        }
    }
}
