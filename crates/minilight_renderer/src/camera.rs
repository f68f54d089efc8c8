//! Camera: view frame construction and per-frame ray generation.

use minilight_math::Vec3;
use rand::RngCore;

use crate::image::Image;
use crate::rng::real01;
use crate::scene::Scene;
use crate::tracer::RayTracer;

/// View angle limits, degrees.
const VIEW_ANGLE_MIN: f64 = 10.0;
const VIEW_ANGLE_MAX: f64 = 160.0;

/// Pinhole camera with a cached orthonormal view frame.
pub struct Camera {
    view_position: Vec3,
    view_direction: Vec3,
    /// Full view angle, radians.
    view_angle: f64,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    /// Create a camera at `position` looking along `direction` with the
    /// given view angle in degrees.
    ///
    /// A zero direction falls back to +Z; the angle is clamped to
    /// [10, 160] degrees.
    pub fn new(position: Vec3, direction: Vec3, angle_degrees: f64) -> Self {
        let view_direction = {
            let unit = direction.normalize_or_zero();
            if unit == Vec3::ZERO {
                Vec3::Z
            } else {
                unit
            }
        };
        let view_angle = angle_degrees
            .clamp(VIEW_ANGLE_MIN, VIEW_ANGLE_MAX)
            .to_radians();

        // World Y is up, unless the view is vertical and the frame has
        // to be anchored to Z instead
        let right = Vec3::Y.cross(view_direction).normalize_or_zero();
        let (right, up) = if right != Vec3::ZERO {
            (right, view_direction.cross(right).normalize())
        } else {
            let up = Vec3::new(0.0, 0.0, if view_direction.y < 0.0 { 1.0 } else { -1.0 });
            (up.cross(view_direction).normalize(), up)
        };

        Self {
            view_position: position,
            view_direction,
            view_angle,
            right,
            up,
        }
    }

    /// Camera position; also the eye point the scene's octree must cover.
    pub fn position(&self) -> Vec3 {
        self.view_position
    }

    /// Full view angle in radians, after clamping.
    pub fn view_angle(&self) -> f64 {
        self.view_angle
    }

    /// Accumulate one frame: a jittered radiance sample for every pixel.
    pub fn frame(&self, scene: &Scene, rng: &mut dyn RngCore, image: &mut Image) {
        let tracer = RayTracer::new(scene);
        let (width, height) = (image.width(), image.height());
        let aspect = height as f64 / width as f64;
        let half_tan = (self.view_angle * 0.5).tan();

        for y in 0..height {
            for x in 0..width {
                // Sub-pixel jitter, one draw per dimension
                let x_coord = (x as f64 + real01(rng)) * 2.0 / width as f64 - 1.0;
                let y_coord = (y as f64 + real01(rng)) * 2.0 / height as f64 - 1.0;

                let offset = self.right * x_coord + self.up * (y_coord * aspect);
                let direction = (self.view_direction + offset * half_tan).normalize();

                let radiance = tracer.radiance(self.view_position, direction, rng, None);
                image.add_to_pixel(x, y, radiance);
            }
        }
    }
}
