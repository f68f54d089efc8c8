use crate::Vec3;

/// Axis-aligned bounding box stored as lower/upper corners.
///
/// The corner form (rather than per-axis intervals) is what the octree's
/// midpoint arithmetic works on directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from lower and upper corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            min: box0.min.min(box1.min),
            max: box0.max.max(box1.max),
        }
    }

    /// Grow the AABB by `delta` on every face.
    pub fn expand(&self, delta: f64) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(delta),
            max: self.max + Vec3::splat(delta),
        }
    }

    /// Test whether a point lies inside the box (boundary inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Test whether two boxes overlap on every axis (touching counts).
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Expand a rectangular bound into a cube anchored at the lower corner,
    /// with side equal to the longest dimension.
    pub fn cubified(&self) -> Aabb {
        let side = self.size().max_element();
        Aabb {
            min: self.min,
            max: self.max.max(self.min + Vec3::splat(side)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 3.0), Vec3::new(0.0, 10.0, -3.0));

        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(10.0, 10.0, 3.0));
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.min, Vec3::ZERO);
        assert_eq!(surrounding.max, Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_expand_and_contains() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);

        assert!(aabb.contains(Vec3::splat(0.5)));
        assert!(aabb.contains(Vec3::ONE));
        assert!(!aabb.contains(Vec3::splat(1.001)));
        assert!(aabb.expand(0.01).contains(Vec3::splat(1.001)));
    }

    #[test]
    fn test_aabb_overlaps() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_points(Vec3::splat(1.0), Vec3::splat(3.0));
        let c = Aabb::from_points(Vec3::splat(2.5), Vec3::splat(4.0));

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        // Touching faces count as overlap
        let d = Aabb::from_points(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 1.0, 1.0));
        assert!(a.overlaps(&d));
    }

    #[test]
    fn test_aabb_cubified() {
        let aabb = Aabb::from_points(Vec3::new(1.0, 1.0, 1.0), Vec3::new(5.0, 2.0, 3.0));
        let cube = aabb.cubified();

        assert_eq!(cube.min, aabb.min);
        assert_eq!(cube.max, Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(cube.size(), Vec3::splat(4.0));
    }
}
