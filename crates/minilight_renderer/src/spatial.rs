//! Octree spatial index for ray/triangle intersection acceleration.
//!
//! Cells are a tagged variant: a branch of eight optional children or a
//! leaf holding triangle indices. Nearest-hit queries walk the subcells
//! in the order the ray crosses their interior partitions, so the first
//! accepted hit is the nearest one.

use minilight_math::{Aabb, Ray, Vec3, TOLERANCE};

use crate::triangle::Triangle;

/// Item count a cell tolerates before it subdivides.
const MAX_ITEMS: usize = 8;

/// Hard subdivision depth cap.
const MAX_LEVELS: u32 = 44;

enum CellKind {
    /// Eight optional subcells, indexed by octant bits (bit m set selects
    /// the high half on axis m). Empty octants stay `None`.
    Branch([Option<Box<Cell>>; 8]),
    /// Flat list of triangle indices into the scene array.
    Leaf(Vec<usize>),
}

struct Cell {
    bound: Aabb,
    kind: CellKind,
}

/// Octree over a scene's triangles.
///
/// The root is cubical: the rectangular bound enveloping the eye point
/// and every item, expanded to a cube anchored at its lower corner.
pub struct SpatialIndex {
    root: Cell,
}

impl SpatialIndex {
    /// Build the index over `triangles`, with `eye` guaranteed inside
    /// the root so camera rays always start within the tree.
    pub fn new(eye: Vec3, triangles: &[Triangle]) -> Self {
        let mut bound = Aabb::new(eye, eye);
        for triangle in triangles {
            bound = Aabb::surrounding(&bound, &triangle.bound());
        }
        let bound = bound.cubified();

        let items: Vec<usize> = (0..triangles.len()).collect();
        let root = Cell::build(bound, items, 0, triangles);
        log::debug!(
            "octree over {} triangles, depth {}, root side {:.3}",
            triangles.len(),
            root.depth(),
            bound.size().x
        );

        Self { root }
    }

    /// Number of cell levels actually built, counting the root.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    /// Find the nearest triangle hit along `ray`, excluding `last_hit`.
    ///
    /// `last_hit` is the identity (index) of the triangle the ray
    /// originates on, refused to prevent self-intersection.
    pub fn intersection(
        &self,
        ray: &Ray,
        last_hit: Option<usize>,
        triangles: &[Triangle],
    ) -> Option<(usize, Vec3)> {
        self.root.intersection(ray, last_hit, ray.origin, triangles)
    }
}

/// Bound of octant `k` within `bound` split at `mid`.
fn subcell_bound(bound: &Aabb, mid: Vec3, k: usize) -> Aabb {
    let lo = bound.min.to_array();
    let hi = bound.max.to_array();
    let mid = mid.to_array();

    let mut min = [0.0; 3];
    let mut max = [0.0; 3];
    for axis in 0..3 {
        if (k >> axis) & 1 == 1 {
            min[axis] = mid[axis];
            max[axis] = hi[axis];
        } else {
            min[axis] = lo[axis];
            max[axis] = mid[axis];
        }
    }
    Aabb::new(Vec3::from_array(min), Vec3::from_array(max))
}

impl Cell {
    fn build(bound: Aabb, items: Vec<usize>, level: u32, triangles: &[Triangle]) -> Cell {
        if items.len() <= MAX_ITEMS || level >= MAX_LEVELS - 1 {
            return Cell {
                bound,
                kind: CellKind::Leaf(items),
            };
        }

        let mid = bound.centroid();
        let mut children: [Option<Box<Cell>>; 8] = std::array::from_fn(|_| None);

        // Subdivision must be curtailed when it stops separating items:
        // more than one child inheriting the parent's whole set, or a
        // subcell too thin to split further, forces leaves next level.
        let mut full_inheritances = 0;
        let too_thin = (mid.x - bound.min.x) < 4.0 * TOLERANCE;

        for (k, child) in children.iter_mut().enumerate() {
            let sub = subcell_bound(&bound, mid, k);
            let sub_items: Vec<usize> = items
                .iter()
                .copied()
                .filter(|&i| triangles[i].bound().overlaps(&sub))
                .collect();

            if sub_items.len() == items.len() {
                full_inheritances += 1;
            }
            if sub_items.is_empty() {
                continue;
            }

            let next_level = if full_inheritances > 1 || too_thin {
                MAX_LEVELS
            } else {
                level + 1
            };
            *child = Some(Box::new(Cell::build(sub, sub_items, next_level, triangles)));
        }

        Cell {
            bound,
            kind: CellKind::Branch(children),
        }
    }

    /// Levels in this subtree, counting this cell.
    fn depth(&self) -> u32 {
        match &self.kind {
            CellKind::Leaf(_) => 1,
            CellKind::Branch(children) => {
                1 + children
                    .iter()
                    .flatten()
                    .map(|child| child.depth())
                    .max()
                    .unwrap_or(0)
            }
        }
    }

    /// Nearest hit within this cell, entered at `start` (a point known to
    /// lie within the cell; the ray origin at the root).
    fn intersection(
        &self,
        ray: &Ray,
        last_hit: Option<usize>,
        start: Vec3,
        triangles: &[Triangle],
    ) -> Option<(usize, Vec3)> {
        match &self.kind {
            CellKind::Leaf(items) => self.leaf_intersection(ray, last_hit, items, triangles),
            CellKind::Branch(children) => {
                self.walk_intersection(ray, last_hit, start, children, triangles)
            }
        }
    }

    fn leaf_intersection(
        &self,
        ray: &Ray,
        last_hit: Option<usize>,
        items: &[usize],
        triangles: &[Triangle],
    ) -> Option<(usize, Vec3)> {
        let mut best = None;
        let mut best_t = f64::INFINITY;
        // A hit outside the padded cell belongs to a neighbouring cell;
        // reporting it here would shadow a nearer hit found there
        let padded = self.bound.expand(TOLERANCE);

        for &item in items {
            if last_hit == Some(item) {
                continue;
            }
            if let Some(t) = triangles[item].intersection(ray) {
                if t < best_t {
                    let hit = ray.at(t);
                    if padded.contains(hit) {
                        best = Some((item, hit));
                        best_t = t;
                    }
                }
            }
        }

        best
    }

    fn walk_intersection(
        &self,
        ray: &Ray,
        last_hit: Option<usize>,
        start: Vec3,
        children: &[Option<Box<Cell>>; 8],
        triangles: &[Triangle],
    ) -> Option<(usize, Vec3)> {
        let mid = self.bound.centroid().to_array();
        let lo = self.bound.min.to_array();
        let hi = self.bound.max.to_array();
        let origin = ray.origin.to_array();
        let direction = ray.direction.to_array();

        // Octant containing the entry point
        let entry = start.to_array();
        let mut k = (0..3).fold(0usize, |k, axis| {
            k | usize::from(entry[axis] >= mid[axis]) << axis
        });
        let mut walk = start;

        loop {
            if let Some(child) = &children[k] {
                if let Some(hit) = child.intersection(ray, last_hit, walk, triangles) {
                    return Some(hit);
                }
            }

            // Find the face of octant k the ray crosses first. Moving
            // toward the inner partition on an axis means the midplane;
            // moving outward means the cell's own face on that side.
            let mut step = f64::INFINITY;
            let mut axis = 0;
            for m in 0..3 {
                let high = (k >> m) & 1 == 1;
                let face = if (direction[m] >= 0.0) == high {
                    if high {
                        hi[m]
                    } else {
                        lo[m]
                    }
                } else {
                    mid[m]
                };
                // Zero direction components give +/-inf here, which the
                // minimum discards
                let s = (face - origin[m]) / direction[m];
                if s < step {
                    step = s;
                    axis = m;
                }
            }

            // Crossing an outer face leaves this cell
            let high = (k >> axis) & 1 == 1;
            if (direction[axis] < 0.0 && !high) || (direction[axis] > 0.0 && high) {
                return None;
            }

            k ^= 1 << axis;
            walk = ray.at(step);
        }
    }
}
