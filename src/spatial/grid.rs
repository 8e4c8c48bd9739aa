//! SpatialGrid - uniform bucket grid over the XZ ground plane.
//!
//! Broad phase only: a query returns every object bucketed in the 3x3 cell
//! neighborhood around the query point, and callers narrow from there. The
//! 3x3 pattern (instead of exact-radius cell math) is what makes boundary
//! queries safe: a point sitting exactly on a cell edge still sees both
//! sides.
//!
//! Cost model: insert is O(1) amortized, query is O(objects in 9 cells).
//! That bounds per-frame work by local density, not world population.
//!
//! Invariant: cell size must be at least twice the largest registered
//! interaction radius, otherwise an object could sit in a neighboring-but-
//! not-adjacent cell and become invisible to the 3x3 query. `insert` warns
//! once when that is violated.

use std::collections::HashMap;

use crate::core::console;
use crate::domain::objects::{ObjectId, WorldSnapshot};

pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<ObjectId>>,
    object_count: usize,
    max_radius_seen: f32,
    warned_oversize: bool,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            cells: HashMap::new(),
            object_count: 0,
            max_radius_seen: 0.0,
            warned_oversize: false,
        }
    }

    #[inline]
    fn cell_of(&self, x: f32, z: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Bucket an object into exactly one cell.
    pub fn insert(&mut self, id: ObjectId, x: f32, z: f32, radius: f32) {
        if radius > self.max_radius_seen {
            self.max_radius_seen = radius;
        }
        if radius > self.cell_size * 0.5 && !self.warned_oversize {
            self.warned_oversize = true;
            console::warn(&format!(
                "grid: object {id} radius {radius} exceeds half the cell size {}; \
                 3x3 queries may miss it",
                self.cell_size
            ));
        }
        self.cells.entry(self.cell_of(x, z)).or_default().push(id);
        self.object_count += 1;
    }

    /// Collect every object bucketed in the 3x3 neighborhood of `(x, z)`.
    ///
    /// `radius` is the caller's interaction reach; it is covered by the 3x3
    /// pattern as long as the cell-size invariant holds, so it only gates a
    /// debug warning here. `out` is cleared first - callers reuse one scratch
    /// Vec across frames to stay allocation-free in steady state.
    pub fn query_into(&self, x: f32, z: f32, radius: f32, out: &mut Vec<ObjectId>) {
        out.clear();
        debug_assert!(
            radius <= self.cell_size,
            "query radius {radius} exceeds cell size {}",
            self.cell_size
        );
        if self.cells.is_empty() {
            // Empty world: O(1), empty result, never an error.
            return;
        }
        let (cx, cz) = self.cell_of(x, z);
        for ix in (cx - 1)..=(cx + 1) {
            for iz in (cz - 1)..=(cz + 1) {
                if let Some(ids) = self.cells.get(&(ix, iz)) {
                    out.extend_from_slice(ids);
                }
            }
        }
    }

    /// Convenience wrapper over [`query_into`](Self::query_into).
    pub fn query(&self, x: f32, z: f32, radius: f32) -> Vec<ObjectId> {
        let mut out = Vec::new();
        self.query_into(x, z, radius, &mut out);
        out
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.object_count = 0;
        self.max_radius_seen = 0.0;
    }

    /// Reconstruct from scratch after the snapshot changed between frames.
    pub fn rebuild(&mut self, snapshot: &WorldSnapshot) {
        self.clear();
        for obj in snapshot.iter() {
            self.insert(obj.id, obj.x, obj.z, obj.radius);
        }
    }

    pub fn object_count(&self) -> usize {
        self.object_count
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_query_finds_object() {
        let mut grid = SpatialGrid::new(16.0);
        grid.insert(1, 10.0, 10.0, 2.0);
        assert_eq!(grid.query(10.0, 10.0, 4.0), vec![1]);
        assert_eq!(grid.object_count(), 1);
    }

    #[test]
    fn coverage_within_radius() {
        // Any query point within an object's radius must see the object.
        let mut grid = SpatialGrid::new(16.0);
        grid.insert(42, 31.9, -7.5, 6.0);
        for (px, pz) in [
            (31.9, -7.5),
            (31.9 + 5.9, -7.5),
            (31.9 - 5.9, -7.5),
            (31.9, -7.5 + 5.9),
            (31.9, -7.5 - 5.9),
            (32.0, -8.0), // across the x=32 cell boundary
        ] {
            assert!(
                grid.query(px, pz, 6.0).contains(&42),
                "missed object from ({px}, {pz})"
            );
        }
    }

    #[test]
    fn locality_never_returns_far_objects() {
        let mut grid = SpatialGrid::new(16.0);
        grid.insert(1, 0.0, 0.0, 2.0);
        grid.insert(2, 100.0, 100.0, 2.0); // 6+ cells away
        let hits = grid.query(0.0, 0.0, 4.0);
        assert!(hits.contains(&1));
        assert!(!hits.contains(&2));
    }

    #[test]
    fn boundary_query_sees_both_sides() {
        let mut grid = SpatialGrid::new(16.0);
        grid.insert(1, 15.5, 0.0, 1.0); // cell (0, 0)
        grid.insert(2, 16.5, 0.0, 1.0); // cell (1, 0)
        let hits = grid.query(16.0, 0.0, 1.0); // exactly on the boundary
        assert!(hits.contains(&1) && hits.contains(&2));
    }

    #[test]
    fn negative_coordinates_bucket_correctly() {
        let mut grid = SpatialGrid::new(16.0);
        grid.insert(1, -0.5, -0.5, 1.0);
        // floor division: (-0.5 / 16) lands in cell (-1, -1), adjacent to (0, 0)
        assert!(grid.query(0.5, 0.5, 1.0).contains(&1));
    }

    #[test]
    fn empty_world_query_is_empty_not_error() {
        let grid = SpatialGrid::new(16.0);
        assert!(grid.query(123.0, -456.0, 8.0).is_empty());
    }

    #[test]
    fn rebuild_reflects_snapshot() {
        use crate::domain::objects::{EnvObject, ObjectKind, WorldSnapshot};

        let mut snap = WorldSnapshot::new();
        for i in 0..10u32 {
            snap.register(EnvObject {
                id: i,
                x: i as f32 * 3.0,
                y: 0.0,
                z: 0.0,
                radius: 1.0,
                kind: ObjectKind::Obstacle,
            })
            .unwrap();
        }
        let mut grid = SpatialGrid::new(16.0);
        grid.rebuild(&snap);
        assert_eq!(grid.object_count(), 10);

        snap.remove(0);
        grid.rebuild(&snap);
        assert_eq!(grid.object_count(), 9);
        assert!(!grid.query(0.0, 0.0, 4.0).contains(&0));
    }
}
