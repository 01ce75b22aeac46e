//! Spatial Hash
//!
//! Uniform grid that buckets sprite indices by the cells their bounds cover.
//! Used for static lists (platforms) so collision queries only test nearby
//! sprites instead of the whole layer.

use std::collections::HashMap;
use super::bounds::Bounds;

/// Default bucket size in world pixels
pub const DEFAULT_CELL_SIZE: f32 = 128.0;

/// Grid of buckets keyed by integer cell coordinates
#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    /// Inclusive cell range covered by a box
    fn cell_range(&self, bounds: &Bounds) -> (i32, i32, i32, i32) {
        let min_x = (bounds.left / self.cell_size).floor() as i32;
        let min_y = (bounds.bottom / self.cell_size).floor() as i32;
        let max_x = (bounds.right / self.cell_size).floor() as i32;
        let max_y = (bounds.top / self.cell_size).floor() as i32;
        (min_x, min_y, max_x, max_y)
    }

    /// Register an item under every cell its bounds touch
    pub fn insert(&mut self, index: usize, bounds: &Bounds) {
        let (min_x, min_y, max_x, max_y) = self.cell_range(bounds);
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    /// Candidate items near a box (sorted, no duplicates)
    ///
    /// Candidates still need an exact overlap test.
    pub fn query(&self, bounds: &Bounds) -> Vec<usize> {
        let (min_x, min_y, max_x, max_y) = self.cell_range(bounds);
        let mut found = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(bucket);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Number of non-empty cells
    #[cfg(test)]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_returns_nearby_only() {
        let mut hash = SpatialHash::new(64.0);
        hash.insert(0, &Bounds::new(0.0, 0.0, 32.0, 32.0));
        hash.insert(1, &Bounds::new(1000.0, 0.0, 1032.0, 32.0));

        let near = hash.query(&Bounds::new(10.0, 10.0, 20.0, 20.0));
        assert_eq!(near, vec![0]);

        let far = hash.query(&Bounds::new(500.0, 500.0, 510.0, 510.0));
        assert!(far.is_empty());
    }

    #[test]
    fn test_spanning_item_is_deduplicated() {
        let mut hash = SpatialHash::new(64.0);
        // Covers a 3x2 block of cells
        hash.insert(7, &Bounds::new(10.0, 10.0, 150.0, 100.0));
        assert_eq!(hash.cell_count(), 6);

        let hits = hash.query(&Bounds::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(hits, vec![7]);
    }

    #[test]
    fn test_negative_coordinates() {
        let mut hash = SpatialHash::default();
        hash.insert(3, &Bounds::new(-40.0, -40.0, -10.0, -10.0));
        assert_eq!(hash.query(&Bounds::new(-20.0, -20.0, -15.0, -15.0)), vec![3]);
        assert!(hash.query(&Bounds::new(10.0, 10.0, 20.0, 20.0)).is_empty());
    }
}
