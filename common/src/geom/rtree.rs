use super::point::Point;
use rstar::{AABB, RTree};

pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

struct IndexedPoint {
    pos: [f64; 2],
    id: usize,
}

impl rstar::RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, pos: Point<f64>, id: usize) {
        self.tree.insert(IndexedPoint {
            pos: [pos.x, pos.y],
            id,
        });
    }

    /// Ids of all points within `radius` of `center`, sorted ascending so
    /// callers iterate in a stable order.
    pub fn query_within(&self, center: Point<f64>, radius: f64) -> Vec<usize> {
        let aabb = AABB::from_corners(
            [center.x - radius, center.y - radius],
            [center.x + radius, center.y + radius],
        );
        let mut ids: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&aabb)
            .filter(|item| {
                let dx = item.pos[0] - center.x;
                let dy = item.pos[1] - center.y;
                (dx * dx + dy * dy).sqrt() < radius
            })
            .map(|item| item.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_within_is_sorted_and_strict() {
        let mut idx = SpatialIndex::new();
        idx.insert(Point::new(0.0, 0.0), 2);
        idx.insert(Point::new(1.0, 0.0), 0);
        idx.insert(Point::new(5.0, 0.0), 1);

        let hits = idx.query_within(Point::new(0.0, 0.0), 5.0);
        assert_eq!(hits, vec![0, 2], "radius is exclusive, results sorted");
    }
}
