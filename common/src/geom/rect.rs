use super::point::Point;

/// Axis-aligned bounding box over world coordinates. Grown point by point
/// when deriving the grid window from an input network.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rect {
    pub min: Point<f64>,
    pub max: Point<f64>,
}

impl Rect {
    /// Box spanning two arbitrary corners.
    pub fn span(a: Point<f64>, b: Point<f64>) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Widens the box to cover `p`.
    pub fn grow(&mut self, p: Point<f64>) {
        self.min = Point::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    /// Extent as a vector: x is the width, y the height.
    pub fn size(&self) -> Point<f64> {
        self.max - self.min
    }

    pub fn padded(&self, by: f64) -> Rect {
        Rect {
            min: Point::new(self.min.x - by, self.min.y - by),
            max: Point::new(self.max.x + by, self.max.y + by),
        }
    }
}
