use nalgebra::{point, Point3, Vector3};

/// Axis aligned box, used both for the voxel grid in object space
/// and for its footprint after transformation into view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub lower: Point3<f32>,
    pub upper: Point3<f32>,
}

impl BoundBox {
    pub fn new(lower: Point3<f32>, upper: Point3<f32>) -> BoundBox {
        BoundBox { lower, upper }
    }

    /// Flipped, infinitely small box.
    /// Grows to the first point passed to [`BoundBox::add_point`].
    pub fn empty() -> BoundBox {
        BoundBox {
            lower: point![f32::INFINITY, f32::INFINITY, f32::INFINITY],
            upper: point![f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    pub fn from_position_dims(position: Point3<f32>, dimensions: Vector3<f32>) -> BoundBox {
        BoundBox {
            lower: position,
            upper: position + dimensions,
        }
    }

    /// Smallest box containing all `points`
    pub fn from_points(points: impl IntoIterator<Item = Point3<f32>>) -> BoundBox {
        let mut bbox = BoundBox::empty();
        for p in points {
            bbox.add_point(&p);
        }
        bbox
    }

    pub fn add_point(&mut self, p: &Point3<f32>) {
        self.lower = self.lower.inf(p);
        self.upper = self.upper.sup(p);
    }

    pub fn dims(&self) -> Vector3<f32> {
        self.upper - self.lower
    }

    /// Inclusive on both ends
    pub fn contains(&self, pos: &Point3<f32>) -> bool {
        self.lower.x <= pos.x
            && self.lower.y <= pos.y
            && self.lower.z <= pos.z
            && pos.x <= self.upper.x
            && pos.y <= self.upper.y
            && pos.z <= self.upper.z
    }
}

/// Iterates the 8 corners of a box.
/// Order: x varies fastest, then y, then z.
pub struct BoundBoxIterator {
    lower: Point3<f32>,
    upper: Point3<f32>,
    state: u8,
}

impl Iterator for BoundBoxIterator {
    type Item = Point3<f32>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state > 7 {
            return None;
        }
        let pick = |bit: u8, low: f32, high: f32| if self.state & bit == 0 { low } else { high };
        let p = point![
            pick(1, self.lower.x, self.upper.x),
            pick(2, self.lower.y, self.upper.y),
            pick(4, self.lower.z, self.upper.z)
        ];
        self.state += 1;
        Some(p)
    }
}

impl IntoIterator for BoundBox {
    type Item = Point3<f32>;

    type IntoIter = BoundBoxIterator;

    fn into_iter(self) -> Self::IntoIter {
        BoundBoxIterator {
            lower: self.lower,
            upper: self.upper,
            state: 0,
        }
    }
}
