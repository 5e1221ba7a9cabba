use nalgebra::{Point3, Vector3};

/// Plane `a*x + b*y + c*z + d = 0` in view space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Plane {
        Plane { a, b, c, d }
    }

    /// Plane through three points, normal `(p1 - p0) x (p2 - p0)`
    pub fn from_points(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Plane {
        let normal = (p1 - p0).cross(&(p2 - p0));
        Plane::from_normal(&normal, p0)
    }

    fn from_normal(normal: &Vector3<f32>, through: &Point3<f32>) -> Plane {
        Plane {
            a: normal.x,
            b: normal.y,
            c: normal.z,
            d: -normal.dot(&through.coords),
        }
    }

    /// Parallel plane passing through `p`
    pub fn through(&self, p: &Point3<f32>) -> Plane {
        Plane::from_normal(&self.normal(), p)
    }

    pub fn normal(&self) -> Vector3<f32> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Same plane with `d` moved by `delta`
    pub fn shifted(&self, delta: f32) -> Plane {
        Plane {
            d: self.d + delta,
            ..*self
        }
    }

    /// Where the ray through `(i, j)` along `+k` crosses the plane.
    /// Meaningless for planes with `c == 0`.
    pub fn k_at(&self, i: f32, j: f32) -> f32 {
        -(self.a * i + self.b * j + self.d) / self.c
    }

    pub fn evaluate(&self, p: &Point3<f32>) -> f32 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }
}
