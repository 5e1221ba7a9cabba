use nalgebra::{matrix, vector, Matrix4, Point3, Rotation3, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Object space axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Order in which object space slices along the principal axis
/// are visited front-to-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOrder {
    Increasing,
    Decreasing,
}

/// Homogeneous 4x4 transformation from object space to view space.
///
/// Elementary operations left-multiply the current matrix, so the operation
/// applied last acts last on a point. The ray direction in view space is
/// always `(0, 0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    matrix: Matrix4<f32>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> ViewTransform {
        ViewTransform {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f32>) -> ViewTransform {
        ViewTransform { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// Voxel to view transform of a volume of `size` voxels.
    ///
    /// Built in the order scale, aspect correction, centering, rotation.
    /// Centering comes before rotation so the volume turns about its own center.
    /// Angles are in degrees, rotation order x, y, z; full turns are removed first.
    pub fn volume_view(
        scale: f32,
        aspect: Vector3<f32>,
        size: Vector3<usize>,
        rotation: [f32; 3],
    ) -> ViewTransform {
        let mut transform = ViewTransform::identity();
        transform.scale(scale, scale, scale);
        transform.scale(aspect.x, aspect.y, aspect.z);

        let center = size.map(|v| v as f32).component_mul(&aspect) * (scale / 2.0);
        transform.translate(-center.x, -center.y, -center.z);

        transform.rotate_all(rotation);
        transform
    }

    /// Transform that carries the light. Same rotation as the view, no aspect correction.
    pub fn light_view(rotation: [f32; 3]) -> ViewTransform {
        let mut transform = ViewTransform::identity();
        transform.rotate_all(rotation);
        transform
    }

    fn rotate_all(&mut self, rotation: [f32; 3]) {
        let [x, y, z] = rotation.map(|deg| deg % 360.0);
        self.rotate_x(x).rotate_y(y).rotate_z(z);
    }

    /// `self = other * self`
    pub fn pre_multiply(&mut self, other: &Matrix4<f32>) -> &mut Self {
        self.matrix = other * self.matrix;
        self
    }

    /// Composition, `self` applied after `other`
    pub fn mul(&self, other: &ViewTransform) -> ViewTransform {
        ViewTransform {
            matrix: self.matrix * other.matrix,
        }
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) -> &mut Self {
        self.pre_multiply(&Matrix4::new_nonuniform_scaling(&vector![sx, sy, sz]))
    }

    pub fn translate(&mut self, tx: f32, ty: f32, tz: f32) -> &mut Self {
        self.pre_multiply(&Matrix4::new_translation(&vector![tx, ty, tz]))
    }

    pub fn rotate_x(&mut self, degrees: f32) -> &mut Self {
        self.rotate(Vector3::x_axis(), degrees)
    }

    pub fn rotate_y(&mut self, degrees: f32) -> &mut Self {
        self.rotate(Vector3::y_axis(), degrees)
    }

    pub fn rotate_z(&mut self, degrees: f32) -> &mut Self {
        self.rotate(Vector3::z_axis(), degrees)
    }

    fn rotate(&mut self, axis: nalgebra::Unit<Vector3<f32>>, degrees: f32) -> &mut Self {
        if degrees == 0.0 {
            return self;
        }
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.pre_multiply(&rotation.to_homogeneous())
    }

    /// Shear of x and y proportional to z
    pub fn shear(&mut self, sx: f32, sy: f32) -> &mut Self {
        let shear = matrix![1.0, 0.0, sx, 0.0;
                            0.0, 1.0, sy, 0.0;
                            0.0, 0.0, 1.0, 0.0;
                            0.0, 0.0, 0.0, 1.0];
        self.pre_multiply(&shear)
    }

    /// Permutation making `axis` the principal (z) axis.
    /// `X` maps `(x, y, z)` to `(y, z, x)`, `Y` to `(z, x, y)`, `Z` is the identity.
    pub fn permutation(axis: Axis) -> ViewTransform {
        let matrix = match axis {
            Axis::X => matrix![0.0, 1.0, 0.0, 0.0;
                               0.0, 0.0, 1.0, 0.0;
                               1.0, 0.0, 0.0, 0.0;
                               0.0, 0.0, 0.0, 1.0],
            Axis::Y => matrix![0.0, 0.0, 1.0, 0.0;
                               1.0, 0.0, 0.0, 0.0;
                               0.0, 1.0, 0.0, 0.0;
                               0.0, 0.0, 0.0, 1.0],
            Axis::Z => Matrix4::identity(),
        };
        ViewTransform { matrix }
    }

    pub fn inverse(&self) -> Result<ViewTransform, RenderError> {
        self.matrix
            .try_inverse()
            .filter(|m| m.iter().all(|v| v.is_finite()))
            .map(ViewTransform::from_matrix)
            .ok_or(RenderError::SingularTransform)
    }

    pub fn column(&self, n: usize) -> Vector4<f32> {
        self.matrix.column(n).into_owned()
    }

    pub fn transform(&self, v: &Vector4<f32>) -> Vector4<f32> {
        self.matrix * v
    }

    pub fn transform_point(&self, p: &Point3<f32>) -> Point3<f32> {
        let v = self.matrix * p.to_homogeneous();
        Point3::new(v.x, v.y, v.z)
    }

    /// Transforms direction, translation is ignored
    pub fn transform_vector(&self, v: &Vector3<f32>) -> Vector3<f32> {
        (self.matrix * v.push(0.0)).xyz()
    }

    /// Correction factor for opacities of samples taken one unit apart along the ray.
    ///
    /// Transforms `(0,0,0,1)` and `(0,0,1,1)`, returns the inverted distance of the results.
    pub fn oversampling_ratio(&self) -> f32 {
        let origin = self.matrix * vector![0.0, 0.0, 0.0, 1.0];
        let unit = self.matrix * vector![0.0, 0.0, 1.0, 1.0];
        let d = (unit - origin).xyz().norm();
        1.0 / d
    }

    /// Direction in object space that maps onto the viewing ray.
    /// Computed from the 2x2 minors of the upper left 3x3 block.
    pub fn viewing_vector(&self) -> Vector3<f32> {
        let m = &self.matrix;
        vector![
            m[(0, 1)] * m[(1, 2)] - m[(1, 1)] * m[(0, 2)],
            m[(1, 0)] * m[(0, 2)] - m[(0, 0)] * m[(1, 2)],
            m[(0, 0)] * m[(1, 1)] - m[(1, 0)] * m[(0, 1)]
        ]
    }

    /// Shear-warp shear coefficients `(si, sj)`.
    /// `None` if the viewing vector lies in the xy plane.
    pub fn shear_coefficients(&self) -> Option<(f32, f32)> {
        let v = self.viewing_vector();
        if v.z == 0.0 {
            return None;
        }
        Some((-v.x / v.z, -v.y / v.z))
    }

    pub fn slice_order(&self, sci: f32, scj: f32) -> SliceOrder {
        let m = &self.matrix;
        if m[(2, 0)] * sci + m[(2, 1)] * scj - m[(2, 2)] < 0.0 {
            SliceOrder::Increasing
        } else {
            SliceOrder::Decreasing
        }
    }

    /// Object axis most parallel to the viewing ray
    pub fn principal_axis(&self) -> Axis {
        let v = self.viewing_vector().abs();
        if v.x >= v.y && v.x >= v.z {
            Axis::X
        } else if v.y >= v.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}
