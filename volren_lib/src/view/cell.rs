//! Face planes of a unit voxel cell in view space.
//!
//! The planes are derived once per transform for the cell at the origin.
//! Moving a cell to another grid position only shifts the `d` term of each
//! plane by a multiple of a precomputed delta, so intersecting a ray with any
//! cell costs a handful of multiplications.

use std::cmp::Ordering;

use log::{debug, trace};
use nalgebra::{point, vector, Point3, Vector3};

use super::{Axis, Plane, ViewTransform};

/// Tolerance of cell snapping and of intersection range checks.
/// Too small and rendering at small scales frays, too large and rays test more roots.
pub const CELL_EPSILON: f32 = 0.00001;

/// One of the left, bottom or front faces of a cell.
/// The opposite face is the same plane with `d + shift_d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePlane {
    pub plane: Plane,
    pub shift_d: f32,
    /// Object axis whose unit step moves the plane by `shift_d`
    pub axis: Axis,
}

impl FacePlane {
    /// Near and far face of the cell at `pos`
    pub fn at(&self, pos: &Vector3<i32>) -> (Plane, Plane) {
        let near = self
            .plane
            .shifted(pos[self.axis.index()] as f32 * self.shift_d);
        (near, near.shifted(self.shift_d))
    }
}

/// Footprint of a cell along one view axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Minimum of the origin cell
    pub min: f32,
    /// Maximum minus minimum
    pub delta: f32,
    /// Change of `min` per unit step along object x, y, z
    pub inc: Vector3<f32>,
}

impl Extent {
    fn from_vertices(vertices: &[Point3<f32>; 8], dim: usize) -> Extent {
        let (min, max) = vertices
            .iter()
            .map(|v| v[dim])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let base = vertices[0][dim];
        Extent {
            min,
            delta: max - min,
            inc: vector![
                vertices[1][dim] - base,
                vertices[2][dim] - base,
                vertices[4][dim] - base
            ],
        }
    }

    /// `(min, max)` of the cell at `pos`
    pub fn at(&self, pos: &Vector3<i32>) -> (f32, f32) {
        let min = self.min
            + self.inc.x * pos.x as f32
            + self.inc.y * pos.y as f32
            + self.inc.z * pos.z as f32;
        (min, min + self.delta)
    }
}

/// Homogeneous corners of the cell at `(x, y, z)`.
/// Order: lbf, rbf, ltf, rtf, lbb, rbb, ltb, rtb.
pub fn cell_vertices(x: i32, y: i32, z: i32) -> [Point3<f32>; 8] {
    let (x, y, z) = (x as f32, y as f32, z as f32);
    [
        point![x, y, z],
        point![x + 1.0, y, z],
        point![x, y + 1.0, z],
        point![x + 1.0, y + 1.0, z],
        point![x, y, z + 1.0],
        point![x + 1.0, y, z + 1.0],
        point![x, y + 1.0, z + 1.0],
        point![x + 1.0, y + 1.0, z + 1.0],
    ]
}

/// Face planes from cell vertices in [`cell_vertices`] order.
/// Returns left, right, bottom, top, front, back.
pub fn cell_faces(vertices: &[Point3<f32>; 8]) -> [Plane; 6] {
    let left = Plane::from_points(&vertices[0], &vertices[2], &vertices[4]);
    let bottom = Plane::from_points(&vertices[0], &vertices[1], &vertices[4]);
    let front = Plane::from_points(&vertices[0], &vertices[1], &vertices[2]);
    [
        left,
        left.through(&vertices[1]),
        bottom,
        bottom.through(&vertices[2]),
        front,
        front.through(&vertices[4]),
    ]
}

/// Per transform cell geometry, shared read-only by all rays of a pass.
#[derive(Debug, Clone)]
pub struct CellGeometry {
    /// Most perpendicular to the ray first, planes parallel to the ray removed
    faces: Vec<FacePlane>,
    i: Extent,
    j: Extent,
    k: Extent,
}

impl CellGeometry {
    pub fn new(transform: &ViewTransform) -> CellGeometry {
        let vertices = cell_vertices(0, 0, 0).map(|v| transform.transform_point(&v));
        let faces = cell_faces(&vertices);

        let mut independent = [
            FacePlane {
                plane: faces[0],
                shift_d: faces[1].d - faces[0].d,
                axis: Axis::X,
            },
            FacePlane {
                plane: faces[2],
                shift_d: faces[3].d - faces[2].d,
                axis: Axis::Y,
            },
            FacePlane {
                plane: faces[4],
                shift_d: faces[5].d - faces[4].d,
                axis: Axis::Z,
            },
        ];

        // Stable, equal |c| keeps x, y, z order
        independent.sort_by(|p, q| {
            q.plane
                .c
                .abs()
                .partial_cmp(&p.plane.c.abs())
                .unwrap_or(Ordering::Equal)
        });

        let faces: Vec<FacePlane> = independent
            .into_iter()
            .filter(|f| f.plane.c != 0.0)
            .collect();

        let geometry = CellGeometry {
            faces,
            i: Extent::from_vertices(&vertices, 0),
            j: Extent::from_vertices(&vertices, 1),
            k: Extent::from_vertices(&vertices, 2),
        };

        debug!(
            "Cell geometry: {} usable face planes, k extent {}",
            geometry.faces.len(),
            geometry.k.delta
        );

        geometry
    }

    pub fn faces(&self) -> &[FacePlane] {
        &self.faces
    }

    pub fn extents(&self) -> [&Extent; 3] {
        [&self.i, &self.j, &self.k]
    }

    /// Cell at the grid origin
    pub fn origin_cell(&self) -> Cell<'_> {
        Cell {
            geometry: self,
            pos: vector![0, 0, 0],
        }
    }

    /// Cell enclosing object space point `(ox, oy, oz)`
    pub fn cell_at(&self, ox: f32, oy: f32, oz: f32) -> Cell<'_> {
        let mut cell = self.origin_cell();
        cell.move_to(ox, oy, oz);
        cell
    }

    /// Near and far face planes of the cell at `pos`, shifted incrementally
    pub fn planes_at(&self, pos: &Vector3<i32>) -> Vec<(Axis, Plane, Plane)> {
        self.faces
            .iter()
            .map(|f| {
                let (near, far) = f.at(pos);
                (f.axis, near, far)
            })
            .collect()
    }
}

/// A grid cell, identified by the coordinates of its minimum corner.
/// Moving it is an integer update; all geometry comes from the shared [`CellGeometry`].
#[derive(Debug, Clone, Copy)]
pub struct Cell<'g> {
    geometry: &'g CellGeometry,
    pos: Vector3<i32>,
}

impl<'g> Cell<'g> {
    pub fn position(&self) -> Vector3<i32> {
        self.pos
    }

    /// Move to the cell enclosing object space point `(ox, oy, oz)`
    pub fn move_to(&mut self, ox: f32, oy: f32, oz: f32) {
        self.pos = vector![snap(ox), snap(oy), snap(oz)];
    }

    pub fn set_position(&mut self, pos: Vector3<i32>) {
        self.pos = pos;
    }

    pub fn i_range(&self) -> (f32, f32) {
        self.geometry.i.at(&self.pos)
    }

    pub fn j_range(&self) -> (f32, f32) {
        self.geometry.j.at(&self.pos)
    }

    pub fn k_range(&self) -> (f32, f32) {
        self.geometry.k.at(&self.pos)
    }

    /// Whether the footprint of this cell on the view plane can contain ray `(i, j)`
    pub fn covers(&self, i: f32, j: f32) -> bool {
        let (imin, imax) = self.i_range();
        let (jmin, jmax) = self.j_range();
        between(i, imin, imax, CELL_EPSILON) && between(j, jmin, jmax, CELL_EPSILON)
    }

    /// View space `k` where the ray through `(i, j)` enters and leaves this cell.
    ///
    /// Planes are tried most perpendicular first, each followed by its opposite face.
    /// A root counts if it lies within the k extent of the cell and differs from the first root.
    /// Near edges and corners rounding may produce more than two roots, only the first two count.
    /// Returns `None` if the ray is off the footprint or fewer than two roots are found.
    pub fn intersect(&self, i: f32, j: f32) -> Option<(f32, f32)> {
        if !self.covers(i, j) {
            return None;
        }
        let (kmin, kmax) = self.k_range();
        let mut roots = [0.0; 2];
        let mut found = 0;

        let mut accept = |k: f32, found: &mut usize| {
            let inside = between(k, kmin, kmax, CELL_EPSILON);
            let distinct = *found == 0 || !between(k, roots[0], roots[0], CELL_EPSILON);
            if inside && distinct {
                roots[*found] = k;
                *found += 1;
            }
        };

        for face in &self.geometry.faces {
            if found == 2 {
                break;
            }
            let (near, far) = face.at(&self.pos);
            accept(near.k_at(i, j), &mut found);
            if found < 2 {
                accept(far.k_at(i, j), &mut found);
            }
        }

        if found == 2 {
            Some((roots[0], roots[1]))
        } else {
            trace!(
                "ray ({i}, {j}) misses cell {:?}, {found} roots in k {kmin}..{kmax}",
                self.pos
            );
            None
        }
    }
}

/// Integer cell coordinate enclosing `v`, tolerant to rounding just below a grid line
fn snap(v: f32) -> i32 {
    (if v >= 0.0 {
        v + CELL_EPSILON
    } else {
        v - 1.0 - CELL_EPSILON
    }) as i32
}

fn between(v: f32, lower: f32, upper: f32, epsilon: f32) -> bool {
    v >= lower - epsilon && v <= upper + epsilon
}

#[cfg(test)]
mod test {

    use super::*;

    fn rotated(rotation: [f32; 3]) -> ViewTransform {
        ViewTransform::volume_view(1.0, vector![1.0, 1.0, 1.0], vector![16, 16, 16], rotation)
    }

    #[test]
    fn snapping() {
        assert_eq!(snap(0.0), 0);
        assert_eq!(snap(2.99999999), 3);
        assert_eq!(snap(2.5), 2);
        assert_eq!(snap(-0.5), -1);
        assert_eq!(snap(-1.5), -2);
    }

    #[test]
    fn axis_aligned_keeps_front_plane_only() {
        let geometry = CellGeometry::new(&ViewTransform::identity());
        let faces = geometry.faces();

        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].axis, Axis::Z);

        let mut cell = geometry.origin_cell();
        cell.move_to(3.2, 1.7, 5.5);
        assert_eq!(cell.position(), vector![3, 1, 5]);
        assert_eq!(cell.k_range(), (5.0, 6.0));
        assert_eq!(cell.intersect(3.2, 1.7), Some((5.0, 6.0)));
    }

    #[test]
    fn oblique_view_keeps_planes_sorted() {
        let geometry = CellGeometry::new(&rotated([25.0, 40.0, 10.0]));
        let faces = geometry.faces();

        assert_eq!(faces.len(), 3);
        for pair in faces.windows(2) {
            assert!(pair[0].plane.c.abs() >= pair[1].plane.c.abs());
        }
    }

    #[test]
    fn one_axis_rotation_drops_parallel_plane() {
        // Rotation about y leaves bottom and top faces parallel to the ray
        let geometry = CellGeometry::new(&rotated([0.0, 30.0, 0.0]));
        let axes: Vec<_> = geometry.faces().iter().map(|f| f.axis).collect();

        assert_eq!(axes.len(), 2);
        assert!(!axes.contains(&Axis::Y));
    }

    #[test]
    fn interior_points_give_two_roots() {
        let mut rng = fastrand::Rng::with_seed(7);

        for rotation in [[0.0, 0.0, 0.0], [30.0, 0.0, 0.0], [25.0, 40.0, 10.0], [-70.0, 15.0, 133.0]] {
            let transform = rotated(rotation);
            let geometry = CellGeometry::new(&transform);

            for _ in 0..200 {
                let cell_pos = vector![rng.i32(0..16), rng.i32(0..16), rng.i32(0..16)];
                let p = point![
                    cell_pos.x as f32 + 0.1 + 0.8 * rng.f32(),
                    cell_pos.y as f32 + 0.1 + 0.8 * rng.f32(),
                    cell_pos.z as f32 + 0.1 + 0.8 * rng.f32()
                ];
                let view = transform.transform_point(&p);

                let cell = geometry.cell_at(p.x, p.y, p.z);
                assert_eq!(cell.position(), cell_pos);
                assert!(cell.covers(view.x, view.y));

                let (k0, k1) = cell
                    .intersect(view.x, view.y)
                    .unwrap_or_else(|| panic!("no roots for {p} at rotation {rotation:?}"));
                let (kmin, kmax) = cell.k_range();

                assert!((k0 - k1).abs() > CELL_EPSILON);
                for k in [k0, k1] {
                    assert!(k >= kmin - 1e-3 && k <= kmax + 1e-3);
                }
            }
        }
    }

    #[test]
    fn roots_bracket_point_on_single_axis_rotation() {
        let transform = rotated([0.0, 0.0, 35.0]);
        let geometry = CellGeometry::new(&transform);

        let p = point![4.3, 7.6, 2.5];
        let view = transform.transform_point(&p);
        let (k0, k1) = geometry.cell_at(p.x, p.y, p.z).intersect(view.x, view.y).unwrap();

        assert!(k0.min(k1) <= view.z + 1e-4);
        assert!(k0.max(k1) >= view.z - 1e-4);
    }

    #[test]
    fn incremental_planes_match_direct_planes() {
        let transform = rotated([25.0, 40.0, 10.0]);
        let geometry = CellGeometry::new(&transform);

        let steps = [vector![1, 0, 0], vector![0, 1, 0], vector![0, 0, 1], vector![3, -2, 5]];
        for pos in steps {
            let vertices = cell_vertices(pos.x, pos.y, pos.z).map(|v| transform.transform_point(&v));
            let direct = cell_faces(&vertices);

            for (axis, near, far) in geometry.planes_at(&pos) {
                let expected_near = direct[2 * axis.index()];
                let expected_far = direct[2 * axis.index() + 1];
                for (got, expected) in [(near, expected_near), (far, expected_far)] {
                    assert!((got.a - expected.a).abs() < 1e-4);
                    assert!((got.b - expected.b).abs() < 1e-4);
                    assert!((got.c - expected.c).abs() < 1e-4);
                    assert!((got.d - expected.d).abs() < 1e-4, "{axis:?} {got:?} {expected:?}");
                }
            }
        }
    }

    #[test]
    fn ray_outside_footprint_misses() {
        let transform = rotated([10.0, 20.0, 0.0]);
        let geometry = CellGeometry::new(&transform);
        let cell = geometry.cell_at(5.5, 5.5, 5.5);
        let center = transform.transform_point(&point![5.5, 5.5, 5.5]);

        assert!(!cell.covers(center.x + 5.0, center.y));
        assert_eq!(cell.intersect(center.x + 5.0, center.y), None);
    }

    #[test]
    fn rays_beside_footprint_miss() {
        let mut rng = fastrand::Rng::with_seed(11);
        let size = vector![8, 8, 8];

        for _ in 0..50 {
            let rotation = [rng.f32() * 360.0, rng.f32() * 360.0, rng.f32() * 360.0];
            let transform = ViewTransform::volume_view(1.0, vector![1.0, 1.0, 1.0], size, rotation);
            let geometry = CellGeometry::new(&transform);
            let mut cell = geometry.origin_cell();
            cell.set_position(vector![3, 3, 3]);

            let (imin, imax) = cell.i_range();
            let (jmin, jmax) = cell.j_range();
            for _ in 0..20 {
                let gap = 0.001 + 0.5 * rng.f32();
                let i = imin + (imax - imin) * rng.f32();
                let j = jmin + (jmax - jmin) * rng.f32();
                let beside = match rng.u8(0..4) {
                    0 => (imin - gap, j),
                    1 => (imax + gap, j),
                    2 => (i, jmin - gap),
                    _ => (i, jmax + gap),
                };

                assert!(!cell.covers(beside.0, beside.1));
                assert_eq!(
                    cell.intersect(beside.0, beside.1),
                    None,
                    "ray {beside:?} at rotation {rotation:?}"
                );
            }
        }
    }
}
