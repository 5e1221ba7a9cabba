//! Cells straddling an isosurface and a walk along a ray that visits only those.

use log::debug;
use nalgebra::{vector, Point3, Vector3};

use super::Volume;

const CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (0, 1, 0),
    (1, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (0, 1, 1),
    (1, 1, 1),
];

/// Surface cells of a volume thresholded at one value.
///
/// Cell `(x, y, z)` spans voxels `x..=x + 1`, `y..=y + 1`, `z..=z + 1`.
/// It is a surface cell when its eight voxels are not all on the same side of the threshold.
/// Cells outside the grid are never surface cells.
#[derive(Debug, Clone)]
pub struct BinaryShell {
    size: Vector3<usize>,
    cells: Vec<bool>,
    surface_count: usize,
}

impl BinaryShell {
    pub fn new<V: Volume + ?Sized>(volume: &V, threshold: f32) -> BinaryShell {
        let vsize = volume.get_size();
        let size = vsize.map(|v| v.saturating_sub(1));

        let mut inside = Vec::with_capacity(vsize.x * vsize.y * vsize.z);
        for x in 0..vsize.x {
            for y in 0..vsize.y {
                for z in 0..vsize.z {
                    inside.push(volume.get_data(x, y, z).map_or(false, |v| v >= threshold));
                }
            }
        }
        let voxel = |x: usize, y: usize, z: usize| inside[(x * vsize.y + y) * vsize.z + z];

        let mut cells = Vec::with_capacity(size.x * size.y * size.z);
        for x in 0..size.x {
            for y in 0..size.y {
                for z in 0..size.z {
                    let first = voxel(x, y, z);
                    let straddles = CORNERS
                        .iter()
                        .any(|&(dx, dy, dz)| voxel(x + dx, y + dy, z + dz) != first);
                    cells.push(straddles);
                }
            }
        }

        let surface_count = cells.iter().filter(|&&c| c).count();
        debug!(
            "Binary shell at {threshold}: {surface_count} of {} cells",
            cells.len()
        );

        BinaryShell {
            size,
            cells,
            surface_count,
        }
    }

    /// Cells per dimension, one less than voxels
    pub fn size(&self) -> Vector3<usize> {
        self.size
    }

    pub fn surface_count(&self) -> usize {
        self.surface_count
    }

    fn contains(&self, pos: &Vector3<i32>) -> bool {
        (0..3).all(|d| pos[d] >= 0 && (pos[d] as usize) < self.size[d])
    }

    pub fn surface(&self, pos: &Vector3<i32>) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let (x, y, z) = (pos.x as usize, pos.y as usize, pos.z as usize);
        self.cells[(x * self.size.y + y) * self.size.z + z]
    }

    /// Surface cells along `origin + t * direction` for `t` in `0..=length`, front to back
    pub fn walk(&self, origin: &Point3<f32>, direction: &Vector3<f32>, length: f32) -> ShellWalk<'_> {
        ShellWalk::new(self, origin, direction, length)
    }
}

/// Parameter `t` at which `s + t * ds` next crosses an integer
fn boundary_distance(s: f32, ds: f32) -> f32 {
    if ds > 0.0 {
        (s.floor() + 1.0 - s) / ds
    } else if ds < 0.0 {
        (s - s.floor()) / -ds
    } else {
        f32::INFINITY
    }
}

/// Cell by cell walk of one ray, yields only surface cells.
///
/// Every cell the ray passes through is visited, each step crosses the
/// nearest cell boundary.
#[derive(Debug, Clone)]
pub struct ShellWalk<'s> {
    shell: &'s BinaryShell,
    cell: Vector3<i32>,
    step: Vector3<i32>,
    /// `t` of the next boundary crossing per axis
    t_max: Vector3<f32>,
    /// `t` between two crossings per axis
    t_delta: Vector3<f32>,
    length: f32,
    done: bool,
}

impl<'s> ShellWalk<'s> {
    fn new(shell: &'s BinaryShell, origin: &Point3<f32>, direction: &Vector3<f32>, length: f32) -> ShellWalk<'s> {
        let valid = origin.coords.iter().chain(direction.iter()).all(|v| v.is_finite());
        let mut walk = ShellWalk {
            shell,
            cell: origin.coords.map(|v| v.floor() as i32),
            step: direction.map(|d| match d {
                d if d > 0.0 => 1,
                d if d < 0.0 => -1,
                _ => 0,
            }),
            t_max: vector![
                boundary_distance(origin.x, direction.x),
                boundary_distance(origin.y, direction.y),
                boundary_distance(origin.z, direction.z)
            ],
            t_delta: direction.map(|d| d.abs().recip()),
            length,
            done: !valid,
        };
        if walk.leaving_grid() {
            walk.done = true;
        }
        walk
    }

    /// Outside the grid and not moving towards it along some axis
    fn leaving_grid(&self) -> bool {
        let size = self.shell.size();
        (0..3).any(|d| {
            let (c, s) = (self.cell[d], size[d] as i32);
            (c < 0 && self.step[d] <= 0) || (c >= s && self.step[d] >= 0)
        })
    }

    fn advance(&mut self) {
        let t = &self.t_max;
        let axis = if t.x < t.y {
            if t.x < t.z {
                0
            } else {
                2
            }
        } else if t.y < t.z {
            1
        } else {
            2
        };

        if !(self.t_max[axis] <= self.length) {
            self.done = true;
            return;
        }
        self.cell[axis] += self.step[axis];
        self.t_max[axis] += self.t_delta[axis];

        if self.leaving_grid() {
            self.done = true;
        }
    }
}

impl Iterator for ShellWalk<'_> {
    type Item = Vector3<i32>;

    fn next(&mut self) -> Option<Vector3<i32>> {
        while !self.done {
            let current = self.cell;
            self.advance();
            if self.shell.surface(&current) {
                return Some(current);
            }
        }
        None
    }
}

#[cfg(test)]
mod test {

    use nalgebra::point;

    use super::*;
    use crate::{
        test_helpers::{sphere_volume, uniform_volume},
        volumetric::LinearVolume,
    };

    fn half_space() -> LinearVolume {
        LinearVolume::from_fn(vector![8, 8, 8], |x, _, _| if x >= 4 { 200.0 } else { 0.0 })
    }

    #[test]
    fn half_space_shell_is_one_layer() {
        let shell = BinaryShell::new(&half_space(), 100.0);

        assert_eq!(shell.size(), vector![7, 7, 7]);
        assert_eq!(shell.surface_count(), 49);
        assert!(shell.surface(&vector![3, 0, 6]));
        assert!(!shell.surface(&vector![2, 3, 3]));
        assert!(!shell.surface(&vector![4, 3, 3]));
        assert!(!shell.surface(&vector![-1, 0, 0]));
        assert!(!shell.surface(&vector![3, 7, 0]));
    }

    #[test]
    fn uniform_volume_has_no_shell() {
        let shell = BinaryShell::new(&uniform_volume(6, 200.0), 100.0);

        assert_eq!(shell.surface_count(), 0);
        let walk = shell.walk(&point![0.5, 0.5, 0.5], &vector![1.0, 1.0, 1.0], 10.0);
        assert_eq!(walk.count(), 0);
    }

    #[test]
    fn sphere_shell() {
        let shell = BinaryShell::new(&sphere_volume(16), 128.0);

        assert!(!shell.surface(&vector![7, 7, 7]));
        assert!(!shell.surface(&vector![0, 0, 0]));
        assert!(shell.surface(&vector![12, 7, 7]));
        assert!(shell.surface(&vector![7, 2, 7]));
    }

    #[test]
    fn walk_stops_at_surface_only() {
        let shell = BinaryShell::new(&half_space(), 100.0);

        let forward: Vec<_> = shell
            .walk(&point![0.5, 2.5, 2.5], &vector![1.0, 0.0, 0.0], 7.0)
            .collect();
        assert_eq!(forward, vec![vector![3, 2, 2]]);

        let short = shell.walk(&point![0.5, 2.5, 2.5], &vector![1.0, 0.0, 0.0], 2.0);
        assert_eq!(short.count(), 0);

        let backward: Vec<_> = shell
            .walk(&point![6.5, 1.5, 4.5], &vector![-0.5, 0.0, 0.0], 14.0)
            .collect();
        assert_eq!(backward, vec![vector![3, 1, 4]]);
    }

    #[test]
    fn walk_visits_every_cell_on_the_ray() {
        // every cell of a checkerboard straddles the threshold
        let volume = LinearVolume::from_fn(vector![8, 8, 8], |x, y, z| ((x + y + z) % 2) as f32 * 200.0);
        let shell = BinaryShell::new(&volume, 100.0);
        assert_eq!(shell.surface_count(), 7 * 7 * 7);

        let origin = point![0.3, 0.6, 0.2];
        let direction = vector![0.8, 0.5, 0.3];
        let cells: Vec<_> = shell.walk(&origin, &direction, 8.0).collect();

        assert_eq!(cells[0], vector![0, 0, 0]);
        for pair in cells.windows(2) {
            let d = pair[1] - pair[0];
            assert_eq!(d.abs().sum(), 1, "{:?} -> {:?}", pair[0], pair[1]);
        }

        for n in 0..800 {
            let t = 0.005 + n as f32 * 0.01;
            let p = (origin + direction * t).coords.map(|v| v.floor() as i32);
            assert!(cells.contains(&p), "{p:?} at t {t} not visited");
        }
    }

    #[test]
    fn walk_from_outside_enters_grid() {
        let shell = BinaryShell::new(&half_space(), 100.0);

        let cells: Vec<_> = shell
            .walk(&point![-3.5, 2.5, 2.5], &vector![1.0, 0.0, 0.0], 20.0)
            .collect();
        assert_eq!(cells, vec![vector![3, 2, 2]]);

        // moving away from the grid
        let away = shell.walk(&point![-3.5, 2.5, 2.5], &vector![-1.0, 0.0, 0.0], 20.0);
        assert_eq!(away.count(), 0);
    }
}
