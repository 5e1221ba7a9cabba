use std::ops::RangeBounds;

use log::debug;
use nalgebra::{vector, Vector3};

use crate::config::{Config, GeneratorConfig};

use super::SampleGenerator;

/// Labels 0 and 1 have fixed colors in the palette
const FIRST_LABEL: u8 = 2;

/// Generate volume with a number of randomly placed shapes
pub struct ShapesGenerator {
    shapes: Vec<ShapeInfo>,
}

impl ShapesGenerator {
    pub fn new(shapes: Vec<ShapeInfo>) -> ShapesGenerator {
        ShapesGenerator { shapes }
    }

    pub fn from_config(config: &Config) -> ShapesGenerator {
        let (n_of_shapes, sample, obj_size) = match config.generator {
            GeneratorConfig::Shapes {
                n_of_shapes,
                sample,
                obj_size,
            } => (n_of_shapes, sample, obj_size),
            _ => (0, 0, 1),
        };

        // Generate n shapes
        let variance = (obj_size / 4).max(1);
        let random_shape_gen = ShapeInfoGenerator::new(
            config.dims,
            Vector3::repeat(obj_size),
            Vector3::repeat(variance),
            sample,
            10,
            config.seed,
        );
        let shapes = random_shape_gen.get_shapes(n_of_shapes);
        debug!("Placed {} shapes", shapes.len());
        ShapesGenerator { shapes }
    }

    fn shape_at(&self, coords: Vector3<usize>) -> Option<(usize, &ShapeInfo)> {
        self.shapes
            .iter()
            .enumerate()
            .find(|(_, shape)| shape.contains(coords) && shape.render_at(coords - shape.position_low) > 0)
    }
}

impl SampleGenerator for ShapesGenerator {
    fn sample_at(&self, coords: Vector3<usize>) -> u8 {
        match self.shape_at(coords) {
            Some((_, shape)) => shape.render_at(coords - shape.position_low),
            None => 0,
        }
    }

    fn label_at(&self, coords: Vector3<usize>) -> Option<u8> {
        self.shape_at(coords)
            .map(|(n, _)| FIRST_LABEL + (n % (u8::MAX - FIRST_LABEL) as usize) as u8)
    }

    fn does_label(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Cuboid,
    Sphere,
}

/// One shape in volume
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeInfo {
    pub position_low: Vector3<usize>,
    pub position_high: Vector3<usize>,
    pub shape_type: ShapeType,
    pub sample: u8,
}

impl ShapeInfo {
    #[must_use]
    pub fn new(
        position_low: Vector3<usize>,
        position_high: Vector3<usize>,
        shape_type: ShapeType,
        sample: u8,
    ) -> Self {
        Self {
            position_low,
            position_high,
            shape_type,
            sample,
        }
    }

    /// Inside the bounding box, bounds included
    pub fn contains(&self, coords: Vector3<usize>) -> bool {
        (0..3).all(|i| coords[i] >= self.position_low[i] && coords[i] <= self.position_high[i])
    }

    fn render_at(&self, offset: Vector3<usize>) -> u8 {
        match self.shape_type {
            ShapeType::Cuboid => self.sample,
            ShapeType::Sphere => self.render_sphere(offset),
        }
    }

    fn render_sphere(&self, offset: Vector3<usize>) -> u8 {
        let size = (self.position_high - self.position_low).cast::<f32>();
        let center = size / 2.0;
        let r = size.x.min(size.y).min(size.z) / 2.0;

        if (offset.cast::<f32>() - center).magnitude() <= r {
            self.sample
        } else {
            0
        }
    }
}

/// Generate shapes
/// Helper type
pub struct ShapeInfoGenerator {
    rng: fastrand::Rng,
    vol_dims: Vector3<usize>,
    size: Vector3<usize>,
    size_variance: Vector3<usize>,
    sample: u8,
    sample_variance: u8,
}

impl ShapeInfoGenerator {
    #[must_use]
    pub fn new(
        vol_dims: Vector3<usize>,
        size: Vector3<usize>,
        size_variance: Vector3<usize>,
        sample: u8,
        sample_variance: u8,
        seed: Option<u64>,
    ) -> Self {
        let rng = fastrand::Rng::new();
        if let Some(seed) = seed {
            rng.seed(seed);
        }

        Self {
            rng,
            vol_dims,
            size,
            size_variance,
            sample,
            sample_variance,
        }
    }

    fn random_shape(&self) -> ShapeType {
        if self.rng.bool() {
            ShapeType::Cuboid
        } else {
            ShapeType::Sphere
        }
    }

    fn random_vector<R>(&self, ranges: [R; 3]) -> Vector3<usize>
    where
        R: RangeBounds<usize>,
    {
        let [x, y, z] = ranges;
        vector![self.rng.usize(x), self.rng.usize(y), self.rng.usize(z)]
    }

    pub fn get_shapes(&self, n: usize) -> Vec<ShapeInfo> {
        (0..n).map(|_| self.get_shape()).collect()
    }

    pub fn get_shape(&self) -> ShapeInfo {
        let shape_type = self.random_shape();

        // Shapes never outgrow the volume
        let largest = self.vol_dims.map(|d| d.saturating_sub(1));
        let size_min = self.size.zip_map(&self.size_variance, |s, v| s.saturating_sub(v));
        let size_min = size_min.zip_map(&largest, usize::min);
        let size_max = (self.size + self.size_variance).zip_map(&largest, usize::min);
        let size = self.random_vector([
            size_min.x..=size_max.x,
            size_min.y..=size_max.y,
            size_min.z..=size_max.z,
        ]);

        // Spawn shape in positions it fits
        let free = largest - size;
        let position_low = self.random_vector([0..=free.x, 0..=free.y, 0..=free.z]);
        let position_high = position_low + size;

        let sample = self.random_sample();

        ShapeInfo::new(position_low, position_high, shape_type, sample)
    }

    fn random_sample(&self) -> u8 {
        // Uses saturating intrinsics, so there is no overflow
        let low = self.sample.saturating_sub(self.sample_variance);
        let high = self.sample.saturating_add(self.sample_variance);
        self.rng.u8(low..=high)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn generator(seed: u64) -> ShapeInfoGenerator {
        ShapeInfoGenerator::new(
            vector![40, 30, 20],
            vector![12, 12, 12],
            vector![3, 3, 3],
            100,
            10,
            Some(seed),
        )
    }

    #[test]
    fn shapes_fit_in_volume() {
        let shapes = generator(5).get_shapes(50);
        for shape in &shapes {
            assert!(shape.position_high.x < 40);
            assert!(shape.position_high.y < 30);
            assert!(shape.position_high.z < 20);
            assert!((90..=110).contains(&shape.sample));
        }
    }

    #[test]
    fn seed_replicates_shapes() {
        assert_eq!(generator(9).get_shapes(5), generator(9).get_shapes(5));
    }

    #[test]
    fn labels_follow_shapes() {
        let cube = ShapeInfo::new(vector![0, 0, 0], vector![3, 3, 3], ShapeType::Cuboid, 80);
        let ball = ShapeInfo::new(vector![10, 10, 10], vector![16, 16, 16], ShapeType::Sphere, 60);
        let gen = ShapesGenerator::new(vec![cube, ball]);

        assert_eq!(gen.sample_at(vector![1, 2, 3]), 80);
        assert_eq!(gen.label_at(vector![1, 2, 3]), Some(FIRST_LABEL));
        assert_eq!(gen.sample_at(vector![13, 13, 13]), 60);
        assert_eq!(gen.label_at(vector![13, 13, 13]), Some(FIRST_LABEL + 1));
        // Corner of the ball's box is outside the ball
        assert_eq!(gen.sample_at(vector![10, 10, 10]), 0);
        assert_eq!(gen.label_at(vector![10, 10, 10]), None);
        assert_eq!(gen.label_at(vector![30, 30, 30]), None);
    }
}
