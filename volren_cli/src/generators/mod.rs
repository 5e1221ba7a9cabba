//! Synthetic volumes to render

use log::info;
use nalgebra::{vector, Vector3};
use volren_lib::volumetric::LinearVolume;

use crate::config::{Config, GeneratorConfig};

mod shapes;
mod solid;
mod sphere;

pub use shapes::{ShapeInfo, ShapeInfoGenerator, ShapeType, ShapesGenerator};
pub use solid::SolidGenerator;
pub use sphere::SphereGenerator;

// Generates one sample at a time, at any location
pub trait SampleGenerator {
    fn sample_at(&self, coords: Vector3<usize>) -> u8;

    /// Label of the object at `coords`, `None` if the generator does not label
    fn label_at(&self, _coords: Vector3<usize>) -> Option<u8> {
        None
    }

    fn does_label(&self) -> bool {
        false
    }
}

pub fn get_sample_generator(config: &Config) -> Box<dyn SampleGenerator> {
    match config.generator {
        GeneratorConfig::Shapes { .. } => Box::new(ShapesGenerator::from_config(config)),
        GeneratorConfig::Sphere { .. } => Box::new(SphereGenerator::from_config(config)),
        GeneratorConfig::Solid { .. } => Box::new(SolidGenerator::from_config(config)),
    }
}

/// Sample `gen` on every voxel of a `dims` grid
pub fn build_volume(gen: &dyn SampleGenerator, dims: Vector3<usize>, cell_shape: Vector3<f32>) -> LinearVolume {
    let volume = LinearVolume::from_fn(dims, |x, y, z| gen.sample_at(vector![x, y, z]) as f32)
        .with_aspect(cell_shape);

    if gen.does_label() {
        volume.with_index_fn(|x, y, z| gen.label_at(vector![x, y, z]).unwrap_or(0))
    } else {
        volume
    }
}

pub fn generate_volume(config: &Config) -> LinearVolume {
    let gen = get_sample_generator(config);
    let volume = build_volume(gen.as_ref(), config.dims, config.cell_shape);
    info!("Generated {:?}", volume);
    volume
}

#[cfg(test)]
mod test {
    use super::*;

    struct Diagonal;

    impl SampleGenerator for Diagonal {
        fn sample_at(&self, coords: Vector3<usize>) -> u8 {
            (coords.x == coords.y && coords.y == coords.z) as u8 * 100
        }
    }

    #[test]
    fn volume_follows_generator() {
        use volren_lib::volumetric::{Volume, VoxelKind};

        let volume = build_volume(&Diagonal, vector![4, 4, 4], vector![1.0, 1.0, 2.0]);
        assert_eq!(volume.get_data(2, 2, 2), Some(100.0));
        assert_eq!(volume.get_data(2, 1, 2), Some(0.0));
        assert_eq!(volume.get_aspect(), vector![1.0, 1.0, 2.0]);
        assert_eq!(volume.get_kind(), VoxelKind::Scalar);
    }
}
