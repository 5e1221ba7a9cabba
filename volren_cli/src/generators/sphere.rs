use nalgebra::Vector3;

use crate::config::{Config, GeneratorConfig};

use super::SampleGenerator;

/// Generate one ball in the center of the volume.
/// Samples fall off linearly over `edge` voxels around the radius,
/// so gradients on the surface are well defined.
pub struct SphereGenerator {
    sample: u8,
    center: Vector3<f32>,
    radius: f32,
    edge: f32,
}

impl SphereGenerator {
    pub fn new(sample: u8, dims: Vector3<usize>) -> SphereGenerator {
        let dims_f = dims.cast::<f32>();
        let center = (dims_f - Vector3::repeat(1.0)) / 2.0;
        SphereGenerator {
            sample,
            center,
            radius: dims_f.x.min(dims_f.y).min(dims_f.z) / 3.0,
            edge: 2.0,
        }
    }

    pub fn from_config(config: &Config) -> SphereGenerator {
        let sample = match config.generator {
            GeneratorConfig::Sphere { sample } => sample,
            _ => 0,
        };
        SphereGenerator::new(sample, config.dims)
    }
}

impl SampleGenerator for SphereGenerator {
    fn sample_at(&self, coords: Vector3<usize>) -> u8 {
        let distance = (coords.cast::<f32>() - self.center).magnitude();
        // 1 deep inside, 0 outside, linear in between
        let weight = ((self.radius - distance) / self.edge + 0.5).clamp(0.0, 1.0);
        (weight * self.sample as f32).round() as u8
    }
}

#[cfg(test)]
mod test {
    use nalgebra::vector;

    use super::*;

    #[test]
    fn dense_center_empty_corner() {
        let gen = SphereGenerator::new(200, vector![33, 33, 33]);
        assert_eq!(gen.sample_at(vector![16, 16, 16]), 200);
        assert_eq!(gen.sample_at(vector![0, 0, 0]), 0);
    }

    #[test]
    fn falls_off_monotonically() {
        let gen = SphereGenerator::new(255, vector![32, 32, 32]);
        let mut last = u8::MAX;
        for x in 16..32 {
            let sample = gen.sample_at(vector![x, 16, 16]);
            assert!(sample <= last);
            last = sample;
        }
        assert_eq!(last, 0);
    }
}
