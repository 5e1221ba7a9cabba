use nalgebra::Vector3;

use crate::config::{Config, GeneratorConfig};

use super::SampleGenerator;

/// Generate solid volume
/// All sample values are the same, except for an empty border
pub struct SolidGenerator {
    /// The sample value
    sample: u8,
    pad: usize,
    dims: Vector3<usize>,
}

impl SolidGenerator {
    pub fn new(sample: u8, pad: usize, dims: Vector3<usize>) -> SolidGenerator {
        SolidGenerator { sample, pad, dims }
    }

    pub fn from_config(config: &Config) -> SolidGenerator {
        let sample = match config.generator {
            GeneratorConfig::Solid { sample } => sample,
            _ => 0,
        };
        // Border keeps the faces of the block inside the interpolator's reach
        let smallest = config.dims.iter().copied().min().unwrap_or(0);
        let pad = (smallest / 10).max(1);
        SolidGenerator::new(sample, pad, config.dims)
    }
}

impl SampleGenerator for SolidGenerator {
    fn sample_at(&self, coords: Vector3<usize>) -> u8 {
        let inside = (0..3).all(|i| coords[i] >= self.pad && coords[i] + self.pad < self.dims[i]);
        if inside {
            self.sample
        } else {
            0
        }
    }
}

#[cfg(test)]
mod test {
    use nalgebra::vector;

    use super::*;

    #[test]
    fn border_is_empty() {
        let gen = SolidGenerator::new(50, 2, vector![10, 10, 10]);
        assert_eq!(gen.sample_at(vector![2, 2, 2]), 50);
        assert_eq!(gen.sample_at(vector![7, 7, 7]), 50);
        assert_eq!(gen.sample_at(vector![8, 5, 5]), 0);
        assert_eq!(gen.sample_at(vector![5, 1, 5]), 0);
    }
}
