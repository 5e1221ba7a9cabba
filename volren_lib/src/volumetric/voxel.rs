use nalgebra::{vector, Vector3};

use crate::color::RGB;

/// Interpolated sample of a volume
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoxelValue {
    /// Scalar intensity, brightness for RGB volumes
    pub value: f32,
    pub index: u8,
    pub rgb: Option<RGB>,
}

impl VoxelValue {
    pub fn scalar(value: f32) -> VoxelValue {
        VoxelValue {
            value,
            index: 0,
            rgb: None,
        }
    }

    pub fn indexed(value: f32, index: u8) -> VoxelValue {
        VoxelValue {
            value,
            index,
            rgb: None,
        }
    }

    /// Intensity is the brightest channel
    pub fn rgb(rgb: RGB) -> VoxelValue {
        VoxelValue {
            value: rgb.max(),
            index: 0,
            rgb: Some(rgb),
        }
    }
}

/// Derivative of one (scalar volumes) or three (RGB volumes) channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    channels: [Vector3<f32>; 3],
    count: usize,
}

impl Gradient {
    pub fn scalar(v: Vector3<f32>) -> Gradient {
        Gradient {
            channels: [v, Vector3::zeros(), Vector3::zeros()],
            count: 1,
        }
    }

    pub fn rgb(channels: [Vector3<f32>; 3]) -> Gradient {
        Gradient { channels, count: 3 }
    }

    pub fn zero() -> Gradient {
        Gradient::scalar(vector![0.0, 0.0, 0.0])
    }

    pub fn channel_count(&self) -> usize {
        self.count
    }

    pub fn vector(&self, channel: usize) -> &Vector3<f32> {
        &self.channels[channel]
    }

    pub fn magnitude(&self, channel: usize) -> f32 {
        self.channels[channel].norm()
    }

    pub fn average_magnitude(&self) -> f32 {
        let sum: f32 = (0..self.count).map(|c| self.magnitude(c)).sum();
        sum / self.count as f32
    }

    /// Every channel scaled to unit length, zero channels stay zero
    pub fn normalized(&self) -> Gradient {
        let mut normalized = *self;
        for v in normalized.channels.iter_mut().take(self.count) {
            *v = v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        normalized
    }

    pub fn is_finite(&self) -> bool {
        self.channels[..self.count]
            .iter()
            .all(|v| v.iter().all(|c| c.is_finite()))
    }

    /// Mean of the channel vectors, points towards denser material
    pub fn direction(&self) -> Vector3<f32> {
        let sum: Vector3<f32> = self.channels[..self.count].iter().sum();
        sum / self.count as f32
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn gradient_magnitudes() {
        let g = Gradient::rgb([vector![3.0, 4.0, 0.0], vector![0.0, 0.0, 1.0], vector![0.0, 0.0, 0.0]]);

        assert_eq!(g.channel_count(), 3);
        assert_eq!(g.magnitude(0), 5.0);
        assert_eq!(g.average_magnitude(), 2.0);

        let n = g.normalized();
        assert!((n.magnitude(0) - 1.0).abs() < 1e-6);
        assert_eq!(n.magnitude(2), 0.0);
    }

    #[test]
    fn scalar_direction() {
        let g = Gradient::scalar(vector![0.0, 2.0, 0.0]);
        assert_eq!(g.average_magnitude(), 2.0);
        assert_eq!(g.normalized().direction(), vector![0.0, 1.0, 0.0]);
        assert_eq!(Gradient::zero().normalized().direction(), Vector3::zeros());
        assert!(Gradient::zero().is_finite());
        assert!(!Gradient::scalar(vector![f32::NAN, 0.0, 0.0]).is_finite());
    }

    #[test]
    fn rgb_value_is_brightness() {
        let v = VoxelValue::rgb(vector![10.0, 200.0, 30.0]);
        assert_eq!(v.value, 200.0);
        assert_eq!(v.index, 0);
    }
}
