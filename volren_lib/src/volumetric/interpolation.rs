//! Sampling of a volume between voxel centers.
//!
//! Positions are in object (voxel) space. Callers check [`Interpolator::is_valid`]
//! before [`Interpolator::value`] and [`Interpolator::is_valid_gradient`] before
//! [`Interpolator::gradient`]; invalid positions are skipped, never clamped.

use nalgebra::{vector, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::color::RGB;

use super::{Gradient, Volume, VoxelKind, VoxelValue};

pub trait Interpolator: Send + Sync {
    /// Enough neighbours around `pos` to interpolate a value
    fn is_valid<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool;

    /// Enough neighbours around `pos` to take central differences
    fn is_valid_gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool;

    fn value<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> VoxelValue;

    fn gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> Gradient;

    fn get_name(&self) -> &str;
}

/// Which part of a voxel is read
#[derive(Debug, Clone, Copy)]
enum Channel {
    Intensity,
    Color(usize),
}

fn read<V: Volume + ?Sized>(volume: &V, channel: Channel, x: usize, y: usize, z: usize) -> f32 {
    match channel {
        Channel::Intensity => volume.get_data(x, y, z).unwrap_or(0.0),
        Channel::Color(c) => volume.get_rgb(x, y, z).map(|rgb| rgb[c]).unwrap_or(0.0),
    }
}

/// Central differences at a voxel with both neighbours inside on every axis
fn central_difference<V: Volume + ?Sized>(volume: &V, channel: Channel, v: Vector3<usize>) -> Vector3<f32> {
    let (x, y, z) = (v.x, v.y, v.z);
    vector![
        read(volume, channel, x + 1, y, z) - read(volume, channel, x - 1, y, z),
        read(volume, channel, x, y + 1, z) - read(volume, channel, x, y - 1, z),
        read(volume, channel, x, y, z + 1) - read(volume, channel, x, y, z - 1)
    ] * 0.5
}

fn gradient_channels<V, F>(volume: &V, per_channel: F) -> Gradient
where
    V: Volume + ?Sized,
    F: Fn(Channel) -> Vector3<f32>,
{
    match volume.get_kind() {
        VoxelKind::Rgb => Gradient::rgb([
            per_channel(Channel::Color(0)),
            per_channel(Channel::Color(1)),
            per_channel(Channel::Color(2)),
        ]),
        _ => Gradient::scalar(per_channel(Channel::Intensity)),
    }
}

/// Value of the voxel nearest to the position
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl NearestNeighbor {
    fn round(pos: &Point3<f32>) -> Vector3<f32> {
        pos.coords.map(|v| (v + 0.5).floor())
    }

    fn voxel(pos: &Point3<f32>) -> Vector3<usize> {
        NearestNeighbor::round(pos).map(|v| v as usize)
    }
}

impl Interpolator for NearestNeighbor {
    fn is_valid<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool {
        let size = volume.get_size().map(|v| v as f32);
        let r = NearestNeighbor::round(pos);
        (0..3).all(|d| r[d] >= 0.0 && r[d] < size[d])
    }

    fn is_valid_gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool {
        let size = volume.get_size().map(|v| v as f32);
        let r = NearestNeighbor::round(pos);
        (0..3).all(|d| r[d] >= 1.0 && r[d] + 1.0 < size[d])
    }

    fn value<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> VoxelValue {
        let v = NearestNeighbor::voxel(pos);
        match volume.get_kind() {
            VoxelKind::Rgb => match volume.get_rgb(v.x, v.y, v.z) {
                Some(rgb) => VoxelValue::rgb(rgb),
                None => VoxelValue::default(),
            },
            VoxelKind::Indexed => VoxelValue::indexed(
                read(volume, Channel::Intensity, v.x, v.y, v.z),
                volume.get_index(v.x, v.y, v.z),
            ),
            VoxelKind::Scalar => VoxelValue::scalar(read(volume, Channel::Intensity, v.x, v.y, v.z)),
        }
    }

    fn gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> Gradient {
        let v = NearestNeighbor::voxel(pos);
        gradient_channels(volume, |channel| central_difference(volume, channel, v))
    }

    fn get_name(&self) -> &str {
        "NearestNeighbor"
    }
}

/// Trilinear blend of the 8 voxels of the enclosing cell.
/// Labels are not blended, they come from the lowest corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trilinear;

impl Trilinear {
    fn base(pos: &Point3<f32>) -> Vector3<f32> {
        pos.coords.map(f32::floor)
    }

    /// Corner weights, corners ordered x fastest, then y, then z
    fn weights(pos: &Point3<f32>) -> [f32; 8] {
        let t = pos.coords - Trilinear::base(pos);
        let mut w = [0.0; 8];
        for (corner, weight) in w.iter_mut().enumerate() {
            let pick = |bit: usize, t: f32| if corner & bit == 0 { 1.0 - t } else { t };
            *weight = pick(1, t.x) * pick(2, t.y) * pick(4, t.z);
        }
        w
    }

    fn corner(base: &Vector3<usize>, corner: usize) -> Vector3<usize> {
        vector![
            base.x + (corner & 1),
            base.y + ((corner >> 1) & 1),
            base.z + ((corner >> 2) & 1)
        ]
    }

    fn blend<T, F>(pos: &Point3<f32>, zero: T, sample: F) -> T
    where
        T: std::ops::Add<Output = T> + std::ops::Mul<f32, Output = T>,
        F: Fn(Vector3<usize>) -> T,
    {
        let base = Trilinear::base(pos).map(|v| v as usize);
        Trilinear::weights(pos)
            .iter()
            .enumerate()
            .fold(zero, |acc, (corner, &w)| {
                acc + sample(Trilinear::corner(&base, corner)) * w
            })
    }
}

impl Interpolator for Trilinear {
    fn is_valid<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool {
        let size = volume.get_size().map(|v| v as f32);
        let b = Trilinear::base(pos);
        (0..3).all(|d| b[d] >= 0.0 && b[d] + 1.0 < size[d])
    }

    fn is_valid_gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool {
        let size = volume.get_size().map(|v| v as f32);
        let b = Trilinear::base(pos);
        (0..3).all(|d| b[d] >= 1.0 && b[d] + 2.0 < size[d])
    }

    fn value<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> VoxelValue {
        let base = Trilinear::base(pos).map(|v| v as usize);
        match volume.get_kind() {
            VoxelKind::Rgb => {
                let rgb: RGB = Trilinear::blend(pos, Vector3::zeros(), |v| {
                    volume.get_rgb(v.x, v.y, v.z).unwrap_or_else(Vector3::zeros)
                });
                VoxelValue::rgb(rgb)
            }
            kind => {
                let value = Trilinear::blend(pos, 0.0, |v| read(volume, Channel::Intensity, v.x, v.y, v.z));
                match kind {
                    VoxelKind::Indexed => VoxelValue::indexed(value, volume.get_index(base.x, base.y, base.z)),
                    _ => VoxelValue::scalar(value),
                }
            }
        }
    }

    fn gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> Gradient {
        gradient_channels(volume, |channel| {
            Trilinear::blend(pos, Vector3::zeros(), |v| central_difference(volume, channel, v))
        })
    }

    fn get_name(&self) -> &str {
        "Trilinear"
    }
}

/// Interpolator picked at runtime, e.g. from a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnyInterpolator {
    NearestNeighbor,
    #[default]
    Trilinear,
}

impl Interpolator for AnyInterpolator {
    fn is_valid<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool {
        match self {
            AnyInterpolator::NearestNeighbor => NearestNeighbor.is_valid(volume, pos),
            AnyInterpolator::Trilinear => Trilinear.is_valid(volume, pos),
        }
    }

    fn is_valid_gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> bool {
        match self {
            AnyInterpolator::NearestNeighbor => NearestNeighbor.is_valid_gradient(volume, pos),
            AnyInterpolator::Trilinear => Trilinear.is_valid_gradient(volume, pos),
        }
    }

    fn value<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> VoxelValue {
        match self {
            AnyInterpolator::NearestNeighbor => NearestNeighbor.value(volume, pos),
            AnyInterpolator::Trilinear => Trilinear.value(volume, pos),
        }
    }

    fn gradient<V: Volume + ?Sized>(&self, volume: &V, pos: &Point3<f32>) -> Gradient {
        match self {
            AnyInterpolator::NearestNeighbor => NearestNeighbor.gradient(volume, pos),
            AnyInterpolator::Trilinear => Trilinear.gradient(volume, pos),
        }
    }

    fn get_name(&self) -> &str {
        match self {
            AnyInterpolator::NearestNeighbor => NearestNeighbor.get_name(),
            AnyInterpolator::Trilinear => Trilinear.get_name(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::volumetric::{LinearVolume, RgbVolume};
    use nalgebra::point;

    fn ramp() -> LinearVolume {
        LinearVolume::from_fn(vector![5, 5, 5], |x, y, z| (x + 2 * y + 3 * z) as f32)
    }

    #[test]
    fn nearest_validity() {
        let vol = ramp();
        let nn = NearestNeighbor;

        assert!(nn.is_valid(&vol, &point![0.0, 0.0, 0.0]));
        assert!(nn.is_valid(&vol, &point![-0.4, 4.4, 2.0]));
        assert!(!nn.is_valid(&vol, &point![-0.6, 0.0, 0.0]));
        assert!(!nn.is_valid(&vol, &point![0.0, 4.5, 0.0]));

        assert!(nn.is_valid_gradient(&vol, &point![1.0, 3.4, 2.0]));
        assert!(!nn.is_valid_gradient(&vol, &point![0.4, 2.0, 2.0]));
        assert!(!nn.is_valid_gradient(&vol, &point![2.0, 3.5, 2.0]));
        assert!(!nn.is_valid(&vol, &point![f32::NAN, 1.0, 1.0]));
    }

    #[test]
    fn trilinear_validity() {
        let vol = ramp();
        let tl = Trilinear;

        assert!(tl.is_valid(&vol, &point![0.0, 3.9, 2.0]));
        assert!(!tl.is_valid(&vol, &point![4.0, 1.0, 1.0]));
        assert!(!tl.is_valid(&vol, &point![-0.1, 1.0, 1.0]));

        assert!(tl.is_valid_gradient(&vol, &point![1.0, 2.9, 2.5]));
        assert!(!tl.is_valid_gradient(&vol, &point![0.9, 2.0, 2.0]));
        assert!(!tl.is_valid_gradient(&vol, &point![3.0, 2.0, 2.0]));
    }

    #[test]
    fn linear_field_is_reproduced() {
        let vol = ramp();
        let pos = point![1.25, 2.5, 1.75];
        let expected = 1.25 + 2.0 * 2.5 + 3.0 * 1.75;

        let v = Trilinear.value(&vol, &pos);
        assert!((v.value - expected).abs() < 1e-4);

        let g = Trilinear.gradient(&vol, &pos);
        assert_eq!(g.channel_count(), 1);
        assert!((g.vector(0) - vector![1.0, 2.0, 3.0]).norm() < 1e-4);

        let n = NearestNeighbor.value(&vol, &pos);
        assert_eq!(n.value, 1.0 + 2.0 * 3.0 + 3.0 * 2.0);
    }

    #[test]
    fn index_from_base_voxel() {
        let vol = ramp().with_index_fn(|x, y, _| (x * 10 + y) as u8);

        assert_eq!(Trilinear.value(&vol, &point![2.9, 1.9, 1.0]).index, 21);
        assert_eq!(NearestNeighbor.value(&vol, &point![2.9, 1.9, 1.0]).index, 32);
    }

    #[test]
    fn rgb_gradient_has_three_channels() {
        let vol = RgbVolume::from_fn(vector![4, 4, 4], |x, y, z| [(x * 10) as u8, (y * 20) as u8, (z * 30) as u8]);
        let pos = point![1.5, 1.5, 1.5];

        let g = Trilinear.gradient(&vol, &pos);
        assert_eq!(g.channel_count(), 3);
        assert!((g.vector(0) - vector![10.0, 0.0, 0.0]).norm() < 1e-4);
        assert!((g.vector(2) - vector![0.0, 0.0, 30.0]).norm() < 1e-4);

        let v = Trilinear.value(&vol, &pos);
        assert!((v.value - 45.0).abs() < 1e-4);
        assert_eq!(v.rgb.map(|c| c.x), Some(15.0));
    }

    #[test]
    fn any_dispatches() {
        let vol = ramp();
        let pos = point![1.5, 1.5, 1.5];
        assert_eq!(AnyInterpolator::NearestNeighbor.value(&vol, &pos), NearestNeighbor.value(&vol, &pos));
        assert_eq!(AnyInterpolator::default().get_name(), "Trilinear");
    }
}
