use nalgebra::{vector, Vector3};

use crate::{color::RGB, RenderError};

use super::{Volume, VoxelKind};

/// True color volume, intensity of a voxel is its brightest channel
pub struct RgbVolume {
    size: Vector3<usize>,
    aspect: Vector3<f32>,
    data: Vec<[u8; 3]>,
}

impl std::fmt::Debug for RgbVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbVolume")
            .field("size", &self.size)
            .field("aspect", &self.aspect)
            .field("data len ", &self.data.len())
            .finish()
    }
}

impl RgbVolume {
    pub fn new(size: Vector3<usize>, data: Vec<[u8; 3]>) -> Result<RgbVolume, RenderError> {
        let expected = size.x * size.y * size.z;
        if data.len() != expected {
            return Err(RenderError::InvalidConfig(format!(
                "rgb volume needs {expected} voxels, got {}",
                data.len()
            )));
        }
        Ok(RgbVolume {
            size,
            aspect: vector![1.0, 1.0, 1.0],
            data,
        })
    }

    pub fn from_fn<F>(size: Vector3<usize>, f: F) -> RgbVolume
    where
        F: Fn(usize, usize, usize) -> [u8; 3],
    {
        let mut data = Vec::with_capacity(size.x * size.y * size.z);
        for x in 0..size.x {
            for y in 0..size.y {
                for z in 0..size.z {
                    data.push(f(x, y, z));
                }
            }
        }
        RgbVolume {
            size,
            aspect: vector![1.0, 1.0, 1.0],
            data,
        }
    }

    pub fn with_aspect(mut self, aspect: Vector3<f32>) -> RgbVolume {
        self.aspect = aspect;
        self
    }

    fn get_voxel(&self, x: usize, y: usize, z: usize) -> Option<&[u8; 3]> {
        if x >= self.size.x || y >= self.size.y || z >= self.size.z {
            return None;
        }
        self.data
            .get(z + y * self.size.z + x * self.size.y * self.size.z)
    }
}

impl Volume for RgbVolume {
    fn get_size(&self) -> Vector3<usize> {
        self.size
    }

    fn get_aspect(&self) -> Vector3<f32> {
        self.aspect
    }

    fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        self.get_voxel(x, y, z)
            .map(|rgb| rgb.iter().copied().max().unwrap_or(0) as f32)
    }

    fn get_rgb(&self, x: usize, y: usize, z: usize) -> Option<RGB> {
        self.get_voxel(x, y, z)
            .map(|&[r, g, b]| vector![r as f32, g as f32, b as f32])
    }

    fn get_kind(&self) -> VoxelKind {
        VoxelKind::Rgb
    }

    fn get_name(&self) -> &str {
        "RgbVolume"
    }
}
