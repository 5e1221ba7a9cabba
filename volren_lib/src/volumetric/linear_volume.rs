use nalgebra::{vector, Vector3};

use crate::{common::ValueRange, RenderError};

use super::{Volume, VoxelKind};

/// Scalar volume stored in one contiguous buffer, z varies fastest.
/// Optionally carries an 8-bit label per voxel.
pub struct LinearVolume {
    size: Vector3<usize>,
    aspect: Vector3<f32>,
    data: Vec<f32>,
    index: Option<Vec<u8>>,
}

impl std::fmt::Debug for LinearVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Volume")
            .field("size", &self.size)
            .field("aspect", &self.aspect)
            .field("data len ", &self.data.len())
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

fn voxel_count(size: Vector3<usize>) -> usize {
    size.x * size.y * size.z
}

fn check_len(size: Vector3<usize>, len: usize, what: &str) -> Result<(), RenderError> {
    let expected = voxel_count(size);
    if len != expected {
        return Err(RenderError::InvalidConfig(format!(
            "{what} of volume {}x{}x{} needs {expected} voxels, got {len}",
            size.x, size.y, size.z
        )));
    }
    Ok(())
}

impl LinearVolume {
    pub fn new(size: Vector3<usize>, data: Vec<f32>) -> Result<LinearVolume, RenderError> {
        check_len(size, data.len(), "data")?;
        Ok(LinearVolume {
            size,
            aspect: vector![1.0, 1.0, 1.0],
            data,
            index: None,
        })
    }

    /// Fills the volume by calling `f(x, y, z)` for every voxel
    pub fn from_fn<F>(size: Vector3<usize>, f: F) -> LinearVolume
    where
        F: Fn(usize, usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(voxel_count(size));
        for x in 0..size.x {
            for y in 0..size.y {
                for z in 0..size.z {
                    data.push(f(x, y, z));
                }
            }
        }
        LinearVolume {
            size,
            aspect: vector![1.0, 1.0, 1.0],
            data,
            index: None,
        }
    }

    /// Attach labels, same layout as the data
    pub fn with_index(mut self, index: Vec<u8>) -> Result<LinearVolume, RenderError> {
        check_len(self.size, index.len(), "index")?;
        self.index = Some(index);
        Ok(self)
    }

    pub fn with_index_fn<F>(mut self, f: F) -> LinearVolume
    where
        F: Fn(usize, usize, usize) -> u8,
    {
        let mut index = Vec::with_capacity(self.data.len());
        for x in 0..self.size.x {
            for y in 0..self.size.y {
                for z in 0..self.size.z {
                    index.push(f(x, y, z));
                }
            }
        }
        self.index = Some(index);
        self
    }

    pub fn with_aspect(mut self, aspect: Vector3<f32>) -> LinearVolume {
        self.aspect = aspect;
        self
    }

    pub fn data_range(&self) -> ValueRange {
        ValueRange::from_samples(self.data.iter().copied())
    }

    fn get_3d_index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        if x >= self.size.x || y >= self.size.y || z >= self.size.z {
            return None;
        }
        Some(z + y * self.size.z + x * self.size.y * self.size.z)
    }
}

impl Volume for LinearVolume {
    fn get_size(&self) -> Vector3<usize> {
        self.size
    }

    fn get_aspect(&self) -> Vector3<f32> {
        self.aspect
    }

    fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32> {
        let i = self.get_3d_index(x, y, z)?;
        self.data.get(i).copied()
    }

    fn get_index(&self, x: usize, y: usize, z: usize) -> u8 {
        match (&self.index, self.get_3d_index(x, y, z)) {
            (Some(index), Some(i)) => index[i],
            _ => 0,
        }
    }

    fn get_kind(&self) -> VoxelKind {
        if self.index.is_some() {
            VoxelKind::Indexed
        } else {
            VoxelKind::Scalar
        }
    }

    fn get_name(&self) -> &str {
        "LinearVolume"
    }
}
