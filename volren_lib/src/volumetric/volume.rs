use std::sync::Arc;

use nalgebra::{point, vector, Vector3};

use crate::{color::RGB, common::BoundBox};

/// What a voxel carries besides its scalar value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelKind {
    /// Scalar intensity only
    Scalar,
    /// Scalar intensity with an 8-bit label per voxel
    Indexed,
    /// True color, intensity is the brightness
    Rgb,
}

// Volume is axis aligned, voxel `(x, y, z)` sits at object space point `(x, y, z)`.
// Voxel shape is reported by `get_aspect` and applied by the view transform.
pub trait Volume: Send + Sync {
    // data dimensions
    fn get_size(&self) -> Vector3<usize>;

    // voxel shape
    fn get_aspect(&self) -> Vector3<f32> {
        vector![1.0, 1.0, 1.0]
    }

    // None if outside
    fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32>;

    fn get_index(&self, _x: usize, _y: usize, _z: usize) -> u8 {
        0
    }

    fn get_rgb(&self, _x: usize, _y: usize, _z: usize) -> Option<RGB> {
        None
    }

    fn get_kind(&self) -> VoxelKind {
        VoxelKind::Scalar
    }

    fn get_name(&self) -> &str;

    /// Box spanned by voxel centers in object space
    fn get_bound_box(&self) -> BoundBox {
        let dims = self.get_size().map(|v| v.saturating_sub(1) as f32);
        BoundBox::from_position_dims(point![0.0, 0.0, 0.0], dims)
    }

    fn is_empty(&self) -> bool {
        let size = self.get_size();
        size.x == 0 || size.y == 0 || size.z == 0
    }
}

macro_rules! forward_volume {
    ($($target:ty),*) => {$(
        impl<V: Volume + ?Sized> Volume for $target {
            fn get_size(&self) -> Vector3<usize> {
                (**self).get_size()
            }

            fn get_aspect(&self) -> Vector3<f32> {
                (**self).get_aspect()
            }

            fn get_data(&self, x: usize, y: usize, z: usize) -> Option<f32> {
                (**self).get_data(x, y, z)
            }

            fn get_index(&self, x: usize, y: usize, z: usize) -> u8 {
                (**self).get_index(x, y, z)
            }

            fn get_rgb(&self, x: usize, y: usize, z: usize) -> Option<RGB> {
                (**self).get_rgb(x, y, z)
            }

            fn get_kind(&self) -> VoxelKind {
                (**self).get_kind()
            }

            fn get_name(&self) -> &str {
                (**self).get_name()
            }

            fn get_bound_box(&self) -> BoundBox {
                (**self).get_bound_box()
            }

            fn is_empty(&self) -> bool {
                (**self).is_empty()
            }
        }
    )*};
}

forward_volume!(&V, Arc<V>);
