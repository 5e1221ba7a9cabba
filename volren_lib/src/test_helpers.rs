//! Module with helper functions
//! Saves repetition in unit tests, integration tests and benchmarks

use nalgebra::{vector, Vector3};

use crate::{
    render::{FramePixels, Framebuffer, RenderConfig},
    volumetric::LinearVolume,
};

/// Cube of `side` voxels, all of `value`
pub fn uniform_volume(side: usize, value: f32) -> LinearVolume {
    LinearVolume::from_fn(vector![side, side, side], |_, _, _| value)
}

/// Ball of radius `side / 3` with a linear falloff, 128 on the surface
pub fn sphere_volume(side: usize) -> LinearVolume {
    let center = (side as f32 - 1.0) / 2.0;
    let radius = side as f32 / 3.0;
    LinearVolume::from_fn(vector![side, side, side], |x, y, z| {
        let d = (Vector3::new(x as f32, y as f32, z as f32) - Vector3::repeat(center)).norm();
        ((radius - d) * 64.0 + 128.0).clamp(0.0, 255.0)
    })
}

/// Default tent around 128, white voxels
pub fn tent_config(width: usize, height: usize) -> RenderConfig {
    RenderConfig::builder()
        .resolution(width, height)
        .build_unchecked()
}

/// Coordinates of all non black pixels, row by row
pub fn lit_pixels(frame: &Framebuffer) -> Vec<(usize, usize)> {
    let lit = |i: usize| match frame.pixels() {
        FramePixels::Gray(px) => px[i] != 0,
        FramePixels::Rgb(px) => px[i] != 0,
    };
    (0..frame.height())
        .flat_map(|y| (0..frame.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| lit(y * frame.width() + x))
        .collect()
}
