pub use criterion::{criterion_group, criterion_main, Criterion};

pub use nalgebra::{vector, Vector3};
pub use volren_lib::{
    render::{RenderConfig, Renderer, Traversal},
    test_helpers::sphere_volume,
    volumetric::{LinearVolume, NearestNeighbor, Trilinear, Volume},
};

pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 256;

pub const VOLUME_SIDE: usize = 128;

pub const DEFAULT_ROTATIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [30.0, 45.0, 0.0], [10.0, 200.0, 75.0]];

pub fn get_volume() -> LinearVolume {
    sphere_volume(VOLUME_SIDE)
}

pub fn config(early_ray_termination: bool, traversal: Traversal) -> RenderConfig {
    RenderConfig::builder()
        .resolution(WIDTH, HEIGHT)
        .early_ray_termination(early_ray_termination)
        .traversal(traversal)
        .build_unchecked()
}
