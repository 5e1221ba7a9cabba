use nalgebra::Vector3;

use crate::{
    classify::{ClassifiedSample, Shade},
    color::{self, RGB},
};

/// Accumulated opacity at which a ray counts as saturated
pub const OPAQUE_THRESHOLD: f32 = 0.99;

/// Front-to-back accumulation of one pixel.
///
/// Color is premultiplied by opacity, channels in <0;255>.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelAccumulator {
    color: Vector3<f32>,
    alpha: f32,
    opaque: bool,
}

impl PixelAccumulator {
    pub fn new() -> PixelAccumulator {
        PixelAccumulator::default()
    }

    pub fn color(&self) -> &RGB {
        &self.color
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Composite a gray sample of level `gray` behind the accumulated ones
    pub fn blend_gray(&mut self, opacity: f32, gray: f32, shade: &Shade) {
        self.blend_rgb(opacity, &color::mono(gray), shade);
    }

    /// Composite a colored sample behind the accumulated ones
    pub fn blend_rgb(&mut self, opacity: f32, sample: &RGB, shade: &Shade) {
        let contribution = shade.compute(opacity);
        let remaining = 1.0 - self.alpha;
        let weights = contribution.color.map(|c| c.max(0.0));

        self.color += weights.component_mul(sample) * remaining;
        self.alpha += remaining * contribution.alpha.clamp(0.0, 1.0);
    }

    pub fn blend(&mut self, sample: &ClassifiedSample, shade: &Shade) {
        self.blend_rgb(sample.opacity, &sample.color, shade);
    }

    pub fn almost_opaque(&self) -> bool {
        self.alpha >= OPAQUE_THRESHOLD
    }

    /// Saturate, the ray is not sampled any further
    pub fn set_opaque(&mut self) {
        self.alpha = 1.0;
        self.opaque = true;
    }

    pub fn not_opaque(&self) -> bool {
        !self.opaque
    }

    pub fn to_gray(&self) -> u8 {
        self.color.x.clamp(0.0, 255.0).round() as u8
    }

    /// `0x00RRGGBB`
    pub fn to_rgb(&self) -> u32 {
        color::pack(&self.color)
    }
}
