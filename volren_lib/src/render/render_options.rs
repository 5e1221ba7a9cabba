use serde::{Deserialize, Serialize};

use crate::{
    classify::{ClassifierConfig, ShadingConfig},
    RenderError,
};

/// How the sample of a slab is placed along the ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// One sample per unit step of view space `k`
    #[default]
    ViewSpace,
    /// One sample per crossed cell, in the middle of the ray segment inside the cell
    Cell,
}

/// Parameters of one rendering pass.
///
/// Immutable once handed to a pass, hosts build a new one per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Width and height in pixels
    pub resolution: (usize, usize),
    /// Degrees around x, y and z, applied in this order
    pub rotation: [f32; 3],
    pub scale: f32,
    /// Stretch the volume by the voxel shape of the volume
    pub aspect_correction: bool,
    pub early_ray_termination: bool,
    pub traversal: Traversal,
    /// Number of slabs, derived from the volume extent if not set
    pub depth: Option<usize>,
    pub shading: ShadingConfig,
    pub classifier: ClassifierConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: (256, 256),
            rotation: [0.0; 3],
            scale: 1.0,
            aspect_correction: true,
            early_ray_termination: true,
            traversal: Traversal::ViewSpace,
            depth: None,
            shading: ShadingConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Checks values that would make a pass meaningless.
    /// Classifier parameters are checked when the classifier is built.
    pub fn validate(&self) -> Result<(), RenderError> {
        let (width, height) = self.resolution;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution {width}x{height} has no pixels"
            )));
        }
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if self.rotation.iter().any(|r| !r.is_finite()) {
            return Err(RenderError::InvalidConfig(format!(
                "rotation {:?} is not finite",
                self.rotation
            )));
        }
        if self.depth == Some(0) {
            return Err(RenderError::InvalidConfig("depth of zero slabs".into()));
        }
        let shading = &self.shading;
        if !(shading.ambient >= 0.0 && shading.diffuse >= 0.0) {
            return Err(RenderError::InvalidConfig(format!(
                "ambient {} and diffuse {} must not be negative",
                shading.ambient, shading.diffuse
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn resolution(mut self, width: usize, height: usize) -> Self {
        self.config.resolution = (width, height);
        self
    }

    pub fn rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.config.rotation = [x, y, z];
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn aspect_correction(mut self, enable: bool) -> Self {
        self.config.aspect_correction = enable;
        self
    }

    pub fn early_ray_termination(mut self, enable: bool) -> Self {
        self.config.early_ray_termination = enable;
        self
    }

    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.config.traversal = traversal;
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.config.depth = Some(depth);
        self
    }

    pub fn shading(mut self, shading: ShadingConfig) -> Self {
        self.config.shading = shading;
        self
    }

    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.config.classifier = classifier;
        self
    }

    /// Validated config
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Config as set, checked when a pass starts
    pub fn build_unchecked(self) -> RenderConfig {
        self.config
    }
}
