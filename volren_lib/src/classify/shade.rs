//! Light attenuation of classified samples.

use log::debug;
use nalgebra::{vector, Vector3};
use serde::{Deserialize, Serialize};

use crate::{RenderError, ViewTransform};

use super::ColorKind;

/// Attenuation in <0;1>
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    Gray(f32),
    /// Colored light, `light` tints the sample color only.
    /// Opacity is attenuated by `intensity` alone, as with gray light.
    Rgb { light: Vector3<f32>, intensity: f32 },
}

/// Shaded sample ready for compositing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    /// Multiplies the sample color, per channel
    pub color: Vector3<f32>,
    /// Added to the accumulated opacity
    pub alpha: f32,
}

impl Shade {
    /// Attenuated contribution of a sample with `opacity`
    pub fn compute(&self, opacity: f32) -> Contribution {
        match self {
            Shade::Gray(s) => {
                let c = opacity * s;
                Contribution {
                    color: vector![c, c, c],
                    alpha: c,
                }
            }
            Shade::Rgb { light, intensity } => Contribution {
                color: light * (intensity * opacity),
                alpha: opacity * intensity,
            },
        }
    }
}

pub trait Shader: Send + Sync {
    /// `normal` points towards denser material, it need not be unit length
    fn shade(&self, normal: &Vector3<f32>) -> Shade;

    /// Shade of samples without a usable normal
    fn background(&self) -> Shade;

    fn kind(&self) -> ColorKind {
        ColorKind::Grayscale
    }
}

/// Serializable lighting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Light position in view space, the viewer looks along +z
    pub light: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    /// Light surfaces facing away from the light as if they faced it
    pub render_backfaces: bool,
    /// Colored light, channels in <0;1>; gray light if not set
    pub light_color: Option<[f32; 3]>,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            light: [0.0, 0.0, -1000.0],
            ambient: 0.2,
            diffuse: 0.8,
            render_backfaces: false,
            light_color: None,
        }
    }
}

impl ShadingConfig {
    /// Shader for one view, the light is carried into object space
    /// through the inverse of `light_transform`
    pub fn build(&self, light_transform: &ViewTransform) -> Result<AnyShader, RenderError> {
        let to_object = light_transform.inverse()?;
        let light = to_object.transform_vector(&Vector3::from(self.light));

        let shader = match self.light_color {
            None => AnyShader::Diffuse(DiffuseShader::new(
                light,
                self.ambient,
                self.diffuse,
                self.render_backfaces,
            )?),
            Some(color) => AnyShader::Color(ColorShader::new(
                light,
                Vector3::from(color),
                self.ambient,
                self.diffuse,
                self.render_backfaces,
            )?),
        };

        debug!("Shader light direction in object space {:?}", light.normalize());
        Ok(shader)
    }
}

/// Ambient + diffuse model, the light is far enough to be a direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuseShader {
    light: Vector3<f32>,
    ambient: f32,
    diffuse: f32,
    backfaces: bool,
}

impl DiffuseShader {
    pub fn new(
        light: Vector3<f32>,
        ambient: f32,
        diffuse: f32,
        backfaces: bool,
    ) -> Result<DiffuseShader, RenderError> {
        let light = light
            .try_normalize(f32::EPSILON)
            .ok_or_else(|| RenderError::InvalidConfig("light position is zero".into()))?;
        Ok(DiffuseShader {
            light,
            ambient,
            diffuse,
            backfaces,
        })
    }

    /// Ambient + diffuse term, `None` without a usable normal
    fn intensity(&self, normal: &Vector3<f32>) -> Option<f32> {
        // surface faces away from the denser side
        let outward = -normal.try_normalize(f32::EPSILON)?;
        let d = outward.dot(&self.light);
        let d = if self.backfaces { d.abs() } else { d.max(0.0) };
        Some((self.ambient + self.diffuse * d).clamp(0.0, 1.0))
    }
}

impl Shader for DiffuseShader {
    fn shade(&self, normal: &Vector3<f32>) -> Shade {
        match self.intensity(normal) {
            Some(i) => Shade::Gray(i),
            None => self.background(),
        }
    }

    fn background(&self) -> Shade {
        Shade::Gray(1.0)
    }
}

/// [`DiffuseShader`] with a colored light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorShader {
    diffuse: DiffuseShader,
    color: Vector3<f32>,
}

impl ColorShader {
    pub fn new(
        light: Vector3<f32>,
        color: Vector3<f32>,
        ambient: f32,
        diffuse: f32,
        backfaces: bool,
    ) -> Result<ColorShader, RenderError> {
        Ok(ColorShader {
            diffuse: DiffuseShader::new(light, ambient, diffuse, backfaces)?,
            color: color.map(|c| c.clamp(0.0, 1.0)),
        })
    }
}

impl Shader for ColorShader {
    fn shade(&self, normal: &Vector3<f32>) -> Shade {
        match self.diffuse.intensity(normal) {
            Some(intensity) => Shade::Rgb {
                light: self.color,
                intensity,
            },
            None => self.background(),
        }
    }

    fn background(&self) -> Shade {
        Shade::Rgb {
            light: vector![1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }

    fn kind(&self) -> ColorKind {
        ColorKind::Rgb
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyShader {
    Diffuse(DiffuseShader),
    Color(ColorShader),
}

impl Shader for AnyShader {
    fn shade(&self, normal: &Vector3<f32>) -> Shade {
        match self {
            AnyShader::Diffuse(s) => s.shade(normal),
            AnyShader::Color(s) => s.shade(normal),
        }
    }

    fn background(&self) -> Shade {
        match self {
            AnyShader::Diffuse(s) => s.background(),
            AnyShader::Color(s) => s.background(),
        }
    }

    fn kind(&self) -> ColorKind {
        match self {
            AnyShader::Diffuse(s) => s.kind(),
            AnyShader::Color(s) => s.kind(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn headlight(backfaces: bool) -> DiffuseShader {
        DiffuseShader::new(vector![0.0, 0.0, -1000.0], 0.2, 0.8, backfaces).unwrap()
    }

    #[test]
    fn facing_the_light() {
        let shader = headlight(false);

        // denser material behind the surface, normal towards the viewer
        assert_eq!(shader.shade(&vector![0.0, 0.0, 5.0]), Shade::Gray(1.0));
        assert_eq!(shader.shade(&vector![0.0, 0.0, -5.0]), Shade::Gray(0.2));
        assert_eq!(shader.shade(&vector![3.0, 0.0, 0.0]), Shade::Gray(0.2));
    }

    #[test]
    fn backfaces_lit() {
        let shader = headlight(true);
        assert_eq!(shader.shade(&vector![0.0, 0.0, -5.0]), Shade::Gray(1.0));
    }

    #[test]
    fn zero_normal_gets_background() {
        let shader = headlight(false);
        assert_eq!(shader.shade(&vector![0.0, 0.0, 0.0]), shader.background());
        assert!(DiffuseShader::new(vector![0.0, 0.0, 0.0], 0.2, 0.8, false).is_err());
    }

    #[test]
    fn contribution() {
        let c = Shade::Gray(0.5).compute(0.5);
        assert_eq!(c.alpha, 0.25);
        assert_eq!(c.color, vector![0.25, 0.25, 0.25]);

        let c = Shade::Rgb {
            light: vector![1.0, 0.5, 0.0],
            intensity: 1.0,
        }
        .compute(1.0);
        assert_eq!(c.alpha, 1.0);
        assert_eq!(c.color, vector![1.0, 0.5, 0.0]);
    }

    #[test]
    fn light_color_does_not_change_opacity() {
        let gray = Shade::Gray(0.6).compute(0.5);
        for light in [vector![1.0, 0.0, 0.0], vector![0.2, 0.2, 0.2], vector![1.0, 1.0, 1.0]] {
            let c = Shade::Rgb { light, intensity: 0.6 }.compute(0.5);
            assert_eq!(c.alpha, gray.alpha);
            assert_eq!(c.color, light * 0.3);
        }
    }

    #[test]
    fn light_follows_rotation() {
        let config = ShadingConfig::default();

        // turned half way round, the viewer looks at the former back side
        let shader = config.build(&ViewTransform::light_view([0.0, 180.0, 0.0])).unwrap();
        match shader.shade(&vector![0.0, 0.0, -1.0]) {
            Shade::Gray(s) => assert!((s - 1.0).abs() < 1e-5),
            other => panic!("unexpected shade {other:?}"),
        }
    }

    #[test]
    fn colored_light() {
        let config = ShadingConfig {
            light_color: Some([1.0, 0.0, 0.0]),
            ..Default::default()
        };
        let shader = config.build(&ViewTransform::identity()).unwrap();

        assert_eq!(shader.kind(), ColorKind::Rgb);
        assert_eq!(
            shader.shade(&vector![0.0, 0.0, 1.0]),
            Shade::Rgb {
                light: vector![1.0, 0.0, 0.0],
                intensity: 1.0
            }
        );
        assert_eq!(
            shader.background(),
            Shade::Rgb {
                light: vector![1.0, 1.0, 1.0],
                intensity: 1.0
            }
        );
    }
}
