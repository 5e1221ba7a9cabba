//! Cell-based ray-casting volume renderer.
//!
//! A volume is transformed into view space where every ray runs along `+k`.
//! Rays are stepped slab by slab, each sample is classified (opacity + color),
//! shaded and composited front-to-back until the ray saturates.
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use volren_lib::{render::{RenderConfig, Renderer}, volumetric::{LinearVolume, Trilinear}};
//! use nalgebra::vector;
//!
//! let volume = LinearVolume::from_fn(vector![32, 32, 32], |x, _, _| x as f32 * 8.0);
//! let config = RenderConfig::builder().resolution(64, 64).rotation(20.0, 30.0, 0.0).build().unwrap();
//! let renderer = Renderer::new(volume, Trilinear, config);
//! let (frame, _outcome) = renderer.render(&AtomicBool::new(false)).unwrap();
//! assert_eq!(frame.width(), 64);
//! ```

pub mod classify;
pub mod color;
pub mod common;
mod error;
pub mod render;
pub mod test_helpers;
pub mod view;
pub mod volumetric;

pub use error::RenderError;
pub use render::{RenderConfig, Renderer};
pub use view::ViewTransform;
