use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use log::{debug, info};
use nalgebra::{point, vector, Point3, Vector3};

use crate::{
    classify::{Classifier, ColorKind, Shader},
    common::BoundBox,
    view::{Cell, CellGeometry, ViewTransform},
    volumetric::{BinaryShell, Interpolator, Volume},
    RenderError,
};

use super::{
    compositing::PixelAccumulator,
    framebuffer::{FramePixels, Framebuffer},
    render_options::{RenderConfig, Traversal},
};

/// How a pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every slab was visited
    Complete,
    /// Cancelled, the image holds the slabs composited so far
    Interrupted,
}

/// Volume renderer.
///
/// Plain value, a pass runs synchronously on the calling thread.
/// Hosts run it on a worker thread, see [`super::SerialRenderer`] and
/// [`super::render_sequence`].
pub struct Renderer<V, I>
where
    V: Volume,
    I: Interpolator,
{
    volume: V,
    interpolator: I,
    config: RenderConfig,
}

/// State of one pass, owned by the thread running it
struct RenderPass<C> {
    width: usize,
    height: usize,
    depth: usize,
    classifier: C,
    color_kind: ColorKind,
    inverse: ViewTransform,
    /// Present in cell traversal
    geometry: Option<CellGeometry>,
    /// Present in cell traversal with a single surface threshold
    shell: Option<BinaryShell>,
    /// View space `(i, j)` of every pixel
    rays: Vec<(f32, f32)>,
    /// Object space position of every ray in the current slab
    positions: Vec<Point3<f32>>,
    /// Object space step of one slab
    step: Vector3<f32>,
    pixels: Vec<PixelAccumulator>,
    last_cells: Vec<Option<Vector3<i32>>>,
}

impl<C> RenderPass<C> {
    fn into_framebuffer(self) -> Framebuffer {
        let pixels = match self.color_kind {
            ColorKind::Grayscale => {
                FramePixels::Gray(self.pixels.iter().map(|p| p.to_gray()).collect())
            }
            ColorKind::Rgb => FramePixels::Rgb(self.pixels.iter().map(|p| p.to_rgb()).collect()),
        };
        Framebuffer::from_pixels(self.width, self.height, pixels)
    }
}

impl<V, I> Renderer<V, I>
where
    V: Volume,
    I: Interpolator,
{
    pub fn new(volume: V, interpolator: I, config: RenderConfig) -> Renderer<V, I> {
        Renderer {
            volume,
            interpolator,
            config,
        }
    }

    pub fn get_config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn get_volume(&self) -> &V {
        &self.volume
    }

    pub fn get_interpolator(&self) -> &I {
        &self.interpolator
    }

    /// Object to view transform of the current config
    pub fn view_transform(&self) -> ViewTransform {
        let aspect = if self.config.aspect_correction {
            self.volume.get_aspect()
        } else {
            vector![1.0, 1.0, 1.0]
        };
        ViewTransform::volume_view(
            self.config.scale,
            aspect,
            self.volume.get_size(),
            self.config.rotation,
        )
    }

    /// Transform carrying the light, same rotation without aspect correction
    pub fn light_transform(&self) -> ViewTransform {
        ViewTransform::light_view(self.config.rotation)
    }

    /// Render with classifier and shader described by the config.
    ///
    /// Cancellation is checked once per slab, a cancelled pass
    /// returns what was composited so far.
    pub fn render(&self, cancel: &AtomicBool) -> Result<(Framebuffer, RenderOutcome), RenderError> {
        self.config.validate()?;
        let classifier = self.config.classifier.build()?;
        let shader = self.config.shading.build(&self.light_transform())?;
        self.render_with(&self.view_transform(), &classifier, &shader, cancel)
    }

    /// Render through `transform` with explicit classifier and shader
    pub fn render_with<C, S>(
        &self,
        transform: &ViewTransform,
        classifier: &C,
        shader: &S,
        cancel: &AtomicBool,
    ) -> Result<(Framebuffer, RenderOutcome), RenderError>
    where
        C: Classifier,
        S: Shader,
    {
        let mut pass = self.setup(transform, classifier, shader)?;
        let outcome = self.traverse(&mut pass, shader, cancel);
        Ok((pass.into_framebuffer(), outcome))
    }

    fn setup<C, S>(
        &self,
        transform: &ViewTransform,
        classifier: &C,
        shader: &S,
    ) -> Result<RenderPass<C>, RenderError>
    where
        C: Classifier,
        S: Shader,
    {
        if self.volume.is_empty() {
            return Err(RenderError::EmptyVolume);
        }
        if !classifier.accepts(self.volume.get_kind()) {
            return Err(RenderError::CapabilityMismatch(format!(
                "{} cannot classify {:?} voxels of {}",
                classifier.get_name(),
                self.volume.get_kind(),
                self.volume.get_name()
            )));
        }

        let (width, height) = self.config.resolution;
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "resolution {width}x{height} has no pixels"
            )));
        }

        let inverse = transform.inverse()?;
        let ratio = transform.oversampling_ratio();
        let classifier = classifier.for_view(ratio);

        // view space footprint of the voxel grid
        let bounds = BoundBox::from_points(
            self.volume
                .get_bound_box()
                .into_iter()
                .map(|p| transform.transform_point(&p)),
        );
        let k0 = bounds.lower.z.floor();
        let depth = self
            .config
            .depth
            .unwrap_or((bounds.upper.z.ceil() - k0) as usize + 1);

        let half_w = (width / 2) as isize;
        let half_h = (height / 2) as isize;
        let mut rays = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                rays.push((
                    (x as isize - half_w) as f32,
                    (y as isize - half_h) as f32,
                ));
            }
        }
        let positions = rays
            .iter()
            .map(|&(i, j)| inverse.transform_point(&point![i, j, k0]))
            .collect();
        let step = inverse.column(2).xyz();

        let geometry = match self.config.traversal {
            Traversal::ViewSpace => None,
            Traversal::Cell => Some(CellGeometry::new(transform)),
        };
        let shell = match (&geometry, classifier.surface_threshold()) {
            (Some(_), Some(threshold)) => Some(BinaryShell::new(&self.volume, threshold)),
            _ => None,
        };

        let color_kind = if classifier.kind() == ColorKind::Rgb || shader.kind() == ColorKind::Rgb {
            ColorKind::Rgb
        } else {
            ColorKind::Grayscale
        };

        debug!(
            "Pass setup: {width}x{height}, k0 {k0}, {depth} slabs, oversampling {ratio}, {} with {}, {:?} output",
            classifier.get_name(),
            self.interpolator.get_name(),
            color_kind
        );

        Ok(RenderPass {
            width,
            height,
            depth,
            classifier,
            color_kind,
            inverse,
            geometry,
            shell,
            positions,
            step,
            pixels: vec![PixelAccumulator::new(); width * height],
            last_cells: vec![None; width * height],
            rays,
        })
    }

    fn traverse<C, S>(&self, pass: &mut RenderPass<C>, shader: &S, cancel: &AtomicBool) -> RenderOutcome
    where
        C: Classifier,
        S: Shader,
    {
        let RenderPass {
            width,
            depth,
            classifier,
            inverse,
            geometry,
            shell,
            rays,
            positions,
            step,
            pixels,
            last_cells,
            ..
        } = pass;

        // Only cells straddling the surface can turn a ray opaque, rays walk them front to back
        if let (Some(geometry), Some(shell)) = (geometry.as_ref(), shell.as_ref()) {
            let length = *depth as f32;
            for (row, pixel_row) in pixels.chunks_mut(*width).enumerate() {
                if cancel.load(Ordering::Relaxed) {
                    info!("Render interrupted after {row} rows");
                    return RenderOutcome::Interrupted;
                }

                for (col, pixel) in pixel_row.iter_mut().enumerate() {
                    let n = row * *width + col;
                    let mut cell = geometry.origin_cell();
                    for pos in shell.walk(&positions[n], step, length) {
                        if !pixel.not_opaque() {
                            break;
                        }
                        cell.set_position(pos);
                        self.sample_cell(&cell, rays[n], inverse, classifier, shader, pixel);
                    }
                }

                thread::yield_now();
            }

            info!("Render complete, {} surface cells", shell.surface_count());
            return RenderOutcome::Complete;
        }

        for slab in 0..*depth {
            if cancel.load(Ordering::Relaxed) {
                info!("Render interrupted after {slab} of {depth} slabs");
                return RenderOutcome::Interrupted;
            }

            for (n, pixel) in pixels.iter_mut().enumerate() {
                if !pixel.not_opaque() {
                    continue;
                }

                match geometry.as_ref() {
                    None => self.sample(&positions[n], classifier, shader, pixel),
                    Some(geometry) => {
                        let p = positions[n];
                        let cell = geometry.cell_at(p.x, p.y, p.z);
                        if last_cells[n] == Some(cell.position()) {
                            continue;
                        }
                        last_cells[n] = Some(cell.position());
                        self.sample_cell(&cell, rays[n], inverse, classifier, shader, pixel);
                    }
                }
            }

            for p in positions.iter_mut() {
                *p += *step;
            }

            thread::yield_now();
        }

        info!("Render complete, {depth} slabs");
        RenderOutcome::Complete
    }

    /// Sample in the middle of the chord of ray `(i, j)` through `cell`
    fn sample_cell<C, S>(
        &self,
        cell: &Cell<'_>,
        (i, j): (f32, f32),
        inverse: &ViewTransform,
        classifier: &C,
        shader: &S,
        pixel: &mut PixelAccumulator,
    ) where
        C: Classifier,
        S: Shader,
    {
        if let Some((k_in, k_out)) = cell.intersect(i, j) {
            let pos = inverse.transform_point(&point![i, j, (k_in + k_out) * 0.5]);
            self.sample(&pos, classifier, shader, pixel);
        }
    }

    /// Classify, shade and composite one sample.
    /// Samples without enough neighbours or with a broken gradient contribute nothing.
    fn sample<C, S>(&self, pos: &Point3<f32>, classifier: &C, shader: &S, pixel: &mut PixelAccumulator)
    where
        C: Classifier,
        S: Shader,
    {
        let volume = &self.volume;
        let interpolator = &self.interpolator;

        if !interpolator.is_valid(volume, pos) || !interpolator.is_valid_gradient(volume, pos) {
            return;
        }

        let value = interpolator.value(volume, pos);
        if !classifier.visible(&value) {
            return;
        }

        let gradient = interpolator.gradient(volume, pos);
        if !gradient.is_finite() {
            return;
        }

        let sample = classifier.alpha_color(&value, &gradient);
        if !(sample.opacity > 0.0) {
            return;
        }

        let shade = shader.shade(&gradient.normalized().direction());
        pixel.blend(&sample, &shade);

        if self.config.early_ray_termination && pixel.almost_opaque() {
            pixel.set_opaque();
        }
    }
}
