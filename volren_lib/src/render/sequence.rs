//! Several independent passes over one volume, e.g. a stereo pair or a cine loop.

use std::sync::atomic::AtomicBool;

use log::debug;

use crate::{
    view::Axis,
    volumetric::{Interpolator, Volume},
    RenderError,
};

use super::{Framebuffer, RenderConfig, RenderOutcome, Renderer};

/// Render every config on its own thread.
///
/// Passes share the volume read-only and nothing else.
/// Frames are returned in the order of `configs`.
pub fn render_sequence<V, I>(
    volume: &V,
    interpolator: &I,
    configs: &[RenderConfig],
    cancel: &AtomicBool,
) -> Result<Vec<(Framebuffer, RenderOutcome)>, RenderError>
where
    V: Volume,
    I: Interpolator + Clone,
{
    debug!("Rendering sequence of {} frames", configs.len());

    crossbeam::scope(|s| -> Result<Vec<_>, RenderError> {
        let mut handles = Vec::with_capacity(configs.len());
        for (n, config) in configs.iter().enumerate() {
            let handle = s
                .builder()
                .name(format!("volren-pass-{n}"))
                .spawn(move |_| {
                    let renderer = Renderer::new(volume, interpolator.clone(), config.clone());
                    renderer.render(cancel)
                })
                .map_err(|e| RenderError::ThreadSpawn(e.to_string()))?;
            handles.push(handle);
        }

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| RenderError::WorkerPanicked).and_then(|r| r))
            .collect()
    })
    .map_err(|_| RenderError::WorkerPanicked)?
}

/// `frames` configs turning by `step_degrees` around `axis`, starting at `base`
pub fn cine_configs(base: &RenderConfig, axis: Axis, frames: usize, step_degrees: f32) -> Vec<RenderConfig> {
    (0..frames)
        .map(|n| {
            let mut config = base.clone();
            config.rotation[axis.index()] += n as f32 * step_degrees;
            config
        })
        .collect()
}

/// Left and right eye, turned around y by half of `separation_degrees` each way
pub fn stereo_pair(base: &RenderConfig, separation_degrees: f32) -> [RenderConfig; 2] {
    let mut left = base.clone();
    let mut right = base.clone();
    left.rotation[1] -= separation_degrees / 2.0;
    right.rotation[1] += separation_degrees / 2.0;
    [left, right]
}
