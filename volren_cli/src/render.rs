//! Rendering of the generated volume, one frame or a cine loop

use std::sync::atomic::AtomicBool;

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use volren_lib::{
    render::{cine_configs, RenderOutcome, Renderer},
    volumetric::Volume,
};

use crate::{
    config::{CineConfig, Config},
    output::{frame_path, write_png},
    CliResult,
};

pub fn render_frame<V: Volume>(volume: &V, config: &Config) -> CliResult<()> {
    let cancel = AtomicBool::new(false);
    let renderer = Renderer::new(volume, config.interpolator, config.render.clone());
    let (frame, outcome) = renderer.render(&cancel)?;
    if outcome == RenderOutcome::Interrupted {
        warn!("Frame was interrupted");
    }
    write_png(&frame, &config.file_name)
}

/// Frames are rendered on the rayon pool, one pass per frame
pub fn render_cine<V: Volume>(volume: &V, config: &Config, cine: &CineConfig) -> CliResult<()> {
    let configs = cine_configs(&config.render, cine.axis, cine.frames, cine.step);
    info!(
        "Rendering {} frames, {} degrees apart around {:?}",
        configs.len(),
        cine.step,
        cine.axis
    );

    let progress = ProgressBar::new(configs.len() as u64);
    progress.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} frames {elapsed}"));

    let cancel = AtomicBool::new(false);
    configs
        .into_par_iter()
        .enumerate()
        .try_for_each(|(n, render_config)| -> CliResult<()> {
            let renderer = Renderer::new(volume, config.interpolator, render_config);
            let (frame, _) = renderer.render(&cancel)?;
            write_png(&frame, &frame_path(&config.file_name, n))?;
            progress.inc(1);
            Ok(())
        })?;

    progress.finish_with_message("done");
    Ok(())
}
