//! App configuration
//!
//! Render settings are merged in this order, later wins:
//! 1. defaults of `RenderConfig`
//! 2. TOML file given by `--config`
//! 3. environment variables (`VOLREN_SECTION__KEY`)
//! 4. command line flags

use std::{path::PathBuf, str::FromStr};

use clap::ArgMatches;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use nalgebra::{vector, Vector3};
use volren_lib::{render::RenderConfig, view::Axis, volumetric::AnyInterpolator};

use crate::CliResult;

/// Transform `Values` into `Vector`
fn values_to_vector3<T>(args: &ArgMatches, key: &str) -> CliResult<Vector3<T>>
where
    T: FromStr + Copy,
    <T as FromStr>::Err: std::fmt::Display,
{
    let vals = values_of::<T>(args, key)?;
    match vals[..] {
        [x, y, z] => Ok(vector![x, y, z]),
        _ => Err(format!("{key} needs 3 values").into()),
    }
}

fn values_of<T>(args: &ArgMatches, key: &str) -> CliResult<Vec<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let values = args.values_of(key).ok_or(format!("missing {key}"))?;
    values
        .map(|v| v.parse::<T>().map_err(|e| format!("{key}: {e}").into()))
        .collect()
}

fn value_of<T>(args: &ArgMatches, key: &str) -> CliResult<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    args.value_of(key)
        .map(|v| v.parse::<T>().map_err(|e| format!("{key}: {e}").into()))
        .transpose()
}

/// Settings specific to generator variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorConfig {
    /// Randomly placed cuboids and spheres, each with its own label
    Shapes {
        n_of_shapes: usize,
        sample: u8,
        obj_size: usize,
    },
    /// One ball with a soft edge in the middle of the volume
    Sphere { sample: u8 },
    /// Solid block with an empty border
    Solid { sample: u8 },
}

impl GeneratorConfig {
    pub fn from_args(args: &ArgMatches) -> CliResult<GeneratorConfig> {
        let sample = value_of(args, "sample")?.unwrap_or(200);

        let generator = match args.value_of("generator").unwrap_or("sphere") {
            "shapes" => GeneratorConfig::Shapes {
                n_of_shapes: value_of(args, "n-of-shapes")?.unwrap_or(6),
                sample,
                obj_size: value_of(args, "object-size")?.unwrap_or(16),
            },
            "sphere" => GeneratorConfig::Sphere { sample },
            "solid" => GeneratorConfig::Solid { sample },
            other => return Err(format!("unknown generator {other}").into()),
        };
        Ok(generator)
    }
}

/// Rotation of the view between frames of a cine loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CineConfig {
    pub frames: usize,
    pub step: f32,
    pub axis: Axis,
}

impl CineConfig {
    fn from_args(args: &ArgMatches) -> CliResult<Option<CineConfig>> {
        let frames = match value_of::<usize>(args, "frames")? {
            Some(frames) => frames,
            None => return Ok(None),
        };
        let step = value_of(args, "step")?.unwrap_or(10.0);
        let axis = match args.value_of("axis").unwrap_or("y") {
            "x" => Axis::X,
            "y" => Axis::Y,
            "z" => Axis::Z,
            other => return Err(format!("unknown axis {other}").into()),
        };
        Ok(Some(CineConfig { frames, step, axis }))
    }
}

/// App configuration
/// Config is built from args parsed by `clap` and the render settings figment
#[derive(Debug, Clone)]
pub struct Config {
    /// Dimensions of volume
    pub dims: Vector3<usize>,
    /// Shape of cells
    pub cell_shape: Vector3<f32>,
    /// Type of generator to be used
    pub generator: GeneratorConfig,
    /// Optional seed for RNG, to replicate results
    pub seed: Option<u64>,
    pub render: RenderConfig,
    pub interpolator: AnyInterpolator,
    /// Render a turning sequence instead of one frame
    pub cine: Option<CineConfig>,
    /// Output file name
    pub file_name: PathBuf,
}

impl Config {
    pub fn from_args(args: &ArgMatches) -> CliResult<Config> {
        let file = args.value_of_os("config").map(PathBuf::from);
        let figment = settings_figment(file)?;
        Config::from_figment(args, figment)
    }

    /// Flags are merged on top of `figment`
    pub fn from_figment(args: &ArgMatches, figment: Figment) -> CliResult<Config> {
        let figment = merge_flags(figment, args)?;

        let render: RenderConfig = figment.extract().map_err(|e| e.to_string())?;
        render.validate()?;
        let interpolator = if figment.contains("interpolator") {
            figment
                .extract_inner("interpolator")
                .map_err(|e| e.to_string())?
        } else {
            AnyInterpolator::default()
        };

        let dims = values_to_vector3(args, "dims")?;
        let cell_shape = values_to_vector3(args, "shape")?;
        let generator = GeneratorConfig::from_args(args)?;
        let seed = value_of(args, "seed")?;
        let cine = CineConfig::from_args(args)?;
        let file_name = args
            .value_of_os("output-file")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("frame.png"));

        Ok(Config {
            dims,
            cell_shape,
            generator,
            seed,
            render,
            interpolator,
            cine,
            file_name,
        })
    }
}

/// File and environment layers of the render settings
pub fn settings_figment(file: Option<PathBuf>) -> CliResult<Figment> {
    let mut figment = Figment::new();

    if let Some(path) = file {
        if !path.exists() {
            return Err(format!("config file {} does not exist", path.display()).into());
        }
        figment = figment.merge(Toml::file(path));
    }

    Ok(figment.merge(Env::prefixed("VOLREN_").split("__")))
}

fn merge_flags(mut figment: Figment, args: &ArgMatches) -> CliResult<Figment> {
    if args.is_present("resolution") {
        let res = values_of::<usize>(args, "resolution")?;
        figment = figment.merge(Serialized::default("resolution", res));
    }
    if args.is_present("rotate") {
        let rot = values_of::<f32>(args, "rotate")?;
        figment = figment.merge(Serialized::default("rotation", rot));
    }
    if let Some(scale) = value_of::<f32>(args, "scale")? {
        figment = figment.merge(Serialized::default("scale", scale));
    }
    if let Some(threshold) = value_of::<f32>(args, "threshold")? {
        figment = figment.merge(Serialized::default("classifier.threshold", threshold));
    }
    if let Some(kind) = args.value_of("classifier") {
        figment = figment.merge(Serialized::default("classifier.kind", kind));
    }
    if let Some(traversal) = args.value_of("traversal") {
        figment = figment.merge(Serialized::default("traversal", traversal));
    }
    if let Some(interpolator) = args.value_of("interpolator") {
        figment = figment.merge(Serialized::default("interpolator", interpolator));
    }
    if args.is_present("no-ert") {
        figment = figment.merge(Serialized::default("early_ray_termination", false));
    }
    Ok(figment)
}
