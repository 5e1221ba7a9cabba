//! Argument parsing and validation
//! Uses library `clap`

use std::ffi::OsStr;

use clap::{Arg, Command, ValueHint};

// up to 32bit value
pub fn is_positive_number(num: &str) -> Result<(), String> {
    let n = num.parse::<u32>();
    match n {
        Ok(n) => {
            if n > 0 {
                Ok(())
            } else {
                Err("Number must be greater than 0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

pub fn can_fit_u8(num: &str) -> Result<(), String> {
    let n = num.parse::<u8>();
    match n {
        Ok(_) => Ok(()),
        Err(_) => Err("Number does not fit in range <0;255>".into()),
    }
}

pub fn is_float_number(num: &str) -> Result<(), String> {
    let n = num.parse::<f32>();
    match n {
        Ok(n) => {
            if n > 0.0 {
                Ok(())
            } else {
                Err("Number must be greater than 0.0".into())
            }
        }
        Err(_) => Err("Number required".into()),
    }
}

/// Any finite float, angles may be negative
pub fn is_angle(num: &str) -> Result<(), String> {
    match num.parse::<f32>() {
        Ok(n) if n.is_finite() => Ok(()),
        _ => Err("Angle in degrees required".into()),
    }
}

pub const GENERATOR_NAMES: &[&str] = &["shapes", "sphere", "solid"];
pub const INTERPOLATOR_NAMES: &[&str] = &["trilinear", "nearest_neighbor"];
pub const TRAVERSAL_NAMES: &[&str] = &["view_space", "cell"];
pub const CLASSIFIER_NAMES: &[&str] = &["tent", "indexed_tent", "isosurface", "rgb"];
pub const AXIS_NAMES: &[&str] = &["x", "y", "z"];

pub fn get_command<'a>() -> Command<'a> {
    Command::new("volren")
        .version("0.2.0")
        .about("Renders synthetic volumes with a cell based ray caster")
        .arg(
            Arg::new("dims")
                .help("Dimensions of volume")
                .long("dims")
                .short('d')
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .default_values(&["64", "64", "64"])
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("shape")
                .help("Shape of cell")
                .long("shape")
                .short('s')
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .default_values(&["1", "1", "1"])
                .validator(is_float_number),
        )
        .arg(
            Arg::new("generator")
                .help("Type of generator")
                .long("generator")
                .short('g')
                .takes_value(true)
                .value_name("NAME")
                .default_value("sphere")
                .possible_values(GENERATOR_NAMES),
        )
        .arg(
            Arg::new("seed")
                .help("Seed for RNG, leave out for random seed")
                .long("seed")
                .value_name("SEED")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("sample")
                .help("Values of generated object")
                .long("sample")
                .value_name("BYTE")
                .default_value("200")
                .validator(|s| is_positive_number(s).and(can_fit_u8(s))),
        )
        .arg(
            Arg::new("object-size")
                .help("Size of individual generated objects")
                .long("object-size")
                .value_name("SIDE")
                .default_value("16")
                .hide(true) // Hide from help
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("n-of-shapes")
                .help("Number of shapes generated in volume")
                .long("n-of-shapes")
                .value_name("N")
                .default_value("6")
                .hide(true) // Hide from help
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("config")
                .help("TOML file with render settings")
                .long("config")
                .short('c')
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("resolution")
                .help("Size of rendered image")
                .long("resolution")
                .short('r')
                .number_of_values(2)
                .value_names(&["W", "H"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("rotate")
                .help("Rotation around x, y and z in degrees")
                .long("rotate")
                .number_of_values(3)
                .value_names(&["X", "Y", "Z"])
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .require_equals(true)
                .allow_hyphen_values(true)
                .validator(is_angle),
        )
        .arg(
            Arg::new("scale")
                .help("Zoom of the view")
                .long("scale")
                .value_name("FACTOR")
                .validator(is_float_number),
        )
        .arg(
            Arg::new("threshold")
                .help("Intensity at which the classifier is fully opaque")
                .long("threshold")
                .value_name("VALUE")
                .validator(is_float_number),
        )
        .arg(
            Arg::new("classifier")
                .help("Type of classifier")
                .long("classifier")
                .value_name("NAME")
                .possible_values(CLASSIFIER_NAMES),
        )
        .arg(
            Arg::new("interpolator")
                .help("Sampling of the volume")
                .long("interpolator")
                .short('i')
                .value_name("NAME")
                .possible_values(INTERPOLATOR_NAMES),
        )
        .arg(
            Arg::new("traversal")
                .help("Placement of samples along a ray")
                .long("traversal")
                .short('t')
                .value_name("NAME")
                .possible_values(TRAVERSAL_NAMES),
        )
        .arg(
            Arg::new("no-ert")
                .help("Disable early ray termination")
                .long("no-ert"),
        )
        .arg(
            Arg::new("frames")
                .help("Render a cine loop of this many frames")
                .long("frames")
                .short('f')
                .value_name("N")
                .validator(is_positive_number),
        )
        .arg(
            Arg::new("step")
                .help("Degrees between cine frames")
                .long("step")
                .value_name("DEGREES")
                .default_value("10")
                .allow_hyphen_values(true)
                .validator(is_angle),
        )
        .arg(
            Arg::new("axis")
                .help("Axis the cine loop turns around")
                .long("axis")
                .value_name("AXIS")
                .default_value("y")
                .possible_values(AXIS_NAMES),
        )
        .arg(
            Arg::new("output-file")
                .help("File name to output, cine frames get a numbered suffix")
                .long("output-file")
                .short('o')
                .value_name("FILE")
                .allow_invalid_utf8(true)
                .value_hint(ValueHint::FilePath)
                .default_value_os(OsStr::new("frame.png")),
        )
}
