use std::error::Error;

use config::Config;
use log::info;

mod args;
mod config;
mod generators;
mod output;
mod render;

use crate::{args::get_command, generators::generate_volume};

pub type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

fn run(cfg: &Config) -> CliResult<()> {
    let volume = generate_volume(cfg);

    match &cfg.cine {
        Some(cine) => render::render_cine(&volume, cfg, cine),
        None => render::render_frame(&volume, cfg),
    }
}

pub fn main() {
    env_logger::init();

    let cmd = get_command();
    let args = cmd.get_matches();

    let cfg = match Config::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    info!("{:?}", cfg);

    if let Err(e) = run(&cfg) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
