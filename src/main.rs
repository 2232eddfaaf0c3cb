use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod icon_gen;

use config::Config;

#[derive(Debug, Parser)]
#[clap(
    name = "icon-render",
    about = "Render an SVG icon into optimized square PNG files"
)]
struct Args {
    /// JSON config file with `source_path`, `output_dir`, `sizes` and `optimize`.
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Source SVG [default: public/icon-base.svg]
    #[clap(short, long, value_name = "SVG")]
    input: Option<PathBuf>,

    /// Output directory [default: public]
    #[clap(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Comma-separated PNG sizes [default: 192,512]
    #[clap(short, long, value_delimiter = ',', value_name = "SIZES")]
    sizes: Option<Vec<u32>>,

    /// Keep the rendered PNGs as they are, without the optimizing re-save
    #[clap(long)]
    no_optimize: bool,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(input) = self.input {
            config.source_path = input;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(sizes) = self.sizes {
            config.sizes = sizes;
        }
        if self.no_optimize {
            config.optimize = false;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Args::parse().into_config()?;
    log::debug!("{config:?}");

    icon_gen::generate(&config)
}
