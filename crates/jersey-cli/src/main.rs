//! Jersey pattern CLI
//!
//! Renders a parameter file or a player's career to PNG, or prints the color
//! stops a career derives. Log verbosity follows `RUST_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jersey_bake::{BakeConfig, bake_params, export_png};
use jersey_pattern::{
    Club, ColorStop, NoiseParameters, PlayerRow, TeamColorRecord, derive_color_stops,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jersey")]
#[command(about = "Procedural career jersey patterns", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a parameters JSON file
    Render {
        /// Input parameters JSON
        #[arg(long)]
        params: PathBuf,

        /// Output PNG path
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        size: SizeArgs,
    },

    /// Render a player's career
    Career {
        #[command(flatten)]
        source: CareerSource,

        /// Output PNG path
        #[arg(long)]
        out: PathBuf,

        /// Shaping preset
        #[arg(long, value_enum, default_value_t = Preset::Archive)]
        preset: Preset,

        /// Also write the resulting parameters as JSON
        #[arg(long)]
        save_params: Option<PathBuf>,

        #[command(flatten)]
        size: SizeArgs,
    },

    /// Print the color stops a career derives, as JSON
    Stops {
        #[command(flatten)]
        source: CareerSource,
    },
}

#[derive(Args)]
struct SizeArgs {
    /// Image width in pixels
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Anti-aliasing samples per pixel
    #[arg(long, default_value_t = 1)]
    samples: u32,
}

impl SizeArgs {
    fn config(&self) -> BakeConfig {
        BakeConfig::new(self.width, self.height).with_samples(self.samples)
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CareerSource {
    /// JSON array of clubs ({name, color, years, percentage})
    #[arg(long)]
    clubs: Option<PathBuf>,

    /// JSON object of one player table row
    #[arg(long)]
    player: Option<PathBuf>,

    /// Team color record, e.g. "#DA291C(45%)"; repeat in career order
    #[arg(long = "record")]
    records: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Default,
    Archive,
}

impl CareerSource {
    fn clubs(&self) -> Result<Vec<Club>> {
        if let Some(path) = &self.clubs {
            return serde_json::from_str(&read(path)?)
                .with_context(|| format!("failed to parse clubs from {}", path.display()));
        }
        if let Some(path) = &self.player {
            let row: PlayerRow = serde_json::from_str(&read(path)?)
                .with_context(|| format!("failed to parse player row from {}", path.display()))?;
            return Ok(row.clubs());
        }
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| -> Result<Club> {
                let parsed = TeamColorRecord::parse(record)?;
                Ok(Club::new(
                    format!("Team {}", i + 1),
                    parsed.color.to_hex(),
                    0.0,
                    parsed.percentage,
                ))
            })
            .collect()
    }

    fn stops(&self) -> Result<Vec<ColorStop>> {
        let clubs = self.clubs()?;
        Ok(derive_color_stops(&clubs).context("invalid career")?)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn render(params: &NoiseParameters, size: &SizeArgs, out: &Path) -> Result<()> {
    let config = size.config();
    if config.width == 0 || config.height == 0 {
        bail!("image size must be non-zero, got {}x{}", config.width, config.height);
    }
    let image = bake_params(params, &config);
    export_png(&image, out).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { params, out, size } => {
            let parsed = NoiseParameters::from_json(&read(&params)?)
                .with_context(|| format!("invalid parameters in {}", params.display()))?;
            info!(input = %params.display(), stops = parsed.color_stops.len(), "rendering");
            render(&parsed, &size, &out)?;
        }

        Commands::Career {
            source,
            out,
            preset,
            save_params,
            size,
        } => {
            let stops = source.stops()?;
            let params = match preset {
                Preset::Default => NoiseParameters::with_stops(stops),
                Preset::Archive => NoiseParameters::archive(stops),
            };
            if let Some(path) = save_params {
                fs::write(&path, params.to_json()?)
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
            info!(stops = params.color_stops.len(), "rendering career");
            render(&params, &size, &out)?;
        }

        Commands::Stops { source } => {
            let stops = source.stops()?;
            println!("{}", serde_json::to_string_pretty(&stops)?);
        }
    }

    Ok(())
}
