use std::path::PathBuf;

use clap::{Parser, Subcommand};
use epidem::{OutputFormat, init_logging, load_config, render_summary};
use epidem_core::{Hdf5Container, IndexConfig, SweepIndex};

#[derive(Parser, Debug)]
#[command(name = "epidem")]
#[command(about = "Inspect epidemiology parameter-sweep output files")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// YAML file with index options
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a sweep file's metadata and print a summary
    Inspect {
        /// Path to the .mat file
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => IndexConfig::default(),
    };

    match args.command {
        Command::Inspect { file, json } => {
            tracing::info!(file = %file.display(), "inspecting sweep file");
            let index = SweepIndex::<Hdf5Container>::open_with_config(&file, config)?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            println!("{}", render_summary(&index.summary(), format)?);
        }
    }

    Ok(())
}
