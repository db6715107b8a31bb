// ABOUTME: Main entry point for the inklayers program.
// ABOUTME: Provides CLI interface and executes the export pipeline from the library.

use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use inklayers::{split_escaped_tokens, AppConfig, ExportOptions, OutputType, RunOptions};

/// Exports combinations of layers from an SVG file to separate files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SVG, JSON, TOML or INI files, wildcards supported
    #[arg(required = true)]
    infiles: Vec<String>,

    /// Add layers to every slide. Use labels or indexes (#0, #1-#3)
    #[arg(short, long)]
    add: Vec<String>,

    /// Exclude layers from every slide. Use labels or indexes
    #[arg(short, long)]
    exclude: Vec<String>,

    /// Output file name format (%b basename, %n index, %e extension)
    #[arg(short, long)]
    outfile: Option<String>,

    /// Export type
    #[arg(short = 't', long = "type", value_enum)]
    output_type: Option<OutputType>,

    /// List the available layers
    #[arg(short, long)]
    list: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,

    /// Generates (very) verbose output
    #[arg(short = 'D', long)]
    debug: bool,

    /// Directory receiving the exported files
    #[arg(long)]
    outfolder: Option<PathBuf>,

    /// Export all layers in stacked mode. Use -e to exclude some layers
    #[arg(short, long, conflicts_with = "split")]
    stack: bool,

    /// Export all layers, split one layer per output file
    #[arg(short = 'S', long)]
    split: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.debug || self.verbosity >= 2 {
            "debug"
        } else if self.verbosity == 1 {
            "info"
        } else {
            "warn"
        }
    }

    fn export_options(&self) -> ExportOptions {
        let tokens = |values: &[String]| {
            (!values.is_empty()).then(|| {
                values
                    .iter()
                    .flat_map(|value| split_escaped_tokens(value))
                    .collect::<Vec<_>>()
            })
        };
        ExportOptions {
            add: tokens(&self.add),
            exclude: tokens(&self.exclude),
            outfile: self.outfile.clone(),
            output_type: self.output_type,
            stack: self.stack,
            split: self.split,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level())).init();

    let app = AppConfig::from_env();
    let infiles = inklayers::utils::expand_input_patterns(&cli.infiles)
        .map_err(|e| anyhow::anyhow!("Failed to expand input files: {}", e))?;
    let run = RunOptions {
        list: cli.list,
        outfolder: cli.outfolder.clone(),
    };

    let summary = inklayers::process_files(&infiles, &cli.export_options(), &run, &app);
    if summary.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
