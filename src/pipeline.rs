// ABOUTME: Orchestration of the inklayers pipeline for each input file
// ABOUTME: Wires configuration, drawing layers and command-line overrides into exported slides

use crate::config::{AppConfig, ConfigFormat, ExportConfig, ExportOptions};
use crate::document::SvgDocument;
use crate::errors::Result;
use crate::export::{default_output_dir, Exporter};
use crate::filename::file_stem;
use crate::resolver::{check_unique_names, SlideResolver};
use crate::slide::{stacked_descriptors, Slide};
use log::{error, info};
use std::path::{Path, PathBuf};

/// A drawing together with its resolved slides.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// File given on the command line (configuration or drawing)
    pub input: PathBuf,
    pub document: SvgDocument,
    pub slides: Vec<Slide>,
}

/// What to do with each input file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only print the layers of each drawing
    pub list: bool,
    /// Directory receiving every exported file
    pub outfolder: Option<PathBuf>,
}

/// Outcome of processing several input files
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Resolve the slides of `config` against `document`.
///
/// In stacked mode the configured slides are replaced by one cumulative slide
/// per layer. Their names must still be unique.
pub fn resolve_presentation(
    config: &ExportConfig,
    document: &SvgDocument,
    options: &ExportOptions,
) -> Result<Vec<Slide>> {
    let descriptors = if options.stack {
        check_unique_names(&config.slides)?;
        stacked_descriptors(&document.labels())
    } else {
        config.slides.clone()
    };
    SlideResolver::new(
        document.layers(),
        &document.basename,
        &config.filename_format,
        config.output_type,
        options,
    )
    .resolve(&descriptors)
}

/// Load the configuration and drawing named by an input file. A drawing given
/// directly gets an empty slide list and the command-line or default settings.
pub fn load_input(
    path: &Path,
    options: &ExportOptions,
    app: &AppConfig,
) -> Result<(ExportConfig, SvgDocument)> {
    match ConfigFormat::from_path(path)? {
        ConfigFormat::Svg => Ok((app.drawing_config(path, options), SvgDocument::load(path)?)),
        ConfigFormat::Json | ConfigFormat::Toml | ConfigFormat::Ini => {
            let config = ExportConfig::load(path)?;
            let document = SvgDocument::load(&config.drawing_path(path))?;
            Ok((config, document))
        }
    }
}

pub fn build_presentation(
    path: &Path,
    options: &ExportOptions,
    app: &AppConfig,
) -> Result<Presentation> {
    let (config, document) = load_input(path, options, app)?;
    let slides = resolve_presentation(&config, &document, options)?;
    Ok(Presentation {
        input: path.to_path_buf(),
        document,
        slides,
    })
}

/// Write the slides and the LaTeX include file of a presentation.
pub fn export_presentation(
    presentation: &Presentation,
    options: &ExportOptions,
    app: &AppConfig,
    outfolder: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let output_dir = outfolder
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(&presentation.input, &app.output_dir));
    let exporter = Exporter::new(output_dir, options.split);
    let mut written = exporter.export(&presentation.document, &presentation.slides)?;
    written.push(exporter.write_latex(&file_stem(&presentation.input), &presentation.slides)?);
    Ok(written)
}

/// Layer report of the drawing named by an input file.
pub fn list_layers(path: &Path, options: &ExportOptions, app: &AppConfig) -> Result<Vec<String>> {
    let (_, document) = load_input(path, options, app)?;
    Ok(document.layer_report())
}

fn process_file(
    path: &Path,
    options: &ExportOptions,
    run: &RunOptions,
    app: &AppConfig,
) -> Result<()> {
    if run.list {
        println!("* Layers in {}", path.display());
        for line in list_layers(path, options, app)? {
            println!("{}", line);
        }
        return Ok(());
    }
    let presentation = build_presentation(path, options, app)?;
    let written = export_presentation(&presentation, options, app, run.outfolder.as_deref())?;
    info!("{} files written for {:?}", written.len(), path);
    Ok(())
}

/// Process every input independently. A failing input is reported and the
/// next one is processed.
pub fn process_files(
    paths: &[PathBuf],
    options: &ExportOptions,
    run: &RunOptions,
    app: &AppConfig,
) -> ProcessSummary {
    let mut summary = ProcessSummary::default();
    for path in paths {
        info!("Processing: {:?}", path);
        match process_file(path, options, run, app) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                error!("Failed to process {:?}: {}", path, e);
                eprintln!("Error in {}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }
    info!(
        "Processing completed: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    summary
}
