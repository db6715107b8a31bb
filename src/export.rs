// ABOUTME: Export module for the inklayers application
// ABOUTME: Saves one filtered drawing per slide (or per layer) and the LaTeX include file

use crate::document::SvgDocument;
use crate::errors::{InkError, Result};
use crate::filename::{with_extension, SLIDE_EXTENSION};
use crate::slide::Slide;
use crate::utils;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Where and how slides are written
pub struct Exporter {
    pub output_dir: PathBuf,
    /// Write one file per layer instead of one per slide
    pub split: bool,
}

impl Exporter {
    pub fn new(output_dir: PathBuf, split: bool) -> Self {
        Self { output_dir, split }
    }

    /// Save every slide as a filtered copy of `document`. Returns the written
    /// paths in slide order.
    pub fn export(&self, document: &SvgDocument, slides: &[Slide]) -> Result<Vec<PathBuf>> {
        utils::ensure_directory_exists(&self.output_dir)?;
        let start_time = Instant::now();
        let mut written = Vec::new();

        for slide in slides {
            if self.split {
                for (name, layer) in split_filenames(slide).into_iter().zip(&slide.layers) {
                    let path = self.output_dir.join(name);
                    document.write_filtered(std::slice::from_ref(&layer.label), &path)?;
                    written.push(path);
                }
            } else {
                let path = self.output_dir.join(&slide.filename);
                info!("Saving slide #{} to {:?}", slide.id, path);
                document.write_filtered(&slide.labels, &path)?;
                written.push(path);
            }
        }

        info!(
            "Export complete. Wrote {} files in {:.2} seconds",
            written.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(written)
    }

    /// Write `<stem>.inc.tex` including every slide's converted output.
    pub fn write_latex(&self, stem: &str, slides: &[Slide]) -> Result<PathBuf> {
        utils::ensure_directory_exists(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.inc.tex", stem));
        let mut content = latex_lines(slides).join("\n");
        content.push('\n');
        fs::write(&path, content).map_err(InkError::FileReadError)?;
        info!("LaTeX include file written: {:?}", path);
        Ok(path)
    }
}

/// File names used in split mode: `<slide stem>-split-<i>.svg`, one per
/// layer of the slide.
pub fn split_filenames(slide: &Slide) -> Vec<String> {
    let stem = with_extension(&slide.filename, "");
    (0..slide.layers.len())
        .map(|i| format!("{}-split-{}.{}", stem, i, SLIDE_EXTENSION))
        .collect()
}

/// One beamer overlay `\includegraphics` line per slide.
pub fn latex_lines(slides: &[Slide]) -> Vec<String> {
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            format!(
                "\\includegraphics<{}|handout:0>[width=1.0\\columnwidth]{{{}}}%",
                i + 1,
                slide.output_filename()
            )
        })
        .collect()
}

/// Default output directory for an input file.
pub fn default_output_dir(input: &Path, output_dir: &Path) -> PathBuf {
    input
        .parent()
        .map(|dir| dir.join(output_dir))
        .unwrap_or_else(|| output_dir.to_path_buf())
}
