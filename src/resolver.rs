// ABOUTME: Slide resolution engine turning configured descriptors into concrete slides
// ABOUTME: Handles based-on inheritance, name checks, global overrides and file names

use crate::config::{ExportOptions, OutputType};
use crate::errors::{InkError, Result};
use crate::filename::{expand_filename, format_index, index_width, INDEX_MARKER, SLIDE_EXTENSION};
use crate::filter::{apply_tokens, resolve_labels, FilterAction};
use crate::slide::{layers_for_labels, Layer, Slide, SlideDescriptor};
use log::{debug, info};
use std::collections::{HashMap, HashSet};

/// Resolves slide descriptors against the layers of one drawing.
///
/// File name and type of a slide come from the command-line override when one
/// is given, else from the descriptor, else from the configuration's globals.
pub struct SlideResolver<'a> {
    layers: &'a [Layer],
    labels: Vec<String>,
    basename: String,
    filename_format: String,
    output_type: OutputType,
    options: &'a ExportOptions,
}

impl<'a> SlideResolver<'a> {
    pub fn new(
        layers: &'a [Layer],
        basename: &str,
        filename_format: &str,
        output_type: OutputType,
        options: &'a ExportOptions,
    ) -> Self {
        Self {
            layers,
            labels: layers.iter().map(|layer| layer.label.clone()).collect(),
            basename: basename.to_string(),
            filename_format: filename_format.to_string(),
            output_type,
            options,
        }
    }

    /// Resolve every descriptor, or fail without producing any slide.
    ///
    /// The result is ordered by slide id, i.e. declaration order.
    pub fn resolve(&self, descriptors: &[SlideDescriptor]) -> Result<Vec<Slide>> {
        check_unique_names(descriptors)?;

        let mut slides = self.resolve_rounds(descriptors)?;
        self.apply_global_overrides(&mut slides);
        slides.sort_by_key(|slide| slide.id);
        self.materialize_filenames(&mut slides)?;

        info!("Resolved {} slides", slides.len());
        Ok(slides)
    }

    /// Resolve descriptors in rounds until none is left. A descriptor is ready
    /// once it has no base or its base has been resolved.
    fn resolve_rounds(&self, descriptors: &[SlideDescriptor]) -> Result<Vec<Slide>> {
        let mut pending: Vec<(usize, &SlideDescriptor)> = descriptors.iter().enumerate().collect();
        let mut slides: Vec<Slide> = Vec::with_capacity(descriptors.len());
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut round = 0;

        while !pending.is_empty() {
            round += 1;
            let before = pending.len();
            let mut waiting = Vec::new();

            for (id, descriptor) in pending {
                let labels = match &descriptor.based_on {
                    None => resolve_labels(&self.labels, &descriptor.filter_spec()),
                    Some(base) => match by_name.get(base) {
                        Some(&index) => self.inherit_labels(&slides[index].labels, descriptor),
                        None => {
                            waiting.push((id, descriptor));
                            continue;
                        }
                    },
                };
                debug!("Round {}: slide #{} resolved to {:?}", round, id, labels);

                if let Some(name) = &descriptor.name {
                    by_name.insert(name.clone(), slides.len());
                }
                slides.push(self.make_slide(id, descriptor, labels));
            }

            if waiting.len() == before {
                return Err(unresolved_error(&waiting, descriptors));
            }
            pending = waiting;
        }

        Ok(slides)
    }

    /// Start from the base's labels, then add the own includes and remove the
    /// own excludes, in that order.
    fn inherit_labels(&self, base: &[String], descriptor: &SlideDescriptor) -> Vec<String> {
        let mut labels = base.to_vec();
        if let Some(include) = &descriptor.include {
            labels = apply_tokens(&self.labels, &labels, include, FilterAction::Add);
        }
        if let Some(exclude) = &descriptor.exclude {
            labels = apply_tokens(&self.labels, &labels, exclude, FilterAction::Exclude);
        }
        labels
    }

    fn make_slide(&self, id: usize, descriptor: &SlideDescriptor, labels: Vec<String>) -> Slide {
        let filename_format = self
            .options
            .outfile
            .as_ref()
            .or(descriptor.filename_format.as_ref())
            .unwrap_or(&self.filename_format)
            .clone();
        let output_type = self
            .options
            .output_type
            .or(descriptor.output_type)
            .unwrap_or(self.output_type);

        Slide {
            id,
            name: descriptor.name.clone(),
            filename_format,
            filename: String::new(),
            output_type,
            layers: layers_for_labels(self.layers, &labels),
            labels,
        }
    }

    fn apply_global_overrides(&self, slides: &mut [Slide]) {
        let overrides = [
            (self.options.add.as_ref(), FilterAction::Add),
            (self.options.exclude.as_ref(), FilterAction::Exclude),
        ];
        for (tokens, action) in overrides {
            let Some(tokens) = tokens else { continue };
            debug!("Applying global {:?} of {:?} to every slide", action, tokens);
            for slide in slides.iter_mut() {
                slide.labels = apply_tokens(&self.labels, &slide.labels, tokens, action);
                slide.layers = layers_for_labels(self.layers, &slide.labels);
            }
        }
    }

    /// Index tokens are zero padded to the width of the slide count and only
    /// computed for templates that use one.
    fn materialize_filenames(&self, slides: &mut [Slide]) -> Result<()> {
        let width = index_width(slides.len());
        for (index, slide) in slides.iter_mut().enumerate() {
            let number = slide
                .filename_format
                .contains(INDEX_MARKER)
                .then(|| format_index(index, width));
            slide.filename = expand_filename(
                &slide.filename_format,
                Some(&self.basename),
                Some(SLIDE_EXTENSION),
                number.as_deref(),
            )
            .ok_or_else(|| InkError::FilenameError {
                slide: slide.id,
                format: slide.filename_format.clone(),
            })?;
        }
        Ok(())
    }
}

pub(crate) fn check_unique_names(descriptors: &[SlideDescriptor]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in descriptors.iter().filter_map(|d| d.name.as_deref()) {
        if !seen.insert(name) {
            return Err(InkError::DuplicateSlideName(name.to_string()));
        }
    }
    Ok(())
}

fn unresolved_error(waiting: &[(usize, &SlideDescriptor)], all: &[SlideDescriptor]) -> InkError {
    let known: HashSet<&str> = all.iter().filter_map(|d| d.name.as_deref()).collect();
    for (id, descriptor) in waiting {
        if let Some(base) = descriptor.based_on.as_deref() {
            if !known.contains(base) {
                return InkError::UnknownBase {
                    slide: *id,
                    base: base.to_string(),
                };
            }
        }
    }
    InkError::CircularBase(
        waiting
            .iter()
            .map(|(id, d)| d.name.clone().unwrap_or_else(|| format!("#{}", id)))
            .collect(),
    )
}

/// Resolve `descriptors` against `layers` with the given globals. Shorthand
/// for building a [`SlideResolver`].
pub fn resolve_slides(
    descriptors: &[SlideDescriptor],
    layers: &[Layer],
    basename: &str,
    filename_format: &str,
    output_type: OutputType,
    options: &ExportOptions,
) -> Result<Vec<Slide>> {
    SlideResolver::new(layers, basename, filename_format, output_type, options).resolve(descriptors)
}
