// ABOUTME: Layer, slide descriptor and resolved slide types
// ABOUTME: Also generates the synthetic descriptors used in stacked mode

use crate::config::OutputType;
use crate::filter::{one_or_many, FilterSpec};
use serde::Deserialize;

/// A layer of the drawing, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Value of the `id` attribute, if any
    pub id: Option<String>,
    /// Value of the `inkscape:label` attribute, empty when missing
    pub label: String,
    /// Zero based position among the drawing's layers
    pub source_index: usize,
}

/// A slide as written in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SlideDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "based-on")]
    pub based_on: Option<String>,
    #[serde(default, rename = "filename")]
    pub filename_format: Option<String>,
    #[serde(default, rename = "type")]
    pub output_type: Option<OutputType>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub include: Option<Vec<String>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub exclude: Option<Vec<String>>,
}

impl SlideDescriptor {
    /// Descriptor selecting exactly `include`.
    pub fn including(include: Vec<String>) -> Self {
        Self {
            include: Some(include),
            ..Self::default()
        }
    }

    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new(self.include.clone(), self.exclude.clone())
    }
}

/// A fully resolved slide, ready to be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Position of the descriptor in declaration order
    pub id: usize,
    pub name: Option<String>,
    pub filename_format: String,
    pub filename: String,
    pub output_type: OutputType,
    pub labels: Vec<String>,
    pub layers: Vec<Layer>,
}

impl Slide {
    /// File name of the converted output, e.g. `drawing-0.pdf`.
    pub fn output_filename(&self) -> String {
        crate::filename::with_extension(&self.filename, self.output_type.extension())
    }
}

/// One cumulative slide per layer: slide `i` includes the labels at
/// positions `0..=i`.
pub fn stacked_descriptors(labels: &[String]) -> Vec<SlideDescriptor> {
    (1..=labels.len())
        .map(|count| SlideDescriptor::including(labels[..count].to_vec()))
        .collect()
}

/// Map labels to the first layer carrying each one.
pub fn layers_for_labels(layers: &[Layer], labels: &[String]) -> Vec<Layer> {
    labels
        .iter()
        .filter_map(|label| layers.iter().find(|layer| &layer.label == label))
        .cloned()
        .collect()
}
