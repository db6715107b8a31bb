// ABOUTME: SVG document handling for the inklayers application
// ABOUTME: Reads Inkscape layers and writes copies of the drawing restricted to some layers

use crate::errors::{InkError, Result};
use crate::filename::file_stem;
use crate::slide::Layer;
use crate::utils;
use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A drawing and its top level layers.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    /// File name of the drawing without directory and extension
    pub basename: String,
    source: String,
    layers: Vec<Layer>,
}

impl SvgDocument {
    /// Load and parse the drawing at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading drawing: {:?}", path);
        utils::validate_file_exists(path)?;
        let source = fs::read_to_string(path).map_err(InkError::FileReadError)?;
        Self::from_source(&file_stem(path), source)
    }

    /// Parse an in-memory drawing.
    pub fn from_source(basename: &str, source: String) -> Result<Self> {
        let layers = read_layers(&source)?;
        debug!("Found {} layers in '{}'", layers.len(), basename);
        Ok(Self {
            basename: basename.to_string(),
            source,
            layers,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn labels(&self) -> Vec<String> {
        self.layers.iter().map(|layer| layer.label.clone()).collect()
    }

    /// One `#i: 'label'` line per layer.
    pub fn layer_report(&self) -> Vec<String> {
        self.layers
            .iter()
            .map(|layer| format!("#{}: '{}'", layer.source_index, layer.label))
            .collect()
    }

    /// The drawing with every layer whose label is not in `keep` removed.
    /// Content outside of layers is copied unchanged.
    pub fn filtered(&self, keep: &[String]) -> Result<String> {
        let keep: HashSet<&str> = keep.iter().map(String::as_str).collect();
        let mut reader = Reader::from_str(&self.source);
        let mut writer = Writer::new(Vec::with_capacity(self.source.len()));
        let mut depth = 0usize;

        loop {
            let event = reader.read_event()?;
            match &event {
                Event::Eof => break,
                Event::Start(e) if depth == 1 => {
                    if let Some(layer) = layer_attributes(e) {
                        if !keep.contains(layer.label.as_str()) {
                            reader.read_to_end(e.name())?;
                            continue;
                        }
                    }
                    depth += 1;
                }
                Event::Empty(e) if depth == 1 => {
                    if let Some(layer) = layer_attributes(e) {
                        if !keep.contains(layer.label.as_str()) {
                            continue;
                        }
                    }
                }
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
            writer
                .write_event(event)
                .map_err(|e| InkError::XmlError(e.to_string()))?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| InkError::XmlError(format!("Filtered drawing is not UTF-8: {}", e)))
    }

    /// Write the filtered drawing to `path`, creating its directory if needed.
    pub fn write_filtered(&self, keep: &[String], path: &Path) -> Result<()> {
        debug!("Saving {:?} with layers {:?}", path, keep);
        utils::ensure_parent_directory_exists(path)?;
        fs::write(path, self.filtered(keep)?).map_err(InkError::FileReadError)
    }
}

/// Id and label of an element that is an Inkscape layer.
struct LayerAttributes {
    id: Option<String>,
    label: String,
}

/// Any element carrying `inkscape:groupmode="layer"` is a layer, whatever its
/// tag. Only the `inkscape:` prefixed label counts.
fn layer_attributes(element: &BytesStart) -> Option<LayerAttributes> {
    let mut is_layer = false;
    let mut id = None;
    let mut label = String::new();
    for attr in element.attributes().flatten() {
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        match attr.key.as_ref() {
            b"inkscape:groupmode" => is_layer = value == "layer",
            b"inkscape:label" => label = value,
            b"id" => id = Some(value),
            _ => {}
        }
    }
    is_layer.then_some(LayerAttributes { id, label })
}

fn read_layers(source: &str) -> Result<Vec<Layer>> {
    let mut reader = Reader::from_str(source);
    let mut layers = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => {
                if depth == 1 {
                    push_layer(&mut layers, &e);
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 1 => push_layer(&mut layers, &e),
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(layers)
}

fn push_layer(layers: &mut Vec<Layer>, element: &BytesStart) {
    if let Some(LayerAttributes { id, label }) = layer_attributes(element) {
        layers.push(Layer {
            id,
            label,
            source_index: layers.len(),
        });
    }
}
