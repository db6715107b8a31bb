// ABOUTME: Library module for the inklayers program.
// ABOUTME: Contains the slide resolution engine and the SVG load/export collaborators.

// Reexport modules
pub mod config;
pub mod document;
pub mod errors;
pub mod export;
pub mod filename;
pub mod filter;
pub mod interval;
pub mod pipeline;
pub mod resolver;
pub mod slide;
pub mod utils;

// Reexport common types and functions
pub use config::{split_escaped_tokens, AppConfig, ExportConfig, ExportOptions, OutputType};
pub use document::SvgDocument;
pub use errors::{InkError, IntervalError, Result};
pub use export::Exporter;
pub use filename::expand_filename;
pub use filter::{apply_tokens, resolve_labels, FilterAction, FilterSpec};
pub use interval::{is_member, parse_interval_expression, Interval};
pub use pipeline::{build_presentation, process_files, resolve_presentation, Presentation, RunOptions};
pub use resolver::{resolve_slides, SlideResolver};
pub use slide::{stacked_descriptors, Layer, Slide, SlideDescriptor};
