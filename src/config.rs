// ABOUTME: Configuration module for the inklayers application
// ABOUTME: Loads slide configuration files and holds command-line overrides and defaults

use crate::errors::{InkError, Result};
use crate::slide::SlideDescriptor;
use ini::{Ini, ParseOption, Properties};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Format a slide is converted to after export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputType {
    Png,
    Ps,
    Eps,
    Pdf,
}

impl OutputType {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputType::Png => "png",
            OutputType::Ps => "ps",
            OutputType::Eps => "eps",
            OutputType::Pdf => "pdf",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "png" => Some(OutputType::Png),
            "ps" => Some(OutputType::Ps),
            "eps" => Some(OutputType::Eps),
            "pdf" => Some(OutputType::Pdf),
            _ => None,
        }
    }
}

const OUTPUT_TYPES: &[&str] = &["png", "ps", "eps", "pdf"];

// Case-insensitive, so that "PDF" in a config file is accepted.
impl<'de> Deserialize<'de> for OutputType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        OutputType::from_name(&name)
            .ok_or_else(|| de::Error::unknown_variant(&name, OUTPUT_TYPES))
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// Every key is optional here so that a missing one can be reported by name.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    input: Option<RawInput>,
    output: Option<RawOutput>,
}

#[derive(Debug, Default, Deserialize)]
struct RawInput {
    filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    filename: Option<String>,
    #[serde(rename = "type")]
    output_type: Option<OutputType>,
    slides: Option<Vec<SlideDescriptor>>,
}

/// A validated slide configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Drawing to export, as written in the file
    pub input_filename: String,
    /// Global output file name template
    pub filename_format: String,
    /// Global output type
    pub output_type: OutputType,
    pub slides: Vec<SlideDescriptor>,
}

impl ExportConfig {
    fn from_raw(raw: RawConfig) -> Result<Self> {
        let input = raw.input.unwrap_or_default();
        let output = raw.output.unwrap_or_default();
        Ok(Self {
            input_filename: input
                .filename
                .ok_or_else(|| InkError::MissingKey("input -> filename".to_string()))?,
            filename_format: output
                .filename
                .ok_or_else(|| InkError::MissingKey("output -> filename".to_string()))?,
            output_type: output
                .output_type
                .ok_or_else(|| InkError::MissingKey("output -> type".to_string()))?,
            slides: output
                .slides
                .ok_or_else(|| InkError::MissingKey("output -> slides".to_string()))?,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_raw(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_raw(toml::from_str(content)?)
    }

    /// Parse an INI configuration.
    ///
    /// `[input]` and `[output]` hold the global keys. Every `slide_*` section
    /// is a slide, taken in section name order. Values are read raw: no
    /// quoting, escapes or interpolation, so `%b-%n.%e` and `#0-#4` survive.
    /// `include`/`exclude` are comma separated, `\,` being a literal comma.
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(
            content,
            ParseOption {
                enabled_quote: false,
                enabled_escape: false,
                ..ParseOption::default()
            },
        )?;

        let input = ini.section(Some("input")).map(|section| RawInput {
            filename: section.get("filename").map(str::to_string),
        });
        let output = match ini.section(Some("output")) {
            Some(section) => Some(RawOutput {
                filename: section.get("filename").map(str::to_string),
                output_type: section.get("type").map(parse_ini_type).transpose()?,
                slides: Some(ini_slides(&ini)?),
            }),
            None => None,
        };

        Self::from_raw(RawConfig { input, output })
    }

    /// Load a `.json`, `.toml` or `.ini` configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(InkError::FileReadError)?;
        match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => Self::from_json_str(&content),
            ConfigFormat::Toml => Self::from_toml_str(&content),
            ConfigFormat::Ini => Self::from_ini_str(&content),
            ConfigFormat::Svg => Err(InkError::UnsupportedInput("svg".to_string())),
        }
    }

    /// Path of the drawing, relative to the directory of the config file.
    pub fn drawing_path(&self, config_path: &Path) -> PathBuf {
        let input = Path::new(&self.input_filename);
        match config_path.parent() {
            Some(dir) if input.is_relative() => dir.join(input),
            _ => input.to_path_buf(),
        }
    }
}

fn parse_ini_type(name: &str) -> Result<OutputType> {
    OutputType::from_name(name).ok_or_else(|| {
        InkError::ConfigParseError(format!("INI: unknown output type '{}'", name))
    })
}

fn ini_slides(ini: &Ini) -> Result<Vec<SlideDescriptor>> {
    let mut sections: Vec<(&str, &Properties)> = ini
        .iter()
        .filter_map(|(name, props)| name.map(|name| (name, props)))
        .filter(|(name, _)| name.starts_with("slide_"))
        .collect();
    sections.sort_by(|a, b| a.0.cmp(b.0));

    sections
        .into_iter()
        .map(|(_, props)| {
            Ok(SlideDescriptor {
                name: props.get("name").map(str::to_string),
                based_on: props.get("based-on").map(str::to_string),
                filename_format: props.get("filename").map(str::to_string),
                output_type: props.get("type").map(parse_ini_type).transpose()?,
                include: props.get("include").map(split_escaped_tokens),
                exclude: props.get("exclude").map(split_escaped_tokens),
            })
        })
        .collect()
}

/// Kinds of input file accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Ini,
    Svg,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            "ini" => Ok(ConfigFormat::Ini),
            "svg" => Ok(ConfigFormat::Svg),
            _ => Err(InkError::UnsupportedInput(format!(".{}", extension))),
        }
    }
}

/// Settings given on the command line. They apply to every slide and win over
/// anything in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Tokens added to every slide
    pub add: Option<Vec<String>>,
    /// Tokens removed from every slide
    pub exclude: Option<Vec<String>>,
    /// File name template overriding every slide's
    pub outfile: Option<String>,
    /// Output type overriding every slide's
    pub output_type: Option<OutputType>,
    /// Replace the configured slides with one cumulative slide per layer
    pub stack: bool,
    /// Write one file per layer of each slide
    pub split: bool,
}

/// Split a command-line token list on commas, where `\,` is a literal comma.
///
/// `"L1,L2\, with comma"` gives `["L1", "L2, with comma"]`.
pub fn split_escaped_tokens(value: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&',') => {
                current.push(',');
                chars.next();
            }
            ',' => tokens.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tokens.push(current);
    tokens
}

/// Process wide defaults
pub struct AppConfig {
    /// Output directory, relative to the input file's directory
    pub output_dir: PathBuf,
    /// File name template used when nothing else provides one
    pub default_filename_format: String,
    /// Output type used when nothing else provides one
    pub default_output_type: OutputType,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            default_filename_format: "%b-%n.%e".to_string(),
            default_output_type: OutputType::Pdf,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let output_dir = env::var("INKLAYERS_OUTPUT_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let default_filename_format = env::var("INKLAYERS_FILENAME_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_filename_format);
        let default_output_type = env::var("INKLAYERS_TYPE")
            .ok()
            .and_then(|s| OutputType::from_name(&s))
            .unwrap_or(defaults.default_output_type);

        Self {
            output_dir,
            default_filename_format,
            default_output_type,
        }
    }

    /// Configuration used for a bare drawing given on the command line.
    pub fn drawing_config(&self, drawing: &Path, options: &ExportOptions) -> ExportConfig {
        ExportConfig {
            input_filename: drawing.to_string_lossy().into_owned(),
            filename_format: options
                .outfile
                .clone()
                .unwrap_or_else(|| self.default_filename_format.clone()),
            output_type: options.output_type.unwrap_or(self.default_output_type),
            slides: Vec::new(),
        }
    }
}
