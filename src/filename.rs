// ABOUTME: Output file name templates for exported slides
// ABOUTME: Expands %b (basename), %e (extension) and %n (index) markers

use std::path::Path;

pub const BASENAME_MARKER: &str = "%b";
pub const EXTENSION_MARKER: &str = "%e";
pub const INDEX_MARKER: &str = "%n";

/// Extension of the documents written for each slide.
pub const SLIDE_EXTENSION: &str = "svg";

/// Expand a file name template.
///
/// Returns `None` when a marker appears past the start of the template and no
/// value was supplied for it. A supplied value replaces every occurrence of its
/// marker.
///
/// ```
/// use inklayers::filename::expand_filename;
///
/// let name = expand_filename("%b-%n.%e", Some("test"), Some("svg"), Some("100"));
/// assert_eq!(name.as_deref(), Some("test-100.svg"));
/// assert_eq!(expand_filename("test.%e", None, None, None), None);
/// ```
pub fn expand_filename(
    template: &str,
    basename: Option<&str>,
    extension: Option<&str>,
    index: Option<&str>,
) -> Option<String> {
    let mut name = template.to_string();
    for (marker, value) in [
        (BASENAME_MARKER, basename),
        (EXTENSION_MARKER, extension),
        (INDEX_MARKER, index),
    ] {
        match value {
            Some(value) => name = name.replace(marker, value),
            None if name.find(marker).is_some_and(|pos| pos > 0) => return None,
            None => {}
        }
    }
    Some(name)
}

/// Digits needed to print every index of `count` slides.
pub fn index_width(count: usize) -> usize {
    count.max(1).to_string().len()
}

/// Zero padded index token.
pub fn format_index(index: usize, width: usize) -> String {
    format!("{:0width$}", index, width = width)
}

/// File name without directory and extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Replace the extension of a file name, keeping its directory part.
pub fn with_extension(filename: &str, extension: &str) -> String {
    Path::new(filename)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}
