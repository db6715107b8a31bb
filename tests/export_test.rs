use inklayers::pipeline::{build_presentation, export_presentation, list_layers};
use inklayers::{AppConfig, ExportOptions, InkError, OutputType, SvgDocument};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:groupmode="layer" id="layer1" inkscape:label="L0"><rect id="r0"/></g>
  <g inkscape:groupmode="layer" id="layer2" inkscape:label="L1"><rect id="r1"/></g>
  <g inkscape:groupmode="layer" id="layer3" inkscape:label="L2"><rect id="r2"/></g>
  <g inkscape:groupmode="layer" id="layer4" inkscape:label="L3"><rect id="r3"/></g>
</svg>
"#;

fn write_fixture(dir: &Path, config_name: &str, config: &str) -> std::path::PathBuf {
    fs::write(dir.join("drawing.svg"), DRAWING).expect("Failed to write drawing");
    let config_path = dir.join(config_name);
    fs::write(&config_path, config).expect("Failed to write config");
    config_path
}

fn labels_in(path: &Path) -> Vec<String> {
    let content = fs::read_to_string(path).expect("Failed to read exported slide");
    SvgDocument::from_source("slide", content)
        .expect("Exported slide should parse")
        .labels()
}

#[test]
fn test_export_json_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_fixture(
        temp_dir.path(),
        "talk.json",
        r##"{
            "input": {"filename": "drawing.svg"},
            "output": {
                "filename": "%b-%n.%e",
                "type": "pdf",
                "slides": [
                    {"name": "intro", "include": ["#0-#1"]},
                    {"based-on": "intro", "include": ["L3"], "exclude": ["#0"]},
                    {"include": ["L2"], "filename": "detail.%e", "type": "png"}
                ]
            }
        }"##,
    );

    let app = AppConfig::new();
    let options = ExportOptions::default();
    let presentation = build_presentation(&config_path, &options, &app).expect("Failed to build");
    assert_eq!(presentation.slides.len(), 3);

    let written = export_presentation(&presentation, &options, &app, None).expect("Failed to export");
    let output_dir = temp_dir.path().join("output");
    assert_eq!(written.len(), 4);
    assert_eq!(labels_in(&output_dir.join("drawing-0.svg")), vec!["L0", "L1"]);
    assert_eq!(labels_in(&output_dir.join("drawing-1.svg")), vec!["L1", "L3"]);
    assert_eq!(labels_in(&output_dir.join("detail.svg")), vec!["L2"]);

    let latex = fs::read_to_string(output_dir.join("talk.inc.tex")).expect("Missing LaTeX file");
    assert!(latex.contains(r"\includegraphics<1|handout:0>[width=1.0\columnwidth]{drawing-0.pdf}%"));
    assert!(latex.contains(r"\includegraphics<3|handout:0>[width=1.0\columnwidth]{detail.png}%"));
}

#[test]
fn test_export_toml_config_split_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_fixture(
        temp_dir.path(),
        "talk.toml",
        r##"
[input]
filename = "drawing.svg"

[output]
filename = "%b-%n.%e"
type = "eps"

[[output.slides]]
include = ["#1-#2"]
"##,
    );

    let app = AppConfig::new();
    let options = ExportOptions {
        split: true,
        ..ExportOptions::default()
    };
    let presentation = build_presentation(&config_path, &options, &app).expect("Failed to build");
    let out = temp_dir.path().join("custom");
    export_presentation(&presentation, &options, &app, Some(&out)).expect("Failed to export");

    assert_eq!(labels_in(&out.join("drawing-0-split-0.svg")), vec!["L1"]);
    assert_eq!(labels_in(&out.join("drawing-0-split-1.svg")), vec!["L2"]);
    assert!(!out.join("drawing-0.svg").exists());
    assert!(out.join("talk.inc.tex").exists());
}

#[test]
fn test_build_ini_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_fixture(
        temp_dir.path(),
        "talk.ini",
        "[input]\nfilename = drawing.svg\n\n[output]\nfilename = %b-%n.%e\ntype = pdf\n\n[slide_0]\ninclude = L0,L1\n\n[slide_1]\ninclude = #2-#3\nexclude = L3\n",
    );

    let presentation =
        build_presentation(&config_path, &ExportOptions::default(), &AppConfig::new()).expect("Failed to build");
    let labels: Vec<Vec<String>> = presentation.slides.iter().map(|s| s.labels.clone()).collect();
    assert_eq!(labels, vec![vec!["L0", "L1"], vec!["L2"]]);
    assert_eq!(presentation.slides[1].filename, "drawing-1.svg");
}

#[test]
fn test_bare_drawing_in_stack_mode() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let drawing = temp_dir.path().join("drawing.svg");
    fs::write(&drawing, DRAWING).expect("Failed to write drawing");

    let options = ExportOptions {
        stack: true,
        output_type: Some(OutputType::Png),
        ..ExportOptions::default()
    };
    let presentation = build_presentation(&drawing, &options, &AppConfig::new()).expect("Failed to build");
    let labels: Vec<Vec<String>> = presentation.slides.iter().map(|s| s.labels.clone()).collect();
    assert_eq!(
        labels,
        vec![
            vec!["L0"],
            vec!["L0", "L1"],
            vec!["L0", "L1", "L2"],
            vec!["L0", "L1", "L2", "L3"],
        ]
    );
    assert!(presentation.slides.iter().all(|s| s.output_type == OutputType::Png));
}

#[test]
fn test_list_layers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let drawing = temp_dir.path().join("drawing.svg");
    fs::write(&drawing, DRAWING).expect("Failed to write drawing");

    let lines = list_layers(&drawing, &ExportOptions::default(), &AppConfig::new()).expect("Failed to list");
    assert_eq!(lines, vec!["#0: 'L0'", "#1: 'L1'", "#2: 'L2'", "#3: 'L3'"]);
}

#[test]
fn test_circular_config_produces_no_slides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_fixture(
        temp_dir.path(),
        "loop.json",
        r#"{
            "input": {"filename": "drawing.svg"},
            "output": {
                "filename": "%b-%n.%e",
                "type": "pdf",
                "slides": [
                    {"name": "a", "based-on": "b"},
                    {"name": "b", "based-on": "a"}
                ]
            }
        }"#,
    );

    let result = build_presentation(&config_path, &ExportOptions::default(), &AppConfig::new());
    assert!(matches!(result, Err(InkError::CircularBase(_))));
}

#[test]
fn test_unsupported_input_extension() {
    let result = build_presentation(
        Path::new("slides.yaml"),
        &ExportOptions::default(),
        &AppConfig::new(),
    );
    assert!(matches!(result, Err(InkError::UnsupportedInput(_))));
}
