use clap::Parser;
use detpost::{
    ClassLabels, DecodeConfig, Decoder, Detection, Layout, ModelInput, ScaleContext, Size,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Detection post-processing CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FitConfig {
    /// Scale each axis independently to fill the view.
    #[default]
    Stretch,
    /// Keep the aspect ratio and center the image in the view.
    FitCentered,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct DimsJson {
    width: usize,
    height: usize,
}

impl From<DimsJson> for Size {
    fn from(value: DimsJson) -> Self {
        Size::new(value.width, value.height)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    score_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
    top1_only: bool,
    parallel: bool,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            score_threshold: cfg.score_threshold,
            iou_threshold: cfg.iou_threshold,
            max_detections: cfg.max_detections,
            top1_only: cfg.top1_only,
            parallel: cfg.parallel,
        }
    }
}

impl From<DecodeConfigJson> for DecodeConfig {
    fn from(value: DecodeConfigJson) -> Self {
        Self {
            score_threshold: value.score_threshold,
            iou_threshold: value.iou_threshold,
            max_detections: value.max_detections,
            top1_only: value.top1_only,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    outputs_path: String,
    labels_path: Option<String>,
    model_input: DimsJson,
    source: Option<DimsJson>,
    view: Option<DimsJson>,
    fit: FitConfig,
    decode: DecodeConfigJson,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let input = ModelInput::default();
        Self {
            outputs_path: String::new(),
            labels_path: None,
            model_input: DimsJson {
                width: input.width,
                height: input.height,
            },
            source: None,
            view: None,
            fit: FitConfig::default(),
            decode: DecodeConfigJson::default(),
            output_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_index: usize,
    label: Option<String>,
    score: f32,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl DetectionRecord {
    fn new(decoder: &Decoder, det: &Detection) -> Self {
        Self {
            class_index: det.class_index,
            label: decoder.label(det).map(str::to_owned),
            score: det.score,
            left: det.bbox.left,
            top: det.bbox.top,
            right: det.bbox.right,
            bottom: det.bbox.bottom,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    layout: &'static str,
    rows: usize,
    detections: Vec<DetectionRecord>,
}

fn scale_context(config: &Config) -> Result<ScaleContext, detpost::DecodeError> {
    let model: Size = config.model_input.into();
    // Without a source size, boxes stay in model-input pixels.
    let source: Size = config.source.map(Size::from).unwrap_or(model);
    let view: Size = config.view.map(Size::from).unwrap_or(source);
    match config.fit {
        FitConfig::Stretch => ScaleContext::stretch(model, source, view),
        FitConfig::FitCentered => ScaleContext::fit_centered(model, source, view),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detpost=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.outputs_path.is_empty() {
        return Err("outputs_path must be set in the config".into());
    }

    let labels = match &config.labels_path {
        Some(path) => ClassLabels::parse(&fs::read_to_string(path)?),
        None => ClassLabels::default(),
    };
    let model_input = ModelInput::new(config.model_input.width, config.model_input.height)?;
    let scale = scale_context(&config)?;

    let outputs: Vec<f32> = serde_json::from_str(&fs::read_to_string(&config.outputs_path)?)?;
    tracing::info!(
        values = outputs.len(),
        classes = labels.len(),
        "loaded raw output"
    );

    let output_path = config.output_path.clone();
    let decoder = Decoder::new(labels, model_input, config.decode.into())?;
    let layout: Layout = decoder.resolve(&outputs)?;
    let detections = decoder.decode(&outputs, &scale)?;

    let output = Output {
        layout: layout.name(),
        rows: layout.rows(),
        detections: detections
            .iter()
            .map(|det| DetectionRecord::new(&decoder, det))
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
