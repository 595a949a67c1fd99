use crate::image::io::{decode_grayscale_base64, load_grayscale_image};
use crate::image::GrayscaleImage;
use crate::params::ExtractorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// How `input_path` is encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// An image file the `image` crate can open (PNG, JPEG).
    #[default]
    Image,
    /// A text file holding a base64-encoded image, optionally as a data URL.
    Base64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the extraction report here as JSON.
    pub json_out: Option<PathBuf>,
    /// Dump every stage image into this directory.
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub input_format: InputFormat,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: ExtractorParams,
}

impl RuntimeConfig {
    /// Defaults for a bare image path given on the command line.
    pub fn for_image(path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: path.into(),
            input_format: InputFormat::Image,
            output: OutputConfig::default(),
            params: ExtractorParams::default(),
        }
    }

    /// Decode `input_path` according to `input_format`.
    pub fn load_input(&self) -> Result<GrayscaleImage, String> {
        match self.input_format {
            InputFormat::Image => load_grayscale_image(&self.input_path),
            InputFormat::Base64 => {
                let text = fs::read_to_string(&self.input_path).map_err(|e| {
                    format!("Failed to read {}: {e}", self.input_path.display())
                })?;
                decode_grayscale_base64(&text)
            }
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(contents: &str) -> Result<RuntimeConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

/// Resolve the single positional argument: a `.json` file is a config, any
/// other path is an image to process with default parameters.
pub fn parse_cli(program: &str, args: &[String]) -> Result<RuntimeConfig, String> {
    match args {
        [path] if path == "-h" || path == "--help" => Err(usage(program)),
        [path] => {
            let path = Path::new(path);
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                load_config(path)
            } else {
                Ok(RuntimeConfig::for_image(path))
            }
        }
        _ => Err(usage(program)),
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <config.json | image>")
}
