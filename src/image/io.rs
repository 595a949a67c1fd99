//! I/O helpers around the extraction pipeline.
//!
//! - `load_grayscale_image`: read a PNG/JPEG file into a [`GrayscaleImage`].
//! - `decode_grayscale_bytes`: same for an in-memory encoded file.
//! - `decode_grayscale_base64`: base64 text (optionally a `data:` URL).
//! - `save_grayscale` / `save_mask`: write rasters as PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
//! - [`DirectorySink`]: stage sink dumping numbered PNGs into a directory.
use super::{BinaryMask, GrayscaleImage};
use crate::sink::{StageImage, StageSink};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use log::warn;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

fn from_dynamic(img: DynamicImage) -> Result<GrayscaleImage, String> {
    let luma = img.into_luma8();
    let (w, h) = (luma.width() as usize, luma.height() as usize);
    GrayscaleImage::from_raw(w, h, luma.into_raw()).map_err(|e| e.to_string())
}

/// Load an image from disk and convert it to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayscaleImage, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    from_dynamic(img)
}

/// Decode an encoded image file held in memory.
pub fn decode_grayscale_bytes(bytes: &[u8]) -> Result<GrayscaleImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("Failed to decode image: {e}"))?;
    from_dynamic(img)
}

/// Decode base64 text holding an encoded image. Surrounding whitespace,
/// embedded line breaks and a `data:<mime>;base64,` prefix are accepted.
pub fn decode_grayscale_base64(text: &str) -> Result<GrayscaleImage, String> {
    let trimmed = text.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| "Malformed data URL: missing ','".to_string())?,
        None => trimmed,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("Invalid base64 image: {e}"))?;
    decode_grayscale_bytes(&bytes)
}

/// Save an 8-bit grayscale image as PNG.
pub fn save_grayscale(image: &GrayscaleImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    image
        .to_gray_image()
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a mask as a black/white PNG (foreground white).
pub fn save_mask(mask: &BinaryMask, path: &Path) -> Result<(), String> {
    save_grayscale(&mask.to_grayscale(), path)
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

/// Writes every stage image as `NN_<stage>.png` into a directory.
///
/// Write failures are logged and skipped; a debug dump never aborts an
/// extraction.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    next_index: usize,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_index: 0,
            written: Vec::new(),
        }
    }

    /// Files written so far, in stage order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl StageSink for DirectorySink {
    fn on_stage(&mut self, stage: &str, image: StageImage<'_>) {
        let path = self.dir.join(format!("{:02}_{stage}.png", self.next_index));
        self.next_index += 1;
        match save_grayscale(&image.to_grayscale(), &path) {
            Ok(()) => self.written.push(path),
            Err(err) => warn!("debug image for stage {stage} not written: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(img: &GrayscaleImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(img.to_gray_image())
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn sample() -> GrayscaleImage {
        GrayscaleImage::from_raw(5, 3, (0..15).map(|i| (i * 17) as u8).collect()).unwrap()
    }

    #[test]
    fn decodes_png_bytes() {
        let img = sample();
        assert_eq!(decode_grayscale_bytes(&png_bytes(&img)).unwrap(), img);
    }

    #[test]
    fn decodes_base64_with_data_url_and_line_breaks() {
        let img = sample();
        let encoded = STANDARD.encode(png_bytes(&img));
        let (a, b) = encoded.split_at(encoded.len() / 2);
        let text = format!("  data:image/png;base64,{a}\n{b}\n");
        assert_eq!(decode_grayscale_base64(&text).unwrap(), img);
        assert_eq!(decode_grayscale_base64(&encoded).unwrap(), img);
    }

    #[test]
    fn directory_sink_numbers_stage_files() {
        let dir = std::env::temp_dir().join(format!("crossword_grid_sink_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let img = sample();
        let mask = BinaryMask::from_fn(5, 3, |x, _| x > 2);

        let mut sink = DirectorySink::new(&dir);
        sink.on_stage("binarized", StageImage::Mask(&mask));
        sink.on_stage("cropped", StageImage::Gray(&img));

        let names: Vec<String> = sink
            .written()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["00_binarized.png", "01_cropped.png"]);
        let reloaded = load_grayscale_image(&sink.written()[1]).unwrap();
        assert_eq!(reloaded, img);
        let mask_png = load_grayscale_image(&sink.written()[0]).unwrap();
        assert_eq!(mask_png, mask.to_grayscale());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_grayscale_base64("not base64 at all!").is_err());
        assert!(decode_grayscale_base64("data:image/png;base64").is_err());
        assert!(decode_grayscale_bytes(b"\x89PNG broken").is_err());
    }
}
