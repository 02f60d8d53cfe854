//! I/O helpers for grayscale images and JSON reports.
//!
//! - `read_raw_grayscale`: read a headerless byte-per-pixel file of known
//!   dimensions (the reference dataset format, e.g. `zebras.raw` at 256×256).
//! - `load_grayscale_image`: read a PNG/JPEG/etc. into an owned gray buffer.
//! - `save_grayscale_u8` / `save_grayscale_f32`: write buffers to PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageU8};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned 8-bit grayscale buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Construct an owned grayscale buffer over raw bytes.
    ///
    /// The caller guarantees `data.len() == width * height`; the loaders in
    /// this module validate before constructing.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw row-major pixel bytes
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Borrow as a read-only `ImageU8` view
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

/// Read a headerless raw grayscale file: `width * height` bytes, row-major,
/// one byte per pixel. Fails on any size mismatch before processing starts.
pub fn read_raw_grayscale(path: &Path, width: usize, height: usize) -> Result<GrayImageU8, String> {
    if width == 0 || height == 0 {
        return Err(format!("invalid raw dimensions {width}x{height}"));
    }
    let data =
        fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let expected = width * height;
    if data.len() != expected {
        return Err(format!(
            "Raw file {} has {} bytes, expected {} ({}x{})",
            path.display(),
            data.len(),
            expected,
            width,
            height
        ));
    }
    Ok(GrayImageU8::new(width, height, data))
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw();
    Ok(GrayImageU8::new(width, height, data))
}

/// Save an 8-bit grayscale buffer to a PNG.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width as u32, buffer.height as u32, buffer.data.clone())
            .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a float image to a grayscale PNG, min-max scaled into 0..255.
///
/// Useful for inspecting intermediate feature maps whose values are signed
/// and unbounded. A constant image maps to mid-grey.
pub fn save_grayscale_f32(image: &ImageF32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &v in &image.data {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let span = hi - lo;
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        let row = image.row(y);
        for (x, &px) in row.iter().enumerate() {
            let v = if span > 0.0 {
                ((px - lo) / span * 255.0).clamp(0.0, 255.0) as u8
            } else {
                128
            };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
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
