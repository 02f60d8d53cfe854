//! Per-pixel texture descriptors: illumination normalization, Laws filtering
//! and feature-field assembly.
//!
//! Border policy
//! - Both the neighborhood mean and the convolutions skip taps that fall
//!   outside the image via explicit range checks; skipped taps contribute
//!   nothing to the accumulator.
//! - The normalization denominator stays fixed at `window²` regardless of how
//!   many taps were in bounds. Border means are therefore biased low, which
//!   is the reference behaviour and must not be "fixed" by dividing by the
//!   in-bounds count: downstream results depend on it.
//!
//! Complexity
//! - Normalization is O(W·H·window²), filtering O(W·H·25·9). The reference
//!   256×256 image is processed well under a second without separability
//!   tricks, so none are used.
use crate::error::{Result, SegmenterError};
use crate::filters::{FilterBank, Kernel5, CHANNELS};
use crate::image::ImageF32;

/// Grid of 9-component texture descriptors, congruent to the source image.
///
/// Created once per input image; read-only afterwards. The same field can be
/// clustered several times (e.g. K = 4, 5, 6) without recomputation.
#[derive(Clone, Debug)]
pub struct FeatureField {
    pub w: usize,
    pub h: usize,
    data: Vec<[f32; CHANNELS]>,
}

impl FeatureField {
    /// Wrap precomputed vectors. `data` must hold exactly `w * h` entries.
    pub fn from_vectors(w: usize, h: usize, data: Vec<[f32; CHANNELS]>) -> Self {
        assert_eq!(data.len(), w * h, "feature field shape mismatch");
        Self { w, h, data }
    }

    fn zeroed(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![[0.0; CHANNELS]; w * h],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &[f32; CHANNELS] {
        &self.data[y * self.w + x]
    }

    /// All descriptors in row-major order.
    #[inline]
    pub fn vectors(&self) -> &[[f32; CHANNELS]] {
        &self.data
    }

    /// Extract one channel as a float image (debug/visualization aid).
    pub fn channel_image(&self, channel: usize) -> ImageF32 {
        assert!(channel < CHANNELS);
        let mut out = ImageF32::new(self.w, self.h);
        for (dst, v) in out.data.iter_mut().zip(&self.data) {
            *dst = v[channel];
        }
        out
    }
}

/// Subtract the mean of the centered `window × window` neighborhood from each
/// pixel. Out-of-bounds taps are skipped, the denominator stays `window²`.
pub fn normalize_illumination(img: &ImageF32, window: usize) -> Result<ImageF32> {
    if window == 0 || window % 2 == 0 {
        return Err(SegmenterError::InvalidWindow { window });
    }
    let r = (window / 2) as isize;
    let denom = (window * window) as f32;
    let (w, h) = (img.w as isize, img.h as isize);

    let mut out = ImageF32::new(img.w, img.h);
    for y in 0..img.h {
        for x in 0..img.w {
            let mut sum = 0.0f32;
            for dy in -r..=r {
                let yy = y as isize + dy;
                if yy < 0 || yy >= h {
                    continue;
                }
                for dx in -r..=r {
                    let xx = x as isize + dx;
                    if xx < 0 || xx >= w {
                        continue;
                    }
                    sum += img.get(xx as usize, yy as usize);
                }
            }
            out.set(x, y, img.get(x, y) - sum / denom);
        }
    }
    Ok(out)
}

/// Full 5×5 correlation (no kernel flip), offsets -2..=+2 on both axes.
/// Taps beyond the image contribute nothing.
pub fn convolve5(img: &ImageF32, kernel: &Kernel5) -> ImageF32 {
    let (w, h) = (img.w as isize, img.h as isize);
    let mut out = ImageF32::new(img.w, img.h);
    for y in 0..img.h {
        for x in 0..img.w {
            let mut acc = 0.0f32;
            for dy in -2isize..=2 {
                let yy = y as isize + dy;
                if yy < 0 || yy >= h {
                    continue;
                }
                for dx in -2isize..=2 {
                    let xx = x as isize + dx;
                    if xx < 0 || xx >= w {
                        continue;
                    }
                    acc += img.get(xx as usize, yy as usize)
                        * kernel[((dy + 2) as usize, (dx + 2) as usize)];
                }
            }
            out.set(x, y, acc);
        }
    }
    out
}

/// Run the full extraction: normalize illumination, apply all nine kernels
/// and assemble one descriptor per pixel in bank channel order.
pub fn extract(img: &ImageF32, bank: &FilterBank, window: usize) -> Result<FeatureField> {
    if img.w == 0 || img.h == 0 {
        return Err(SegmenterError::EmptyImage);
    }
    let normalized = normalize_illumination(img, window)?;
    let mut field = FeatureField::zeroed(img.w, img.h);
    for (channel, kernel) in bank.kernels.iter().enumerate() {
        let response = convolve5(&normalized, kernel);
        for (v, &px) in field.data.iter_mut().zip(&response.data) {
            v[channel] = px;
        }
    }
    Ok(field)
}
