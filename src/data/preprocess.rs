//! Image preprocessing for the classifier.
//!
//! Decodes an image file (PNG/JPEG/BMP/GIF), resizes it to the canonical
//! dimensions, and normalizes every channel value to [0, 1]. Training and
//! prediction must use the same `InputType`.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::data::source::Preprocessor;
use crate::error::PreprocessError;

/// Canonical representation a decoded image is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputType {
    /// Grayscale image resized to width×height.
    ImageGrayscale { width: u32, height: u32 },
    /// RGB image resized to width×height, flattened as R,G,B,R,G,B,...
    ImageRgb { width: u32, height: u32 },
}

impl InputType {
    pub fn channels(&self) -> usize {
        match self {
            InputType::ImageGrayscale { .. } => 1,
            InputType::ImageRgb { .. } => 3,
        }
    }

    /// Length of the flattened vector.
    pub fn len(&self) -> usize {
        let (w, h) = self.dimensions();
        w as usize * h as usize * self.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            InputType::ImageGrayscale { width, height } | InputType::ImageRgb { width, height } => {
                (width, height)
            }
        }
    }
}

impl Default for InputType {
    fn default() -> Self {
        InputType::ImageRgb { width: 64, height: 64 }
    }
}

/// Resizes `img` to the canonical size and flattens it into `[0, 1]` values.
pub fn image_to_input(img: &DynamicImage, input_type: InputType) -> Vec<f64> {
    let (width, height) = input_type.dimensions();
    let resized = img.resize_exact(width, height, FilterType::Triangle);
    match input_type {
        InputType::ImageGrayscale { .. } => {
            resized.to_luma8().pixels().map(|p| p.0[0] as f64 / 255.0).collect()
        }
        InputType::ImageRgb { .. } => {
            resized.to_rgb8().pixels().flat_map(|p| p.0.iter().map(|&c| c as f64 / 255.0)).collect()
        }
    }
}

/// Loads image files from disk and converts them with `image_to_input`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePreprocessor {
    pub input_type: InputType,
}

impl ImagePreprocessor {
    pub fn new(input_type: InputType) -> ImagePreprocessor {
        ImagePreprocessor { input_type }
    }

    pub fn load(&self, path: &Path) -> Result<Vec<f64>, PreprocessError> {
        let img = image::open(path).map_err(|source| PreprocessError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        if img.width() == 0 || img.height() == 0 {
            return Err(PreprocessError::Empty);
        }
        Ok(image_to_input(&img, self.input_type))
    }
}

impl Preprocessor<PathBuf> for ImagePreprocessor {
    fn input_len(&self) -> usize {
        self.input_type.len()
    }

    fn preprocess(&self, raw: &PathBuf) -> Result<Vec<f64>, PreprocessError> {
        self.load(raw)
    }
}
