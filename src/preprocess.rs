//! Tensor preprocessing for classifier input.
//!
//! Turns a decoded RGB image into the normalized (1, 3, 224, 224) tensor the
//! network expects. The step order is fixed: resize, scale to [0, 1],
//! per-channel ImageNet normalization, leading batch dimension.

use burn::tensor::{backend::Backend, Tensor};
use image::{imageops::FilterType, RgbImage};

use crate::error::{Error, Result};

/// Model input edge length in pixels.
pub const IMAGE_SIZE: u32 = 224;

/// ImageNet normalization mean values (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Resize an image to the model input size.
///
/// Triangle (bilinear) filtering matches the resize the weights were trained
/// with; a different filter shifts the numeric output and the classification.
fn resize_image(image: &RgbImage) -> RgbImage {
    image::imageops::resize(image, IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle)
}

/// Normalize an image to a flat vector with ImageNet normalization.
/// Returns CHW layout: [C, H, W] flattened.
pub fn to_normalized_chw(image: &RgbImage) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let num_pixels = (width * height) as usize;

    // Pre-allocate for CHW layout
    let mut normalized = vec![0.0f32; 3 * num_pixels];

    for (i, pixel) in image.pixels().enumerate() {
        let r = (pixel[0] as f32 / 255.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let g = (pixel[1] as f32 / 255.0 - IMAGENET_MEAN[1]) / IMAGENET_STD[1];
        let b = (pixel[2] as f32 / 255.0 - IMAGENET_MEAN[2]) / IMAGENET_STD[2];

        // CHW layout: all R values, then all G values, then all B values
        normalized[i] = r;
        normalized[num_pixels + i] = g;
        normalized[2 * num_pixels + i] = b;
    }

    normalized
}

/// Preprocess a decoded RGB image into the model input tensor.
///
/// Output shape is (1, 3, 224, 224) regardless of the original dimensions.
pub fn preprocess<B: Backend>(image: &RgbImage, device: &B::Device) -> Result<Tensor<B, 4>> {
    let resized = resize_image(image);
    let pixels = to_normalized_chw(&resized);

    let size = IMAGE_SIZE as usize;
    let expected = 3 * size * size;
    if pixels.len() != expected {
        return Err(Error::Preprocess(format!(
            "normalized buffer has {} elements, expected {}",
            pixels.len(),
            expected
        )));
    }

    Ok(Tensor::<B, 1>::from_floats(pixels.as_slice(), device).reshape([1, 3, size, size]))
}
