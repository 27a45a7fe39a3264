//! Image decoding and tensor preparation

use image::imageops::FilterType;
use image::RgbImage;

use super::ModelError;

/// Decode an uploaded image of any supported format into RGB8
pub fn decode(bytes: &[u8]) -> Result<RgbImage, ModelError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

/// Resize to `size`x`size` and flatten to NHWC floats in `[0, 1]`
#[cfg_attr(not(feature = "tensorflow"), allow(dead_code))]
pub fn to_input_tensor(image: &RgbImage, size: u32) -> Vec<f32> {
    let resized = image::imageops::resize(image, size, size, FilterType::Triangle);

    resized
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(|channel| f32::from(channel) / 255.0)
        .collect()
}
