use image::imageops::FilterType;
use image::ImageFormat;
use ndarray::Array4;

use super::ClassifierError;

pub const INPUT_SIZE: u32 = 299;

/// Checks the magic bytes; the declared MIME type is not trusted here.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, ClassifierError> {
    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::WebP)) => Ok(format),
        _ => Err(ClassifierError::UnsupportedFormat),
    }
}

/// RGB, resized to 299x299, scaled to [0, 1], with a leading batch axis.
pub fn to_input_tensor(bytes: &[u8]) -> Result<Array4<f32>, ClassifierError> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let resized = image::imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom);

    let side = INPUT_SIZE as usize;
    Ok(Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    }))
}
