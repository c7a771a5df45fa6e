use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::{debug, instrument, warn};

use crate::errors::ServiceError;

/// Longest side, in pixels, of a converted image.
pub const MAX_DIMENSION: u32 = 256;

/// Target size for a `width` x `height` image.
///
/// Images already within `MAX_DIMENSION` on both sides keep their size.
/// Otherwise the longer side becomes `MAX_DIMENSION` and the shorter one is
/// scaled to match, never dropping below one pixel. Square images become
/// `MAX_DIMENSION` x `MAX_DIMENSION`.
pub fn fit_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return (width, height);
    }
    let scale = |short: u32, long: u32| {
        let scaled = u64::from(short) * u64::from(MAX_DIMENSION) / u64::from(long);
        (scaled as u32).max(1)
    };
    if width < height {
        (scale(width, height), MAX_DIMENSION)
    } else if height < width {
        (MAX_DIMENSION, scale(height, width))
    } else {
        (MAX_DIMENSION, MAX_DIMENSION)
    }
}

pub fn decode_jpeg(body: &[u8]) -> Result<DynamicImage, ServiceError> {
    image::load_from_memory_with_format(body, ImageFormat::Jpeg).map_err(|e| {
        warn!(error = %e, bytes = body.len(), "failed to decode jpeg");
        ServiceError::ImageDecode(e.to_string())
    })
}

/// Nearest-neighbour scale into the bounds given by [`fit_dimensions`].
pub fn resize_to_fit(img: DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = fit_dimensions(width, height);
    if (new_width, new_height) == (width, height) {
        return img;
    }
    img.resize_exact(new_width, new_height, FilterType::Nearest)
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, ServiceError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ServiceError::ImageEncode(e.to_string()))?;
    Ok(buf)
}

/// Decode a JPEG body, shrink it to fit and re-encode it as PNG.
#[instrument(level = "debug", skip_all, fields(bytes = body.len()))]
pub fn process_image(body: &[u8]) -> Result<Vec<u8>, ServiceError> {
    let img = decode_jpeg(body)?;
    let (width, height) = img.dimensions();
    let resized = resize_to_fit(img);
    let (new_width, new_height) = resized.dimensions();
    debug!(width, height, new_width, new_height, "image resized");
    encode_png(&resized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_of(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    #[test]
    fn fit_dimensions_keeps_aspect_ratio() {
        let cases = [
            // already within bounds
            ((100, 100), (100, 100)),
            ((256, 256), (256, 256)),
            // short side never drops below one pixel
            ((1, 1000), (1, 256)),
            ((1000, 1), (256, 1)),
            ((500, 1000), (128, 256)),
            ((1000, 500), (256, 128)),
            ((300, 300), (256, 256)),
            ((257, 10), (256, 9)),
        ];
        for ((w, h), expected) in cases {
            assert_eq!(fit_dimensions(w, h), expected, "{w}x{h}");
        }
    }

    #[test]
    fn resize_returns_small_images_untouched() {
        let img = resize_to_fit(DynamicImage::new_rgba8(100, 40));
        assert_eq!(img.dimensions(), (100, 40));
    }

    #[test]
    fn resize_scales_large_images() {
        let img = resize_to_fit(DynamicImage::new_rgba8(500, 1000));
        assert_eq!(img.dimensions(), (128, 256));
    }

    #[test]
    fn empty_body_fails_decoding() {
        assert!(matches!(process_image(b""), Err(ServiceError::ImageDecode(_))));
    }

    #[test]
    fn png_body_fails_decoding() {
        let img = DynamicImage::new_rgba8(300, 300);
        let png = encode_png(&img).unwrap();
        assert!(matches!(process_image(&png), Err(ServiceError::ImageDecode(_))));
    }

    #[test]
    fn jpeg_is_converted_to_bounded_png() {
        let out = process_image(&jpeg_of(500, 1000)).unwrap();
        let png = image::load_from_memory_with_format(&out, ImageFormat::Png).unwrap();
        assert_eq!(png.dimensions(), (128, 256));
    }

    #[test]
    fn small_jpeg_keeps_its_size() {
        let out = process_image(&jpeg_of(64, 32)).unwrap();
        let png = image::load_from_memory_with_format(&out, ImageFormat::Png).unwrap();
        assert_eq!(png.dimensions(), (64, 32));
    }
}
