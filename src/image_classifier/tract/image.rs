use crate::image_classifier::model_descriptor::{PixelNormalization, TensorLayout};
use image::{imageops, DynamicImage, RgbImage};
use tract_onnx::prelude::*;

/// Scales the image into `width` x `height`, padding with black to keep the aspect ratio.
pub fn letterbox(image: &DynamicImage, width: u32, height: u32) -> RgbImage {
    if image.width() == 0 || image.height() == 0 {
        return RgbImage::new(width, height);
    }

    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (width as f32 / w).min(height as f32 / h);
    let new_w = ((w * scale).round() as u32).clamp(1, width);
    let new_h = ((h * scale).round() as u32).clamp(1, height);

    let scaled = image
        .resize_exact(new_w, new_h, imageops::FilterType::Triangle)
        .to_rgb8();

    if new_w == width && new_h == height {
        return scaled;
    }

    let mut padded = RgbImage::new(width, height);
    let x_offset = (width - new_w) / 2;
    let y_offset = (height - new_h) / 2;
    imageops::replace(&mut padded, &scaled, x_offset as i64, y_offset as i64);
    padded
}

pub fn image_to_tensor(
    rgb: &RgbImage,
    layout: TensorLayout,
    normalization: PixelNormalization,
) -> Tensor {
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    let value = |x: usize, y: usize, c: usize| normalization.apply(rgb.get_pixel(x as u32, y as u32)[c]);

    match layout {
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
                value(x, y, c)
            })
            .into_tensor()
        }
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
                value(x, y, c)
            })
            .into_tensor()
        }
    }
}

pub fn prepare_input(
    image: &DynamicImage,
    input_shape: (u32, u32),
    layout: TensorLayout,
    normalization: PixelNormalization,
) -> Tensor {
    let (width, height) = input_shape;
    image_to_tensor(&letterbox(image, width, height), layout, normalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    #[test]
    fn test_letterbox_square_is_plain_resize() {
        let rgb = letterbox(&solid(100, 100, [255, 0, 0]), 32, 32);

        assert_eq!(rgb.dimensions(), (32, 32));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_letterbox_wide_image_is_padded_vertically() {
        let rgb = letterbox(&solid(200, 100, [0, 255, 0]), 32, 32);

        assert_eq!(rgb.dimensions(), (32, 32));
        assert_eq!(rgb.get_pixel(16, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(16, 16), &Rgb([0, 255, 0]));
    }

    #[test]
    fn test_tensor_shape_follows_layout() {
        let rgb = letterbox(&solid(20, 10, [255, 0, 0]), 4, 2);

        let nchw = image_to_tensor(&rgb, TensorLayout::Nchw, PixelNormalization::ZeroToOne);
        let nhwc = image_to_tensor(&rgb, TensorLayout::Nhwc, PixelNormalization::ZeroToOne);

        assert_eq!(nchw.shape(), &[1, 3, 2, 4]);
        assert_eq!(nhwc.shape(), &[1, 2, 4, 3]);
        let values = nchw.as_slice::<f32>().unwrap();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[8], 0.0);
    }
}
