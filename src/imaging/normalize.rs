//! 上传图片归一化
//!
//! 上传的原始图片在入库前统一处理：按 EXIF 方向信息纠正旋转、
//! 等比压缩到边界以内、重编码。版式（横版/竖版）由处理后的
//! 最终像素尺寸推导，不信任客户端提交的任何元数据。

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::metadata::Orientation as ExifOrientation;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageError, ImageFormat, ImageReader};
use serde::Serialize;

use crate::error::{Error, Result};

/// 归一化后图片允许的最长边
pub const MAX_DIMENSION: u32 = 1200;

/// JPEG 重编码质量
const JPEG_QUALITY: u8 = 70;

/// 图片版式
///
/// 高严格大于宽为竖版，正方形算横版。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn classify(width: u32, height: u32) -> Self {
        if height > width {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// 归一化结果，字节尚未落盘
#[derive(Debug)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub format: ImageFormat,
}

/// 归一化一张上传图片
///
/// 解码、按 EXIF 纠正旋转、压缩到 [`MAX_DIMENSION`] 以内、重编码。
/// 字节不是可识别的图片格式时返回 [`Error::Decode`]，此时不产生
/// 任何输出字节。
pub fn normalize(raw: &[u8]) -> Result<NormalizedImage> {
    let reader = ImageReader::new(Cursor::new(raw)).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| Error::Decode(unknown_format_error()))?;

    let mut decoder = reader.into_decoder()?;
    // EXIF 读取是尽力而为：读不到或读坏了都按"无需纠正"处理
    let exif = decoder
        .orientation()
        .unwrap_or(ExifOrientation::NoTransforms);
    let image = DynamicImage::from_decoder(decoder)?;

    let image = correct_rotation(image, exif);
    let image = downsample(image);

    let (width, height) = image.dimensions();
    let orientation = Orientation::classify(width, height);
    let bytes = encode(&image, format)?;

    Ok(NormalizedImage {
        bytes,
        width,
        height,
        orientation,
        format,
    })
}

/// 按 EXIF 方向值纠正旋转
///
/// 只处理三种纯旋转（EXIF 3/6/8），翻转类和其余取值保持原样。
fn correct_rotation(image: DynamicImage, exif: ExifOrientation) -> DynamicImage {
    match exif {
        ExifOrientation::Rotate180 => image.rotate180(),
        ExifOrientation::Rotate90 => image.rotate90(),
        ExifOrientation::Rotate270 => image.rotate270(),
        _ => image,
    }
}

/// 超出边界时等比缩小，不放大
fn downsample(image: DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        image.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        image
    }
}

/// 重编码为原始格式，JPEG 用固定质量 70
fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            image.to_rgb8().write_with_encoder(encoder)?;
        }
        _ => image.write_to(&mut buf, format)?,
    }
    Ok(buf.into_inner())
}

fn unknown_format_error() -> ImageError {
    ImageError::Unsupported(UnsupportedError::from_format_and_kind(
        ImageFormatHint::Unknown,
        UnsupportedErrorKind::Format(ImageFormatHint::Unknown),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::new_rgb8(width, height);
        let mut buf = Cursor::new(Vec::new());
        image
            .write_to(&mut buf, ImageFormat::Png)
            .expect("编码测试图片失败");
        buf.into_inner()
    }

    #[test]
    fn test_normalize_caps_oversize_image() {
        let result = normalize(&png_bytes(3000, 1500)).expect("归一化失败");

        assert!(result.width.max(result.height) <= MAX_DIMENSION);
        // 等比缩放，允许一个像素的舍入误差
        assert_eq!(result.width, 1200);
        assert!((i64::from(result.height) - 600).abs() <= 1);
        assert_eq!(result.orientation, Orientation::Horizontal);
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn test_normalize_never_upscales() {
        let result = normalize(&png_bytes(800, 600)).expect("归一化失败");

        assert_eq!((result.width, result.height), (800, 600));
    }

    #[test]
    fn test_normalize_vertical_classification() {
        let result = normalize(&png_bytes(600, 900)).expect("归一化失败");

        assert_eq!(result.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_normalize_rejects_undecodable_bytes() {
        let err = normalize(b"definitely not an image").unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_rotation_swaps_dimensions() {
        // EXIF 6 → 顺时针 90 度，400x600 变 600x400
        let image = DynamicImage::new_rgb8(400, 600);
        let rotated = correct_rotation(image, ExifOrientation::Rotate90);

        assert_eq!(rotated.dimensions(), (600, 400));
        // 版式按旋转后的尺寸重新判定
        assert_eq!(Orientation::classify(600, 400), Orientation::Horizontal);
    }

    #[test]
    fn test_rotation_180_keeps_dimensions() {
        let image = DynamicImage::new_rgb8(400, 600);
        let rotated = correct_rotation(image, ExifOrientation::Rotate180);

        assert_eq!(rotated.dimensions(), (400, 600));
    }

    #[test]
    fn test_flips_are_left_untouched() {
        let image = DynamicImage::new_rgb8(400, 600);
        let same = correct_rotation(image, ExifOrientation::FlipHorizontal);

        assert_eq!(same.dimensions(), (400, 600));
    }

    #[test]
    fn test_square_counts_as_horizontal() {
        assert_eq!(Orientation::classify(500, 500), Orientation::Horizontal);
    }
}
