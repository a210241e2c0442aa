//! Production imaging codec — pure Rust, statically linked.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, WebP, GIF, TIFF) | `image` crate |
//! | Flatten | alpha composite onto opaque white |
//! | Resize | `image::imageops` with a ratio-selected filter |
//! | Encode → JPEG | mozjpeg (optimized coding, optional progressive) |
//! | Encode → input format (`force: false`) | `image::write_to` |
//! | EXIF carry-over | img-parts segment splice |

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgb, RgbImage, imageops};
use img_parts::ImageEXIF;

use crate::codec::{CodecError, Dimensions, ImageCodec, RenderParams};
use crate::dimensions::TargetDimensions;
use crate::options::{Fit, JpegOptions};

const DEFAULT_JPEG_QUALITY: u8 = 80;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Formats the lenient decode path retries, and the formats `force: false`
/// may re-encode into.
const ENABLED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Tiff,
];

/// Pure Rust codec built on the `image` crate and mozjpeg.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode from memory, returning the image and the detected input format.
///
/// With `fail_on_error` unset, a failed guessed-format decode retries every
/// enabled decoder before reporting the original error.
fn decode(
    bytes: &[u8],
    fail_on_error: bool,
) -> Result<(DynamicImage, Option<ImageFormat>), CodecError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    let format = reader.format();

    match reader.decode() {
        Ok(img) => Ok((img, format)),
        Err(primary) if !fail_on_error => {
            for fallback in ENABLED_FORMATS.iter().copied() {
                if Some(fallback) == format {
                    continue;
                }
                if let Ok(img) = image::load_from_memory_with_format(bytes, fallback) {
                    tracing::debug!(?fallback, "lenient decode succeeded after format retry");
                    return Ok((img, Some(fallback)));
                }
            }
            Err(CodecError::Decode(primary.to_string()))
        }
        Err(e) => Err(CodecError::Decode(e.to_string())),
    }
}

/// Composite transparent pixels onto an opaque white background.
fn flatten_onto_white(img: DynamicImage) -> DynamicImage {
    if !img.color().has_alpha() {
        return img;
    }
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut canvas = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &rgba, 0, 0);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Complete a possibly-partial target using the source aspect ratio.
fn full_target(original: Dimensions, target: TargetDimensions) -> (u32, u32) {
    let aspect = original.width as f64 / original.height as f64;
    match (target.width, target.height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, ((w as f64 / aspect).round() as u32).max(1)),
        (None, Some(h)) => (((h as f64 * aspect).round() as u32).max(1), h),
        (None, None) => (original.width, original.height),
    }
}

/// Pick a resampling filter from the downscale ratio. Strong downscales get a
/// cheaper filter; near-1:1 resizes get Lanczos3.
fn select_filter(original: Dimensions, width: u32, height: u32) -> FilterType {
    let width_ratio = original.width as f64 / width as f64;
    let height_ratio = original.height as f64 / height as f64;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Scale uniformly by `scale`, rounding each axis and keeping a 1 px floor.
fn scale_uniform(img: &DynamicImage, scale: f64) -> DynamicImage {
    let (ow, oh) = img.dimensions();
    if scale >= 1.0 {
        return img.clone();
    }
    let width = ((ow as f64 * scale).round() as u32).max(1);
    let height = ((oh as f64 * scale).round() as u32).max(1);
    let filter = select_filter(
        Dimensions {
            width: ow,
            height: oh,
        },
        width,
        height,
    );
    img.resize_exact(width, height, filter)
}

/// Apply the fit policy with the no-enlargement cap (scale never exceeds 1.0).
fn resize_with_fit(img: &DynamicImage, target_w: u32, target_h: u32, fit: Fit) -> DynamicImage {
    let (ow, oh) = img.dimensions();
    let scale_w = target_w as f64 / ow as f64;
    let scale_h = target_h as f64 / oh as f64;

    match fit {
        Fit::Fill => {
            let width = target_w.min(ow);
            let height = target_h.min(oh);
            if (width, height) == (ow, oh) {
                img.clone()
            } else {
                let filter = select_filter(
                    Dimensions {
                        width: ow,
                        height: oh,
                    },
                    width,
                    height,
                );
                img.resize_exact(width, height, filter)
            }
        }
        Fit::Inside => scale_uniform(img, scale_w.min(scale_h).min(1.0)),
        Fit::Outside => scale_uniform(img, scale_w.max(scale_h).min(1.0)),
        Fit::Cover => {
            let resized = scale_uniform(img, scale_w.max(scale_h).min(1.0));
            let (rw, rh) = resized.dimensions();
            let crop_w = target_w.min(rw);
            let crop_h = target_h.min(rh);
            let x = (rw - crop_w) / 2;
            let y = (rh - crop_h) / 2;
            resized.crop_imm(x, y, crop_w, crop_h)
        }
        Fit::Contain => {
            let resized = scale_uniform(img, scale_w.min(scale_h).min(1.0));
            let (rw, rh) = resized.dimensions();
            if (rw, rh) == (target_w, target_h) {
                return resized;
            }
            // Letterbox onto a white canvas of exactly the target size.
            let mut canvas = RgbImage::from_pixel(target_w, target_h, WHITE);
            let x = (target_w.saturating_sub(rw)) / 2;
            let y = (target_h.saturating_sub(rh)) / 2;
            imageops::overlay(&mut canvas, &resized.to_rgb8(), x as i64, y as i64);
            DynamicImage::ImageRgb8(canvas)
        }
    }
}

/// Encode per the JPEG options: mozjpeg by default, the input format when
/// `force` is explicitly disabled for a non-JPEG source.
fn encode(
    img: &DynamicImage,
    input_format: Option<ImageFormat>,
    jpeg: JpegOptions,
) -> Result<Vec<u8>, CodecError> {
    if jpeg.force == Some(false) {
        if let Some(format) = input_format {
            if format != ImageFormat::Jpeg && ENABLED_FORMATS.contains(&format) {
                let mut out = Cursor::new(Vec::new());
                img.write_to(&mut out, format)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
                return Ok(out.into_inner());
            }
        }
    }

    encode_jpeg(
        img,
        jpeg.quality.unwrap_or(DEFAULT_JPEG_QUALITY),
        jpeg.progressive.unwrap_or(false),
    )
}

fn encode_jpeg(img: &DynamicImage, quality: u8, progressive: bool) -> Result<Vec<u8>, CodecError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality.clamp(1, 100) as f32);
    if progressive {
        comp.set_progressive_mode();
    }
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    comp.write_scanlines(rgb.as_raw())
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    comp.finish().map_err(|e| CodecError::Encode(e.to_string()))
}

/// Splice the source EXIF segment into the encoded output. Best effort: any
/// failure returns the output unchanged.
fn carry_exif(source: &[u8], output: Vec<u8>) -> Vec<u8> {
    let exif = match img_parts::DynImage::from_bytes(bytes::Bytes::copy_from_slice(source)) {
        Ok(Some(parsed)) => parsed.exif(),
        _ => None,
    };
    let Some(exif) = exif else {
        return output;
    };

    match img_parts::DynImage::from_bytes(bytes::Bytes::from(output.clone())) {
        Ok(Some(mut parsed)) => {
            parsed.set_exif(Some(exif));
            parsed.encoder().bytes().to_vec()
        }
        _ => {
            tracing::debug!("output format does not support EXIF, skipping metadata carry-over");
            output
        }
    }
}

impl ImageCodec for RustCodec {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, CodecError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?
            .into_dimensions()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, bytes: &[u8], params: &RenderParams) -> Result<Vec<u8>, CodecError> {
        let (img, input_format) = decode(bytes, params.fail_on_error)?;
        let img = flatten_onto_white(img);
        let (ow, oh) = img.dimensions();
        let (target_w, target_h) = full_target(
            Dimensions {
                width: ow,
                height: oh,
            },
            params.dimensions,
        );
        let resized = resize_with_fit(&img, target_w, target_h, params.fit);
        let encoded = encode(&resized, input_format, params.jpeg.unwrap_or_default())?;

        if params.with_metadata {
            Ok(carry_exif(bytes, encoded))
        } else {
            Ok(encoded)
        }
    }
}
