use chatlate_types::{ColorThreshold, Resolution, Rgb, Roi};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::PipelineError;
use crate::types::{PreprocessedImage, RawFrame};

const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    Foreground,
    Background,
}

impl PixelClass {
    fn to_rgba(self) -> Rgba<u8> {
        match self {
            PixelClass::Foreground => FOREGROUND,
            PixelClass::Background => BACKGROUND,
        }
    }
}

/// Classify one pixel against the chat font color band
pub fn classify(pixel: Rgb, threshold: &ColorThreshold) -> PixelClass {
    if threshold.matches(pixel) {
        PixelClass::Foreground
    } else {
        PixelClass::Background
    }
}

/// Scale a captured frame to the reference resolution, crop the chat region and
/// binarize it so OCR sees white text on black.
///
/// Scaling happens before cropping so ROI coordinates stay valid across
/// physical screen resolutions. A ROI that does not fit the scaled frame is
/// reported, never clamped.
pub fn preprocess(
    frame: RawFrame,
    reference: Resolution,
    roi: Roi,
    threshold: &ColorThreshold,
) -> Result<PreprocessedImage, PipelineError> {
    let image = decode(frame)?;
    let scaled = scale_to_fit(image, reference);

    let bounds = Resolution {
        width: scaled.width(),
        height: scaled.height(),
    };
    if !roi.fits_within(bounds) {
        return Err(PipelineError::RegionOutOfBounds { roi, bounds });
    }

    let cropped = imageops::crop_imm(&scaled, roi.x, roi.y, roi.width, roi.height).to_image();
    Ok(PreprocessedImage::new(binarize(&cropped, threshold)))
}

fn decode(frame: RawFrame) -> Result<RgbaImage, PipelineError> {
    let RawFrame {
        data,
        width,
        height,
    } = frame;

    if width == 0 || height == 0 {
        return Err(PipelineError::CaptureFormat(format!(
            "empty frame ({width}x{height})"
        )));
    }

    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(PipelineError::CaptureFormat(format!(
            "expected {expected} RGBA bytes for {width}x{height}, got {}",
            data.len()
        )));
    }

    RgbaImage::from_raw(width, height, data).ok_or_else(|| {
        PipelineError::CaptureFormat(format!("cannot build {width}x{height} bitmap"))
    })
}

/// Size of a `width` x `height` frame scaled to fit inside `reference`, aspect ratio kept.
///
/// Integer math keeps frames with the reference aspect ratio exact.
pub fn scaled_size(width: u32, height: u32, reference: Resolution) -> (u32, u32) {
    let (w, h) = (width as u64, height as u64);
    let (rw, rh) = (reference.width as u64, reference.height as u64);

    let (out_w, out_h) = if w * rh >= h * rw {
        (rw, (h * rw + w / 2) / w)
    } else {
        ((w * rh + h / 2) / h, rh)
    };

    (out_w.max(1) as u32, out_h.max(1) as u32)
}

fn scale_to_fit(image: RgbaImage, reference: Resolution) -> RgbaImage {
    let (width, height) = scaled_size(image.width(), image.height(), reference);
    if (width, height) == image.dimensions() {
        return image;
    }

    tracing::trace!(
        "Scaling frame {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    imageops::resize(&image, width, height, FilterType::Triangle)
}

fn binarize(image: &RgbaImage, threshold: &ColorThreshold) -> RgbaImage {
    let mut output = RgbaImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let class = classify(Rgb::new(pixel[0], pixel[1], pixel[2]), threshold);
        output.put_pixel(x, y, class.to_rgba());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_box_frame(width: u32, height: u32, roi: Roi) -> RawFrame {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            let inside = x >= roi.x
                && x < roi.x + roi.width
                && y >= roi.y
                && y < roi.y + roi.height;
            if inside {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        RawFrame::from_rgba(image)
    }

    fn exact_white() -> ColorThreshold {
        ColorThreshold {
            reference: Rgb::new(255, 255, 255),
            offset: 0,
        }
    }

    #[test]
    fn test_classify_boundaries() {
        let threshold = ColorThreshold {
            reference: Rgb::new(120, 120, 120),
            offset: 15,
        };

        assert_eq!(
            classify(Rgb::new(120, 120, 120), &threshold),
            PixelClass::Foreground
        );
        assert_eq!(
            classify(Rgb::new(135, 105, 135), &threshold),
            PixelClass::Foreground
        );
        assert_eq!(
            classify(Rgb::new(136, 120, 120), &threshold),
            PixelClass::Background
        );
        assert_eq!(
            classify(Rgb::new(120, 104, 120), &threshold),
            PixelClass::Background
        );
    }

    #[test]
    fn test_white_box_crop_is_all_white() {
        let roi = Roi::default();
        let frame = white_box_frame(1920, 1080, roi);

        let result = preprocess(frame, Resolution::default(), roi, &exact_white()).unwrap();

        assert_eq!((result.width(), result.height()), (550, 160));
        assert!(result.as_rgba().pixels().all(|p| *p == FOREGROUND));
    }

    #[test]
    fn test_output_is_strictly_binary() {
        let image = RgbaImage::from_fn(64, 36, |x, y| {
            Rgba([(x * 4) as u8, (y * 7) as u8, ((x + y) * 3) as u8, 128])
        });
        let roi = Roi {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        };

        let result = preprocess(
            RawFrame::from_rgba(image),
            Resolution::default(),
            roi,
            &ColorThreshold::default(),
        )
        .unwrap();

        assert!(
            result
                .as_rgba()
                .pixels()
                .all(|p| *p == FOREGROUND || *p == BACKGROUND)
        );
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let image = RgbaImage::from_fn(1280, 720, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8, 255])
        });
        let frame = RawFrame::from_rgba(image);
        let threshold = ColorThreshold::default();

        let first =
            preprocess(frame.clone(), Resolution::default(), Roi::default(), &threshold).unwrap();
        let second = preprocess(frame, Resolution::default(), Roi::default(), &threshold).unwrap();

        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_matching_aspect_ratio_crops_exact_size() {
        let roi = Roi::default();
        for (width, height) in [(1280, 720), (3840, 2160), (2560, 1440), (960, 540), (1920, 1080)]
        {
            let frame = RawFrame::from_rgba(RgbaImage::new(width, height));
            let result =
                preprocess(frame, Resolution::default(), roi, &ColorThreshold::default()).unwrap();

            assert_eq!(
                (result.width(), result.height()),
                (roi.width, roi.height),
                "source {width}x{height}"
            );
        }
    }

    #[test]
    fn test_scaled_size_keeps_aspect_ratio() {
        let reference = Resolution::default();

        assert_eq!(scaled_size(3840, 2160, reference), (1920, 1080));
        assert_eq!(scaled_size(1280, 720, reference), (1920, 1080));
        // 4:3 is limited by height
        assert_eq!(scaled_size(1024, 768, reference), (1440, 1080));
        // ultrawide is limited by width
        assert_eq!(scaled_size(3440, 1440, reference), (1920, 804));
    }

    #[test]
    fn test_roi_outside_scaled_frame_is_rejected() {
        // 4:3 scales to 1440x1080, so a ROI reaching x=1500 no longer fits
        let frame = RawFrame::from_rgba(RgbaImage::new(1024, 768));
        let roi = Roi {
            x: 1000,
            y: 0,
            width: 500,
            height: 100,
        };

        let err =
            preprocess(frame, Resolution::default(), roi, &ColorThreshold::default()).unwrap_err();

        match err {
            PipelineError::RegionOutOfBounds { bounds, .. } => {
                assert_eq!(bounds.width, 1440);
                assert_eq!(bounds.height, 1080);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_truncated_buffer_is_capture_format_error() {
        let frame = RawFrame::new(10, 10, vec![0; 399]);

        let err = preprocess(
            frame,
            Resolution::default(),
            Roi::default(),
            &ColorThreshold::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::CaptureFormat(_)));
    }

    #[test]
    fn test_empty_frame_is_capture_format_error() {
        let frame = RawFrame::new(0, 1080, Vec::new());

        let err = preprocess(
            frame,
            Resolution::default(),
            Roi::default(),
            &ColorThreshold::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::CaptureFormat(_)));
    }
}
