use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::fmt;

/// One still image taken from the camera feed, JPEG encoded for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedFrame")
            .field("jpeg", &format_args!("<{} bytes>", self.jpeg.len()))
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    EmptyCanvas,
    Encode(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::EmptyCanvas => write!(f, "canvas has zero area"),
            FrameError::Encode(msg) => write!(f, "encode error: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<image::ImageError> for FrameError {
    fn from(err: image::ImageError) -> Self {
        FrameError::Encode(err.to_string())
    }
}

/// Draws `video_frame` stretched onto a `canvas_width` x `canvas_height`
/// canvas and encodes the canvas as JPEG at `quality` (1..=100).
pub fn capture_frame(
    video_frame: &DynamicImage,
    canvas_width: u32,
    canvas_height: u32,
    quality: u8,
) -> Result<CapturedFrame, FrameError> {
    if canvas_width == 0 || canvas_height == 0 {
        return Err(FrameError::EmptyCanvas);
    }

    let canvas = if video_frame.width() == canvas_width && video_frame.height() == canvas_height {
        video_frame.to_rgb8()
    } else {
        video_frame
            .resize_exact(canvas_width, canvas_height, FilterType::Triangle)
            .to_rgb8()
    };

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));
    canvas.write_with_encoder(encoder)?;

    Ok(CapturedFrame {
        jpeg,
        width: canvas_width,
        height: canvas_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_frame_is_scaled_to_canvas() {
        let video = DynamicImage::ImageRgb8(RgbImage::from_pixel(1280, 720, Rgb([10, 200, 30])));

        let frame = capture_frame(&video, 640, 480, 95).unwrap();

        assert_eq!(&frame.jpeg[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory_with_format(&frame.jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 480));
    }

    #[test]
    fn test_alpha_is_dropped() {
        let video = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 48, Rgba([1, 2, 3, 0])));

        let frame = capture_frame(&video, 64, 48, 95).unwrap();

        assert!(!frame.jpeg.is_empty());
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        let video = DynamicImage::ImageRgb8(RgbImage::new(4, 4));

        assert_eq!(
            capture_frame(&video, 0, 480, 95).err(),
            Some(FrameError::EmptyCanvas)
        );
    }

    #[test]
    fn test_debug_hides_bytes() {
        let frame = CapturedFrame {
            jpeg: vec![0; 1024],
            width: 1,
            height: 1,
        };

        assert!(format!("{:?}", frame).contains("<1024 bytes>"));
    }
}
