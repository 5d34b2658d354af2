//! Upload Decoding
//!
//! Uploaded files arrive as data URLs (`data:<mime>;base64,<payload>`).
//! They are decoded into 8-bit grayscale images resized to the model input
//! size, which is what every [`Predictor`](super::Predictor) receives.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

/// Errors raised while turning an upload into a model input
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Not a data URL")]
    NotDataUrl,

    #[error("Data URL is not base64-encoded")]
    NotBase64Encoded,

    #[error("Invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Empty payload")]
    Empty,

    #[error("Unsupported image: {0}")]
    Image(#[from] image::ImageError),
}

/// A parsed data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    /// MIME type as declared by the browser; may be empty
    pub mime: String,
    pub payload: Vec<u8>,
}

impl DataUrl {
    pub fn parse(contents: &str) -> Result<Self, DecodeError> {
        let rest = contents
            .trim()
            .strip_prefix("data:")
            .ok_or(DecodeError::NotDataUrl)?;
        let (meta, data) = rest.split_once(',').ok_or(DecodeError::NotDataUrl)?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or(DecodeError::NotBase64Encoded)?;

        let payload = base64_decode(data)?;
        if payload.is_empty() {
            return Err(DecodeError::Empty);
        }

        Ok(Self {
            mime: mime.to_string(),
            payload,
        })
    }
}

/// Grayscale model input
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: GrayImage,
}

impl DecodedImage {
    /// Decode raw image bytes, convert to grayscale and resize to a
    /// `size` x `size` square.
    pub fn from_bytes(bytes: &[u8], size: u32) -> Result<Self, DecodeError> {
        let image = image::load_from_memory(bytes)?;
        let pixels = image
            .grayscale()
            .resize_exact(size, size, FilterType::Triangle)
            .to_luma8();
        Ok(Self { pixels })
    }

    /// Decode an uploaded data URL
    pub fn from_data_url(contents: &str, size: u32) -> Result<Self, DecodeError> {
        let url = DataUrl::parse(contents)?;
        tracing::debug!(mime = %url.mime, bytes = url.payload.len(), "Decoding upload");
        Self::from_bytes(&url.payload, size)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Row-major luma values
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Re-encode as PNG for transport to a model service
    pub fn to_png(&self) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(self.pixels.clone())
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        Ok(buf)
    }
}

/// Decode standard, padded base64. Line breaks and other ASCII whitespace
/// are skipped.
pub fn base64_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = input.split_ascii_whitespace().collect();
    Ok(STANDARD.decode(compact)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small RGB PNG wrapped in a data URL
    pub(crate) fn png_data_url(width: u32, height: u32) -> String {
        let image = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 20) as u8, (y * 20) as u8, 128])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(&buf))
    }

    #[test]
    fn test_base64_decode() {
        assert_eq!(base64_decode("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(base64_decode("aGVs\nbG8h").unwrap(), b"hello!");
        assert_eq!(base64_decode(" aGVs\r\nbG8h\n").unwrap(), b"hello!");
        assert_eq!(base64_decode("").unwrap(), b"");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(matches!(
            base64_decode("aGV*bG8="),
            Err(DecodeError::InvalidBase64(base64::DecodeError::InvalidByte(_, b'*')))
        ));
        assert!(base64_decode("aGVsbG8=x").is_err());
        assert!(base64_decode("a").is_err());
    }

    #[test]
    fn test_data_url_reports_bad_payload() {
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,iVBOR%w0K"),
            Err(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_data_url_parse() {
        let url = DataUrl::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(url.mime, "image/png");
        assert_eq!(url.payload, b"hello");

        assert!(matches!(
            DataUrl::parse("image/png;base64,aGVsbG8="),
            Err(DecodeError::NotDataUrl)
        ));
        assert!(matches!(
            DataUrl::parse("data:text/plain,hello"),
            Err(DecodeError::NotBase64Encoded)
        ));
        assert!(matches!(
            DataUrl::parse("data:image/png;base64,"),
            Err(DecodeError::Empty)
        ));
    }

    #[test]
    fn test_decode_resizes_to_grayscale_square() {
        let image = DecodedImage::from_data_url(&png_data_url(12, 7), 32).unwrap();
        assert_eq!(image.width(), 32);
        assert_eq!(image.height(), 32);
        assert_eq!(image.pixels().len(), 32 * 32);
    }

    #[test]
    fn test_decode_rejects_non_image() {
        let contents = format!("data:image/png;base64,{}", STANDARD.encode(b"not an image"));
        assert!(matches!(
            DecodedImage::from_data_url(&contents, 32),
            Err(DecodeError::Image(_))
        ));
    }

    #[test]
    fn test_png_reencode() {
        let image = DecodedImage::from_data_url(&png_data_url(4, 4), 8).unwrap();
        let png = image.to_png().unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), ImageFormat::Png);

        let reloaded = DecodedImage::from_bytes(&png, 8).unwrap();
        assert_eq!(reloaded.width(), 8);
        assert_eq!(reloaded.pixels().len(), image.pixels().len());
    }
}
