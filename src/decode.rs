//! Image decoding for the analysis pipeline.
//!
//! Accepts the input encodings callers actually send (raw bytes, base64 data
//! URIs, byte streams, already-decoded images) and produces a canonical RGB
//! image. Purely an in-memory transform; no disk I/O.

use std::io::Read;

use base64::Engine;
use image::{DynamicImage, RgbImage};

use crate::error::{Error, Result};

/// Image input in one of the supported encodings.
pub enum ImageInput {
    /// Raw image container bytes (PNG, JPEG, ...)
    Bytes(Vec<u8>),
    /// Base64 data URI (`"data:image/...;base64,<payload>"`)
    DataUri(String),
    /// Byte-stream handle, e.g. an uploaded file
    Reader(Box<dyn Read + Send>),
    /// Already-decoded image
    Decoded(DynamicImage),
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageInput::Bytes(bytes) => write!(f, "ImageInput::Bytes({} bytes)", bytes.len()),
            ImageInput::DataUri(uri) => write!(f, "ImageInput::DataUri({} chars)", uri.len()),
            ImageInput::Reader(_) => write!(f, "ImageInput::Reader"),
            ImageInput::Decoded(image) => write!(
                f,
                "ImageInput::Decoded({}x{})",
                image.width(),
                image.height()
            ),
        }
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        ImageInput::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageInput {
    fn from(bytes: &[u8]) -> Self {
        ImageInput::Bytes(bytes.to_vec())
    }
}

impl From<DynamicImage> for ImageInput {
    fn from(image: DynamicImage) -> Self {
        ImageInput::Decoded(image)
    }
}

/// Decode an image input into RGB color mode.
///
/// Images in any other color mode (grayscale, indexed palette) are converted
/// to RGB.
pub fn decode(input: ImageInput) -> Result<RgbImage> {
    let image = match input {
        ImageInput::Bytes(bytes) => image::load_from_memory(&bytes)?,
        ImageInput::DataUri(uri) => {
            if !uri.starts_with("data:image") {
                return Err(Error::Decode("not an image data URI".to_string()));
            }
            // Payload sits after the first comma; the header before it is ignored
            let payload = uri
                .split_once(',')
                .map(|(_, payload)| payload)
                .ok_or_else(|| Error::Decode("data URI has no comma separator".to_string()))?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(payload)
                .map_err(|e| Error::Decode(format!("invalid base64 payload: {e}")))?;
            image::load_from_memory(&bytes)?
        }
        ImageInput::Reader(mut reader) => {
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .map_err(|e| Error::Decode(format!("failed to read image stream: {e}")))?;
            image::load_from_memory(&bytes)?
        }
        ImageInput::Decoded(image) => image,
    };

    Ok(image.to_rgb8())
}
