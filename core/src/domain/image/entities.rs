use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageMediaType {
    Jpeg,
    Png,
    Webp,
}

impl ImageMediaType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageMediaType::Jpeg),
            "image/png" => Some(ImageMediaType::Png),
            "image/webp" => Some(ImageMediaType::Webp),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageMediaType::Jpeg => "image/jpeg",
            ImageMediaType::Png => "image/png",
            ImageMediaType::Webp => "image/webp",
        }
    }

    /// Detects the format from the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageMediaType::Jpeg)
        } else if data.starts_with(&PNG_SIGNATURE) {
            Some(ImageMediaType::Png)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(ImageMediaType::Webp)
        } else {
            None
        }
    }
}

/// An uploaded image as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl RawImage {
    pub fn new(filename: Option<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            data,
        }
    }
}

/// Canonical form of an image, shared by the fingerprint and the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub filename: String,
    pub media_type: ImageMediaType,
    pub base64: String,
    pub size_bytes: usize,
}

impl NormalizedImage {
    pub fn from_bytes(filename: String, media_type: ImageMediaType, data: &[u8]) -> Self {
        Self {
            filename,
            media_type,
            base64: general_purpose::STANDARD.encode(data),
            size_bytes: data.len(),
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type.as_mime(), self.base64)
    }
}
