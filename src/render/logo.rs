//! Optional logo resolution.
//!
//! A missing or corrupt logo never blocks rendering: resolution always
//! yields a [`Branding`], falling back to the company name in bold text.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Logo as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogoSource {
    /// Raw file contents plus the file extension ("png", "jpg", …).
    Bytes { data: Vec<u8>, extension: String },
    /// `data:image/png;base64,....` string, or a bare base64 payload.
    DataUri(String),
}

impl LogoSource {
    /// Read a logo file; the extension is taken from the path.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        Ok(Self::Bytes { data, extension })
    }
}

/// Image formats recognized by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
}

impl ImageKind {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, b'P', b'N', b'G', ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [b'G', b'I', b'F', b'8', ..] => Some(Self::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some(Self::Webp),
            [b'B', b'M', ..] => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    fn default_extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }
}

/// A decoded logo that passed the signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoImage {
    pub bytes: Vec<u8>,
    pub extension: String,
    pub kind: ImageKind,
}

impl LogoImage {
    /// Inline `data:` URI for markup output.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.kind.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// What goes in the top-left corner of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branding {
    Image(LogoImage),
    /// Company name rendered as bold text.
    FallbackText(String),
}

impl Branding {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

/// Resolve an optional logo into branding, silently substituting text.
pub fn resolve_branding(logo: Option<&LogoSource>, company_name: &str) -> Branding {
    let fallback = || Branding::FallbackText(company_name.to_string());
    let Some(source) = logo else {
        return fallback();
    };

    let (bytes, extension) = match source {
        LogoSource::Bytes { data, extension } => (data.clone(), extension.to_ascii_lowercase()),
        LogoSource::DataUri(uri) => match decode_data_uri(uri) {
            Some(decoded) => decoded,
            None => {
                tracing::debug!("logo data URI is not valid base64, using company name");
                return fallback();
            }
        },
    };

    match ImageKind::sniff(&bytes) {
        Some(kind) => {
            let extension = if extension.is_empty() {
                kind.default_extension().to_string()
            } else {
                extension
            };
            Branding::Image(LogoImage {
                bytes,
                extension,
                kind,
            })
        }
        None => {
            tracing::debug!(len = bytes.len(), "logo is not a recognized image, using company name");
            fallback()
        }
    }
}

/// Split `data:image/{ext};base64,{payload}` and decode the payload.
fn decode_data_uri(uri: &str) -> Option<(Vec<u8>, String)> {
    let (header, payload) = match uri.split_once(',') {
        Some((header, payload)) => (header, payload),
        None => ("", uri),
    };
    let extension = header
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split(';').next())
        .map(|ext| if ext == "jpeg" { "jpg" } else { ext })
        .unwrap_or_default()
        .to_ascii_lowercase();
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    Some((bytes, extension))
}
