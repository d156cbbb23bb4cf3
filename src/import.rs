//! Turning dropped or picked files into image cards.

#[cfg(test)]
#[path = "import_test.rs"]
mod import_test;

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use canvas::consts::IMAGE_CARD_MIN_WIDTH;
use canvas::doc::NewCard;
use canvas::geom::Size;

/// Widest initial display width of an imported image.
pub const IMAGE_IMPORT_MAX_WIDTH: f64 = 300.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("{mime:?} is not an image; only images can be added to the board")]
    NotAnImage { mime: String },
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("image file is empty")]
    NoData,
}

/// An image handed over by a file picker or drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageImport {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub intrinsic_width: u32,
    pub intrinsic_height: u32,
}

impl ImageImport {
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>, intrinsic_width: u32, intrinsic_height: u32) -> Self {
        Self { bytes, mime: mime.into(), intrinsic_width, intrinsic_height }
    }

    /// Check that this is a non-empty image with real dimensions.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImportError`] that applies.
    pub fn validate(&self) -> Result<(), ImportError> {
        if !self.mime.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(ImportError::NotAnImage { mime: self.mime.clone() });
        }
        if self.intrinsic_width == 0 || self.intrinsic_height == 0 {
            return Err(ImportError::EmptyImage { width: self.intrinsic_width, height: self.intrinsic_height });
        }
        if self.bytes.is_empty() {
            return Err(ImportError::NoData);
        }
        Ok(())
    }

    #[must_use]
    pub fn natural_size(&self) -> Size {
        Size::new(f64::from(self.intrinsic_width), f64::from(self.intrinsic_height))
    }

    /// `data:<mime>;base64,<bytes>`.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime.trim(), STANDARD.encode(&self.bytes))
    }

    /// Validate and build the card payload.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when [`ImageImport::validate`] fails.
    pub fn into_new_card(self) -> Result<NewCard, ImportError> {
        self.validate()?;
        let natural = self.natural_size();
        Ok(NewCard::image(self.data_url(), natural).with_size(display_size(natural)))
    }
}

/// Initial on-board size for an image of `natural` pixels: at most
/// [`IMAGE_IMPORT_MAX_WIDTH`] wide, never narrower than the image minimum,
/// ratio preserved.
#[must_use]
pub fn display_size(natural: Size) -> Size {
    let Some(aspect) = natural.aspect() else {
        return Size::new(IMAGE_CARD_MIN_WIDTH, IMAGE_CARD_MIN_WIDTH);
    };
    let width = natural.width.clamp(IMAGE_CARD_MIN_WIDTH, IMAGE_IMPORT_MAX_WIDTH);
    Size::new(width, width / aspect)
}

/// MIME type guessed from a file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}
