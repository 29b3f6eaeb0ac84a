//! Custom swatch files
//!
//! A user-supplied fabric image, read into memory so it can be previewed
//! and uploaded. Validation mirrors what `/upload-swatch` accepts.

use std::io::Cursor;
use std::path::Path;

use crate::{ClientError, ClientResult};

/// Content types accepted by the backend
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
/// Upload ceiling (5 MiB)
pub const MAX_SWATCH_BYTES: usize = 5 * 1024 * 1024;
/// Size reported when the image header cannot be decoded
pub const FALLBACK_DIMENSIONS: (u32, u32) = (400, 400);

/// An image file chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatchFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SwatchFile {
    /// Build from in-memory bytes; the content type is guessed from the name
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("swatch")
            .to_string();
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Reject files the backend would refuse anyway
    pub fn validate(&self) -> ClientResult<()> {
        if !ALLOWED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(ClientError::InvalidSwatch(format!(
                "Invalid file type: {}. Allowed: {}",
                self.content_type,
                ALLOWED_CONTENT_TYPES.join(", ")
            )));
        }
        if self.bytes.is_empty() {
            return Err(ClientError::InvalidSwatch("Empty file".to_string()));
        }
        if self.bytes.len() > MAX_SWATCH_BYTES {
            return Err(ClientError::InvalidSwatch(format!(
                "File too large: {:.1}MB. Maximum: {}MB",
                self.bytes.len() as f64 / 1024.0 / 1024.0,
                MAX_SWATCH_BYTES / 1024 / 1024
            )));
        }
        Ok(())
    }

    /// Natural pixel size, read from the image header only
    pub fn dimensions(&self) -> (u32, u32) {
        image::ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok())
            .unwrap_or(FALLBACK_DIMENSIONS)
    }

    pub(crate) fn to_form(&self) -> ClientResult<reqwest::multipart::Form> {
        let part = reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)?;
        Ok(reqwest::multipart::Form::new().part("file", part))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(SwatchFile::from_bytes("a.JPG", vec![1]).content_type, "image/jpeg");
        assert_eq!(SwatchFile::from_bytes("a.webp", vec![1]).content_type, "image/webp");
        assert_eq!(
            SwatchFile::from_bytes("notes", vec![1]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn validation_rules() {
        assert!(SwatchFile::from_bytes("s.png", png_bytes(2, 2)).validate().is_ok());
        assert!(matches!(
            SwatchFile::from_bytes("s.png", vec![]).validate(),
            Err(ClientError::InvalidSwatch(_))
        ));
        assert!(SwatchFile::from_bytes("s.gif", vec![1, 2]).validate().is_err());
        assert!(
            SwatchFile::from_bytes("s.jpg", vec![0; MAX_SWATCH_BYTES + 1])
                .validate()
                .is_err()
        );
    }

    #[test]
    fn dimensions_from_header_or_fallback() {
        assert_eq!(SwatchFile::from_bytes("s.png", png_bytes(31, 17)).dimensions(), (31, 17));
        assert_eq!(
            SwatchFile::from_bytes("s.png", b"not an image".to_vec()).dimensions(),
            FALLBACK_DIMENSIONS
        );
    }

    #[tokio::test]
    async fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tela.png");
        std::fs::write(&path, png_bytes(4, 4)).unwrap();
        let file = SwatchFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "tela.png");
        assert_eq!(file.content_type, "image/png");
        assert_eq!(file.dimensions(), (4, 4));
    }
}
