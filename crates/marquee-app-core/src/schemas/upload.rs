use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::CatalogError;

/// Folder inside the bucket that holds every catalog image.
pub const IMAGE_PREFIX: &str = "imgs";

/// An image received with a create request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.bytes.is_empty() {
            return Err(CatalogError::ValidationFailed("image file is empty".into()));
        }
        if !self.content_type.starts_with("image/") {
            return Err(CatalogError::ValidationFailed(format!(
                "invalid file type: {}; only images are allowed",
                self.content_type
            )));
        }
        Ok(())
    }

    /// Bucket path for this upload: `imgs/{unix millis}-{file name}`.
    ///
    /// Only the last path component of the client-supplied name is kept.
    pub fn asset_reference(&self, now: DateTime<Utc>) -> String {
        let base = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("upload");
        format!("{IMAGE_PREFIX}/{}-{base}", now.timestamp_millis())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn upload(name: &str, content_type: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.into(),
            content_type: content_type.into(),
            bytes: Bytes::from_static(b"\x89PNG"),
        }
    }

    #[test]
    fn reference_uses_millis_and_base_name() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(
            upload("poster.png", "image/png").asset_reference(now),
            "imgs/1700000000123-poster.png"
        );
        assert_eq!(
            upload("../../etc/passwd", "image/png").asset_reference(now),
            "imgs/1700000000123-passwd"
        );
        assert_eq!(
            upload("C:\\pics\\me.jpg", "image/jpeg").asset_reference(now),
            "imgs/1700000000123-me.jpg"
        );
        assert_eq!(upload("", "image/png").asset_reference(now), "imgs/1700000000123-upload");
    }

    #[test]
    fn only_non_empty_images_are_accepted() {
        assert!(upload("a.png", "image/png").validate().is_ok());
        assert!(upload("a.txt", "text/plain").validate().is_err());
        let empty = ImageUpload {
            bytes: Bytes::new(),
            ..upload("a.png", "image/png")
        };
        assert!(empty.validate().is_err());
    }
}
