//! `multipart/form-data` reader for the create endpoints.
//!
//! Text parts are collected by name; the `file` part becomes the
//! [`ImageUpload`] handed to the catalog.  Field-level problems are reported
//! as validation failures (400).

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use bytes::BytesMut;
use marquee_app_core::schemas::ImageUpload;
use marquee_app_core::CatalogError;
use serde::Deserialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::error::ServerError;

const FILE_FIELD: &str = "file";

#[derive(Debug, Default)]
pub struct CreateForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl CreateForm {
    pub async fn read(mut multipart: Multipart, max_file_bytes: usize) -> Result<Self, ServerError> {
        let mut form = Self::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| ServerError::BadRequest(format!("Failed to read multipart field: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_owned();

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();

                let mut bytes = BytesMut::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read file chunk: {e}")))?
                {
                    bytes.extend_from_slice(&chunk);
                    if bytes.len() > max_file_bytes {
                        return Err(invalid(format!(
                            "File too large: exceeds maximum of {max_file_bytes} bytes"
                        )));
                    }
                }

                debug!(
                    file_name = %file_name,
                    content_type = %content_type,
                    size_bytes = bytes.len(),
                    "received file upload"
                );
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.freeze(),
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read field {name}: {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Required, non-blank text field.
    pub fn text(&self, name: &str) -> Result<String, ServerError> {
        match self.fields.get(name).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => Ok(value.to_owned()),
            _ => Err(invalid(format!("{name} is required"))),
        }
    }

    pub fn number<T: FromStr>(&self, name: &str) -> Result<T, ServerError> {
        let raw = self.text(name)?;
        raw.parse()
            .map_err(|_| invalid(format!("{name} must be a number, got '{raw}'")))
    }

    /// Optional comma-separated list of ids; absent or blank means none.
    pub fn id_list(&self, name: &str) -> Result<Vec<i64>, ServerError> {
        let Some(raw) = self.fields.get(name) else {
            return Ok(Vec::new());
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse()
                    .map_err(|_| invalid(format!("{name} must be a comma-separated list of ids")))
            })
            .collect()
    }

    pub fn image(&mut self) -> Result<ImageUpload, ServerError> {
        self.image
            .take()
            .ok_or_else(|| invalid(format!("an image must be uploaded in the '{FILE_FIELD}' field")))
    }
}

fn invalid(message: String) -> ServerError {
    ServerError::Catalog(CatalogError::ValidationFailed(message))
}

/// OpenAPI shape of `POST /api/v1/actors`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ActorUploadForm {
    pub name: String,
    pub country: String,
    pub rating: f64,
    pub age: i64,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// OpenAPI shape of `POST /api/v1/movies`.
#[allow(dead_code)]
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieUploadForm {
    pub title: String,
    pub description: String,
    pub duration: i64,
    pub rating: f64,
    pub genre: String,
    /// Comma-separated ids of existing actors.
    pub actor_ids: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> CreateForm {
        CreateForm {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn text_fields_are_required_and_trimmed() {
        let f = form(&[("name", "  Ana "), ("country", "   ")]);
        assert_eq!(f.text("name").unwrap(), "Ana");
        assert!(f.text("country").is_err());
        assert!(f.text("missing").is_err());
    }

    #[test]
    fn numbers_must_parse() {
        let f = form(&[("age", "33"), ("rating", "four")]);
        assert_eq!(f.number::<i64>("age").unwrap(), 33);
        let err = f.number::<f64>("rating").unwrap_err();
        assert!(matches!(
            err,
            ServerError::Catalog(CatalogError::ValidationFailed(_))
        ));
    }

    #[test]
    fn id_lists_are_optional() {
        assert!(form(&[]).id_list("actorIds").unwrap().is_empty());
        assert_eq!(
            form(&[("actorIds", "3, 1,,2")]).id_list("actorIds").unwrap(),
            vec![3, 1, 2]
        );
        assert!(form(&[("actorIds", "1,x")]).id_list("actorIds").is_err());
    }

    #[test]
    fn missing_file_is_a_validation_failure() {
        assert!(form(&[]).image().is_err());
    }
}
