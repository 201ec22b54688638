use plant_core::{Endpoint, UploadDestination, NO_FILES_SELECTED};
use plant_logging::{plant_info, plant_warn};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::types::map_reqwest_error;
use crate::{
    ClientError, FailureKind, FileEntry, PlantClient, UPLOAD_FAILED, UPLOAD_STATUS_FAILED,
};

/// Multipart field every file is attached under.
pub const FILES_FIELD: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub name: String,
    pub bytes: u64,
}

/// Result of an accepted batch.
///
/// The batch is one request, so every entry in `files` shares the same fate;
/// the list records what was sent, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub response: Value,
    pub files: Vec<FileOutcome>,
}

impl PlantClient {
    /// Uploads `files` as a single multipart request to `/upload/{destination}`.
    pub async fn upload_files(
        &self,
        files: Vec<FileEntry>,
        destination: UploadDestination,
    ) -> Result<UploadReport, ClientError> {
        if files.is_empty() {
            return Err(ClientError::new(
                FailureKind::InvalidArgument { name: "files" },
                NO_FILES_SELECTED,
            ));
        }
        let request = Endpoint::Upload { destination }.build()?;

        let outcomes: Vec<FileOutcome> = files
            .iter()
            .map(|entry| FileOutcome {
                name: entry.upload_name().to_string(),
                bytes: entry.len() as u64,
            })
            .collect();
        let form = build_form(files)?;

        plant_info!("Uploading {} file(s) to {}", outcomes.len(), destination);
        let response = self
            .request_builder(&request)?
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.ok();
            let message = body
                .as_deref()
                .and_then(detail_message)
                .unwrap_or_else(|| UPLOAD_FAILED.to_string());
            plant_warn!("Upload to {} rejected with {}: {}", destination, status, message);
            return Err(ClientError::new(
                FailureKind::UploadRejected(status.as_u16()),
                message,
            ));
        }

        let response = response.json::<Value>().await.map_err(map_reqwest_error)?;
        Ok(UploadReport {
            response,
            files: outcomes,
        })
    }

    /// Point-in-time read of the server's upload/processing status.
    pub async fn get_upload_status(&self) -> Result<Value, ClientError> {
        let request = Endpoint::UploadStatus.build()?;
        let response = self
            .request_builder(&request)?
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            plant_warn!("Upload status request failed with {}", status);
            return Err(ClientError::new(
                FailureKind::HttpStatus(status.as_u16()),
                UPLOAD_STATUS_FAILED,
            ));
        }

        response.json::<Value>().await.map_err(map_reqwest_error)
    }
}

/// Builds the multipart body: one `files` part per entry, in order.
///
/// File names go out unescaped so `a/b/c.tif` arrives as written.
pub fn build_form(files: Vec<FileEntry>) -> Result<Form, ClientError> {
    let mut form = Form::new().percent_encode_noop();
    for entry in files {
        let name = entry.upload_name().to_string();
        let mime = entry.mime_type();
        let part = Part::bytes(entry.content)
            .file_name(name)
            .mime_str(mime)
            .map_err(|err| {
                ClientError::new(FailureKind::InvalidArgument { name: "files" }, err.to_string())
            })?;
        form = form.part(FILES_FIELD, part);
    }
    Ok(form)
}

/// Extracts the `detail` message from an error body, if there is a usable one.
pub fn detail_message(body: &[u8]) -> Option<String> {
    let parsed: Value = serde_json::from_slice(body).ok()?;
    match parsed.get("detail")? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
