//! Wire types exchanged with the backend.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::TransportResult;

/// Body of `POST /chat`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
}

/// Response of `POST /chat`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The bot's answer.
    pub reply: String,
}

/// Response of `POST /upload_csv`.
///
/// `columns` is only present when the backend parsed the file.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UploadReply {
    /// Human-readable status.
    pub message: String,
    /// Column names of the parsed CSV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl UploadReply {
    /// Whether the backend accepted and parsed the file.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.columns.is_some()
    }
}

/// A CSV file ready to be sent as the `csv_file` multipart field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CsvUpload {
    /// File name as shown to the user and sent to the backend.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    /// Build an upload from in-memory contents.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: &Path) -> TransportResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self {
            file_name: file_name_of(path),
            bytes,
        })
    }
}

/// Last path component, lossily decoded; the whole path if there is none.
#[must_use]
pub fn file_name_of(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
