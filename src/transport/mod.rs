//! Backend transport: the `Transport` seam and its HTTP implementation.

pub mod error;
pub mod http;
pub mod types;

pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
pub use types::{ChatReply, ChatRequest, CsvUpload, UploadReply};

use async_trait::async_trait;

/// Sends user input to the backend.
///
/// Implementations carry no conversation state; callers tag requests with the
/// originating conversation themselves.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a chat message and return the bot's reply text.
    ///
    /// # Errors
    /// Any network, status or decoding failure.
    async fn send_chat(&self, message: &str) -> TransportResult<String>;

    /// Upload a CSV file.
    ///
    /// # Errors
    /// Network failures and unparseable bodies. A well-formed rejection from
    /// the backend is returned as an `UploadReply` without columns.
    async fn upload_csv(&self, upload: CsvUpload) -> TransportResult<UploadReply>;
}
