//! HTTP transport backed by `reqwest`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;

use super::error::{TransportError, TransportResult};
use super::types::{ChatReply, ChatRequest, CsvUpload, UploadReply};
use super::Transport;

/// Path of the chat endpoint, relative to the base URL.
const CHAT_PATH: &str = "chat";
/// Path of the upload endpoint, relative to the base URL.
const UPLOAD_PATH: &str = "upload_csv";
/// Multipart field name expected by the backend.
const CSV_FIELD: &str = "csv_file";
/// Longest response body excerpt kept in status errors.
const BODY_EXCERPT_CHARS: usize = 200;

/// Talks to the Flask backend over HTTP.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    chat_url: Url,
    upload_url: Url,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        let base = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            chat_url: base.join(CHAT_PATH)?,
            upload_url: base.join(UPLOAD_PATH)?,
        })
    }

    /// Resolved URL of the chat endpoint.
    #[must_use]
    pub const fn chat_url(&self) -> &Url {
        &self.chat_url
    }

    /// Resolved URL of the upload endpoint.
    #[must_use]
    pub const fn upload_url(&self) -> &Url {
        &self.upload_url
    }
}

/// Parse the base URL so relative joins append instead of replacing the
/// last path segment.
fn parse_base_url(raw: &str) -> TransportResult<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}

async fn read_body(response: Response) -> TransportResult<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_chat(&self, message: &str) -> TransportResult<String> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&request)
            .send()
            .await?;

        let (status, body) = read_body(response).await?;
        if !(200..300).contains(&status) {
            warn!(status, "chat request rejected");
            return Err(TransportError::Status {
                status,
                body: excerpt(&body),
            });
        }

        let reply: ChatReply = serde_json::from_str(&body)?;
        debug!(chars = reply.reply.len(), "chat reply received");
        Ok(reply.reply)
    }

    async fn upload_csv(&self, upload: CsvUpload) -> TransportResult<UploadReply> {
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part(CSV_FIELD, part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        // Validation failures come back as 4xx/5xx with a regular `{message}`
        // body, which is shown to the user as-is.
        let (status, body) = read_body(response).await?;
        let reply: UploadReply = serde_json::from_str(&body).map_err(|e| {
            if (200..300).contains(&status) {
                TransportError::JsonParse(e)
            } else {
                TransportError::Status {
                    status,
                    body: excerpt(&body),
                }
            }
        })?;

        if !(200..300).contains(&status) {
            warn!(status, file = %upload.file_name, "upload rejected by backend");
        }
        debug!(file = %upload.file_name, size, accepted = reply.is_success(), "upload finished");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use axum::extract::Multipart;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn chat(Json(request): Json<ChatRequest>) -> (StatusCode, Json<ChatReply>) {
        if request.message.is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ChatReply {
                    reply: "Por favor, digite uma mensagem.".to_string(),
                }),
            );
        }
        (
            StatusCode::OK,
            Json(ChatReply {
                reply: format!("echo: {}", request.message),
            }),
        )
    }

    async fn upload(mut multipart: Multipart) -> (StatusCode, Json<UploadReply>) {
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() != Some(CSV_FIELD) {
                continue;
            }
            let name = field.file_name().unwrap_or_default().to_string();
            let text = field.text().await.unwrap_or_default();
            if !name.ends_with(".csv") {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(UploadReply {
                        message: "Formato de arquivo inválido.".to_string(),
                        columns: None,
                    }),
                );
            }
            let columns = text
                .lines()
                .next()
                .map(|header| header.split(',').map(str::to_string).collect());
            return (
                StatusCode::OK,
                Json(UploadReply {
                    message: "Arquivo CSV carregado e pronto para análise!".to_string(),
                    columns,
                }),
            );
        }
        (
            StatusCode::BAD_REQUEST,
            Json(UploadReply {
                message: "Nenhum arquivo enviado".to_string(),
                columns: None,
            }),
        )
    }

    fn backend() -> Router {
        Router::new()
            .route("/chat", post(chat))
            .route("/upload_csv", post(upload))
    }

    fn transport_for(base_url: &str) -> HttpTransport {
        let config = ClientConfig::new()
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5));
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn test_endpoints_resolve_under_base_path() {
        let transport = transport_for("http://example.com/bot");
        assert_eq!(transport.chat_url().as_str(), "http://example.com/bot/chat");
        assert_eq!(
            transport.upload_url().as_str(),
            "http://example.com/bot/upload_csv"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::new().with_base_url("not a url");
        assert!(matches!(
            HttpTransport::new(&config),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_send_chat_returns_reply() {
        let base = spawn_backend(backend()).await;
        let transport = transport_for(&base);
        let reply = transport.send_chat("quantas linhas?").await.unwrap();
        assert_eq!(reply, "echo: quantas linhas?");
    }

    #[tokio::test]
    async fn test_send_chat_non_success_is_error() {
        let base = spawn_backend(backend()).await;
        let transport = transport_for(&base);
        let err = transport.send_chat("").await.unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 400, .. }));
        assert!(err.reached_backend());
    }

    #[tokio::test]
    async fn test_send_chat_malformed_body_is_error() {
        let app = Router::new().route("/chat", post(|| async { "definitely not json" }));
        let base = spawn_backend(app).await;
        let transport = transport_for(&base);
        let err = transport.send_chat("hello").await.unwrap_err();
        assert!(matches!(err, TransportError::JsonParse(_)));
    }

    #[tokio::test]
    async fn test_send_chat_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = transport_for(&format!("http://{addr}"));
        let err = transport.send_chat("hello").await.unwrap_err();
        assert!(matches!(err, TransportError::HttpRequest(_)));
        assert!(!err.reached_backend());
    }

    #[tokio::test]
    async fn test_upload_csv_reports_columns() {
        let base = spawn_backend(backend()).await;
        let transport = transport_for(&base);
        let reply = transport
            .upload_csv(CsvUpload::new("sales.csv", "date,amount\n2024-01-01,10\n"))
            .await
            .unwrap();
        assert!(reply.is_success());
        assert_eq!(
            reply.columns,
            Some(vec!["date".to_string(), "amount".to_string()])
        );
    }

    #[tokio::test]
    async fn test_upload_rejection_is_a_reply() {
        let base = spawn_backend(backend()).await;
        let transport = transport_for(&base);
        let reply = transport
            .upload_csv(CsvUpload::new("notes.txt", "hello"))
            .await
            .unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.message, "Formato de arquivo inválido.");
    }

    #[tokio::test]
    async fn test_upload_unparseable_error_body() {
        let app = Router::new().route(
            "/upload_csv",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_backend(app).await;
        let transport = transport_for(&base);
        let err = transport
            .upload_csv(CsvUpload::new("sales.csv", "a,b\n"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransportError::Status { status: 500, ref body } if body == "boom"
        ));
    }
}
