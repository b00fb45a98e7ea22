use std::path::Path;

use reqwest::multipart;
use serde::Deserialize;
use thiserror::Error;

use crate::common::{ChatMessage, SenderRole};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status {0}")]
    Api(u16),

    #[error("send rejected by backend")]
    Rejected,

    #[error("attachment read error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    success: bool,
    #[serde(default)]
    chat: Option<ChatMessage>,
}

/// Client for the chat endpoints of the platform backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Full message history for the (staff, doctor) pair, in backend order.
    pub async fn fetch_history(
        &self,
        staff_id: &str,
        doctor_id: &str,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        let response = self
            .http
            .get(format!("{}/chat-history", self.base_url))
            .query(&[("staff", staff_id), ("doctor", doctor_id)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16()));
        }

        let body: HistoryResponse = response.json().await?;
        Ok(body.messages)
    }

    /// Submit one outgoing message as a multipart form. The caller guarantees
    /// at least one of `text`/`file` is present. Returns the recorded message
    /// when the backend echoes it back.
    pub async fn send_message(
        &self,
        staff_id: &str,
        doctor_id: &str,
        role: SenderRole,
        text: Option<&str>,
        file: Option<&Path>,
    ) -> Result<Option<ChatMessage>, ApiError> {
        let mut form = multipart::Form::new().text("senderType", role.as_str());
        if let Some(text) = text {
            form = form.text("message", text.to_string());
        }
        if let Some(path) = file {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            form = form.part("file", multipart::Part::bytes(bytes).file_name(file_name));
        }

        let response = self
            .http
            .post(format!("{}/chat-send", self.base_url))
            .query(&[("staff", staff_id), ("doctor", doctor_id)])
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16()));
        }

        let body: SendResponse = response.json().await?;
        if !body.success {
            return Err(ApiError::Rejected);
        }
        Ok(body.chat)
    }

    /// Absolute URL for an attachment's server-relative path.
    pub fn attachment_url(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const HISTORY_BODY: &str = r#"{
        "messages": [
            {
                "senderId": "s1", "receiverId": "d1",
                "sender": "Alice", "receiver": "Dr. Bob",
                "message": "hi", "timestamp": "2024-05-01T12:00:00Z"
            },
            {
                "senderId": "d1", "receiverId": "s1",
                "sender": "Dr. Bob", "receiver": "Alice",
                "message": "hello", "timestamp": "2024-05-01T12:00:05Z"
            }
        ]
    }"#;

    #[tokio::test]
    async fn fetch_history_preserves_backend_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/chat-history")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("staff".into(), "s1".into()),
                Matcher::UrlEncoded("doctor".into(), "d1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(HISTORY_BODY)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let history = client.fetch_history("s1", "d1").await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].message.as_deref(), Some("hi"));
        assert_eq!(history[1].message.as_deref(), Some("hello"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_history_maps_server_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/chat-history")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let err = client.fetch_history("s1", "d1").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(500)));
    }

    #[tokio::test]
    async fn send_message_surfaces_backend_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat-send")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": false}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let err = client
            .send_message("s1", "d1", SenderRole::Staff, Some("hi"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected));
    }

    #[tokio::test]
    async fn send_message_returns_echoed_chat() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat-send")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("staff".into(), "s1".into()),
                Matcher::UrlEncoded("doctor".into(), "d1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "success": true,
                    "chat": {
                        "senderId": "s1", "receiverId": "d1",
                        "sender": "Alice", "receiver": "Dr. Bob",
                        "message": "hi", "timestamp": "2024-05-01T12:00:00Z"
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(server.url());
        let chat = client
            .send_message("s1", "d1", SenderRole::Staff, Some("hi"), None)
            .await
            .unwrap();

        assert_eq!(chat.unwrap().message.as_deref(), Some("hi"));
        mock.assert_async().await;
    }

    #[test]
    fn attachment_url_joins_base_and_relative_path() {
        let client = ApiClient::new("http://backend/api/");
        assert_eq!(
            client.attachment_url("/uploads/report.pdf"),
            "http://backend/api/uploads/report.pdf"
        );
    }
}
