use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};

use crate::error::{AppError, AppResult};
use crate::services::{BoardSnapshot, TicketSource};

pub const DEFAULT_ENDPOINT: &str = "https://api.quicksell.co/v1/internal/frontend-assignment";

pub struct HttpTicketSource {
    http: Client,
    endpoint: String,
}

impl HttpTicketSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

pub fn decode_snapshot(body: &str) -> AppResult<BoardSnapshot> {
    serde_json::from_str(body)
        .map_err(|err| AppError::Decode(format!("failed to parse board payload: {err}")))
}

#[async_trait]
impl TicketSource for HttpTicketSource {
    async fn fetch_snapshot(&self) -> AppResult<BoardSnapshot> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(AppError::Configuration(
                "board endpoint must not be empty".to_string(),
            ));
        }

        tracing::debug!(endpoint, "requesting board snapshot");

        let response = self
            .http
            .get(endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Fetch(format!("failed to call {endpoint}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Fetch(format!(
                "board endpoint responded with {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|err| AppError::Fetch(format!("failed to read board payload: {err}")))?;
        let snapshot = decode_snapshot(&body)?;

        tracing::info!(
            tickets = snapshot.tickets.len(),
            users = snapshot.users.len(),
            "board snapshot received"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_board_payload() {
        let snapshot = decode_snapshot(
            r#"{
                "tickets": [
                    {"id":"CAM-1","title":"Update user profile page UI","tag":["Feature request"],
                     "userId":"usr-1","status":"Todo","priority":4}
                ],
                "users": [{"id":"usr-1","name":"Anoop Sharma","available":false}]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.tickets.len(), 1);
        assert_eq!(snapshot.users[0].name, "Anoop Sharma");
    }

    #[test]
    fn rejects_non_json_body() {
        let err = decode_snapshot("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn rejects_missing_lists() {
        let err = decode_snapshot(r#"{"tickets": []}"#).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_fetch_error() {
        let source = HttpTicketSource::new("http://127.0.0.1:1/board");
        let err = source.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }

    #[tokio::test]
    async fn blank_endpoint_is_a_configuration_error() {
        let source = HttpTicketSource::new("  ");
        let err = source.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
