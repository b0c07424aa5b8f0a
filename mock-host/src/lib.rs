//! Stand-in for the environment that hosts the request panel.
//!
//! The panel posts each submitted request here; the host records it and
//! answers `202 Accepted` without executing anything. The message schema
//! is mirrored from `reqpad-core` rather than shared, so the core's
//! integration test catches drift between the two.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMessage {
    pub request_method: String,
    pub request_url: String,
    #[serde(default)]
    pub key_value_table_data: Vec<HeaderRow>,
    pub body_option: String,
    pub body_raw_option: String,
    #[serde(default)]
    pub body_raw_data: serde_json::Value,
    pub auth_option: String,
    #[serde(default)]
    pub auth_data: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Received {
    pub id: Uuid,
    pub message: RequestMessage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
}

pub type Inbox = Arc<RwLock<Vec<Received>>>;

pub fn app() -> Router {
    app_with_inbox(Inbox::default())
}

/// Build the router around an existing inbox so callers can inspect what
/// arrived.
pub fn app_with_inbox(inbox: Inbox) -> Router {
    Router::new()
        .route("/messages", get(list_messages).post(receive_message))
        .route("/messages/{id}", get(get_message))
        .with_state(inbox)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn receive_message(
    State(inbox): State<Inbox>,
    Json(message): Json<RequestMessage>,
) -> (StatusCode, Json<Receipt>) {
    let id = Uuid::new_v4();
    tracing::info!(%id, method = %message.request_method, url = %message.request_url, "request received");
    inbox.write().await.push(Received { id, message });
    (StatusCode::ACCEPTED, Json(Receipt { id }))
}

async fn list_messages(State(inbox): State<Inbox>) -> Json<Vec<Received>> {
    Json(inbox.read().await.clone())
}

async fn get_message(
    State(inbox): State<Inbox>,
    Path(id): Path<Uuid>,
) -> Result<Json<Received>, StatusCode> {
    let inbox = inbox.read().await;
    inbox
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "requestMethod": "POST",
        "requestUrl": "https://a.test",
        "keyValueTableData": [{"key": "Accept", "value": "*/*"}],
        "bodyOption": "Raw",
        "bodyRawOption": "JSON",
        "bodyRawData": {"json": "{}"},
        "authOption": "No Auth",
        "authData": {}
    }"#;

    #[test]
    fn message_deserializes_from_panel_json() {
        let message: RequestMessage = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(message.request_method, "POST");
        assert_eq!(message.key_value_table_data[0].key, "Accept");
        assert_eq!(message.body_raw_data["json"], "{}");
    }

    #[test]
    fn header_rows_default_to_empty() {
        let message: RequestMessage = serde_json::from_str(
            r#"{"requestMethod":"GET","requestUrl":"","bodyOption":"None","bodyRawOption":"Text","authOption":"No Auth"}"#,
        )
        .unwrap();
        assert!(message.key_value_table_data.is_empty());
        assert!(message.auth_data.is_null());
    }

    #[test]
    fn message_rejects_missing_url() {
        let result: Result<RequestMessage, _> =
            serde_json::from_str(r#"{"requestMethod":"GET"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn received_serializes_id_as_string() {
        let received = Received {
            id: Uuid::nil(),
            message: serde_json::from_str(SAMPLE).unwrap(),
        };
        let json = serde_json::to_value(&received).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["message"]["requestUrl"], "https://a.test");
    }
}
