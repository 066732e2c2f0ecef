use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::state::AppState;
use crate::domain::model::ContactMessage;
use crate::utils::error::Result;

pub async fn send(
    State(state): State<Arc<AppState>>,
    JsonBody(message): JsonBody<ContactMessage>,
) -> Result<Json<Value>> {
    state.contact.send(message).await?;
    Ok(Json(json!({ "success": "Message sent successfully!" })))
}
