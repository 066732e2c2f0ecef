use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::state::AppState;
use crate::domain::model::{Experience, ExperienceInput};
use crate::utils::error::Result;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Experience>>> {
    Ok(Json(state.experiences.list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Experience>> {
    Ok(Json(state.experiences.get(&id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<ExperienceInput>,
) -> Result<(StatusCode, Json<Experience>)> {
    let experience = state.experiences.create(input).await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ExperienceInput>,
) -> Result<Json<Experience>> {
    Ok(Json(state.experiences.update(&id, input).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.experiences.delete(&id).await?;
    Ok(Json(json!({ "message": "Experience removed successfully" })))
}
