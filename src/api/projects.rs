use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};

use super::auth::AdminUser;
use super::extract::{multipart_rejection, read_project_form};
use super::state::AppState;
use crate::domain::model::Project;
use crate::utils::error::Result;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Project>>> {
    Ok(Json(state.projects.list().await?))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    Ok(Json(state.projects.get(&id).await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminUser>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Project>)> {
    let (form, image) = read_project_form(multipart.map_err(multipart_rejection)?).await?;
    let project = state.projects.create(form, image).await?;

    tracing::debug!("Project {} created by admin {}", project.id, admin.id);
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Project>> {
    let (form, image) = read_project_form(multipart.map_err(multipart_rejection)?).await?;
    Ok(Json(state.projects.update(&id, form, image).await?))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.projects.delete(&id).await?;
    Ok(Json(json!({ "message": "Project removed successfully" })))
}
