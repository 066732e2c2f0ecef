use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::extract::JsonBody;
use super::state::AppState;
use crate::core::auth::authenticate;
use crate::utils::error::{PortfolioError, Result};

pub const AUTH_HEADER: &str = "x-auth-token";

/// Identity of the admin behind a verified token, available to handlers as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<Value>> {
    let token = authenticate(
        state.users.as_ref(),
        &state.tokens,
        request.email.trim(),
        &request.password,
    )
    .await?;

    Ok(Json(json!({ "token": token })))
}

/// Rejects the request unless it carries a valid admin token.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(PortfolioError::MissingToken)?;

    let claims = state.tokens.verify(token)?;
    request.extensions_mut().insert(AdminUser { id: claims.user.id });

    Ok(next.run(request).await)
}
