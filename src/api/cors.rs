use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::auth::AUTH_HEADER;
use crate::config::toml_config::ServerConfig;
use crate::utils::error::{PortfolioError, Result};

/// Parsed origin allow-list, shared by the CORS layer and the origin guard.
#[derive(Debug, Clone)]
pub struct AllowedOrigins(Arc<Vec<HeaderValue>>);

impl AllowedOrigins {
    pub fn from_config(cfg: &ServerConfig) -> Self {
        let origins: Vec<HeaderValue> = cfg
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin `{}`", origin);
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            warn!("No CORS origins configured; browsers will block cross-origin requests");
        }

        Self(Arc::new(origins))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }
}

/// Build the CORS layer from the configured origin allow-list.
///
/// Preflights from other origins are answered without CORS headers, so the
/// browser blocks the follow-up request.
pub fn build_cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.0.iter().cloned()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(AUTH_HEADER)])
        .max_age(Duration::from_secs(60 * 60))
}

/// Refuses requests whose `Origin` is not on the allow-list before any handler
/// runs. Requests without an `Origin` header (curl, server-to-server) pass.
pub async fn reject_foreign_origin(
    State(origins): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !origins.contains(origin) {
            warn!("Rejected request from origin {:?}", origin);
            return Err(PortfolioError::OriginNotAllowed);
        }
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins_match_exactly() {
        let cfg = ServerConfig {
            cors_origins: vec![
                "https://amolshende.vercel.app/".to_string(),
                "http://localhost:5173".to_string(),
            ],
            ..ServerConfig::default()
        };
        let origins = AllowedOrigins::from_config(&cfg);

        assert!(origins.contains(&HeaderValue::from_static("https://amolshende.vercel.app")));
        assert!(origins.contains(&HeaderValue::from_static("http://localhost:5173")));
        assert!(!origins.contains(&HeaderValue::from_static("http://localhost:3000")));
        assert!(!origins.contains(&HeaderValue::from_static("https://evil.example.com")));
    }
}
