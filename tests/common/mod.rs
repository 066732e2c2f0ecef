#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use httpmock::MockServer;
use portfolio_api::adapters::{BrevoMailer, CloudinaryMediaHost};
use portfolio_api::core::admin::seed_admin;
use portfolio_api::utils::validation::Validate;
use portfolio_api::{build_router, AppConfig, AppState, Store};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const BOUNDARY: &str = "----portfolio-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub media: MockServer,
    pub mail: MockServer,
    _config_dir: TempDir,
}

/// Router over the in-memory store, with mock servers standing in for the
/// media host and the mail relay. The config goes through a real TOML file.
pub async fn spawn_app() -> Result<TestApp> {
    let media = MockServer::start_async().await;
    let mail = MockServer::start_async().await;

    let config_dir = TempDir::new()?;
    let config_path = config_dir.path().join("portfolio.toml");
    let config_content = format!(
        r#"
[server]
cors_origins = ["{origin}"]
max_upload_bytes = 1048576

[auth]
jwt_secret = "integration-test-secret"

[database]
backend = "memory"

[media]
cloud_name = "demo"
api_key = "1234"
api_secret = "abcd"
base_url = "{media}"

[mail]
api_key = "xkeysib-test"
recipient = "owner@example.com"
base_url = "{mail}"

[admin]
email = "{email}"
password = "{password}"
"#,
        origin = ALLOWED_ORIGIN,
        media = media.base_url(),
        mail = mail.base_url(),
        email = ADMIN_EMAIL,
        password = ADMIN_PASSWORD,
    );
    tokio::fs::write(&config_path, config_content).await?;

    let config = AppConfig::from_file(&config_path)?;
    config.validate()?;

    let store = Store::in_memory();
    let admin = config.admin.clone().expect("admin section");
    seed_admin(store.users.as_ref(), &admin.email, &admin.password).await?;

    let state = AppState::new(
        store,
        Arc::new(CloudinaryMediaHost::new(&config.media)),
        Arc::new(BrevoMailer::new(&config.mail)),
        &config,
    );

    Ok(TestApp {
        router: build_router(state, &config.server),
        media,
        mail,
        _config_dir: config_dir,
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn login(&self) -> Result<String> {
        let response = self
            .send(json_request(
                "POST",
                "/api/login",
                None,
                &serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            ))
            .await?;
        let body = body_json(response).await?;
        Ok(body["token"].as_str().expect("token in login response").to_string())
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-auth-token", token)
        .body(Body::empty())
        .expect("request")
}

/// Hand-built `multipart/form-data` request. `image` is `(file name, bytes)`.
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-auth-token", token)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
