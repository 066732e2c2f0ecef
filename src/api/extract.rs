use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::domain::model::{ImageUpload, ProjectForm};
use crate::utils::error::PortfolioError;

/// `Json` extractor whose rejections use the API's error body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PortfolioError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> PortfolioError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return PortfolioError::PayloadTooLarge;
    }
    PortfolioError::validation(rejection.body_text())
}

pub fn multipart_rejection(rejection: MultipartRejection) -> PortfolioError {
    PortfolioError::validation(rejection.body_text())
}

/// Reads the project form: text fields plus an optional `image` file part.
pub async fn read_project_form(
    mut multipart: Multipart,
) -> Result<(ProjectForm, Option<ImageUpload>), PortfolioError> {
    let mut form = ProjectForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // Browsers send an empty part when no file was picked.
            if !file_name.is_empty() || !bytes.is_empty() {
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let target = match name.as_str() {
            "title" => &mut form.title,
            "description" => &mut form.description,
            "technologies" => &mut form.technologies,
            "githubUrl" => &mut form.github_url,
            "liveUrl" => &mut form.live_url,
            "category" => &mut form.category,
            other => {
                tracing::debug!("Ignoring unknown form field `{}`", other);
                continue;
            }
        };
        *target = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok((form, image))
}

fn multipart_error(e: MultipartError) -> PortfolioError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return PortfolioError::PayloadTooLarge;
    }
    PortfolioError::validation(e.body_text())
}
