use std::sync::Arc;

use chrono::Utc;

use crate::domain::model::{ImageUpload, Project, ProjectForm};
use crate::domain::ports::{MediaHost, ProjectRepository};
use crate::utils::error::{PortfolioError, Result};
use crate::utils::validation::validate_image_extension;

/// Project CRUD with the image lifecycle on the media host kept in step with the records.
#[derive(Clone)]
pub struct ProjectService {
    repository: Arc<dyn ProjectRepository>,
    media: Arc<dyn MediaHost>,
    allowed_formats: Vec<String>,
}

impl ProjectService {
    pub fn new(
        repository: Arc<dyn ProjectRepository>,
        media: Arc<dyn MediaHost>,
        allowed_formats: Vec<String>,
    ) -> Self {
        Self {
            repository,
            media,
            allowed_formats,
        }
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.repository.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Project> {
        self.repository
            .get(id)
            .await?
            .ok_or(PortfolioError::NotFound {
                resource: "Project",
            })
    }

    pub async fn create(&self, form: ProjectForm, image: Option<ImageUpload>) -> Result<Project> {
        let image = image.ok_or(PortfolioError::MissingImage)?;
        self.check_image(&image)?;

        // Reject bad text fields before anything is uploaded.
        form.validate_for_create()?;

        let uploaded = self.media.upload(image).await?;
        let public_id = uploaded.public_id.clone();
        let new_project = form.into_new_project(uploaded)?;

        match self.repository.insert(new_project).await {
            Ok(project) => {
                tracing::info!("Created project {} ({})", project.id, project.title);
                Ok(project)
            }
            Err(e) => {
                self.discard_image(&public_id).await;
                Err(e)
            }
        }
    }

    pub async fn update(
        &self,
        id: &str,
        form: ProjectForm,
        image: Option<ImageUpload>,
    ) -> Result<Project> {
        let mut project = self.get(id).await?;
        form.apply_to(&mut project)?;

        let previous_image_id = match image {
            Some(image) => {
                self.check_image(&image)?;
                let uploaded = self.media.upload(image).await?;
                let previous = std::mem::replace(&mut project.image_id, uploaded.public_id);
                project.image_url = uploaded.url;
                Some(previous)
            }
            None => None,
        };
        project.updated_at = Utc::now();

        let saved = match self.repository.replace(project.clone()).await {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                if previous_image_id.is_some() {
                    self.discard_image(&project.image_id).await;
                }
                return Err(PortfolioError::NotFound {
                    resource: "Project",
                });
            }
            Err(e) => {
                if previous_image_id.is_some() {
                    self.discard_image(&project.image_id).await;
                }
                return Err(e);
            }
        };

        if let Some(previous) = previous_image_id.filter(|id| !id.is_empty()) {
            self.discard_image(&previous).await;
        }

        tracing::info!("Updated project {}", saved.id);
        Ok(saved)
    }

    /// Removes the remote image first; the record is kept if that fails so the
    /// asset is never orphaned.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let project = self.get(id).await?;

        if project.image_id.is_empty() {
            tracing::warn!("Project {} has no stored image id; skipping media cleanup", id);
        } else {
            self.media.destroy(&project.image_id).await?;
        }

        if !self.repository.delete(id).await? {
            return Err(PortfolioError::NotFound {
                resource: "Project",
            });
        }

        tracing::info!("Deleted project {}", id);
        Ok(())
    }

    fn check_image(&self, image: &ImageUpload) -> Result<()> {
        let allowed: Vec<&str> = self.allowed_formats.iter().map(String::as_str).collect();
        validate_image_extension(&image.file_name, &allowed)?;
        if image.bytes.is_empty() {
            return Err(PortfolioError::MissingImage);
        }
        Ok(())
    }

    async fn discard_image(&self, public_id: &str) {
        if let Err(e) = self.media.destroy(public_id).await {
            tracing::warn!("Failed to remove image {} from media host: {}", public_id, e);
        }
    }
}
