use std::sync::Arc;

use chrono::Utc;

use crate::domain::model::{Experience, ExperienceInput};
use crate::domain::ports::ExperienceRepository;
use crate::utils::error::{PortfolioError, Result};

#[derive(Clone)]
pub struct ExperienceService {
    repository: Arc<dyn ExperienceRepository>,
}

impl ExperienceService {
    pub fn new(repository: Arc<dyn ExperienceRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Experience>> {
        self.repository.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Experience> {
        self.repository.get(id).await?.ok_or(not_found())
    }

    pub async fn create(&self, input: ExperienceInput) -> Result<Experience> {
        let experience = self.repository.insert(input.into_new_experience()?).await?;
        tracing::info!("Created experience {}", experience.id);
        Ok(experience)
    }

    /// Partial update: fields absent from the input keep their stored value.
    pub async fn update(&self, id: &str, input: ExperienceInput) -> Result<Experience> {
        let mut experience = self.get(id).await?;
        input.apply_to(&mut experience)?;
        experience.updated_at = Utc::now();

        let saved = self
            .repository
            .replace(experience)
            .await?
            .ok_or(not_found())?;
        tracing::info!("Updated experience {}", saved.id);
        Ok(saved)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!("Deleted experience {}", id);
        Ok(())
    }
}

fn not_found() -> PortfolioError {
    PortfolioError::NotFound {
        resource: "Experience",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryExperienceRepository;

    fn service() -> ExperienceService {
        ExperienceService::new(Arc::new(MemoryExperienceRepository::new()))
    }

    fn input() -> ExperienceInput {
        ExperienceInput {
            title: Some("Software Intern".to_string()),
            organization: Some("Acme".to_string()),
            period: Some("2023 - 2024".to_string()),
            description: Some("Built internal tools".to_string()),
            icon: Some("briefcase".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let experiences = service();
        let created = experiences.create(input()).await.unwrap();

        let fetched = experiences.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.organization, "Acme");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_field() {
        let experiences = service();
        let result = experiences
            .create(ExperienceInput {
                period: None,
                ..input()
            })
            .await;

        assert!(matches!(result, Err(PortfolioError::ValidationError { .. })));
        assert!(experiences.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let experiences = service();
        let created = experiences.create(input()).await.unwrap();

        let updated = experiences
            .update(
                &created.id,
                ExperienceInput {
                    icon: Some("graduation-cap".to_string()),
                    ..ExperienceInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.icon, "graduation-cap");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let experiences = service();
        let created = experiences.create(input()).await.unwrap();

        experiences.delete(&created.id).await.unwrap();

        assert!(matches!(
            experiences.get(&created.id).await,
            Err(PortfolioError::NotFound { .. })
        ));
        assert!(matches!(
            experiences.delete(&created.id).await,
            Err(PortfolioError::NotFound { .. })
        ));
    }
}
