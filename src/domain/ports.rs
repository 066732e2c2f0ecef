use crate::domain::model::{
    ContactMessage, Experience, ImageUpload, NewExperience, NewProject, NewUser, Project,
    UploadedImage, User,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for portfolio projects. Ids that cannot exist in the backing
/// store are treated as missing rather than as errors.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest first.
    async fn list(&self) -> Result<Vec<Project>>;
    async fn get(&self, id: &str) -> Result<Option<Project>>;
    async fn insert(&self, project: NewProject) -> Result<Project>;
    /// Overwrites the stored record with the same id. `None` when it no longer exists.
    async fn replace(&self, project: Project) -> Result<Option<Project>>;
    /// Returns `true` when a record was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// All experiences, newest first.
    async fn list(&self) -> Result<Vec<Experience>>;
    async fn get(&self, id: &str) -> Result<Option<Experience>>;
    async fn insert(&self, experience: NewExperience) -> Result<Experience>;
    async fn replace(&self, experience: Experience) -> Result<Option<Experience>>;
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn insert(&self, user: NewUser) -> Result<User>;
    /// Returns `false` when no user has that id.
    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool>;
}

/// Remote image storage.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage>;
    async fn destroy(&self, public_id: &str) -> Result<()>;
}

/// Outbound mail relay for contact-form messages.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<()>;
}
