//! In-process document store used for local development and tests.
//!
//! Records live in `RwLock`-guarded maps keyed by a random hex id, so the data
//! is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::model::{
    Experience, NewExperience, NewProject, NewUser, Project, User,
};
use crate::domain::ports::{ExperienceRepository, ProjectRepository, UserRepository};
use crate::utils::error::Result;

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProjectRepository {
    projects: Arc<RwLock<HashMap<String, Project>>>,
}

impl MemoryProjectRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn list(&self) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut list: Vec<Project> = projects.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn get(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn insert(&self, project: NewProject) -> Result<Project> {
        let now = Utc::now();
        let project = Project {
            id: new_id(),
            title: project.title,
            description: project.description,
            technologies: project.technologies,
            image_url: project.image_url,
            image_id: project.image_id,
            github_url: project.github_url,
            live_url: project.live_url,
            category: project.category,
            created_at: now,
            updated_at: now,
        };

        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn replace(&self, project: Project) -> Result<Option<Project>> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&project.id) {
            Some(stored) => {
                *stored = project.clone();
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.projects.write().await.remove(id).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryExperienceRepository {
    experiences: Arc<RwLock<HashMap<String, Experience>>>,
}

impl MemoryExperienceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExperienceRepository for MemoryExperienceRepository {
    async fn list(&self) -> Result<Vec<Experience>> {
        let experiences = self.experiences.read().await;
        let mut list: Vec<Experience> = experiences.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn get(&self, id: &str) -> Result<Option<Experience>> {
        Ok(self.experiences.read().await.get(id).cloned())
    }

    async fn insert(&self, experience: NewExperience) -> Result<Experience> {
        let now = Utc::now();
        let experience = Experience {
            id: new_id(),
            title: experience.title,
            organization: experience.organization,
            period: experience.period,
            description: experience.description,
            icon: experience.icon,
            created_at: now,
            updated_at: now,
        };

        self.experiences
            .write()
            .await
            .insert(experience.id.clone(), experience.clone());
        Ok(experience)
    }

    async fn replace(&self, experience: Experience) -> Result<Option<Experience>> {
        let mut experiences = self.experiences.write().await;
        match experiences.get_mut(&experience.id) {
            Some(stored) => {
                *stored = experience.clone();
                Ok(Some(experience))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.experiences.write().await.remove(id).is_some())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: new_id(),
            email: user.email,
            password_hash: user.password_hash,
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
