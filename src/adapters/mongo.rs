//! MongoDB-backed repositories.
//!
//! Collections keep the established document layout: `projects`, `experiences`
//! and `users`, with `_id` as an `ObjectId` and `createdAt`/`updatedAt`
//! timestamps on content records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::domain::model::{
    Experience, NewExperience, NewProject, NewUser, Project, User,
};
use crate::domain::ports::{ExperienceRepository, ProjectRepository, UserRepository};
use crate::utils::error::{PortfolioError, Result};

const PROJECTS: &str = "projects";
const EXPERIENCES: &str = "experiences";
const USERS: &str = "users";

#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub async fn connect(uri: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(PortfolioError::storage)?;
        let database = client.database(database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(PortfolioError::storage)?;
        tracing::info!("MongoDB connected (database `{}`)", database_name);

        let store = Self { database };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.database
            .collection::<UserDocument>(USERS)
            .create_index(unique_email)
            .await
            .map_err(PortfolioError::storage)?;
        Ok(())
    }

    pub fn projects(&self) -> MongoProjectRepository {
        MongoProjectRepository {
            collection: self.database.collection(PROJECTS),
        }
    }

    pub fn experiences(&self) -> MongoExperienceRepository {
        MongoExperienceRepository {
            collection: self.database.collection(EXPERIENCES),
        }
    }

    pub fn users(&self) -> MongoUserRepository {
        MongoUserRepository {
            collection: self.database.collection(USERS),
        }
    }
}

/// Ids that are not valid `ObjectId`s cannot match any document.
fn parse_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn to_chrono(value: BsonDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn to_bson(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: String,
    technologies: Vec<String>,
    image_url: String,
    /// Absent on documents written before image ids were stored.
    #[serde(rename = "cloudinaryId", default)]
    image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    live_url: Option<String>,
    category: String,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<ProjectDocument> for Project {
    fn from(document: ProjectDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            title: document.title,
            description: document.description,
            technologies: document.technologies,
            image_url: document.image_url,
            image_id: document.image_id,
            github_url: document.github_url,
            live_url: document.live_url,
            category: document.category,
            created_at: to_chrono(document.created_at),
            updated_at: to_chrono(document.updated_at),
        }
    }
}

impl ProjectDocument {
    fn from_project(id: ObjectId, project: Project) -> Self {
        Self {
            id,
            title: project.title,
            description: project.description,
            technologies: project.technologies,
            image_url: project.image_url,
            image_id: project.image_id,
            github_url: project.github_url,
            live_url: project.live_url,
            category: project.category,
            created_at: to_bson(project.created_at),
            updated_at: to_bson(project.updated_at),
        }
    }
}

#[derive(Clone)]
pub struct MongoProjectRepository {
    collection: Collection<ProjectDocument>,
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    async fn list(&self) -> Result<Vec<Project>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(PortfolioError::storage)?;
        let documents: Vec<ProjectDocument> =
            cursor.try_collect().await.map_err(PortfolioError::storage)?;
        Ok(documents.into_iter().map(Project::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Project>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(PortfolioError::storage)?;
        Ok(document.map(Project::from))
    }

    async fn insert(&self, project: NewProject) -> Result<Project> {
        let now = to_bson(Utc::now());
        let document = ProjectDocument {
            id: ObjectId::new(),
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

        self.collection
            .insert_one(&document)
            .await
            .map_err(PortfolioError::storage)?;
        Ok(document.into())
    }

    async fn replace(&self, project: Project) -> Result<Option<Project>> {
        let Some(oid) = parse_id(&project.id) else {
            return Ok(None);
        };
        let document = ProjectDocument::from_project(oid, project);

        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, &document)
            .await
            .map_err(PortfolioError::storage)?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(document.into()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(PortfolioError::storage)?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExperienceDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    organization: String,
    period: String,
    description: String,
    icon: String,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

impl From<ExperienceDocument> for Experience {
    fn from(document: ExperienceDocument) -> Self {
        Self {
            id: document.id.to_hex(),
            title: document.title,
            organization: document.organization,
            period: document.period,
            description: document.description,
            icon: document.icon,
            created_at: to_chrono(document.created_at),
            updated_at: to_chrono(document.updated_at),
        }
    }
}

#[derive(Clone)]
pub struct MongoExperienceRepository {
    collection: Collection<ExperienceDocument>,
}

#[async_trait]
impl ExperienceRepository for MongoExperienceRepository {
    async fn list(&self) -> Result<Vec<Experience>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(PortfolioError::storage)?;
        let documents: Vec<ExperienceDocument> =
            cursor.try_collect().await.map_err(PortfolioError::storage)?;
        Ok(documents.into_iter().map(Experience::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Experience>> {
        let Some(oid) = parse_id(id) else {
            return Ok(None);
        };
        let document = self
            .collection
            .find_one(doc! { "_id": oid })
            .await
            .map_err(PortfolioError::storage)?;
        Ok(document.map(Experience::from))
    }

    async fn insert(&self, experience: NewExperience) -> Result<Experience> {
        let now = to_bson(Utc::now());
        let document = ExperienceDocument {
            id: ObjectId::new(),
            title: experience.title,
            organization: experience.organization,
            period: experience.period,
            description: experience.description,
            icon: experience.icon,
            created_at: now,
            updated_at: now,
        };

        self.collection
            .insert_one(&document)
            .await
            .map_err(PortfolioError::storage)?;
        Ok(document.into())
    }

    async fn replace(&self, experience: Experience) -> Result<Option<Experience>> {
        let Some(oid) = parse_id(&experience.id) else {
            return Ok(None);
        };
        let document = ExperienceDocument {
            id: oid,
            title: experience.title,
            organization: experience.organization,
            period: experience.period,
            description: experience.description,
            icon: experience.icon,
            created_at: to_bson(experience.created_at),
            updated_at: to_bson(experience.updated_at),
        };

        let result = self
            .collection
            .replace_one(doc! { "_id": oid }, &document)
            .await
            .map_err(PortfolioError::storage)?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(document.into()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(PortfolioError::storage)?;
        Ok(result.deleted_count > 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    email: String,
    /// Password hash; the field name matches the existing `users` documents.
    password: String,
}

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let document = self
            .collection
            .find_one(doc! { "email": email })
            .await
            .map_err(PortfolioError::storage)?;

        Ok(document.map(|d| User {
            id: d.id.to_hex(),
            email: d.email,
            password_hash: d.password,
        }))
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> Result<bool> {
        let Some(oid) = parse_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "password": password_hash } },
            )
            .await
            .map_err(PortfolioError::storage)?;
        Ok(result.matched_count > 0)
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let document = UserDocument {
            id: ObjectId::new(),
            email: user.email,
            password: user.password_hash,
        };
        self.collection
            .insert_one(&document)
            .await
            .map_err(PortfolioError::storage)?;

        Ok(User {
            id: document.id.to_hex(),
            email: document.email,
            password_hash: document.password,
        })
    }
}
