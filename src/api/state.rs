use std::sync::Arc;

use crate::adapters::{
    BrevoMailer, CloudinaryMediaHost, MemoryExperienceRepository, MemoryProjectRepository,
    MemoryUserRepository,
};
use crate::config::toml_config::{DatabaseBackend, DatabaseConfig};
use crate::config::AppConfig;
use crate::core::auth::TokenService;
use crate::core::contact::ContactService;
use crate::core::experiences::ExperienceService;
use crate::core::projects::ProjectService;
use crate::domain::ports::{
    ExperienceRepository, Mailer, MediaHost, ProjectRepository, UserRepository,
};
use crate::utils::error::{PortfolioError, Result};

/// The three collections behind the API.
#[derive(Clone)]
pub struct Store {
    pub projects: Arc<dyn ProjectRepository>,
    pub experiences: Arc<dyn ExperienceRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            projects: Arc::new(MemoryProjectRepository::new()),
            experiences: Arc::new(MemoryExperienceRepository::new()),
            users: Arc::new(MemoryUserRepository::new()),
        }
    }

    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        match config.backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory store; content is lost on restart");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Mongo => Self::open_mongo(config).await,
        }
    }

    #[cfg(feature = "mongo")]
    async fn open_mongo(config: &DatabaseConfig) -> Result<Self> {
        let uri = config
            .uri
            .as_deref()
            .ok_or_else(|| PortfolioError::MissingConfigError {
                field: "database.uri".to_string(),
            })?;
        let mongo = crate::adapters::MongoStore::connect(uri, &config.name).await?;

        Ok(Self {
            projects: Arc::new(mongo.projects()),
            experiences: Arc::new(mongo.experiences()),
            users: Arc::new(mongo.users()),
        })
    }

    #[cfg(not(feature = "mongo"))]
    async fn open_mongo(_config: &DatabaseConfig) -> Result<Self> {
        Err(PortfolioError::ConfigError {
            message: "built without the `mongo` feature; use database.backend = \"memory\""
                .to_string(),
        })
    }
}

pub struct AppState {
    pub projects: ProjectService,
    pub experiences: ExperienceService,
    pub contact: ContactService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        store: Store,
        media: Arc<dyn MediaHost>,
        mailer: Arc<dyn Mailer>,
        config: &AppConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            projects: ProjectService::new(
                store.projects,
                media,
                config.media.allowed_formats.clone(),
            ),
            experiences: ExperienceService::new(store.experiences),
            contact: ContactService::new(mailer),
            users: store.users,
            tokens: TokenService::new(&config.auth.jwt_secret, config.token_ttl_seconds()),
        })
    }

    /// Connects the configured store and the real media host and mail relay.
    pub async fn from_config(config: &AppConfig) -> Result<Arc<Self>> {
        let store = Store::open(&config.database).await?;
        let media = Arc::new(CloudinaryMediaHost::new(&config.media));
        let mailer = Arc::new(BrevoMailer::new(&config.mail));

        Ok(Self::new(store, media, mailer, config))
    }
}
