use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::{PortfolioError, Result};
use crate::utils::validation::require_text;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image_url: String,
    /// Public id of the image on the media host, needed to delete it later.
    /// Empty for records that predate stored image ids.
    #[serde(rename = "cloudinaryId", default)]
    pub image_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub image_url: String,
    pub image_id: String,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub category: String,
}

/// Text fields of the project form, as submitted. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub category: Option<String>,
}

impl ProjectForm {
    /// Checks that every mandatory field is present and non-blank.
    pub fn validate_for_create(&self) -> Result<()> {
        let fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("technologies", &self.technologies),
            ("category", &self.category),
        ];
        for (field_name, value) in fields {
            require_text(field_name, value.as_deref().unwrap_or_default())?;
        }
        if parse_technologies(self.technologies.as_deref().unwrap_or_default()).is_empty() {
            return Err(PortfolioError::validation("technologies is required"));
        }
        Ok(())
    }

    /// Builds the record to insert, requiring every mandatory field.
    pub fn into_new_project(self, image: UploadedImage) -> Result<NewProject> {
        self.validate_for_create()?;

        Ok(NewProject {
            title: self.title.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default(),
            technologies: parse_technologies(&self.technologies.unwrap_or_default()),
            image_url: image.url,
            image_id: image.public_id,
            github_url: optional_url(self.github_url),
            live_url: optional_url(self.live_url),
            category: self.category.unwrap_or_default(),
        })
    }

    /// Applies the submitted fields onto an existing project. Required fields
    /// may be omitted but not blanked; link fields are cleared by an empty value.
    pub fn apply_to(self, project: &mut Project) -> Result<()> {
        if let Some(title) = self.title {
            require_text("title", &title)?;
            project.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            require_text("description", &description)?;
            project.description = description;
        }
        if let Some(technologies) = self.technologies {
            let technologies = parse_technologies(&technologies);
            if technologies.is_empty() {
                return Err(PortfolioError::validation("technologies is required"));
            }
            project.technologies = technologies;
        }
        if let Some(category) = self.category {
            require_text("category", &category)?;
            project.category = category;
        }
        if self.github_url.is_some() {
            project.github_url = optional_url(self.github_url);
        }
        if self.live_url.is_some() {
            project.live_url = optional_url(self.live_url);
        }
        Ok(())
    }
}

/// Splits the comma-separated technology list, trimming items and dropping blanks.
pub fn parse_technologies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tech| !tech.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(value: Option<String>, field_name: &str) -> Result<String> {
    let value = value.unwrap_or_default();
    require_text(field_name, &value)?;
    Ok(value)
}

fn optional_url(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub organization: String,
    pub period: String,
    pub description: String,
    /// Icon name rendered by the front end, e.g. `briefcase`.
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExperience {
    pub title: String,
    pub organization: String,
    pub period: String,
    pub description: String,
    pub icon: String,
}

/// JSON body for creating or editing an experience.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExperienceInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl ExperienceInput {
    pub fn into_new_experience(self) -> Result<NewExperience> {
        Ok(NewExperience {
            title: required(self.title, "title")?,
            organization: required(self.organization, "organization")?,
            period: required(self.period, "period")?,
            description: required(self.description, "description")?,
            icon: required(self.icon, "icon")?,
        })
    }

    pub fn apply_to(self, experience: &mut Experience) -> Result<()> {
        let fields = [
            ("title", self.title, &mut experience.title),
            ("organization", self.organization, &mut experience.organization),
            ("period", self.period, &mut experience.period),
            ("description", self.description, &mut experience.description),
            ("icon", self.icon, &mut experience.icon),
        ];

        for (field_name, value, target) in fields {
            if let Some(value) = value {
                require_text(field_name, &value)?;
                *target = value;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub public_id: String,
}
