//! Static and guide page models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a guide page.
///
/// Persisted as the `page_type` PostgreSQL enum, so the database rejects
/// anything outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "page_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    ProductLaunch,
    Integration,
    Help,
    Docs,
}

/// Represents a guide page record from the database.
///
/// Maps to the `guide_pages` table; addressed publicly by unique slug.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GuidePage {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub page_type: PageType,
    pub body: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a guide page (staff only).
#[derive(Debug, Deserialize)]
pub struct CreateGuidePageRequest {
    pub title: String,
    pub slug: String,
    pub page_type: PageType,

    #[serde(default)]
    pub body: String,

    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

/// Request body for partial guide page updates (staff only).
#[derive(Debug, Deserialize)]
pub struct UpdateGuidePageRequest {
    pub title: Option<String>,
    pub page_type: Option<PageType>,
    pub body: Option<String>,
    pub published: Option<bool>,
}

/// Response body for guide page endpoints.
#[derive(Debug, Serialize)]
pub struct GuidePageResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub page_type: PageType,
    pub body: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuidePage> for GuidePageResponse {
    fn from(page: GuidePage) -> Self {
        Self {
            id: page.id,
            title: page.title,
            slug: page.slug,
            page_type: page.page_type,
            body: page.body,
            published: page.published,
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

/// Response body for the fixed public pages (home, explore, ...).
#[derive(Debug, Serialize)]
pub struct StaticPageResponse {
    pub title: &'static str,
    pub content: &'static str,
}

/// Response body for the contact page.
#[derive(Debug, Serialize)]
pub struct ContactPageResponse {
    pub title: &'static str,
    pub email: &'static str,
}
