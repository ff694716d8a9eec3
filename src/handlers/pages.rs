//! Static and guide page HTTP handlers.
//!
//! The static pages are fixed marketing/help content; guide pages are
//! editable records addressed by slug. Reads are public, guide writes are
//! staff only.

use crate::{
    error::AppError,
    handlers::validate_slug,
    middleware::auth::AuthContext,
    models::page::{
        ContactPageResponse, CreateGuidePageRequest, GuidePage, GuidePageResponse,
        StaticPageResponse, UpdateGuidePageRequest,
    },
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

/// `GET /api/v1/pages/home`
pub async fn home() -> Json<StaticPageResponse> {
    Json(StaticPageResponse {
        title: "Home",
        content: "Welcome to Finagen.",
    })
}

/// `GET /api/v1/pages/explore`
pub async fn explore() -> Json<StaticPageResponse> {
    Json(StaticPageResponse {
        title: "Explore Products",
        content: "Browse AI agents.",
    })
}

/// `GET /api/v1/pages/usage-guide`
pub async fn usage_guide() -> Json<StaticPageResponse> {
    Json(StaticPageResponse {
        title: "Usage Guide",
        content: "How to use products.",
    })
}

/// `GET /api/v1/pages/contact`
pub async fn contact() -> Json<ContactPageResponse> {
    Json(ContactPageResponse {
        title: "Contact Us",
        email: "support@example.com",
    })
}

/// `GET /api/v1/pages/docs`
pub async fn docs() -> Json<StaticPageResponse> {
    Json(StaticPageResponse {
        title: "Docs",
        content: "API and integration docs.",
    })
}

/// List published guide pages, alphabetically by title.
pub async fn list_guides(
    State(state): State<AppState>,
) -> Result<Json<Vec<GuidePageResponse>>, AppError> {
    let pages = sqlx::query_as::<_, GuidePage>(
        r#"
        SELECT id, title, slug, page_type, body, published, created_at, updated_at
        FROM guide_pages
        WHERE published = true
        ORDER BY title
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(pages.into_iter().map(Into::into).collect()))
}

/// Get one published guide page by slug.
pub async fn get_guide(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<GuidePageResponse>, AppError> {
    let page = sqlx::query_as::<_, GuidePage>(
        r#"
        SELECT id, title, slug, page_type, body, published, created_at, updated_at
        FROM guide_pages
        WHERE slug = $1 AND published = true
        "#,
    )
    .bind(&slug)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Guide page"))?;

    Ok(Json(page.into()))
}

/// Create a guide page (staff only).
///
/// The page type is an enum; anything outside
/// product_launch/integration/help/docs is rejected during
/// deserialization before this handler runs.
pub async fn create_guide(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateGuidePageRequest>,
) -> Result<Json<GuidePageResponse>, AppError> {
    auth.ensure_staff()?;
    validate_slug(&request.slug)?;
    if request.title.trim().is_empty() {
        return Err(AppError::InvalidRequest("title must not be empty".to_string()));
    }

    let page = sqlx::query_as::<_, GuidePage>(
        r#"
        INSERT INTO guide_pages (title, slug, page_type, body, published)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, slug, page_type, body, published, created_at, updated_at
        "#,
    )
    .bind(&request.title)
    .bind(&request.slug)
    .bind(request.page_type)
    .bind(&request.body)
    .bind(request.published)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "A guide page with this slug already exists"))?;

    Ok(Json(page.into()))
}

/// Partially update a guide page (staff only). Addressed by slug, like
/// retrieval; the slug itself is immutable.
pub async fn update_guide(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateGuidePageRequest>,
) -> Result<Json<GuidePageResponse>, AppError> {
    auth.ensure_staff()?;

    let page = sqlx::query_as::<_, GuidePage>(
        r#"
        UPDATE guide_pages
        SET title = COALESCE($2, title),
            page_type = COALESCE($3, page_type),
            body = COALESCE($4, body),
            published = COALESCE($5, published),
            updated_at = NOW()
        WHERE slug = $1
        RETURNING id, title, slug, page_type, body, published, created_at, updated_at
        "#,
    )
    .bind(&slug)
    .bind(request.title)
    .bind(request.page_type)
    .bind(request.body)
    .bind(request.published)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Guide page"))?;

    Ok(Json(page.into()))
}
