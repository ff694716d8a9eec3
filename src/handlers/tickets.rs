//! Support ticket HTTP handlers.
//!
//! - GET /api/v1/tickets - List the caller's tickets
//! - POST /api/v1/tickets - Open a ticket
//! - GET /api/v1/tickets/{id} - Get one ticket

use crate::{
    error::AppError,
    middleware::auth::AuthContext,
    models::ticket::{CreateTicketRequest, Ticket, TicketResponse},
    state::AppState,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// List the caller's tickets, newest first.
pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let tickets = sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, user_id, subject, message, status, created_at, updated_at
        FROM tickets
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

/// Open a new support ticket. New tickets start in status "open".
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateTicketRequest>,
) -> Result<Json<TicketResponse>, AppError> {
    if request.subject.trim().is_empty() || request.message.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "subject and message are required".to_string(),
        ));
    }

    let ticket = sqlx::query_as::<_, Ticket>(
        r#"
        INSERT INTO tickets (user_id, subject, message)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, subject, message, status, created_at, updated_at
        "#,
    )
    .bind(auth.user_id)
    .bind(&request.subject)
    .bind(&request.message)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(ticket.into()))
}

/// Get one of the caller's tickets by id.
pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, AppError> {
    let ticket = sqlx::query_as::<_, Ticket>(
        r#"
        SELECT id, user_id, subject, message, status, created_at, updated_at
        FROM tickets
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(ticket_id)
    .bind(auth.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AppError::NotFound("Ticket"))?;

    Ok(Json(ticket.into()))
}
