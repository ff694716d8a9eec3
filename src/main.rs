//! Finagen API - Main Application Entry Point
//!
//! This is a REST API server for a platform selling access to AI agent
//! products. It manages user accounts, API keys, products and pricing
//! plans, subscriptions, invoices and payment methods, usage metering,
//! support tickets, and content pages.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API keys (SHA-256 hashed, prefix-indexed) for
//!   programmatic access, HS256 session JWTs for the account surface
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with public and authenticated route groups
//! 5. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{services::jwt::JwtService, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let state = AppState {
        pool,
        jwt: JwtService::new(&config.jwt_secret, config.jwt_expiration_hours),
    };

    // Authenticated routes: require an API key or a session token
    let authenticated_routes = Router::new()
        // API key management
        .route("/api/v1/keys", post(handlers::api_keys::create_key))
        .route("/api/v1/keys", get(handlers::api_keys::list_keys))
        .route("/api/v1/keys/{id}", get(handlers::api_keys::get_key))
        .route(
            "/api/v1/keys/{id}/revoke",
            post(handlers::api_keys::revoke_key),
        )
        // Account routes
        .route("/api/v1/me/profile", get(handlers::me::get_profile))
        .route("/api/v1/me/profile", patch(handlers::me::update_profile))
        .route(
            "/api/v1/me/subscriptions",
            get(handlers::me::list_subscriptions),
        )
        .route("/api/v1/me/subscribe", post(handlers::me::subscribe))
        .route("/api/v1/me/dashboard", get(handlers::me::dashboard))
        // Billing routes
        .route(
            "/api/v1/billing/invoices",
            get(handlers::billing::list_invoices),
        )
        .route(
            "/api/v1/billing/invoices/{id}",
            get(handlers::billing::get_invoice),
        )
        .route(
            "/api/v1/billing/payment-methods",
            get(handlers::billing::list_payment_methods),
        )
        .route(
            "/api/v1/billing/payment-methods",
            post(handlers::billing::create_payment_method),
        )
        .route(
            "/api/v1/billing/payment-methods/{id}",
            get(handlers::billing::get_payment_method),
        )
        .route(
            "/api/v1/billing/payment-methods/{id}",
            delete(handlers::billing::delete_payment_method),
        )
        // Usage metering routes
        .route("/api/v1/usage/events", get(handlers::usage::list_events))
        .route("/api/v1/usage/events", post(handlers::usage::record_event))
        // Support tickets
        .route("/api/v1/tickets", get(handlers::tickets::list_tickets))
        .route("/api/v1/tickets", post(handlers::tickets::create_ticket))
        .route("/api/v1/tickets/{id}", get(handlers::tickets::get_ticket))
        // Catalog/content writes (staff checked in the handlers)
        .route("/api/v1/products", post(handlers::products::create_product))
        .route(
            "/api/v1/products/{slug}",
            patch(handlers::products::update_product),
        )
        .route("/api/v1/plans", post(handlers::products::create_plan))
        .route("/api/v1/plans/{id}", patch(handlers::products::update_plan))
        .route("/api/v1/guides", post(handlers::pages::create_guide))
        .route("/api/v1/guides/{slug}", patch(handlers::pages::update_guide))
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        // Catalog reads
        .route("/api/v1/products", get(handlers::products::list_products))
        .route(
            "/api/v1/products/{slug}",
            get(handlers::products::get_product),
        )
        .route("/api/v1/plans", get(handlers::products::list_plans))
        .route("/api/v1/plans/{id}", get(handlers::products::get_plan))
        // Content pages
        .route("/api/v1/pages/home", get(handlers::pages::home))
        .route("/api/v1/pages/explore", get(handlers::pages::explore))
        .route("/api/v1/pages/usage-guide", get(handlers::pages::usage_guide))
        .route("/api/v1/pages/contact", get(handlers::pages::contact))
        .route("/api/v1/pages/docs", get(handlers::pages::docs))
        .route("/api/v1/guides", get(handlers::pages::list_guides))
        .route("/api/v1/guides/{slug}", get(handlers::pages::get_guide));

    // Combine public and authenticated routes
    let app = Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        // Browser dashboard runs on a separate origin
        .layer(CorsLayer::permissive())
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
