//! Data models representing database entities.
//!
//! Each module pairs the `sqlx::FromRow` record with explicit request and
//! response structs for the wire representation. Response structs never
//! expose secret or foreign-owner fields.

/// API key credential model
pub mod api_key;
/// Invoice and payment method models
pub mod billing;
/// Guide/content page models
pub mod page;
/// Product and pricing plan models
pub mod product;
/// Plan subscription model
pub mod subscription;
/// Support ticket model
pub mod ticket;
/// User account model
pub mod user;
/// Usage metering event model
pub mod usage;
