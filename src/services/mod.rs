//! Business logic services.
//!
//! Services contain core logic separated from HTTP handlers: credential
//! generation and verification, password hashing, and session token signing.

pub mod api_key_service;
pub mod jwt;
pub mod password;
