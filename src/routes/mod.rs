//! HTTP route handlers
//!
//! This module contains all HTTP endpoint implementations for the DocBay
//! server. Routes are organized by functionality:
//!
//! - `index`: HTML index page with the project listing and upload form
//! - `upload`: multipart archive upload
//! - `docs`: version resolution and static documentation serving
//! - `delete`: version deletion
//! - `health`: liveness probe

pub mod delete;
pub mod docs;
pub mod health;
pub mod index;
pub mod upload;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
