// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Liveness probes for both listeners.

use axum::Json;

use crate::models::HealthResponse;

pub const PUBLIC_SERVICE: &str = "labeler-public-api";
pub const INTERNAL_SERVICE: &str = "labeler-internal-api";

/// Liveness probe on the public listener.
///
/// Always returns 200 while the process is running; the public surface
/// exposes nothing else.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn public_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: PUBLIC_SERVICE.to_string(),
    })
}

/// Liveness probe on the private listener.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn internal_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: INTERNAL_SERVICE.to_string(),
    })
}
