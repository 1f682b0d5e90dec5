// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface of the labeler, split across two listeners.
//!
//! The public router carries nothing but a liveness probe. The mutating
//! labeling surface lives on the internal router, which is bound to a
//! private-network address only; the two surfaces never share a port.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{AppliedLabel, AtUri, HealthResponse, LabelRecord, LabelResponse, PersistedLabel},
    state::AppState,
};

pub mod health;
pub mod label;

/// Router for the public listener: liveness probe only, no mutating routes.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(health::public_health))
        .layer(TraceLayer::new_for_http())
}

/// Router for the private listener: the labeling surface.
pub fn internal_router(state: AppState) -> Router {
    Router::new()
        .route("/label", get(label::apply_label))
        .route("/labels", get(label::list_labels))
        .route("/health", get(health::internal_health))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        label::apply_label,
        label::list_labels,
        health::internal_health
    ),
    components(
        schemas(
            AtUri,
            LabelResponse,
            AppliedLabel,
            LabelRecord,
            PersistedLabel,
            HealthResponse
        )
    ),
    tags(
        (name = "Labels", description = "Manual moderation labeling"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
