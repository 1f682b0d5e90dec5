// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP error envelope for the labeling API.
//!
//! Component-level failures (validation, normalization, ledger submission)
//! are translated into [`ApiError`] at the handler boundary; nothing is
//! silently swallowed and the structured JSON shape is the same for every
//! failure class.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Usage hint included in parameter-level rejections.
pub const LABEL_USAGE: &str =
    "GET /label?uri=<at_uri_or_bsky_url>&val=<label_identifier>&neg=<true|false>";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
    pub usage: Option<&'static str>,
    pub available_labels: Option<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_labels: Option<&'a [String]>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: None,
            usage: None,
            available_labels: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_usage(mut self) -> Self {
        self.usage = Some(LABEL_USAGE);
        self
    }

    pub fn with_available_labels(mut self, labels: Vec<String>) -> Self {
        self.available_labels = Some(labels);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.error,
            message: self.message.as_deref(),
            usage: self.usage,
            available_labels: self.available_labels.as_deref(),
        });
        (self.status, body).into_response()
    }
}
