// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The labeling pipeline: validate, normalize, submit.
//!
//! `GET /label` is the single mutating endpoint of the service and lives on
//! the private listener only. Validation runs before normalization so that a
//! malformed request never costs a resolver round trip, and normalization
//! runs before submission so the ledger only ever sees canonical URIs.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::IntoParams;

use crate::{
    error::ApiError,
    models::{AppliedLabel, AtUri, LabelQuery, LabelRecord, LabelRequest, LabelResponse,
        PersistedLabel},
    normalize::{normalize, NormalizeError},
    providers::LedgerError,
    state::AppState,
    validate::{validate, ValidationError},
};

/// Apply a moderation label to a content reference.
#[utoipa::path(
    get,
    path = "/label",
    params(LabelQuery),
    tag = "Labels",
    responses(
        (status = 200, description = "Label applied", body = LabelResponse),
        (status = 400, description = "Invalid request parameters"),
        (status = 500, description = "Resolution or submission failed")
    )
)]
pub async fn apply_label(
    State(state): State<AppState>,
    Query(query): Query<LabelQuery>,
) -> Result<Json<LabelResponse>, ApiError> {
    let request = validate(query, &state.registry, state.allow_default_label)
        .map_err(|e| validation_error_response(e, &state))?;

    info!(uri = %request.uri, val = %request.val, neg = request.neg, "labeling request");

    let uri = normalize(&request.uri, &state.resolver)
        .await
        .map_err(|e| normalize_error_response(e, &request.uri))?;

    let persisted = submit(&state, &request, uri.clone()).await.map_err(|e| {
        error!(uri = %uri, val = %request.val, "label submission failed: {e}");
        ApiError::internal("Failed to apply label").with_message(e.to_string())
    })?;

    info!(uri = %uri, val = %request.val, neg = request.neg, id = persisted.id, "label applied");

    let kind = if request.neg { "Negative label" } else { "Label" };
    Ok(Json(LabelResponse {
        success: true,
        message: format!("{kind} applied successfully"),
        label: AppliedLabel {
            uri,
            value: request.val,
            negative: request.neg,
            timestamp: persisted.cts,
        },
    }))
}

/// Query parameters of the `/labels` read-back endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LabelsQuery {
    /// Canonical `at://` URI or supported web URL.
    pub uri: Option<String>,
}

/// List the persisted labels for a content reference.
///
/// Read path for operators verifying that a label (or its negation) landed;
/// proxies the ledger's query interface.
#[utoipa::path(
    get,
    path = "/labels",
    params(LabelsQuery),
    tag = "Labels",
    responses(
        (status = 200, description = "Persisted labels", body = [PersistedLabel]),
        (status = 400, description = "Missing or unsupported uri"),
        (status = 500, description = "Resolution or ledger query failed")
    )
)]
pub async fn list_labels(
    State(state): State<AppState>,
    Query(query): Query<LabelsQuery>,
) -> Result<Json<Vec<PersistedLabel>>, ApiError> {
    let reference = match query.uri {
        Some(uri) if !uri.trim().is_empty() => uri,
        _ => return Err(ApiError::bad_request("Missing uri parameter")),
    };

    let uri = normalize(&reference, &state.resolver)
        .await
        .map_err(|e| normalize_error_response(e, &reference))?;

    let labels = state.ledger.query_labels(uri.as_str()).await.map_err(|e| {
        error!(uri = %uri, "ledger query failed: {e}");
        ApiError::internal("Failed to query labels").with_message(e.to_string())
    })?;

    Ok(Json(labels))
}

/// Submission gateway: assemble the record and delegate to the ledger.
///
/// Pure transformation plus a delegated call; no retry. The negation marker
/// is omitted entirely on positive records.
async fn submit(
    state: &AppState,
    request: &LabelRequest,
    uri: AtUri,
) -> Result<PersistedLabel, LedgerError> {
    let record = LabelRecord {
        src: state.labeler_did.clone(),
        uri,
        val: request.val.clone(),
        neg: request.neg.then_some(true),
        cts: Utc::now(),
    };
    state.ledger.create_label(&record).await
}

fn validation_error_response(error: ValidationError, state: &AppState) -> ApiError {
    warn!("rejected labeling request: {error}");
    match error {
        ValidationError::MissingUri => ApiError::bad_request("Missing uri parameter")
            .with_usage()
            .with_available_labels(state.registry.identifiers()),
        ValidationError::MissingVal => ApiError::bad_request("Missing val parameter")
            .with_message("The val parameter is required and must specify a valid label identifier")
            .with_usage()
            .with_available_labels(state.registry.identifiers()),
        ValidationError::InvalidNeg(_) => ApiError::bad_request("Invalid neg parameter")
            .with_message("neg parameter must be \"true\", \"false\", \"1\", \"0\", or omitted")
            .with_usage(),
        ValidationError::UnknownLabel(val) => ApiError::bad_request("Invalid label")
            .with_message(format!("Label '{val}' not found"))
            .with_available_labels(state.registry.identifiers()),
    }
}

fn normalize_error_response(error: NormalizeError, reference: &str) -> ApiError {
    match error {
        NormalizeError::UnsupportedFormat(raw) => {
            warn!(uri = %raw, "unsupported reference format");
            ApiError::bad_request("Unsupported URI format").with_message(raw)
        }
        NormalizeError::Resolution { handle, source } => {
            error!(uri = %reference, handle, "handle resolution failed: {source}");
            ApiError::internal("Failed to apply label")
                .with_message(format!("Could not resolve handle: {handle}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    use crate::models::{Blurs, DefaultSetting, LabelDefinition, Severity};
    use crate::providers::{IdentityResolverClient, LabelLedgerClient};
    use crate::registry::LabelRegistry;

    /// Shared state of the fake collaborators, visible to assertions.
    #[derive(Clone, Default)]
    struct FakeUpstream {
        resolver_hits: Arc<AtomicUsize>,
        records: Arc<Mutex<Vec<LabelRecord>>>,
    }

    impl FakeUpstream {
        fn resolver_hits(&self) -> usize {
            self.resolver_hits.load(Ordering::SeqCst)
        }

        fn records(&self) -> Vec<LabelRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[derive(Debug, serde::Deserialize)]
    struct HandleParam {
        handle: String,
    }

    #[derive(Debug, serde::Deserialize)]
    struct UriParam {
        uri: String,
    }

    /// Fake resolver: knows `alice.test`, rejects everything else.
    fn resolver_router(upstream: FakeUpstream) -> Router {
        Router::new().route(
            "/xrpc/com.atproto.identity.resolveHandle",
            get(move |Query(params): Query<HandleParam>| {
                let upstream = upstream.clone();
                async move {
                    upstream.resolver_hits.fetch_add(1, Ordering::SeqCst);
                    if params.handle == "alice.test" {
                        Ok(Json(serde_json::json!({ "did": "did:plc:xyz" })))
                    } else {
                        Err(StatusCode::BAD_REQUEST)
                    }
                }
            }),
        )
    }

    /// Fake ledger: appends records and assigns sequence ids.
    fn ledger_router(upstream: FakeUpstream) -> Router {
        let create_state = upstream.clone();
        Router::new().route(
            "/labels",
            axum::routing::post(move |Json(record): Json<LabelRecord>| {
                let upstream = create_state.clone();
                async move {
                    let mut records = upstream.records.lock().unwrap();
                    records.push(record.clone());
                    Json(PersistedLabel {
                        id: records.len() as i64,
                        src: record.src,
                        uri: record.uri,
                        val: record.val,
                        neg: record.neg,
                        cts: record.cts,
                        sig: None,
                    })
                }
            })
            .get(move |Query(params): Query<UriParam>| {
                let upstream = upstream.clone();
                async move {
                    let records = upstream.records.lock().unwrap();
                    let matching: Vec<PersistedLabel> = records
                        .iter()
                        .enumerate()
                        .filter(|(_, r)| r.uri.as_str() == params.uri)
                        .map(|(i, r)| PersistedLabel {
                            id: (i + 1) as i64,
                            src: r.src.clone(),
                            uri: r.uri.clone(),
                            val: r.val.clone(),
                            neg: r.neg,
                            cts: r.cts,
                            sig: None,
                        })
                        .collect();
                    Json(matching)
                }
            }),
        )
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn registry() -> LabelRegistry {
        let definition = |identifier: &str| LabelDefinition {
            identifier: identifier.to_string(),
            name: identifier.to_string(),
            description: String::new(),
            adult_only: false,
            severity: Severity::Inform,
            blurs: Blurs::None,
            default_setting: DefaultSetting::Warn,
        };
        LabelRegistry::from_definitions(vec![definition("spam"), definition("misleading")])
    }

    async fn test_state(upstream: FakeUpstream) -> AppState {
        let resolver_url = spawn(resolver_router(upstream.clone())).await;
        let ledger_url = spawn(ledger_router(upstream)).await;
        AppState {
            registry: Arc::new(registry()),
            resolver: IdentityResolverClient::new(&resolver_url).unwrap(),
            ledger: LabelLedgerClient::new(&ledger_url).unwrap(),
            labeler_did: "did:plc:labeler".to_string(),
            allow_default_label: false,
        }
    }

    fn label_query(uri: Option<&str>, val: Option<&str>, neg: Option<&str>) -> LabelQuery {
        LabelQuery {
            uri: uri.map(str::to_string),
            val: val.map(str::to_string),
            neg: neg.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn web_url_is_resolved_and_submitted() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let Json(response) = apply_label(
            State(state),
            Query(label_query(
                Some("https://example.com/profile/alice.test/post/abc123"),
                Some("spam"),
                Some(""),
            )),
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(
            response.label.uri.as_str(),
            "at://did:plc:xyz/app.bsky.feed.post/abc123"
        );
        assert_eq!(response.label.value, "spam");
        assert!(!response.label.negative);

        assert_eq!(upstream.resolver_hits(), 1);
        let records = upstream.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].src, "did:plc:labeler");
        assert_eq!(
            records[0].uri.as_str(),
            "at://did:plc:xyz/app.bsky.feed.post/abc123"
        );
        assert_eq!(records[0].val, "spam");
        assert_eq!(records[0].neg, None);
    }

    #[tokio::test]
    async fn canonical_uri_skips_the_resolver() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let Json(response) = apply_label(
            State(state),
            Query(label_query(
                Some("at://did:plc:abc/app.bsky.feed.post/1"),
                Some("misleading"),
                None,
            )),
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(upstream.resolver_hits(), 0);
        assert_eq!(upstream.records().len(), 1);
    }

    #[tokio::test]
    async fn missing_uri_is_rejected_with_zero_side_effects() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let err = apply_label(State(state), Query(label_query(None, Some("spam"), None)))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Missing uri parameter");
        assert!(err.usage.is_some());
        assert_eq!(upstream.resolver_hits(), 0);
        assert!(upstream.records().is_empty());
    }

    #[tokio::test]
    async fn unknown_label_enumerates_the_registry() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let err = apply_label(
            State(state),
            Query(label_query(
                Some("at://did:plc:abc/app.bsky.feed.post/1"),
                Some("nonexistent-label"),
                None,
            )),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Invalid label");
        assert_eq!(
            err.available_labels,
            Some(vec!["spam".to_string(), "misleading".to_string()])
        );
        assert!(upstream.records().is_empty());
    }

    #[tokio::test]
    async fn invalid_neg_token_is_rejected() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let err = apply_label(
            State(state),
            Query(label_query(
                Some("at://did:plc:abc/app.bsky.feed.post/1"),
                Some("spam"),
                Some("maybe"),
            )),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Invalid neg parameter");
        assert_eq!(upstream.resolver_hits(), 0);
    }

    #[tokio::test]
    async fn negation_is_a_new_record_distinguishable_on_read_back() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;
        let uri = "at://did:plc:abc/app.bsky.feed.post/1";

        let Json(applied) = apply_label(
            State(state.clone()),
            Query(label_query(Some(uri), Some("spam"), None)),
        )
        .await
        .unwrap();
        assert!(!applied.label.negative);

        let Json(negated) = apply_label(
            State(state.clone()),
            Query(label_query(Some(uri), Some("spam"), Some("true"))),
        )
        .await
        .unwrap();
        assert!(negated.label.negative);
        assert_eq!(negated.message, "Negative label applied successfully");

        let records = upstream.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].neg, None);
        assert_eq!(records[1].neg, Some(true));

        let Json(listed) = list_labels(
            State(state),
            Query(LabelsQuery {
                uri: Some(uri.to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].neg, None);
        assert_eq!(listed[1].neg, Some(true));
    }

    #[tokio::test]
    async fn unresolvable_handle_fails_without_touching_the_ledger() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let err = apply_label(
            State(state),
            Query(label_query(
                Some("https://bsky.app/profile/bob.test/post/xyz"),
                Some("spam"),
                None,
            )),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.message.as_deref(),
            Some("Could not resolve handle: bob.test")
        );
        assert_eq!(upstream.resolver_hits(), 1);
        assert!(upstream.records().is_empty());
    }

    #[tokio::test]
    async fn unsupported_format_is_a_client_error() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream.clone()).await;

        let err = apply_label(
            State(state),
            Query(label_query(
                Some("https://bsky.app/profile/alice.test"),
                Some("spam"),
                None,
            )),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Unsupported URI format");
        assert_eq!(upstream.resolver_hits(), 0);
    }

    #[tokio::test]
    async fn lenient_mode_substitutes_the_default_label() {
        let upstream = FakeUpstream::default();
        let mut state = test_state(upstream.clone()).await;
        state.allow_default_label = true;

        let Json(response) = apply_label(
            State(state),
            Query(label_query(
                Some("at://did:plc:abc/app.bsky.feed.post/1"),
                None,
                None,
            )),
        )
        .await
        .unwrap();

        assert_eq!(response.label.value, "spam");
    }

    #[tokio::test]
    async fn list_labels_requires_a_uri() {
        let upstream = FakeUpstream::default();
        let state = test_state(upstream).await;

        let err = list_labels(State(state), Query(LabelsQuery { uri: None }))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
