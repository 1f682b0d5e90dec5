// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the data structures flowing through the labeling
//! pipeline and the JSON bodies of the HTTP API. All wire-facing types derive
//! `Serialize`/`Deserialize` and `ToSchema` for automatic JSON handling and
//! OpenAPI documentation.
//!
//! ## AT URI Type
//!
//! The [`AtUri`] newtype wraps canonical AT Protocol content identifiers
//! (`at://<did>/<collection>/<rkey>`). It provides type safety and marks the
//! boundary between raw operator input and normalized references.
//!
//! ## Model Categories
//!
//! - **Label definitions**: the registry's immutable label vocabulary
//! - **Requests**: raw query input and its validated form
//! - **Records**: label records handed to the external ledger
//! - **Responses**: JSON bodies returned by the HTTP surface

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// AT URI Type
// =============================================================================

/// Canonical AT Protocol content identifier.
///
/// Format: `at://<did>/<collection>/<rkey>`. Produced by the URI normalizer;
/// raw operator input never reaches the ledger without passing through it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct AtUri(pub String);

impl AtUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AtUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AtUri {
    fn from(value: String) -> Self {
        AtUri(value)
    }
}

impl From<&str> for AtUri {
    fn from(value: &str) -> Self {
        AtUri(value.to_string())
    }
}

// =============================================================================
// Label Definitions
// =============================================================================

/// How prominently clients should surface a label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Alert,
    Inform,
    None,
}

/// What part of the labeled content clients should blur.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Blurs {
    Content,
    Media,
    None,
}

/// Default client-side setting for a label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultSetting {
    Ignore,
    Warn,
    Hide,
}

/// A single label definition from the registry source file.
///
/// Loaded once at startup and immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelDefinition {
    /// Stable, unique label identifier (the `val` of emitted records).
    pub identifier: String,
    /// Human-readable display name.
    pub name: String,
    /// Operator-facing description of when the label applies.
    pub description: String,
    /// Whether the label is only shown to adult accounts.
    pub adult_only: bool,
    pub severity: Severity,
    pub blurs: Blurs,
    pub default_setting: DefaultSetting,
}

// =============================================================================
// Label Requests
// =============================================================================

/// Raw query parameters of `GET /label`, before validation.
///
/// This type never crosses the validator boundary; handlers work with
/// [`LabelRequest`] only.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LabelQuery {
    /// Canonical `at://` URI or supported web URL.
    pub uri: Option<String>,
    /// Label identifier; must match a loaded definition.
    pub val: Option<String>,
    /// Negation flag: one of `true`, `1`, `false`, `0`, or empty.
    pub neg: Option<String>,
}

/// A validated labeling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRequest {
    /// Content reference as supplied by the operator (not yet normalized).
    pub uri: String,
    /// Label identifier, known to the registry.
    pub val: String,
    /// Whether this request negates a previously applied label.
    pub neg: bool,
}

// =============================================================================
// Label Records
// =============================================================================

/// A label record as handed to the external ledger for signing and storage.
///
/// Records are never mutated after creation; negation is expressed as a new
/// record carrying `neg: true`. The marker is omitted entirely on positive
/// records, matching the ledger's sparse-field convention.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LabelRecord {
    /// DID of the labeler service that issued the record.
    pub src: String,
    /// Canonical URI of the labeled content.
    pub uri: AtUri,
    /// Label identifier.
    pub val: String,
    /// Negation marker; serialized only when `Some(true)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neg: Option<bool>,
    /// Creation timestamp, issued at submission time.
    pub cts: DateTime<Utc>,
}

/// A label record as persisted by the ledger: the record plus the
/// ledger-assigned sequence id and authoritative timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PersistedLabel {
    /// Ledger-assigned sequence id.
    pub id: i64,
    pub src: String,
    pub uri: AtUri,
    pub val: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neg: Option<bool>,
    /// Ledger-assigned creation timestamp.
    pub cts: DateTime<Utc>,
    /// Signature over the record, assigned by the ledger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

// =============================================================================
// Response Bodies
// =============================================================================

/// The applied label as echoed back to the operator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AppliedLabel {
    pub uri: AtUri,
    pub value: String,
    pub negative: bool,
    pub timestamp: DateTime<Utc>,
}

/// Success body of `GET /label`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct LabelResponse {
    pub success: bool,
    pub message: String,
    pub label: AppliedLabel,
}

/// Body of `GET /health` on both listeners.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
