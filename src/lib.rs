// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Labeler Server - Manual Moderation Labeling Service
//!
//! This crate provides a manual moderation-labeling surface for AT Protocol
//! content: operators submit a content reference and a label identifier over
//! a private-network HTTP API, and the service validates, normalizes, and
//! forwards a label record to an external label ledger for signing and
//! persistence.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and the two routers (Axum)
//! - `config` - Immutable configuration loaded from the environment
//! - `normalize` - Content reference to canonical `at://` URI conversion
//! - `providers` - Clients for the identity resolver and the label ledger
//! - `registry` - The loaded label vocabulary
//! - `validate` - Typed validation of raw label requests

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod registry;
pub mod state;
pub mod validate;
