// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::Config;
use crate::providers::{IdentityResolverClient, LabelLedgerClient};
use crate::registry::LabelRegistry;

/// Shared state of the labeling surface.
///
/// Everything in here is read-only after startup (the registry) or a cheap
/// clone around an internal connection pool (the clients), so concurrent
/// requests need no locking.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LabelRegistry>,
    pub resolver: IdentityResolverClient,
    pub ledger: LabelLedgerClient,
    /// The service's own DID, stamped on every record as its source.
    pub labeler_did: String,
    /// Legacy lenient mode: substitute the registry default when `val` is
    /// omitted.
    pub allow_default_label: bool,
}

impl AppState {
    pub fn new(
        config: &Config,
        registry: LabelRegistry,
        resolver: IdentityResolverClient,
        ledger: LabelLedgerClient,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            resolver,
            ledger,
            labeler_did: config.labeler_did.clone(),
            allow_default_label: config.allow_default_label,
        }
    }
}
