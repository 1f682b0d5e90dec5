// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Clients for the service's external collaborators: the identity resolver
//! directory and the label ledger.

pub mod identity;
pub mod ledger;

pub use identity::{IdentityResolverClient, ResolverError};
pub use ledger::{LabelLedgerClient, LedgerError};
