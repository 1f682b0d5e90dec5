// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! URI normalization: operator-supplied content references to canonical
//! `at://` URIs.
//!
//! Two accepted shapes:
//!
//! - a canonical `at://` URI, returned unchanged without any network call;
//! - a web-facing post URL, `https://<host>/profile/<handle>/post/<postId>`,
//!   whose handle is resolved to a DID through the identity resolver.
//!
//! The fast path is checked first so the common case (operators already
//! holding canonical URIs) never touches the network; the resolver call is
//! the only network dependency of this module.

use url::Url;

use crate::models::AtUri;
use crate::providers::{IdentityResolverClient, ResolverError};

const CANONICAL_SCHEME: &str = "at://";
const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("unsupported URI format: {0}")]
    UnsupportedFormat(String),

    #[error("could not resolve handle: {handle}")]
    Resolution {
        handle: String,
        #[source]
        source: ResolverError,
    },
}

/// Normalize an operator-supplied reference to a canonical AT URI.
///
/// Calls the identity resolver at most once, and only for web URLs.
pub async fn normalize(
    reference: &str,
    resolver: &IdentityResolverClient,
) -> Result<AtUri, NormalizeError> {
    if reference.starts_with(CANONICAL_SCHEME) {
        return Ok(AtUri::from(reference));
    }

    let (handle, post_id) = parse_post_url(reference)
        .ok_or_else(|| NormalizeError::UnsupportedFormat(reference.to_string()))?;

    let did = resolver
        .resolve_handle(&handle)
        .await
        .map_err(|source| NormalizeError::Resolution { handle, source })?;

    Ok(AtUri(format!("at://{did}/{POST_COLLECTION}/{post_id}")))
}

/// Extract `(handle, post_id)` from a web-facing post URL.
///
/// The path must be exactly `/profile/<handle>/post/<postId>`; query and
/// fragment are ignored. Returns `None` for anything else.
fn parse_post_url(reference: &str) -> Option<(String, String)> {
    let url = Url::parse(reference).ok()?;
    if url.scheme() != "https" || url.host_str().is_none() {
        return None;
    }

    let mut segments: Vec<&str> = url.path_segments()?.collect();
    // Tolerate a trailing slash.
    if segments.last() == Some(&"") {
        segments.pop();
    }

    match segments.as_slice() {
        ["profile", handle, "post", post_id] if !handle.is_empty() && !post_id.is_empty() => {
            Some((handle.to_string(), post_id.to_string()))
        }
        _ => None,
    }
}
