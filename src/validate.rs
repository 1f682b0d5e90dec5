// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation: raw `/label` query parameters to a typed
//! [`LabelRequest`].
//!
//! Rules apply in order, cheapest first, so a malformed request is rejected
//! before any network resolution or ledger submission can happen. The
//! validator never normalizes the content reference; that is the
//! normalizer's job and may cost a network round trip.

use crate::models::{LabelQuery, LabelRequest};
use crate::registry::LabelRegistry;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing uri parameter")]
    MissingUri,

    #[error("missing val parameter")]
    MissingVal,

    #[error("invalid neg parameter: {0:?}")]
    InvalidNeg(String),

    #[error("label {0:?} not found")]
    UnknownLabel(String),
}

/// Validate a raw label query against the registry.
///
/// With `allow_default_label` set, a missing or blank `val` falls back to
/// the registry's first identifier instead of being rejected. This is the
/// legacy lenient behavior and is off by default.
pub fn validate(
    query: LabelQuery,
    registry: &LabelRegistry,
    allow_default_label: bool,
) -> Result<LabelRequest, ValidationError> {
    let uri = match query.uri {
        Some(uri) if !uri.trim().is_empty() => uri,
        _ => return Err(ValidationError::MissingUri),
    };

    let val = match query.val {
        Some(val) if !val.trim().is_empty() => val,
        _ if allow_default_label => registry.default_identifier().to_string(),
        _ => return Err(ValidationError::MissingVal),
    };

    let neg = parse_neg(query.neg.as_deref())?;

    if !registry.exists(&val) {
        return Err(ValidationError::UnknownLabel(val));
    }

    Ok(LabelRequest { uri, val, neg })
}

/// Collapse the tri-state `neg` parameter to a boolean.
fn parse_neg(raw: Option<&str>) -> Result<bool, ValidationError> {
    match raw {
        None => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") | Some("") => Ok(false),
        Some(other) => Err(ValidationError::InvalidNeg(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Blurs, DefaultSetting, LabelDefinition, Severity};

    fn registry() -> LabelRegistry {
        LabelRegistry::from_definitions(vec![
            definition("spam"),
            definition("misleading"),
        ])
    }

    fn definition(identifier: &str) -> LabelDefinition {
        LabelDefinition {
            identifier: identifier.to_string(),
            name: identifier.to_string(),
            description: String::new(),
            adult_only: false,
            severity: Severity::Inform,
            blurs: Blurs::None,
            default_setting: DefaultSetting::Warn,
        }
    }

    fn query(uri: Option<&str>, val: Option<&str>, neg: Option<&str>) -> LabelQuery {
        LabelQuery {
            uri: uri.map(str::to_string),
            val: val.map(str::to_string),
            neg: neg.map(str::to_string),
        }
    }

    #[test]
    fn valid_request_passes_through() {
        let request = validate(
            query(Some("at://did:plc:xyz/app.bsky.feed.post/1"), Some("spam"), None),
            &registry(),
            false,
        )
        .unwrap();

        assert_eq!(request.uri, "at://did:plc:xyz/app.bsky.feed.post/1");
        assert_eq!(request.val, "spam");
        assert!(!request.neg);
    }

    #[test]
    fn missing_uri_is_rejected_first() {
        // Everything else is invalid too; the uri check must win.
        let err = validate(query(None, None, Some("maybe")), &registry(), false).unwrap_err();
        assert_eq!(err, ValidationError::MissingUri);

        let err = validate(query(Some("   "), Some("spam"), None), &registry(), false).unwrap_err();
        assert_eq!(err, ValidationError::MissingUri);
    }

    #[test]
    fn missing_val_is_rejected_when_strict() {
        let err = validate(query(Some("at://x"), None, None), &registry(), false).unwrap_err();
        assert_eq!(err, ValidationError::MissingVal);

        let err = validate(query(Some("at://x"), Some("  "), None), &registry(), false)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingVal);
    }

    #[test]
    fn missing_val_falls_back_to_default_when_lenient() {
        let request = validate(query(Some("at://x"), None, None), &registry(), true).unwrap();
        assert_eq!(request.val, "spam");
    }

    #[test]
    fn neg_grammar_collapses_to_boolean() {
        for (raw, expected) in [
            (None, false),
            (Some(""), false),
            (Some("false"), false),
            (Some("0"), false),
            (Some("true"), true),
            (Some("1"), true),
        ] {
            let request =
                validate(query(Some("at://x"), Some("spam"), raw), &registry(), false).unwrap();
            assert_eq!(request.neg, expected, "neg={raw:?}");
        }
    }

    #[test]
    fn unrecognized_neg_token_is_rejected() {
        for raw in ["yes", "no", "TRUE", "negative", "2"] {
            let err = validate(query(Some("at://x"), Some("spam"), Some(raw)), &registry(), false)
                .unwrap_err();
            assert_eq!(err, ValidationError::InvalidNeg(raw.to_string()));
        }
    }

    #[test]
    fn unknown_label_is_rejected_after_neg_parsing() {
        let err = validate(
            query(Some("at://x"), Some("nonexistent-label"), None),
            &registry(),
            false,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownLabel("nonexistent-label".to_string())
        );

        // A bad neg token on an unknown label reports the neg error: rule
        // order is fixed.
        let err = validate(
            query(Some("at://x"), Some("nonexistent-label"), Some("maybe")),
            &registry(),
            false,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidNeg("maybe".to_string()));
    }
}
