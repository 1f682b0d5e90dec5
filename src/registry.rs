// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Label registry: the immutable set of label definitions this service may
//! apply, loaded once at startup from a JSON file.

use std::fs;
use std::path::Path;

use crate::config::ConfigError;
use crate::models::LabelDefinition;

/// The loaded label vocabulary.
///
/// Owns the definition set for the process lifetime; answers membership and
/// default-identifier queries without any further IO.
#[derive(Debug, Clone)]
pub struct LabelRegistry {
    definitions: Vec<LabelDefinition>,
}

impl LabelRegistry {
    /// Load definitions from a JSON array file.
    ///
    /// Fails if the file is unreadable, malformed, or contains no
    /// definitions. An empty vocabulary would make every labeling request
    /// unsatisfiable, so the service refuses to start instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::LabelSource {
            path: display.clone(),
            message: e.to_string(),
        })?;

        let definitions: Vec<LabelDefinition> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::LabelSource {
                path: display.clone(),
                message: e.to_string(),
            })?;

        if definitions.is_empty() {
            return Err(ConfigError::EmptyLabelSource { path: display });
        }

        Ok(Self { definitions })
    }

    /// Whether `identifier` names a loaded label definition.
    pub fn exists(&self, identifier: &str) -> bool {
        self.definitions
            .iter()
            .any(|def| def.identifier == identifier)
    }

    /// Identifier of the first-loaded definition.
    ///
    /// Consumed only by the lenient validation mode when a request omits an
    /// explicit label value. `load` guarantees at least one definition.
    pub fn default_identifier(&self) -> &str {
        &self.definitions[0].identifier
    }

    /// All loaded identifiers, in file order. Used in error payloads so an
    /// operator can correct a rejected request.
    pub fn identifiers(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|def| def.identifier.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    #[cfg(test)]
    pub fn from_definitions(definitions: Vec<LabelDefinition>) -> Self {
        Self { definitions }
    }
}
