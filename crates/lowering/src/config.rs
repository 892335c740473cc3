// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Build Options
//!
//! Options controlling how text is turned into an AST.
//!
//! - `best_effort`: build from partial trees. Syntax errors no longer stop
//!   the build, and items whose CST is missing pieces are dropped (and
//!   recorded) instead of failing the whole query.
//! - `max_subquery_depth`: guard against pathologically nested subqueries.
//!
//! ## Example
//!
//! ```rust
//! use soql_lsp_lowering::BuildOptions;
//!
//! let options = BuildOptions {
//!     best_effort: true,
//!     ..Default::default()
//! };
//! assert!(options.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default nesting limit for subqueries, the deepest the grammar accepts
pub const DEFAULT_MAX_SUBQUERY_DEPTH: usize = soql_grammar::MAX_SUBQUERY_DEPTH;

/// Options for [`crate::build_query`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Keep building past syntax errors and malformed items
    pub best_effort: bool,

    /// Maximum subquery nesting
    pub max_subquery_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            best_effort: false,
            max_subquery_depth: DEFAULT_MAX_SUBQUERY_DEPTH,
        }
    }
}

impl BuildOptions {
    /// Options for editor tooling, which works on half-typed text
    pub fn best_effort() -> Self {
        Self {
            best_effort: true,
            ..Self::default()
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_subquery_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "maxSubqueryDepth",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }

    /// Parse options from an editor settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "soqlLsp": {
    ///     "bestEffort": true,
    ///     "maxSubqueryDepth": 16
    ///   }
    /// }
    ///
    /// Missing keys take their defaults; a missing section or a section of
    /// the wrong shape yields `None`.
    pub fn from_settings(settings: &Value) -> Option<Self> {
        let section = settings.get("soqlLsp")?;
        let options: Self = serde_json::from_value(section.clone()).ok()?;
        if let Err(err) = options.validate() {
            tracing::warn!(error = %err, "ignoring invalid soqlLsp settings");
            return None;
        }
        Some(options)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = BuildOptions::default();
        assert!(!options.best_effort);
        assert_eq!(options.max_subquery_depth, DEFAULT_MAX_SUBQUERY_DEPTH);
        assert!(options.validate().is_ok());
        assert!(BuildOptions::best_effort().best_effort);
    }

    #[test]
    fn test_zero_depth_is_invalid() {
        let options = BuildOptions {
            max_subquery_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidValue {
                field: "maxSubqueryDepth",
                ..
            })
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = json!({ "soqlLsp": { "bestEffort": true } });
        let options = BuildOptions::from_settings(&settings).unwrap();
        assert!(options.best_effort);
        assert_eq!(options.max_subquery_depth, DEFAULT_MAX_SUBQUERY_DEPTH);
    }

    #[test]
    fn test_from_settings_rejects_bad_payloads() {
        assert!(BuildOptions::from_settings(&json!({})).is_none());
        assert!(BuildOptions::from_settings(&json!({ "soqlLsp": { "bestEffort": "yes" } })).is_none());
        assert!(
            BuildOptions::from_settings(&json!({ "soqlLsp": { "maxSubqueryDepth": 0 } })).is_none()
        );
    }
}
