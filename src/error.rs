// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! Error taxonomy shared by every stage of the pipeline (§7).
//!
//! Rules themselves never raise — a rule that cannot apply degrades to a
//! zero score with a reason string (see [`crate::rules::RuleOutcome`]).
//! These variants are for the stages that can: document parsing, format
//! detection, adapter conversion, and model validation.

use std::fmt;

/// Convenience alias for the crate's fallible operations.
pub type Result<T> = std::result::Result<T, DungeonQualityError>;

/// The error taxonomy of §7.
#[derive(Debug, thiserror::Error)]
pub enum DungeonQualityError {
    /// The input document is structurally malformed: a required field is
    /// missing, or a coordinate is non-numeric.
    #[error("invalid input at {field_path}: {problem}")]
    InvalidInput {
        /// Dotted path to the offending field, e.g. `levels[0].rooms[2].position.x`.
        field_path: String,
        problem: String,
    },

    /// No registered adapter could classify the document.
    #[error("no adapter matched this document")]
    NoMatchingAdapter,

    /// An adapter recognized the document but failed while converting it.
    #[error("conversion failed in adapter {adapter}: {source}")]
    ConversionFailed {
        adapter: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The converted model violates a hard invariant (I1: a connection
    /// endpoint does not resolve to any room or corridor in its level).
    #[error("invalid model at {field_path}: {problem}")]
    InvalidModel {
        field_path: String,
        problem: String,
    },

    /// A single file in a batch exceeded its per-file timeout.
    #[error("evaluation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl DungeonQualityError {
    pub fn invalid_input(field_path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidInput {
            field_path: field_path.into(),
            problem: problem.into(),
        }
    }

    pub fn invalid_model(field_path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::InvalidModel {
            field_path: field_path.into(),
            problem: problem.into(),
        }
    }

    pub fn conversion_failed(
        adapter: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConversionFailed {
            adapter,
            source: Box::new(source),
        }
    }
}

/// A string-only error used by adapters that have no richer diagnostic to
/// attach; wrapped by [`DungeonQualityError::ConversionFailed`].
#[derive(Debug)]
pub struct AdapterError(pub String);

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for AdapterError {}
