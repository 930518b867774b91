// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! `dungeon-quality` ingests dungeon maps exported from third-party level
//! editors, normalizes them to a single graph/geometry model, repairs
//! missing topology by spatial inference, and scores the result against
//! nine independent structural, gameplay, and aesthetic rules.
//!
//! The crate-root functions mirror the five external operations of the
//! pipeline: [`detect`], [`convert`], [`infer`], [`assess`], and
//! [`assess_directory`]. Each is also available as a method on the
//! corresponding builder type ([`AdapterRegistry`], [`QualityAssessor`],
//! [`BatchCollector`]) for callers who want to configure more than the
//! defaults.

#![forbid(unsafe_code)]

pub mod adapters;
pub mod assess;
pub mod batch;
pub mod error;
pub mod graph;
pub mod inference;
pub mod model;
pub mod rules;
mod util;

pub use adapters::AdapterRegistry;
pub use assess::{AssessmentResult, AssessorConfig, Grade, QualityAssessor, Recommendation, Severity};
pub use batch::{BatchCollector, BatchEntry, BatchOptions, BatchOutcome, BatchSummary};
pub use error::{DungeonQualityError, Result};
pub use graph::{DungeonGraph, GraphOptions};
pub use inference::SpatialInferenceOptions;
pub use model::{NodeId, UnifiedDungeon};

/// Identifies which registered adapter would handle `raw`, without
/// converting it (§6).
pub fn detect(raw: &serde_json::Value) -> Result<&'static str> {
    AdapterRegistry::with_defaults().detect(raw)
}

/// Detects and converts a raw document into the unified model (§6).
pub fn convert(raw: serde_json::Value) -> Result<UnifiedDungeon> {
    AdapterRegistry::with_defaults().convert(raw)
}

/// Runs the Spatial Inference Engine over an already-unified model with
/// default options (§6). Use [`inference::infer`] directly to pass custom
/// [`SpatialInferenceOptions`].
pub fn infer(model: &UnifiedDungeon) -> UnifiedDungeon {
    inference::infer(model, &SpatialInferenceOptions::default())
}

/// Runs the full pipeline (detect → convert → infer → score → aggregate)
/// on a single raw document with default configuration (§6).
pub fn assess(raw: serde_json::Value) -> Result<AssessmentResult> {
    QualityAssessor::new(AssessorConfig::default()).assess(raw)
}

/// Runs [`assess`] over every matching file in a directory with default
/// configuration (§6).
pub fn assess_directory(dir: &std::path::Path) -> Result<BatchSummary> {
    BatchCollector::new(AssessorConfig::default(), BatchOptions::default()).run(dir)
}
