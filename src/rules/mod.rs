// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The Metric Rule Set (§4.D): nine independent, pure evaluators.
//!
//! Each rule is a unit struct implementing [`Rule`]; none of them ever
//! raise. A rule that cannot apply (e.g. fewer than two rooms) degrades to
//! `RuleOutcome { score: 0.0, reason: Some(..), .. }` rather than erroring,
//! matching §4.D's "Failure model for rules".

mod accessibility;
mod dead_end_ratio;
mod degree_variance;
mod door_distribution;
mod geometric_balance;
mod key_path_length;
mod loop_ratio;
mod path_diversity;
mod treasure_monster;

pub use accessibility::Accessibility;
pub use dead_end_ratio::DeadEndRatio;
pub use degree_variance::DegreeVariance;
pub use door_distribution::DoorDistribution;
pub use geometric_balance::GeometricBalance;
pub use key_path_length::KeyPathLength;
pub use loop_ratio::LoopRatio;
pub use path_diversity::PathDiversity;
pub use treasure_monster::TreasureMonsterDistribution;

use serde::{Deserialize, Serialize};

use crate::graph::DungeonGraph;
use crate::model::Level;

/// The three categories of §4.E, used to group rules for weighted
/// aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structural,
    Gameplay,
    Aesthetic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structural => "structural",
            Category::Gameplay => "gameplay",
            Category::Aesthetic => "aesthetic",
        }
    }
}

/// The result of evaluating one rule against one level: a score in
/// `[0, 1]`, a JSON-shaped diagnostic detail record, and an optional
/// reason explaining a degenerate (zero) score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub score: f64,
    pub detail: serde_json::Value,
    pub reason: Option<String>,
}

impl RuleOutcome {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        RuleOutcome {
            score: 0.0,
            detail: serde_json::json!({ "reason": "degenerate" }),
            reason: Some(reason.into()),
        }
    }

    pub fn scored(score: f64, detail: serde_json::Value) -> Self {
        RuleOutcome {
            score: crate::util::clamp01(score),
            detail,
            reason: None,
        }
    }
}

/// A single metric rule (§4.D). Implementations are pure functions of a
/// level and its precomputed graph; they must not raise.
pub trait Rule: Send + Sync {
    fn id(&self) -> &'static str;
    fn category(&self) -> Category;
    fn evaluate(&self, level: &Level, graph: &DungeonGraph) -> RuleOutcome;
}

/// Constructs the nine rules of §4.D in the order they are presented
/// there. Evaluation order does not affect the aggregate (§5: "all
/// aggregations are commutative").
pub fn default_rule_set() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(Accessibility),
        Box::new(DegreeVariance),
        Box::new(DoorDistribution),
        Box::new(DeadEndRatio),
        Box::new(KeyPathLength),
        Box::new(LoopRatio),
        Box::new(PathDiversity),
        Box::new(TreasureMonsterDistribution),
        Box::new(GeometricBalance),
    ]
}
