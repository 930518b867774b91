// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The Quality Assessor (§4.E): runs the full B→C→D pipeline and
//! aggregates the nine rule scores into one graded [`AssessmentResult`].

use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::adapters::AdapterRegistry;
use crate::error::Result;
use crate::graph::{DungeonGraph, GraphOptions};
use crate::inference::{self, SpatialInferenceOptions};
use crate::model::UnifiedDungeon;
use crate::rules::{default_rule_set, Category, Rule, RuleOutcome};
use crate::util::clamp01;

/// Letter grade bands (§4.E): `A >= 0.85`, `B >= 0.70`, `C >= 0.55`,
/// `D >= 0.40`, otherwise `F`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Grade::A
        } else if score >= 0.70 {
            Grade::B
        } else if score >= 0.55 {
            Grade::C
        } else if score >= 0.40 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

/// Severity bands for per-rule recommendations: a rule scoring below
/// `0.35` is `High`, below `0.5` is `Medium`, below `0.65` is `Low`; at or
/// above `0.65` no recommendation is produced for that rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recommendation {
    pub rule_id: String,
    pub category: Category,
    pub severity: Severity,
    pub score: f64,
    pub actions: Vec<String>,
}

fn severity_for(score: f64) -> Option<Severity> {
    if score < 0.35 {
        Some(Severity::High)
    } else if score < 0.5 {
        Some(Severity::Medium)
    } else if score < 0.65 {
        Some(Severity::Low)
    } else {
        None
    }
}

/// Default per-rule improvement threshold (§4.E): a rule scoring at or
/// above this is not worth recommending against, even if it falls in a
/// `Severity` band.
const DEFAULT_IMPROVEMENT_THRESHOLD: f64 = 0.5;

fn recommendation_actions(rule_id: &str) -> &'static [&'static str] {
    match rule_id {
        "accessibility" => &["large portions of the map are unreachable from the entrance; add connections to stranded rooms"],
        "degree_variance" => &["room connectivity is too uniform or too erratic; vary the number of doors per room"],
        "door_distribution" => &["doors are too sparse, too dense, or too unevenly spread; rebalance door counts across rooms"],
        "dead_end_ratio" => &["too many dead-end rooms; add loops or secondary exits"],
        "key_path_length" => &["the critical path barely uses the map's extent; route the entrance-to-exit path through more of the level"],
        "loop_ratio" => &["the loop structure is too sparse or too tangled relative to the room count"],
        "path_diversity" => &["too few or too many alternate routes between rooms; add or remove connecting passages"],
        "treasure_monster_distribution" => &["treasure and monsters are clustered unevenly, or treasure sits far from anything guarding it"],
        "geometric_balance" => &["room sizes, spacing, or layout symmetry are uneven"],
        _ => &["this rule scored below the improvement threshold"],
    }
}

/// Configuration for [`QualityAssessor`] (§4.E).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssessorConfig {
    pub category_weights: HashMap<Category, f64>,
    pub graph_options: GraphOptions,
    pub run_spatial_inference: bool,
    pub spatial_inference_options: SpatialInferenceOptions,
    /// Rule ids to skip; an empty set runs all nine.
    pub disabled_rules: Vec<String>,
    /// Per-rule improvement threshold (§6): a rule must score below its
    /// threshold to produce a recommendation. Rules absent from this map
    /// use [`DEFAULT_IMPROVEMENT_THRESHOLD`].
    pub improvement_thresholds: HashMap<String, f64>,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        let mut category_weights = HashMap::new();
        category_weights.insert(Category::Structural, 0.35);
        category_weights.insert(Category::Gameplay, 0.50);
        category_weights.insert(Category::Aesthetic, 0.15);
        AssessorConfig {
            category_weights,
            graph_options: GraphOptions::default(),
            run_spatial_inference: true,
            spatial_inference_options: SpatialInferenceOptions::default(),
            disabled_rules: Vec::new(),
            improvement_thresholds: HashMap::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub overall_score: f64,
    pub grade: Grade,
    pub category_scores: HashMap<Category, f64>,
    /// Per-rule outcome, averaged across levels when the model has more
    /// than one (§4.E: a multi-level document is assessed level by level
    /// and each rule's score is the mean across levels).
    pub rule_outcomes: HashMap<String, RuleOutcome>,
    pub recommendations: Vec<Recommendation>,
    /// I4 warnings (dropped, unplaceable game elements) surfaced from
    /// validation, non-fatal.
    pub warnings: Vec<String>,
}

pub struct QualityAssessor {
    config: AssessorConfig,
    rules: Vec<Box<dyn Rule>>,
}

impl QualityAssessor {
    pub fn new(config: AssessorConfig) -> Self {
        QualityAssessor {
            rules: default_rule_set()
                .into_iter()
                .filter(|r| !config.disabled_rules.iter().any(|d| d == r.id()))
                .collect(),
            config,
        }
    }

    /// Runs detection, conversion, validation, spatial inference, and
    /// rule evaluation on a raw document (§6 `assess`).
    pub fn assess(&self, raw: serde_json::Value) -> Result<AssessmentResult> {
        let registry = AdapterRegistry::with_defaults();
        let model = registry.convert(raw)?;
        self.assess_model(&model)
    }

    /// Same pipeline, starting from an already-converted model. Useful
    /// when a caller has built the model themselves (e.g. after running
    /// [`crate::infer`] manually).
    pub fn assess_model(&self, model: &UnifiedDungeon) -> Result<AssessmentResult> {
        log::debug!("assess: validating model (I1/I4)");
        let (model, warnings) = model.drop_unplaceable_elements()?;

        let model = if self.config.run_spatial_inference {
            log::debug!("assess: running spatial inference");
            inference::infer(&model, &self.config.spatial_inference_options)
        } else {
            model
        };

        log::debug!("assess: evaluating {} rules across {} level(s)", self.rules.len(), model.levels().len());

        #[cfg(feature = "parallel")]
        let per_level: Vec<HashMap<String, RuleOutcome>> = model
            .levels()
            .par_iter()
            .map(|level| self.evaluate_level(level))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let per_level: Vec<HashMap<String, RuleOutcome>> =
            model.levels().iter().map(|level| self.evaluate_level(level)).collect();

        let rule_outcomes = average_outcomes(per_level, &self.rules);

        let category_scores = self.category_scores(&rule_outcomes);
        let overall_score = self.overall_score(&category_scores);
        let grade = Grade::from_score(overall_score);
        let recommendations = self.recommendations(&rule_outcomes);

        Ok(AssessmentResult {
            overall_score,
            grade,
            category_scores,
            rule_outcomes,
            recommendations,
            warnings,
        })
    }

    fn evaluate_level(&self, level: &crate::model::Level) -> HashMap<String, RuleOutcome> {
        let entrance = level
            .rooms
            .iter()
            .find(|r| r.is_entrance)
            .map(|r| crate::model::NodeId::Room(r.id.clone()));
        let exit = level
            .rooms
            .iter()
            .find(|r| r.is_exit)
            .map(|r| crate::model::NodeId::Room(r.id.clone()));
        let graph = DungeonGraph::build(level, self.config.graph_options, entrance, exit);

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(String, RuleOutcome)> = self
            .rules
            .par_iter()
            .map(|rule| (rule.id().to_string(), rule.evaluate(level, &graph)))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(String, RuleOutcome)> = self
            .rules
            .iter()
            .map(|rule| (rule.id().to_string(), rule.evaluate(level, &graph)))
            .collect();

        outcomes.into_iter().collect()
    }

    fn category_scores(&self, outcomes: &HashMap<String, RuleOutcome>) -> HashMap<Category, f64> {
        let mut sums: HashMap<Category, f64> = HashMap::new();
        let mut counts: HashMap<Category, usize> = HashMap::new();
        for rule in &self.rules {
            if let Some(outcome) = outcomes.get(rule.id()) {
                *sums.entry(rule.category()).or_insert(0.0) += outcome.score;
                *counts.entry(rule.category()).or_insert(0) += 1;
            }
        }
        sums.into_iter()
            .map(|(cat, sum)| (cat, sum / counts.get(&cat).copied().unwrap_or(1) as f64))
            .collect()
    }

    /// Weighted mean of category scores, renormalized over whichever
    /// categories have at least one enabled rule (so disabling every rule
    /// in a category doesn't silently zero out the overall score).
    fn overall_score(&self, category_scores: &HashMap<Category, f64>) -> f64 {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (category, score) in category_scores {
            let weight = self.config.category_weights.get(category).copied().unwrap_or(0.0);
            weighted_sum += weight * score;
            weight_total += weight;
        }
        if weight_total <= 0.0 {
            return 0.0;
        }
        clamp01(weighted_sum / weight_total)
    }

    fn recommendations(&self, outcomes: &HashMap<String, RuleOutcome>) -> Vec<Recommendation> {
        let mut recs: Vec<Recommendation> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let outcome = outcomes.get(rule.id())?;
                if outcome.reason.is_some() {
                    return None;
                }
                let threshold = self
                    .config
                    .improvement_thresholds
                    .get(rule.id())
                    .copied()
                    .unwrap_or(DEFAULT_IMPROVEMENT_THRESHOLD);
                if outcome.score >= threshold {
                    return None;
                }
                let severity = severity_for(outcome.score)?;
                Some(Recommendation {
                    rule_id: rule.id().to_string(),
                    category: rule.category(),
                    severity,
                    score: outcome.score,
                    actions: recommendation_actions(rule.id()).iter().map(|s| s.to_string()).collect(),
                })
            })
            .collect();
        recs.sort_by_key(|r| OrderedFloat(r.score));
        recs
    }
}

/// Averages per-rule scores across levels. When a rule degrades on some
/// levels, its detail is taken from the first level it ran on and its
/// averaged score still reflects every level's contribution.
fn average_outcomes(
    per_level: Vec<HashMap<String, RuleOutcome>>,
    rules: &[Box<dyn Rule>],
) -> HashMap<String, RuleOutcome> {
    let level_count = per_level.len().max(1) as f64;
    rules
        .iter()
        .map(|rule| {
            let mut total = 0.0;
            let mut detail = serde_json::Value::Null;
            let mut reason = None;
            for outcomes in &per_level {
                if let Some(outcome) = outcomes.get(rule.id()) {
                    total += outcome.score;
                    if detail.is_null() {
                        detail = outcome.detail.clone();
                    }
                    if reason.is_none() {
                        reason = outcome.reason.clone();
                    }
                }
            }
            (
                rule.id().to_string(),
                RuleOutcome {
                    score: clamp01(total / level_count),
                    detail,
                    reason,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_level_document() -> serde_json::Value {
        serde_json::json!({
            "header": { "schemaName": "dnd-dungeon-unified", "schemaVersion": "1.0.0" },
            "levels": [{
                "id": "l1",
                "map": { "width": 100, "height": 100 },
                "rooms": [
                    { "id": "r1", "shape": "rectangle", "position": { "x": 0.0, "y": 0.0 }, "size": { "width": 10.0, "height": 10.0 }, "is_entrance": true },
                    { "id": "r2", "shape": "rectangle", "position": { "x": 20.0, "y": 0.0 }, "size": { "width": 10.0, "height": 10.0 } },
                    { "id": "r3", "shape": "rectangle", "position": { "x": 40.0, "y": 0.0 }, "size": { "width": 10.0, "height": 10.0 }, "is_exit": true }
                ],
                "connections": [
                    { "id": "c1", "from_room": "r1", "to_room": "r2" },
                    { "id": "c2", "from_room": "r2", "to_room": "r3" }
                ]
            }]
        })
    }

    #[test]
    fn assesses_a_simple_chain_without_erroring() {
        let assessor = QualityAssessor::new(AssessorConfig::default());
        let result = assessor.assess(simple_level_document()).unwrap();
        assert!(result.overall_score >= 0.0 && result.overall_score <= 1.0);
        assert_eq!(result.rule_outcomes.len(), 9);
    }

    #[test]
    fn grade_bands_match_thresholds() {
        assert_eq!(Grade::from_score(0.9), Grade::A);
        assert_eq!(Grade::from_score(0.85), Grade::A);
        assert_eq!(Grade::from_score(0.7), Grade::B);
        assert_eq!(Grade::from_score(0.55), Grade::C);
        assert_eq!(Grade::from_score(0.4), Grade::D);
        assert_eq!(Grade::from_score(0.1), Grade::F);
    }

    #[test]
    fn invalid_connection_is_rejected_rather_than_silently_dropped() {
        let mut doc = simple_level_document();
        doc["levels"][0]["connections"][0]["to_room"] = serde_json::json!("does-not-exist");
        let assessor = QualityAssessor::new(AssessorConfig::default());
        let err = assessor.assess(doc).unwrap_err();
        assert!(matches!(err, crate::error::DungeonQualityError::InvalidModel { .. }));
    }

    #[test]
    fn improvement_threshold_suppresses_low_severity_recommendations_by_default() {
        // A rule scoring in [0.5, 0.65) is `Severity::Low` but, at the
        // default 0.5 improvement threshold, shouldn't be recommended.
        let outcomes = {
            let mut m = HashMap::new();
            m.insert(
                "accessibility".to_string(),
                RuleOutcome::scored(0.6, serde_json::Value::Null),
            );
            m
        };
        let assessor = QualityAssessor::new(AssessorConfig::default());
        let recs = assessor.recommendations(&outcomes);
        assert!(recs.is_empty());
    }

    #[test]
    fn disabling_a_rule_removes_it_from_outcomes() {
        let mut config = AssessorConfig::default();
        config.disabled_rules.push("geometric_balance".to_string());
        let assessor = QualityAssessor::new(config);
        let result = assessor.assess(simple_level_document()).unwrap();
        assert_eq!(result.rule_outcomes.len(), 8);
        assert!(!result.rule_outcomes.contains_key("geometric_balance"));
    }
}
