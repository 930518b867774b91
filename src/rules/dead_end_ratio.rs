// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.4 Dead-End Ratio: the fraction of rooms with exactly one
//! connection, mapped by a piecewise-linear decreasing score.

use crate::graph::DungeonGraph;
use crate::model::{Level, NodeId};
use crate::rules::{Category, Rule, RuleOutcome};

/// Breakpoints of the piecewise-linear score (§4.D.4): 1.0 at ratio 0,
/// 0.8 at 0.2, 0.4 at 0.4, 0 at 0.6 and beyond.
const BREAKPOINTS: [(f64, f64); 4] = [(0.0, 1.0), (0.2, 0.8), (0.4, 0.4), (0.6, 0.0)];

fn piecewise_linear_decreasing(x: f64, points: &[(f64, f64)]) -> f64 {
    if x <= points[0].0 {
        return points[0].1;
    }
    if x >= points[points.len() - 1].0 {
        return points[points.len() - 1].1;
    }
    for window in points.windows(2) {
        let (x0, y0) = window[0];
        let (x1, y1) = window[1];
        if x >= x0 && x <= x1 {
            let t = (x - x0) / (x1 - x0);
            return y0 + t * (y1 - y0);
        }
    }
    points[points.len() - 1].1
}

pub struct DeadEndRatio;

impl Rule for DeadEndRatio {
    fn id(&self) -> &'static str {
        "dead_end_ratio"
    }

    fn category(&self) -> Category {
        Category::Gameplay
    }

    fn evaluate(&self, level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if level.rooms.is_empty() {
            return RuleOutcome::degenerate("no rooms");
        }
        let dead_ends = level
            .rooms
            .iter()
            .filter(|r| graph.degree(&NodeId::Room(r.id.clone())) == 1)
            .count();
        let ratio = dead_ends as f64 / level.rooms.len() as f64;
        let score = piecewise_linear_decreasing(ratio, &BREAKPOINTS);

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "dead_end_count": dead_ends,
                "ratio": ratio,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_match_spec() {
        assert!((piecewise_linear_decreasing(0.0, &BREAKPOINTS) - 1.0).abs() < 1e-9);
        assert!((piecewise_linear_decreasing(0.2, &BREAKPOINTS) - 0.8).abs() < 1e-9);
        assert!((piecewise_linear_decreasing(0.4, &BREAKPOINTS) - 0.4).abs() < 1e-9);
        assert!((piecewise_linear_decreasing(0.6, &BREAKPOINTS) - 0.0).abs() < 1e-9);
        assert!((piecewise_linear_decreasing(0.9, &BREAKPOINTS) - 0.0).abs() < 1e-9);
        assert!((piecewise_linear_decreasing(0.1, &BREAKPOINTS) - 0.9).abs() < 1e-9);
    }
}
