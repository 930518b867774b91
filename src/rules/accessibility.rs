// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.1 Accessibility: unweighted BFS reach from the entrance.

use crate::graph::DungeonGraph;
use crate::model::Level;
use crate::rules::{Category, Rule, RuleOutcome};

pub struct Accessibility;

impl Rule for Accessibility {
    fn id(&self) -> &'static str {
        "accessibility"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn evaluate(&self, _level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if graph.node_count() == 0 {
            return RuleOutcome::degenerate("no rooms or corridors");
        }
        let Some(entrance) = graph.entrance() else {
            return RuleOutcome::degenerate("no entrance resolved");
        };

        let distances = graph.bfs_distances(entrance);
        let reach = distances.len() as f64 / graph.node_count() as f64;

        let score = if reach < 0.6 {
            0.3 + 0.7 * (reach / 0.6)
        } else if reach > 0.95 {
            (1.0 - (reach - 0.95) / 0.1).max(0.5)
        } else {
            1.0
        };

        let unreachable: Vec<String> = graph
            .nodes()
            .iter()
            .filter(|n| !distances.contains_key(n))
            .map(|n| n.to_string())
            .collect();
        let component_sizes: Vec<usize> = graph
            .connected_components()
            .into_iter()
            .map(|c| c.len())
            .collect();

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "reach": reach,
                "unreachable": unreachable,
                "component_sizes": component_sizes,
            }),
        )
    }
}
