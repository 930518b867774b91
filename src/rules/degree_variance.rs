// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.2 Degree Variance: how close the degree spread is to a mild,
//! well-connected dungeon (variance near 1.0).

use crate::graph::DungeonGraph;
use crate::model::Level;
use crate::rules::{Category, Rule, RuleOutcome};
use crate::util::{gaussian_closeness, mean, variance};

pub struct DegreeVariance;

impl Rule for DegreeVariance {
    fn id(&self) -> &'static str {
        "degree_variance"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn evaluate(&self, _level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if graph.node_count() < 2 {
            return RuleOutcome::degenerate("fewer than two rooms/corridors");
        }
        let degrees: Vec<f64> = graph.nodes().iter().map(|n| graph.degree(n) as f64).collect();
        let mu = mean(&degrees);
        let sigma2 = variance(&degrees);
        let score = gaussian_closeness(sigma2, 1.0, 0.5);

        let mut histogram = std::collections::BTreeMap::new();
        for d in &degrees {
            *histogram.entry(*d as u64).or_insert(0u64) += 1;
        }

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "mean_degree": mu,
                "variance": sigma2,
                "histogram": histogram,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphOptions;
    use crate::model::{ConnectionDoc, MapSize, PositionDoc, RoomDoc, Shape, SizeDoc};

    fn room(id: &str) -> RoomDoc {
        RoomDoc {
            id: id.to_string(),
            shape: Shape::Rectangle,
            position: PositionDoc { x: 0.0, y: 0.0 },
            size: SizeDoc {
                width: 10.0,
                height: 10.0,
            },
            name: None,
            description: None,
            is_entrance: false,
            is_exit: false,
        }
    }

    fn conn(a: &str, b: &str) -> ConnectionDoc {
        ConnectionDoc {
            id: format!("{a}-{b}"),
            from_room: a.to_string(),
            to_room: b.to_string(),
            door_type: None,
            door_id: None,
            bidirectional: true,
            inferred: false,
            confidence: 1.0,
        }
    }

    #[test]
    fn linear_chain_matches_s1() {
        let level = Level {
            id: "l1".into(),
            name: String::new(),
            map: MapSize {
                width: 10,
                height: 10,
            },
            rooms: (1..=5).map(|i| room(&format!("r{i}"))).collect(),
            corridors: vec![],
            connections: vec![conn("r1", "r2"), conn("r2", "r3"), conn("r3", "r4"), conn("r4", "r5")],
            doors: vec![],
            game_elements: vec![],
        };
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let outcome = DegreeVariance.evaluate(&level, &graph);
        assert!((outcome.score - 0.32).abs() < 0.01);
    }

    #[test]
    fn square_loop_matches_s2() {
        let level = Level {
            id: "l1".into(),
            name: String::new(),
            map: MapSize {
                width: 10,
                height: 10,
            },
            rooms: (1..=4).map(|i| room(&format!("r{i}"))).collect(),
            corridors: vec![],
            connections: vec![conn("r1", "r2"), conn("r2", "r3"), conn("r3", "r4"), conn("r4", "r1")],
            doors: vec![],
            game_elements: vec![],
        };
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let outcome = DegreeVariance.evaluate(&level, &graph);
        assert!((outcome.score - 0.135).abs() < 0.01);
    }
}
