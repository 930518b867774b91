// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.6 Loop Ratio: closeness of the cyclomatic ratio to a target of
//! 0.3 (a handful of loops, not a maze of them).

use crate::graph::DungeonGraph;
use crate::model::Level;
use crate::rules::{Category, Rule, RuleOutcome};
use crate::util::gaussian_closeness;

pub struct LoopRatio;

impl Rule for LoopRatio {
    fn id(&self) -> &'static str {
        "loop_ratio"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn evaluate(&self, _level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if graph.edge_count() == 0 {
            return RuleOutcome::degenerate("no edges");
        }
        let mu = graph.cyclomatic_number();
        let ratio = mu as f64 / graph.edge_count() as f64;
        let score = gaussian_closeness(ratio, 0.3, 0.15);

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "cyclomatic_number": mu,
                "ratio": ratio,
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
    fn chain_matches_s1() {
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
        let outcome = LoopRatio.evaluate(&level, &graph);
        assert!((outcome.score - 0.135).abs() < 0.01);
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
        let outcome = LoopRatio.evaluate(&level, &graph);
        assert!((outcome.score - 0.946).abs() < 0.01);
    }
}
