// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.5 Key Path Length: how much of the entrance's BFS eccentricity is
//! spent on the critical path to the exit.

use crate::graph::DungeonGraph;
use crate::model::Level;
use crate::rules::{Category, Rule, RuleOutcome};

pub struct KeyPathLength;

impl Rule for KeyPathLength {
    fn id(&self) -> &'static str {
        "key_path_length"
    }

    fn category(&self) -> Category {
        Category::Aesthetic
    }

    fn evaluate(&self, _level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        let (Some(entrance), Some(exit)) = (graph.entrance(), graph.exit()) else {
            return RuleOutcome::degenerate("no entrance/exit resolved");
        };
        let distances = graph.bfs_distances(entrance);
        let Some(&path_length) = distances.get(exit) else {
            return RuleOutcome::degenerate("exit unreachable from entrance");
        };
        let diameter = distances.values().copied().max().unwrap_or(0);
        let score = if diameter > 0 {
            path_length as f64 / diameter as f64
        } else {
            0.0
        };

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "path_length": path_length,
                "entrance_eccentricity": diameter,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphOptions;
    use crate::model::{ConnectionDoc, MapSize, NodeId, PositionDoc, RoomDoc, Shape, SizeDoc};

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
        let graph = DungeonGraph::build(
            &level,
            GraphOptions::default(),
            Some(NodeId::Room("r1".into())),
            Some(NodeId::Room("r5".into())),
        );
        let outcome = KeyPathLength.evaluate(&level, &graph);
        assert!((outcome.score - 1.0).abs() < 1e-9);
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
        let graph = DungeonGraph::build(
            &level,
            GraphOptions::default(),
            Some(NodeId::Room("r1".into())),
            Some(NodeId::Room("r3".into())),
        );
        let outcome = KeyPathLength.evaluate(&level, &graph);
        assert!((outcome.score - 1.0).abs() < 1e-9);
    }
}
