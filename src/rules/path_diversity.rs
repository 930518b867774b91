// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.7 Path Diversity: how many distinct shortest paths typically
//! connect a pair of rooms.
//!
//! Pair enumeration is capped at 500 (spec.md §9) by uniform random
//! sampling with a fixed seed derived from the level id, so repeated
//! evaluations of the same model are bit-for-bit identical (§8: "Running
//! assess() twice on the same model yields identical scores").

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::graph::DungeonGraph;
use crate::model::{Level, NodeId};
use crate::rules::{Category, Rule, RuleOutcome};
use crate::util::{gaussian_closeness, mean};

const MAX_DISTANCE: usize = 6;
const PAIR_CAP: usize = 500;

pub struct PathDiversity;

impl Rule for PathDiversity {
    fn id(&self) -> &'static str {
        "path_diversity"
    }

    fn category(&self) -> Category {
        Category::Gameplay
    }

    fn evaluate(&self, level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if level.rooms.len() < 2 {
            return RuleOutcome::degenerate("fewer than two rooms");
        }

        let mut room_ids: Vec<String> = level.rooms.iter().map(|r| r.id.clone()).collect();
        room_ids.sort();

        let mut counts = Vec::new();
        for (i, a) in room_ids.iter().enumerate() {
            let from_a = graph.bfs_distances_and_path_counts(&NodeId::Room(a.clone()));
            for b in &room_ids[(i + 1)..] {
                if let Some(&(dist, count)) = from_a.get(&NodeId::Room(b.clone())) {
                    if dist >= 1 && dist <= MAX_DISTANCE {
                        counts.push(count as f64);
                    }
                }
            }
        }

        if counts.is_empty() {
            return RuleOutcome {
                score: 0.3,
                detail: serde_json::json!({ "sampled_pairs": 0 }),
                reason: Some("no room pair has any path within distance 6".to_string()),
            };
        }

        let sampled = if counts.len() > PAIR_CAP {
            let seed = seed_from_level_id(&level.id);
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let mut indices: Vec<usize> = (0..counts.len()).collect();
            indices.shuffle(&mut rng);
            indices.truncate(PAIR_CAP);
            indices.into_iter().map(|i| counts[i]).collect::<Vec<_>>()
        } else {
            counts.clone()
        };

        let avg = mean(&sampled);
        let score = gaussian_closeness(avg, 2.0, 1.0);

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "average_path_count": avg,
                "pairs_considered": counts.len(),
                "pairs_sampled": sampled.len(),
            }),
        )
    }
}

fn seed_from_level_id(level_id: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    level_id.hash(&mut hasher);
    hasher.finish()
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
    fn diamond_graph_has_two_shortest_paths() {
        // r1-r2-r4 and r1-r3-r4: two distinct shortest paths of length 2.
        let level = Level {
            id: "l1".into(),
            name: String::new(),
            map: MapSize {
                width: 10,
                height: 10,
            },
            rooms: vec![room("r1"), room("r2"), room("r3"), room("r4")],
            corridors: vec![],
            connections: vec![conn("r1", "r2"), conn("r1", "r3"), conn("r2", "r4"), conn("r3", "r4")],
            doors: vec![],
            game_elements: vec![],
        };
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let counts = graph.bfs_distances_and_path_counts(&NodeId::Room("r1".into()));
        assert_eq!(counts[&NodeId::Room("r4".into())], (2, 2));
    }

    #[test]
    fn disconnected_single_room_degenerate() {
        let level = Level {
            id: "l1".into(),
            name: String::new(),
            map: MapSize {
                width: 10,
                height: 10,
            },
            rooms: vec![room("r1")],
            corridors: vec![],
            connections: vec![],
            doors: vec![],
            game_elements: vec![],
        };
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let outcome = PathDiversity.evaluate(&level, &graph);
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.reason.is_some());
    }

    #[test]
    fn deterministic_across_runs() {
        let level = Level {
            id: "seed-level".into(),
            name: String::new(),
            map: MapSize {
                width: 10,
                height: 10,
            },
            rooms: (1..=20).map(|i| room(&format!("r{i}"))).collect(),
            corridors: vec![],
            connections: (1..20).map(|i| conn(&format!("r{i}"), &format!("r{}", i + 1))).collect(),
            doors: vec![],
            game_elements: vec![],
        };
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let a = PathDiversity.evaluate(&level, &graph);
        let b = PathDiversity.evaluate(&level, &graph);
        assert_eq!(a.score, b.score);
    }
}
