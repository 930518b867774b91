// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.8 Treasure/Monster Distribution: how evenly treasure and
//! monster-or-boss elements are spread across rooms, and whether treasure
//! tends to sit near the things guarding it.

use std::collections::HashMap;

use crate::graph::DungeonGraph;
use crate::model::unified::is_monster_or_boss;
use crate::model::{GameElementKind, Level};
use crate::rules::{Category, Rule, RuleOutcome};
use crate::util::{euclidean_distance, geometric_mean_positive, uniformity_from_cv};

pub struct TreasureMonsterDistribution;

impl Rule for TreasureMonsterDistribution {
    fn id(&self) -> &'static str {
        "treasure_monster_distribution"
    }

    fn category(&self) -> Category {
        Category::Gameplay
    }

    fn evaluate(&self, level: &Level, _graph: &DungeonGraph) -> RuleOutcome {
        if level.rooms.is_empty() {
            return RuleOutcome::degenerate("no rooms");
        }

        let mut treasure_positions = Vec::new();
        let mut monster_positions = Vec::new();
        let mut treasure_per_room: HashMap<&str, u32> = HashMap::new();
        let mut monster_per_room: HashMap<&str, u32> = HashMap::new();

        for elem in &level.game_elements {
            let Some(room) = crate::model::unified::nearest_room(level, elem) else {
                continue;
            };
            if elem.kind == GameElementKind::Treasure {
                treasure_positions.push(elem.position);
                *treasure_per_room.entry(room.id.as_str()).or_insert(0) += 1;
            } else if is_monster_or_boss(elem.kind) {
                monster_positions.push(elem.position);
                *monster_per_room.entry(room.id.as_str()).or_insert(0) += 1;
            }
        }

        if treasure_positions.is_empty() {
            return RuleOutcome::degenerate("no treasure elements");
        }

        // Uniformity is computed over rooms that actually hold at least one
        // item of the relevant kind: an empty room contributes no signal
        // about how evenly occupied rooms share the load.
        let treasure_counts: Vec<f64> = treasure_per_room.values().map(|&c| c as f64).collect();
        let uniformity_treasure = uniformity_from_cv(&treasure_counts);

        if monster_positions.is_empty() {
            return RuleOutcome {
                score: uniformity_treasure,
                detail: serde_json::json!({
                    "uniformity_treasure": uniformity_treasure,
                    "treasure_count": treasure_positions.len(),
                    "monster_count": 0,
                }),
                reason: Some("no monsters".to_string()),
            };
        }

        let monster_counts: Vec<f64> = monster_per_room.values().map(|&c| c as f64).collect();
        let uniformity_monster = uniformity_from_cv(&monster_counts);

        let diagonal =
            ((level.map.width.pow(2) + level.map.height.pow(2)) as f64).sqrt().max(1e-9);
        let mean_nearest_distance = treasure_positions
            .iter()
            .map(|t| {
                monster_positions
                    .iter()
                    .map(|m| euclidean_distance(t.x, t.y, m.x, m.y))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum::<f64>()
            / treasure_positions.len() as f64;
        let proximity = crate::util::clamp01(1.0 - mean_nearest_distance / diagonal);

        let score = geometric_mean_positive(&[uniformity_treasure, uniformity_monster, proximity]);

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "uniformity_treasure": uniformity_treasure,
                "uniformity_monster": uniformity_monster,
                "proximity": proximity,
                "treasure_count": treasure_positions.len(),
                "monster_count": monster_positions.len(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphOptions;
    use crate::model::{
        GameElementDoc, MapSize, PositionDoc, RoomDoc, Shape, SizeDoc,
    };

    fn room(id: &str, x: f64, y: f64) -> RoomDoc {
        RoomDoc {
            id: id.to_string(),
            shape: Shape::Rectangle,
            position: PositionDoc { x, y },
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

    fn elem(id: &str, kind: GameElementKind, x: f64, y: f64) -> GameElementDoc {
        GameElementDoc {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            position: PositionDoc { x, y },
            description: None,
            r#ref: None,
        }
    }

    fn base_level(elements: Vec<GameElementDoc>) -> Level {
        Level {
            id: "l1".into(),
            name: String::new(),
            map: MapSize {
                width: 100,
                height: 100,
            },
            rooms: vec![room("r1", 0.0, 0.0), room("r2", 50.0, 0.0)],
            corridors: vec![],
            connections: vec![],
            doors: vec![],
            game_elements: elements,
        }
    }

    #[test]
    fn single_treasure_and_monster_matches_s4() {
        let level = base_level(vec![
            elem("t1", GameElementKind::Treasure, 5.0, 5.0),
            elem("m1", GameElementKind::Monster, 5.0, 5.0),
        ]);
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let outcome = TreasureMonsterDistribution.evaluate(&level, &graph);
        assert!(outcome.score > 0.99, "expected near-1.0, got {}", outcome.score);
    }

    #[test]
    fn no_monsters_falls_back_to_treasure_uniformity() {
        let level = base_level(vec![elem("t1", GameElementKind::Treasure, 5.0, 5.0)]);
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let outcome = TreasureMonsterDistribution.evaluate(&level, &graph);
        assert_eq!(outcome.reason.as_deref(), Some("no monsters"));
        assert!((outcome.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn no_treasure_is_degenerate() {
        let level = base_level(vec![elem("m1", GameElementKind::Monster, 5.0, 5.0)]);
        let graph = DungeonGraph::build(&level, GraphOptions::default(), None, None);
        let outcome = TreasureMonsterDistribution.evaluate(&level, &graph);
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.reason.is_some());
    }
}
