// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.3 Door Distribution: quantity, uniformity, and connectivity of
//! doors incident to rooms (corridors excluded from the room population).
//!
//! A room's door count is taken as its degree in the shared graph: each
//! incident edge represents one doorway to a neighboring room or
//! corridor, whether that edge came from an explicit `doors` entry or
//! merely a `connections` entry without door detail.

use crate::graph::DungeonGraph;
use crate::model::{Level, NodeId};
use crate::rules::{Category, Rule, RuleOutcome};
use crate::util::{clamp01, mean, variance};

pub struct DoorDistribution;

impl Rule for DoorDistribution {
    fn id(&self) -> &'static str {
        "door_distribution"
    }

    fn category(&self) -> Category {
        Category::Structural
    }

    fn evaluate(&self, level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if level.rooms.is_empty() {
            return RuleOutcome::degenerate("no rooms");
        }
        let counts: Vec<f64> = level
            .rooms
            .iter()
            .map(|r| graph.degree(&NodeId::Room(r.id.clone())) as f64)
            .collect();

        let m = mean(&counts);
        let s_q = if m < 1.5 {
            if m <= 0.0 { 0.0 } else { m / 1.5 }
        } else if m > 3.0 {
            (1.0 - (m - 3.0) / 3.0).max(0.0)
        } else {
            1.0
        };

        let cv2 = if m == 0.0 { 1.0 } else { variance(&counts) / (m * m) };
        let s_u = (1.0 - cv2).max(0.0);

        let isolated = counts.iter().filter(|c| **c == 0.0).count();
        let s_c = 1.0 - isolated as f64 / level.rooms.len() as f64;

        let score = 0.4 * s_q + 0.4 * s_u + 0.2 * s_c;

        RuleOutcome::scored(
            clamp01(score),
            serde_json::json!({
                "mean_doors_per_room": m,
                "quantity_score": s_q,
                "uniformity_score": s_u,
                "connectivity_score": s_c,
                "isolated_rooms": isolated,
            }),
        )
    }
}
