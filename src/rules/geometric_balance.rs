// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! §4.D.9 Geometric Balance: mirror symmetry, room area uniformity, and
//! spacing uniformity, combined by geometric mean.

use itertools::Itertools;

use crate::graph::DungeonGraph;
use crate::model::{Level, NodeId, RoomDoc};
use crate::rules::{Category, Rule, RuleOutcome};
use crate::util::{euclidean_distance, geometric_mean_positive, uniformity_from_cv};

pub struct GeometricBalance;

impl Rule for GeometricBalance {
    fn id(&self) -> &'static str {
        "geometric_balance"
    }

    fn category(&self) -> Category {
        Category::Aesthetic
    }

    fn evaluate(&self, level: &Level, graph: &DungeonGraph) -> RuleOutcome {
        if level.rooms.len() < 2 {
            return RuleOutcome::degenerate("fewer than two rooms");
        }

        let symmetry = symmetry_score(&level.rooms);

        let areas: Vec<f64> = level.rooms.iter().map(room_area).collect();
        let area_uniformity = uniformity_from_cv(&areas);

        let spacing_uniformity = spacing_uniformity(level, graph);

        let score = geometric_mean_positive(&[symmetry, area_uniformity, spacing_uniformity]);

        RuleOutcome::scored(
            score,
            serde_json::json!({
                "symmetry": symmetry,
                "area_uniformity": area_uniformity,
                "spacing_uniformity": spacing_uniformity,
            }),
        )
    }
}

fn room_area(room: &RoomDoc) -> f64 {
    room.size.width * room.size.height
}

fn room_center(room: &RoomDoc) -> (f64, f64) {
    (
        room.position.x + room.size.width / 2.0,
        room.position.y + room.size.height / 2.0,
    )
}

/// Fraction of rooms that have a mirror counterpart across the map's
/// vertical midline, within a tolerance of `1%` of the map's width (§4.D.9).
fn symmetry_score(rooms: &[RoomDoc]) -> f64 {
    let min_x = rooms
        .iter()
        .map(|r| r.position.x)
        .fold(f64::INFINITY, f64::min);
    let max_x = rooms
        .iter()
        .map(|r| r.position.x + r.size.width)
        .fold(f64::NEG_INFINITY, f64::max);
    let x_mid = (min_x + max_x) / 2.0;
    let tolerance = 0.01 * (max_x - min_x).max(1e-9);

    let centers: Vec<(f64, f64)> = rooms.iter().map(room_center).collect();
    let mut matched = vec![false; rooms.len()];
    let mut matches = 0usize;

    for i in 0..rooms.len() {
        if matched[i] {
            continue;
        }
        let (cx, cy) = centers[i];
        let mirror_x = 2.0 * x_mid - cx;
        for j in (i + 1)..rooms.len() {
            if matched[j] {
                continue;
            }
            let (ox, oy) = centers[j];
            if (ox - mirror_x).abs() <= tolerance && (oy - cy).abs() <= tolerance {
                matched[i] = true;
                matched[j] = true;
                matches += 2;
                break;
            }
        }
    }

    matches as f64 / rooms.len() as f64
}

/// Uniformity of pairwise room spacing. Prefers distances between rooms
/// that are graph-connected (the distances a player actually walks); falls
/// back to every pair when fewer than two rooms are connected.
fn spacing_uniformity(level: &Level, graph: &DungeonGraph) -> f64 {
    let centers: std::collections::HashMap<&str, (f64, f64)> = level
        .rooms
        .iter()
        .map(|r| (r.id.as_str(), room_center(r)))
        .collect();

    let mut connected_distances = Vec::new();
    for room in &level.rooms {
        let node = NodeId::Room(room.id.clone());
        for neighbor in graph.neighbors(&node) {
            if let NodeId::Room(other_id) = neighbor {
                if other_id.as_str() > room.id.as_str() {
                    let (ax, ay) = centers[room.id.as_str()];
                    let (bx, by) = centers[other_id.as_str()];
                    connected_distances.push(euclidean_distance(ax, ay, bx, by));
                }
            }
        }
    }

    if connected_distances.len() >= 2 {
        return uniformity_from_cv(&connected_distances);
    }

    let all_distances: Vec<f64> = level
        .rooms
        .iter()
        .tuple_combinations()
        .map(|(a, b)| {
            let (ax, ay) = room_center(a);
            let (bx, by) = room_center(b);
            euclidean_distance(ax, ay, bx, by)
        })
        .collect();
    uniformity_from_cv(&all_distances)
}
