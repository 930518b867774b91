// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The Spatial Inference Engine (§4.C): recovers missing topology from
//! geometry alone.
//!
//! The engine never mutates its input; it rebuilds the model with
//! appended collections (§9 re-architecture guidance), which is
//! behaviorally equivalent to in-place mutation and plays nicely with
//! Rust's ownership rules.

use std::collections::HashSet;

use cgmath::{InnerSpace, Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::graph::{DungeonGraph, GraphOptions};
use crate::model::{
    ConnectionDoc, DoorDoc, DoorEndpoints, Level, NodeId, RoomDoc, UnifiedDungeon,
};

/// Configuration for [`infer`] (§4.C).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpatialInferenceOptions {
    /// Maximum gap, in grid units, between two bounds considered adjacent.
    pub adjacency_threshold: f64,
    /// Minimum length of shared edge, in grid units, for adjacency.
    pub min_overlap: f64,
    pub infer_doors: bool,
    pub infer_entrance_exit: bool,
}

impl Default for SpatialInferenceOptions {
    fn default() -> Self {
        SpatialInferenceOptions {
            adjacency_threshold: 1.0,
            min_overlap: 0.5,
            infer_doors: true,
            infer_entrance_exit: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Rect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Rect {
    fn of(position: (f64, f64), size: (f64, f64)) -> Self {
        Rect {
            min_x: position.0,
            min_y: position.1,
            max_x: position.0 + size.0,
            max_y: position.1 + size.1,
        }
    }

    fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    fn centroid(&self) -> Point2<f64> {
        Point2::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

struct Adjacency {
    overlap: f64,
    confidence: f64,
    midpoint: Point2<f64>,
}

/// Tests horizontal adjacency (a's right edge near b's left edge, or vice
/// versa), returning the overlap along Y if the gap is within threshold
/// and the overlap is at least `min_overlap`.
fn horizontal_adjacency(a: Rect, b: Rect, threshold: f64, min_overlap: f64) -> Option<Adjacency> {
    let overlap_y = a.max_y.min(b.max_y) - a.min_y.max(b.min_y);
    if overlap_y < min_overlap {
        return None;
    }
    let (gap, edge_x) = if (b.min_x - a.max_x).abs() <= (a.min_x - b.max_x).abs() {
        (b.min_x - a.max_x, (a.max_x + b.min_x) / 2.0)
    } else {
        (a.min_x - b.max_x, (b.max_x + a.min_x) / 2.0)
    };
    if gap.abs() > threshold {
        return None;
    }
    let overlap_min_y = a.min_y.max(b.min_y);
    Some(Adjacency {
        overlap: overlap_y,
        confidence: (overlap_y / a.height().min(b.height())).min(1.0),
        midpoint: Point2::new(edge_x, overlap_min_y + overlap_y / 2.0),
    })
}

fn vertical_adjacency(a: Rect, b: Rect, threshold: f64, min_overlap: f64) -> Option<Adjacency> {
    let overlap_x = a.max_x.min(b.max_x) - a.min_x.max(b.min_x);
    if overlap_x < min_overlap {
        return None;
    }
    let (gap, edge_y) = if (b.min_y - a.max_y).abs() <= (a.min_y - b.max_y).abs() {
        (b.min_y - a.max_y, (a.max_y + b.min_y) / 2.0)
    } else {
        (a.min_y - b.max_y, (b.max_y + a.min_y) / 2.0)
    };
    if gap.abs() > threshold {
        return None;
    }
    let overlap_min_x = a.min_x.max(b.min_x);
    Some(Adjacency {
        overlap: overlap_x,
        confidence: (overlap_x / a.width().min(b.width())).min(1.0),
        midpoint: Point2::new(overlap_min_x + overlap_x / 2.0, edge_y),
    })
}

fn best_adjacency(a: Rect, b: Rect, threshold: f64, min_overlap: f64) -> Option<Adjacency> {
    let h = horizontal_adjacency(a, b, threshold, min_overlap);
    let v = vertical_adjacency(a, b, threshold, min_overlap);
    match (h, v) {
        (Some(h), Some(v)) => Some(if h.overlap >= v.overlap { h } else { v }),
        (Some(h), None) => Some(h),
        (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// A spatial node: a room or corridor plus its rectangle, used only
/// internally while inferring adjacency.
struct SpatialNode {
    node_id: NodeId,
    rect: Rect,
}

fn spatial_nodes(level: &Level) -> Vec<SpatialNode> {
    level
        .rooms
        .iter()
        .map(|r| SpatialNode {
            node_id: NodeId::Room(r.id.clone()),
            rect: Rect::of((r.position.x, r.position.y), (r.size.width, r.size.height)),
        })
        .chain(level.corridors.iter().map(|c| SpatialNode {
            node_id: NodeId::Corridor(c.id.clone()),
            rect: Rect::of((c.position.x, c.position.y), (c.size.width, c.size.height)),
        }))
        .collect()
}

/// Runs spatial inference on `model`, returning an enriched copy. Existing
/// connections are never removed; only new ones are appended, each
/// flagged `inferred = true` with `confidence < 1.0` (§4.C invariant).
pub fn infer(model: &UnifiedDungeon, options: &SpatialInferenceOptions) -> UnifiedDungeon {
    let levels = model
        .levels()
        .iter()
        .map(|level| infer_level(level, options))
        .collect();
    model.with_levels(levels)
}

fn infer_level(level: &Level, options: &SpatialInferenceOptions) -> Level {
    let mut level = level.clone();

    let existing: HashSet<(String, String)> = level
        .connections
        .iter()
        .flat_map(|c| [
            (c.from_room.clone(), c.to_room.clone()),
            (c.to_room.clone(), c.from_room.clone()),
        ])
        .collect();

    let nodes = spatial_nodes(&level);
    let mut new_connections = Vec::new();
    let mut new_doors = Vec::new();
    let mut next_conn_id = level.connections.len();
    let mut next_door_id = level.doors.len();

    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let a = &nodes[i];
            let b = &nodes[j];
            if existing.contains(&(a.node_id.raw_id().to_string(), b.node_id.raw_id().to_string())) {
                continue;
            }
            let Some(adj) = best_adjacency(a.rect, b.rect, options.adjacency_threshold, options.min_overlap)
            else {
                continue;
            };

            new_connections.push(ConnectionDoc {
                id: format!("inferred-conn-{next_conn_id}"),
                from_room: a.node_id.raw_id().to_string(),
                to_room: b.node_id.raw_id().to_string(),
                door_type: options.infer_doors.then(|| "inferred".to_string()),
                door_id: None,
                bidirectional: true,
                inferred: true,
                confidence: adj.confidence,
            });
            next_conn_id += 1;

            if options.infer_doors {
                new_doors.push(DoorDoc {
                    id: format!("inferred-door-{next_door_id}"),
                    between: DoorEndpoints {
                        from_room: a.node_id.raw_id().to_string(),
                        to_room: b.node_id.raw_id().to_string(),
                    },
                    r#type: "inferred".to_string(),
                    position: Some(crate::model::PositionDoc {
                        x: adj.midpoint.x,
                        y: adj.midpoint.y,
                    }),
                    notes: None,
                    inferred: true,
                });
                next_door_id += 1;
            }
        }
    }

    level.connections.extend(new_connections);
    level.doors.extend(new_doors);

    if options.infer_entrance_exit && !level.rooms.iter().any(|r| r.is_entrance || r.is_exit) {
        infer_entrance_exit(&mut level);
    }

    level
}

/// Computes the convex hull of a set of points (monotone chain), returning
/// the hull vertices in counter-clockwise order.
fn convex_hull(mut points: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap().then(a.y.partial_cmp(&b.y).unwrap()));
    points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    if points.len() < 3 {
        return points;
    }

    fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
        let oa: Vector2<f64> = a - o;
        let ob: Vector2<f64> = b - o;
        oa.x * ob.y - oa.y * ob.x
    }

    let mut lower: Vec<Point2<f64>> = Vec::new();
    for &p in &points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point2<f64>> = Vec::new();
    for &p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn on_hull(point: Point2<f64>, hull: &[Point2<f64>]) -> bool {
    hull.iter().any(|h| (h.x - point.x).abs() < 1e-9 && (h.y - point.y).abs() < 1e-9)
}

/// Entrance/exit labelling (§4.C), applied only when no room already
/// carries either flag.
fn infer_entrance_exit(level: &mut Level) {
    if level.rooms.is_empty() {
        return;
    }
    let graph = DungeonGraph::build(level, GraphOptions::default(), None, None);

    let centroids: Vec<Point2<f64>> = level
        .rooms
        .iter()
        .map(|r| Rect::of((r.position.x, r.position.y), (r.size.width, r.size.height)).centroid())
        .collect();
    let hull = convex_hull(centroids.clone());

    let degree_one_on_hull: Vec<&RoomDoc> = level
        .rooms
        .iter()
        .zip(&centroids)
        .filter(|(room, centroid)| {
            graph.degree(&NodeId::Room(room.id.clone())) == 1 && on_hull(**centroid, &hull)
        })
        .map(|(room, _)| room)
        .collect();

    let entrance_id = if let Some(room) = degree_one_on_hull.first() {
        room.id.clone()
    } else {
        level
            .rooms
            .iter()
            .zip(&centroids)
            .min_by(|(ra, ca), (rb, cb)| {
                ca.x
                    .partial_cmp(&cb.x)
                    .unwrap()
                    .then(ca.y.partial_cmp(&cb.y).unwrap())
                    .then(ra.id.cmp(&rb.id))
            })
            .map(|(room, _)| room.id.clone())
            .unwrap()
    };

    let distances = graph.bfs_distances(&NodeId::Room(entrance_id.clone()));
    let exit_id = level
        .rooms
        .iter()
        .zip(&centroids)
        .filter(|(room, _)| room.id != entrance_id)
        .max_by(|(ra, ca), (rb, cb)| {
            let da = distances.get(&NodeId::Room(ra.id.clone())).copied().unwrap_or(0);
            let db = distances.get(&NodeId::Room(rb.id.clone())).copied().unwrap_or(0);
            let entrance_centroid = centroids[level.rooms.iter().position(|r| r.id == entrance_id).unwrap()];
            da.cmp(&db)
                .then(
                    (ca - entrance_centroid)
                        .magnitude()
                        .partial_cmp(&(cb - entrance_centroid).magnitude())
                        .unwrap(),
                )
                .then(rb.id.cmp(&ra.id))
        })
        .map(|(room, _)| room.id.clone());

    for room in &mut level.rooms {
        if room.id == entrance_id {
            room.is_entrance = true;
        }
        if Some(&room.id) == exit_id.as_ref() {
            room.is_exit = true;
        }
    }
}
