// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! Typed view of the unified wire schema (§6).
//!
//! These types deserialize the authoritative JSON schema directly; they are
//! intentionally permissive about optional fields (adapters populate
//! defaults) but do not themselves enforce I1–I5 — that is
//! [`super::unified::UnifiedDungeon::validate`]'s job.

use serde::{Deserialize, Serialize};

pub const UNIFIED_SCHEMA_NAME: &str = "dnd-dungeon-unified";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub header: Header,
    pub levels: Vec<Level>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub schema_name: String,
    pub schema_version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub grid: GridSpec,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(rename = "type", default = "default_grid_type")]
    pub kind: String,
    /// Defaults to 5 ft square per I5.
    #[serde(default = "default_grid_size")]
    pub size: i64,
    #[serde(default = "default_grid_unit")]
    pub unit: String,
}

fn default_grid_type() -> String {
    "square".to_string()
}
fn default_grid_size() -> i64 {
    5
}
fn default_grid_unit() -> String {
    "ft".to_string()
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            kind: default_grid_type(),
            size: default_grid_size(),
            unit: default_grid_unit(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub map: MapSize,
    #[serde(default)]
    pub rooms: Vec<RoomDoc>,
    #[serde(default)]
    pub corridors: Vec<RoomDoc>,
    #[serde(default)]
    pub connections: Vec<ConnectionDoc>,
    #[serde(default)]
    pub doors: Vec<DoorDoc>,
    #[serde(default)]
    pub game_elements: Vec<GameElementDoc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MapSize {
    pub width: i64,
    pub height: i64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PositionDoc {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SizeDoc {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rectangle,
    Circle,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoomDoc {
    pub id: String,
    pub shape: Shape,
    pub position: PositionDoc,
    pub size: SizeDoc,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_entrance: bool,
    #[serde(default)]
    pub is_exit: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionDoc {
    pub id: String,
    pub from_room: String,
    pub to_room: String,
    #[serde(default)]
    pub door_type: Option<String>,
    #[serde(default)]
    pub door_id: Option<String>,
    #[serde(default = "default_true")]
    pub bidirectional: bool,
    #[serde(default)]
    pub inferred: bool,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_true() -> bool {
    true
}
fn default_confidence() -> f64 {
    1.0
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoorEndpoints {
    pub from_room: String,
    pub to_room: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoorDoc {
    pub id: String,
    pub between: DoorEndpoints,
    #[serde(default = "default_door_type")]
    pub r#type: String,
    #[serde(default)]
    pub position: Option<PositionDoc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub inferred: bool,
}

fn default_door_type() -> String {
    "standard".to_string()
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameElementKind {
    Treasure,
    Monster,
    Boss,
    Trap,
    Npc,
    Mechanism,
    Special,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameElementDoc {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GameElementKind,
    pub position: PositionDoc,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub r#ref: Option<String>,
}

impl Document {
    /// Returns the format tag "unified" iff the header carries the reserved
    /// schema name, per §4.B.
    pub fn is_unified(&self) -> bool {
        self.header.schema_name == UNIFIED_SCHEMA_NAME
    }
}
