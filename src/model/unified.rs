// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The unified model proper (§3, §4.A): a validated [`Document`] plus the
//! operations every downstream component relies on.

use std::collections::HashSet;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{DungeonQualityError, Result};
use crate::model::document::{self, Document, GameElementKind, RoomDoc};

/// Identifies a graph node: either a room or a corridor. Corridors are
/// first-class nodes by default (see [`crate::graph::GraphOptions`]),
/// resolving the Open Question of spec.md §9.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Room(String),
    Corridor(String),
}

impl NodeId {
    pub fn raw_id(&self) -> &str {
        match self {
            NodeId::Room(id) | NodeId::Corridor(id) => id,
        }
    }

    pub fn is_room(&self) -> bool {
        matches!(self, NodeId::Room(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Room(id) => write!(f, "room:{id}"),
            NodeId::Corridor(id) => write!(f, "corridor:{id}"),
        }
    }
}

/// The canonical typed structure produced by adapters and consumed by
/// rules (§3). Wraps the wire-schema [`Document`] plus the invariants
/// from §3 that must hold before any rule runs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnifiedDungeon {
    document: Document,
}

impl UnifiedDungeon {
    /// Constructs a model from a raw, already-unified document, performing
    /// only the structural checks that the schema itself cannot express
    /// (§4.A `from_document`). Returns [`DungeonQualityError::InvalidInput`]
    /// when a required field is missing or malformed.
    pub fn from_document(document: Document) -> Result<Self> {
        if document.header.schema_name.is_empty() {
            return Err(DungeonQualityError::invalid_input(
                "header.schemaName",
                "missing schema name",
            ));
        }
        for (li, level) in document.levels.iter().enumerate() {
            for (ri, room) in level.rooms.iter().enumerate() {
                check_finite_position(&room.position, &format!("levels[{li}].rooms[{ri}]"))?;
            }
            for (ci, corridor) in level.corridors.iter().enumerate() {
                check_finite_position(
                    &corridor.position,
                    &format!("levels[{li}].corridors[{ci}]"),
                )?;
            }
            for (gi, elem) in level.game_elements.iter().enumerate() {
                check_finite_position(
                    &elem.position,
                    &format!("levels[{li}].gameElements[{gi}]"),
                )?;
            }
        }
        Ok(UnifiedDungeon { document })
    }

    pub fn header(&self) -> &document::Header {
        &self.document.header
    }

    pub fn levels(&self) -> &[document::Level] {
        &self.document.levels
    }

    pub fn levels_mut(&mut self) -> &mut Vec<document::Level> {
        &mut self.document.levels
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Rebuilds the model with `levels` replaced, used by the spatial
    /// inference engine to append inferred connections/doors without
    /// mutating `self` in place (§9 re-architecture guidance).
    pub fn with_levels(&self, levels: Vec<document::Level>) -> Self {
        UnifiedDungeon {
            document: Document {
                header: self.document.header.clone(),
                levels,
            },
        }
    }

    /// Checks invariants I1–I5 (§3). Fails with `InvalidModel` on an I1
    /// violation (a connection endpoint that resolves to nothing); returns
    /// the list of I4 warnings (dropped game elements) otherwise.
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();
        for (li, level) in self.document.levels.iter().enumerate() {
            let node_ids: HashSet<&str> = level
                .rooms
                .iter()
                .map(|r| r.id.as_str())
                .chain(level.corridors.iter().map(|c| c.id.as_str()))
                .collect();

            for (ci, conn) in level.connections.iter().enumerate() {
                if !node_ids.contains(conn.from_room.as_str()) {
                    return Err(DungeonQualityError::invalid_model(
                        format!("levels[{li}].connections[{ci}].from_room"),
                        format!("'{}' does not resolve to any room or corridor", conn.from_room),
                    ));
                }
                if !node_ids.contains(conn.to_room.as_str()) {
                    return Err(DungeonQualityError::invalid_model(
                        format!("levels[{li}].connections[{ci}].to_room"),
                        format!("'{}' does not resolve to any room or corridor", conn.to_room),
                    ));
                }
            }

            for (gi, elem) in level.game_elements.iter().enumerate() {
                if nearest_room(level, elem).is_none() {
                    warnings.push(format!(
                        "levels[{li}].gameElements[{gi}] ('{}'): no room found near position ({}, {}); dropped",
                        elem.id, elem.position.x, elem.position.y
                    ));
                }
            }
        }
        Ok(warnings)
    }

    /// Checks I1 and applies I4: drops game elements whose nearest room
    /// cannot be determined, returning the filtered model and the I4
    /// warnings produced. Propagates `InvalidModel` on an I1 violation
    /// rather than silently continuing past it.
    pub fn drop_unplaceable_elements(&self) -> Result<(Self, Vec<String>)> {
        let warnings = self.validate()?;
        let levels = self
            .document
            .levels
            .iter()
            .map(|level| {
                let mut level = level.clone();
                level
                    .game_elements
                    .retain(|elem| nearest_room(&level, elem).is_some());
                level
            })
            .collect();
        Ok((self.with_levels(levels), warnings))
    }
}

fn check_finite_position(position: &document::PositionDoc, path: &str) -> Result<()> {
    if !position.x.is_finite() || !position.y.is_finite() {
        return Err(DungeonQualityError::invalid_input(
            format!("{path}.position"),
            "position coordinates must be finite numbers",
        ));
    }
    Ok(())
}

/// Finds the room whose bounds are nearest to `elem`'s position, used for
/// I4. Corridors never count as a game element's containing room.
pub fn nearest_room<'a>(
    level: &'a document::Level,
    elem: &document::GameElementDoc,
) -> Option<&'a RoomDoc> {
    level
        .rooms
        .iter()
        .min_by_key(|room| OrderedFloat(distance_to_room(room, &elem.position)))
        .filter(|_| !level.rooms.is_empty())
}

fn distance_to_room(room: &RoomDoc, pos: &document::PositionDoc) -> f64 {
    let cx = room.position.x + room.size.width / 2.0;
    let cy = room.position.y + room.size.height / 2.0;
    ((pos.x - cx).powi(2) + (pos.y - cy).powi(2)).sqrt()
}

pub(crate) fn is_monster_or_boss(kind: GameElementKind) -> bool {
    matches!(kind, GameElementKind::Monster | GameElementKind::Boss)
}
