// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! An example second adapter (§4.B) for a bare rectangular-grid export: no
//! `header`, just a `grid` size and a flat list of `cells`. Exists to
//! exercise the registry with more than one format, so ambiguous-match and
//! no-match detection paths have something real to disambiguate between.

use std::collections::HashMap;

use serde::Deserialize;

use crate::adapters::Adapter;
use crate::error::Result;
use crate::model::{
    ConnectionDoc, Document, GridSpec, Header, Level, MapSize, PositionDoc, RoomDoc, Shape,
    SizeDoc, UnifiedDungeon, UNIFIED_SCHEMA_NAME,
};

#[derive(Deserialize)]
struct LegacyGridDoc {
    grid: LegacyGridSpec,
    cells: Vec<LegacyCell>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyGridSpec {
    cols: i64,
    rows: i64,
    cell_size: f64,
}

#[derive(Deserialize)]
struct LegacyCell {
    x: i64,
    y: i64,
    room: bool,
}

pub struct LegacyGridAdapter;

impl Adapter for LegacyGridAdapter {
    fn id(&self) -> &'static str {
        "legacy_grid"
    }

    fn detect(&self, raw: &serde_json::Value) -> f64 {
        let looks_like_grid = raw.get("grid").is_some() && raw.get("cells").is_some();
        let has_header = raw.get("header").is_some();
        if looks_like_grid && !has_header {
            1.0
        } else {
            0.0
        }
    }

    fn convert(&self, raw: serde_json::Value) -> Result<UnifiedDungeon> {
        let doc: LegacyGridDoc =
            serde_json::from_value(raw).map_err(|e| crate::error::DungeonQualityError::conversion_failed("legacy_grid", e))?;

        let cell_size = doc.grid.cell_size;
        let room_cells: HashMap<(i64, i64), &LegacyCell> = doc
            .cells
            .iter()
            .filter(|c| c.room)
            .map(|c| ((c.x, c.y), c))
            .collect();

        let room_id = |x: i64, y: i64| -> String { format!("r{x}_{y}") };

        let rooms: Vec<RoomDoc> = room_cells
            .values()
            .map(|c| RoomDoc {
                id: room_id(c.x, c.y),
                shape: Shape::Rectangle,
                position: PositionDoc {
                    x: c.x as f64 * cell_size,
                    y: c.y as f64 * cell_size,
                },
                size: SizeDoc {
                    width: cell_size,
                    height: cell_size,
                },
                name: None,
                description: None,
                is_entrance: false,
                is_exit: false,
            })
            .collect();

        let mut connections = Vec::new();
        for &(x, y) in room_cells.keys() {
            for (nx, ny) in [(x + 1, y), (x, y + 1)] {
                if room_cells.contains_key(&(nx, ny)) {
                    connections.push(ConnectionDoc {
                        id: format!("conn-{x}-{y}-{nx}-{ny}"),
                        from_room: room_id(x, y),
                        to_room: room_id(nx, ny),
                        door_type: None,
                        door_id: None,
                        bidirectional: true,
                        inferred: false,
                        confidence: 1.0,
                    });
                }
            }
        }

        let level = Level {
            id: "level-1".to_string(),
            name: String::new(),
            map: MapSize {
                width: doc.grid.cols * cell_size as i64,
                height: doc.grid.rows * cell_size as i64,
            },
            rooms,
            corridors: vec![],
            connections,
            doors: vec![],
            game_elements: vec![],
        };

        let document = Document {
            header: Header {
                schema_name: UNIFIED_SCHEMA_NAME.to_string(),
                schema_version: "1.0.0".to_string(),
                name: String::new(),
                author: String::new(),
                description: "converted from legacy_grid".to_string(),
                grid: GridSpec {
                    kind: "square".to_string(),
                    size: cell_size as i64,
                    unit: "ft".to_string(),
                },
            },
            levels: vec![level],
        };

        UnifiedDungeon::from_document(document)
    }
}
