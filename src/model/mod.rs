// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The Unified Dungeon Model (§3, §4.A): the single currency among every
//! other component in this crate.

pub mod document;
pub mod unified;

pub use document::{
    ConnectionDoc, Document, DoorDoc, DoorEndpoints, GameElementDoc, GameElementKind, GridSpec,
    Header, Level, MapSize, PositionDoc, RoomDoc, Shape, SizeDoc, UNIFIED_SCHEMA_NAME,
};
pub use unified::{NodeId, UnifiedDungeon};
