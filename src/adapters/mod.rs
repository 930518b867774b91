// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The Format Adapter Registry (§4.B): detects which third-party dungeon
//! format a raw JSON document is in, and converts it to the
//! [`crate::model::UnifiedDungeon`] every downstream component consumes.

mod legacy_grid;
mod unified;

pub use legacy_grid::LegacyGridAdapter;
pub use unified::UnifiedAdapter;

use crate::error::{DungeonQualityError, Result};
use crate::model::UnifiedDungeon;

/// One recognizable dungeon export format.
///
/// `detect` returns a confidence in `[0, 1]`; `0.0` means "definitely not
/// this format" and is treated the same as not matching at all. Adapters
/// must not raise from `detect` — only `convert` may fail, once a format
/// has already committed to handling the document.
pub trait Adapter: Send + Sync {
    fn id(&self) -> &'static str;
    fn detect(&self, raw: &serde_json::Value) -> f64;
    fn convert(&self, raw: serde_json::Value) -> Result<UnifiedDungeon>;
}

/// Holds the registered adapters and performs detection/conversion
/// (§4.B). Detection probes every adapter; registration order only
/// matters as the tie-break when two adapters report equal, nonzero
/// confidence (earliest registered wins, and the tie is logged).
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn Adapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        AdapterRegistry {
            adapters: Vec::new(),
        }
    }

    /// The reserved `"unified"` adapter plus the bundled example
    /// `"legacy_grid"` adapter, in that order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(UnifiedAdapter));
        registry.register(Box::new(LegacyGridAdapter));
        registry
    }

    pub fn register(&mut self, adapter: Box<dyn Adapter>) {
        self.adapters.push(adapter);
    }

    /// Returns the id of the best-matching adapter, or
    /// [`DungeonQualityError::NoMatchingAdapter`] if none matched at all.
    pub fn detect(&self, raw: &serde_json::Value) -> Result<&'static str> {
        let mut best: Option<(&'static str, f64)> = None;
        let mut tie = false;
        for adapter in &self.adapters {
            let confidence = adapter.detect(raw);
            if confidence <= 0.0 {
                continue;
            }
            match best {
                None => best = Some((adapter.id(), confidence)),
                Some((_, b)) if confidence > b => best = Some((adapter.id(), confidence)),
                Some((_, b)) if (confidence - b).abs() < 1e-9 => tie = true,
                _ => {}
            }
        }
        match best {
            Some((id, _)) => {
                if tie {
                    log::warn!("ambiguous format detection, picking earliest registered: {id}");
                }
                Ok(id)
            }
            None => Err(DungeonQualityError::NoMatchingAdapter),
        }
    }

    /// Detects the format and converts in one step (§6 `convert`).
    pub fn convert(&self, raw: serde_json::Value) -> Result<UnifiedDungeon> {
        let id = self.detect(&raw)?;
        let adapter = self
            .adapters
            .iter()
            .find(|a| a.id() == id)
            .expect("detect returned an id that is registered");
        adapter.convert(raw)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
