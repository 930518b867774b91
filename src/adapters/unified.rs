// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The reserved `"unified"` adapter (§4.B): a pass-through for documents
//! already in the canonical wire schema.

use crate::adapters::Adapter;
use crate::error::{DungeonQualityError, Result};
use crate::model::{Document, UnifiedDungeon, UNIFIED_SCHEMA_NAME};

pub struct UnifiedAdapter;

impl Adapter for UnifiedAdapter {
    fn id(&self) -> &'static str {
        "unified"
    }

    fn detect(&self, raw: &serde_json::Value) -> f64 {
        match raw.get("header").and_then(|h| h.get("schemaName")).and_then(|v| v.as_str()) {
            Some(name) if name == UNIFIED_SCHEMA_NAME => 1.0,
            _ => 0.0,
        }
    }

    fn convert(&self, raw: serde_json::Value) -> Result<UnifiedDungeon> {
        let document: Document = serde_json::from_value(raw).map_err(|e| {
            DungeonQualityError::conversion_failed("unified", e)
        })?;
        if !document.is_unified() {
            return Err(DungeonQualityError::invalid_input(
                "header.schemaName",
                format!("expected '{UNIFIED_SCHEMA_NAME}'"),
            ));
        }
        let model = UnifiedDungeon::from_document(document)?;
        model.validate()?;
        Ok(model)
    }
}
