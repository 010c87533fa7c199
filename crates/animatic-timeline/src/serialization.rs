//! Timing-data serialization with versioning and migration.
//!
//! Uses JSON with a schema version field so timing documents written by
//! older builds keep loading.

use std::collections::HashMap;

use animatic_core::{AnimaticError, PanelId, Result};
use serde::{Deserialize, Serialize};

use crate::audio::AudioTrack;
use crate::model::TimelineModel;
use crate::panel_timing::PanelTiming;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned timing-data document: the full set of panel timings (in
/// order) plus audio tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingDocument {
    /// Schema version for migration.
    pub version: u32,
    /// Panel timing records, in panel order.
    pub panels: Vec<PanelTiming>,
    /// Audio tracks on the global timeline.
    pub audio_tracks: Vec<AudioTrack>,
    /// Application version that wrote this document.
    pub app_version: String,
}

impl TimingDocument {
    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            AnimaticError::Serialization(format!("Failed to serialize timing data: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| AnimaticError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(AnimaticError::Serialization(format!(
                "Timing document version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| AnimaticError::Serialization(format!("Failed to parse timing data: {}", e)))
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare panel array without the document wrapper
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "panels": data,
                        "audio_tracks": [],
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(AnimaticError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

impl TimelineModel {
    /// Snapshot the full timing state as a versioned document.
    pub fn export_timing_data(&self) -> TimingDocument {
        TimingDocument {
            version: CURRENT_VERSION,
            panels: self.timings_in_order().cloned().collect(),
            audio_tracks: self.audio_tracks().to_vec(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Replace the model's contents from a timing document.
    pub fn import_timing_data(&mut self, doc: TimingDocument) -> Result<()> {
        let order: Vec<PanelId> = doc.panels.iter().map(|t| t.panel_id).collect();
        let mut timings = HashMap::with_capacity(doc.panels.len());
        for timing in doc.panels {
            if timings.insert(timing.panel_id, timing).is_some() {
                return Err(AnimaticError::Serialization(
                    "Duplicate panel id in timing document".into(),
                ));
            }
        }
        self.restore(order, timings, doc.audio_tracks);
        Ok(())
    }
}
