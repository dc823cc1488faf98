//! External collaborators
//!
//! Position persistence and the activity log live outside the engine. Calls
//! are fire-and-forget: implementations must not block the caller and swallow
//! their own failures.

use std::sync::Arc;

use glam::Vec3;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::model::LogicalIndex;

/// Position persistence payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub group: String,
    pub instance_index: u32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PositionRecord {
    pub fn new(group: impl Into<String>, index: LogicalIndex, position: Vec3) -> Self {
        Self {
            group: group.into(),
            instance_index: index.0,
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }
}

/// Activity log payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl LogEntry {
    pub fn new(kind: impl Into<String>, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            data,
        }
    }
}

/// Outbound calls made by the editor after commits
pub trait Collaborators {
    fn save_position(&self, record: PositionRecord);
    fn write_log(&self, entry: LogEntry);
}

/// Drops every call
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCollaborators;

impl Collaborators for NullCollaborators {
    fn save_position(&self, _record: PositionRecord) {}

    fn write_log(&self, _entry: LogEntry) {}
}

#[derive(Debug, Default)]
struct Recorded {
    positions: Vec<PositionRecord>,
    logs: Vec<LogEntry>,
}

/// Keeps every call in memory. Clones share the same records, so a test can
/// hand one clone to the editor and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollaborators {
    inner: Arc<Mutex<Recorded>>,
}

impl MemoryCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> Vec<PositionRecord> {
        self.inner.lock().positions.clone()
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.lock().logs.clone()
    }

    /// Log types in call order
    pub fn log_kinds(&self) -> Vec<String> {
        self.inner.lock().logs.iter().map(|e| e.kind.clone()).collect()
    }
}

impl Collaborators for MemoryCollaborators {
    fn save_position(&self, record: PositionRecord) {
        self.inner.lock().positions.push(record);
    }

    fn write_log(&self, entry: LogEntry) {
        self.inner.lock().logs.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_record_wire_names() {
        let record = PositionRecord::new("square-tube", LogicalIndex(4), Vec3::new(1.0, 2.0, 3.0));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["group"], "square-tube");
        assert_eq!(json["instanceIndex"], 4);
        assert_eq!(json["z"], 3.0);
    }

    #[test]
    fn test_log_entry_uses_type_field() {
        let entry = LogEntry::new("move", "moved", serde_json::json!({ "index": 1 }));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "move");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_memory_clones_share_records() {
        let recorder = MemoryCollaborators::new();
        let handle: Box<dyn Collaborators> = Box::new(recorder.clone());
        handle.write_log(LogEntry::new("delete", "gone", serde_json::Value::Null));
        assert_eq!(recorder.log_kinds(), vec!["delete".to_string()]);
    }
}
