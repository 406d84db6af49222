#![forbid(unsafe_code)]

//! Step-by-step recording of tile snapshots.
//!
//! Each recorded step becomes one JSON line. The BLAKE3 digest of the
//! whole trace gives a compact fingerprint for determinism checks: two
//! runs with the same seed and inputs must produce the same digest.

use std::fmt;

use serde_json::json;
use tilekit_widgets::TileSnapshot;

/// An ordered JSONL log of tile snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileTrace {
    lines: Vec<String>,
}

impl TileTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `snapshot` under `label`.
    pub fn record<T: fmt::Display>(&mut self, label: &str, snapshot: &TileSnapshot<T>) {
        let line = json!({
            "step": self.lines.len(),
            "label": label,
            "index": snapshot.current_index,
            "running": snapshot.is_running,
            "current": snapshot.current.as_ref().map(ToString::to_string),
            "next": snapshot.next.as_ref().map(ToString::to_string),
            "offset": [snapshot.translation.x, snapshot.translation.y],
            "travel": snapshot.geometry.travel_distance,
            "transitioning": snapshot.transitioning,
        });
        self.lines.push(line.to_string());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All steps, newline separated.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Hex BLAKE3 digest of [`Self::to_jsonl`].
    #[must_use]
    pub fn digest(&self) -> String {
        blake3::hash(self.to_jsonl().as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_widgets::{Geometry, Translation};

    fn snapshot(index: u64, current: &'static str) -> TileSnapshot<&'static str> {
        TileSnapshot {
            current_index: index,
            is_running: true,
            current: Some(current),
            next: None,
            translation: Translation::ZERO,
            geometry: Geometry::UNSIZED,
            transitioning: false,
        }
    }

    #[test]
    fn lines_are_json_objects() {
        let mut trace = TileTrace::new();
        trace.record("mount", &snapshot(0, "A"));
        let value: serde_json::Value =
            serde_json::from_str(&trace.lines()[0]).expect("valid json line");
        assert_eq!(value["label"], "mount");
        assert_eq!(value["current"], "A");
        assert!(value["next"].is_null());
        assert_eq!(value["step"], 0);
    }

    #[test]
    fn digest_tracks_content() {
        let mut a = TileTrace::new();
        let mut b = TileTrace::new();
        a.record("tick", &snapshot(1, "B"));
        b.record("tick", &snapshot(1, "B"));
        assert_eq!(a.digest(), b.digest());

        b.record("tick", &snapshot(2, "C"));
        assert_ne!(a.digest(), b.digest());
        assert_eq!(b.to_jsonl().lines().count(), 2);
    }
}
