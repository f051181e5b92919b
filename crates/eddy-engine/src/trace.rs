//! Write-only JSON trace of the environment registries.
//!
//! When tracing is enabled, the environment serializes both registries to
//! one JSON file per tick, *before* the tick body runs, so each document is
//! the state the tick started from. Files are named by a process-start
//! timestamp captured at writer construction plus the tick number:
//!
//! ```text
//! <dir>/20260830T141503-tick-0.json
//! <dir>/20260830T141503-tick-1.json
//! ```
//!
//! State nodes serialize their key/value mapping; function records
//! serialize their routine name, owner path, and dependency patterns.
//! Values JSON cannot represent (non-finite floats) are replaced with the
//! [`UNSERIALIZABLE`] sentinel rather than failing the trace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::json;

use eddy_core::{FunctionRecord, Namespace, StateHandle, TickId, Value};

/// Sentinel standing in for values the trace cannot serialize.
pub const UNSERIALIZABLE: &str = "<unserializable>";

/// Serializes the environment registries to per-tick JSON files.
pub struct TraceWriter {
    dir: PathBuf,
    stamp: String,
}

impl TraceWriter {
    /// Create a writer targeting `dir`, creating the directory if needed.
    ///
    /// The timestamp embedded in every file name is captured here, once,
    /// so all ticks of one run share a common prefix.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S").to_string();
        Ok(Self { dir, stamp })
    }

    /// The directory trace files are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the trace document for `tick`. Returns the file path.
    pub fn write(
        &self,
        tick: TickId,
        state: &Namespace<StateHandle>,
        functions: &Namespace<FunctionRecord>,
    ) -> io::Result<PathBuf> {
        let mut state_doc = serde_json::Map::new();
        for (path, handle) in state.paths() {
            let node = handle.borrow();
            let mut values = serde_json::Map::new();
            for (key, value) in node.iter() {
                values.insert(key.to_string(), value_to_json(value));
            }
            state_doc.insert(path, values.into());
        }

        let mut function_doc = serde_json::Map::new();
        for (path, record) in functions.paths() {
            function_doc.insert(
                path,
                json!({
                    "routine": record.routine_name(),
                    "path": record.path(),
                    "dependencies": record.dependencies(),
                }),
            );
        }

        let doc = json!({
            "tick": tick.0,
            "state": state_doc,
            "functions": function_doc,
        });

        let file = self.dir.join(format!("{}-tick-{}.json", self.stamp, tick));
        fs::write(&file, serde_json::to_vec_pretty(&doc)?)?;
        Ok(file)
    }
}

/// Convert a state value to JSON, substituting the sentinel where JSON has
/// no representation (NaN and infinities).
fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(v) => json!(v),
        Value::Int(v) => json!(v),
        Value::Float(v) if v.is_finite() => json!(v),
        Value::Float(_) => json!(UNSERIALIZABLE),
        Value::Str(v) => json!(v),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
    }
}
