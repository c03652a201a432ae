//! JSONL transcript of a pipeline run.
//!
//! Every completion call, stage result and gate decision becomes one line:
//!
//! ```text
//! {"seq":0,"type":"completion","timestamp":"…","model":"deepseek_v3",…}
//! {"seq":1,"type":"stage_completed","timestamp":"…","stage":"audit",…}
//! {"seq":2,"type":"decision","timestamp":"…","stage":"audit","decision":"approve"}
//! ```

use chrono::{SecondsFormat, Utc};
use council_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transcript file name inside the output directory
pub const TRANSCRIPT_FILE: &str = "conversation.jsonl";

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// Appends one JSON object per event, numbered in write order.
///
/// Concurrent fan-out calls log from several tasks; the mutex keeps lines
/// whole and the sequence numbers gapless.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create (or truncate) the transcript at `path`.
    ///
    /// Returns `None` when the file cannot be created; the run continues
    /// without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create transcript directory {}: {}", parent.display(), e);
            return None;
        }

        match File::create(path) {
            Ok(file) => Some(Self {
                sink: Mutex::new(Sink {
                    writer: BufWriter::new(file),
                    seq: 0,
                }),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not create transcript {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Transcript at `<dir>/conversation.jsonl`
    pub fn in_dir(dir: impl AsRef<Path>) -> Option<Self> {
        Self::new(dir.as_ref().join(TRANSCRIPT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(seq: u64, event: ConversationEvent) -> Value {
    let mut map = Map::new();
    map.insert("seq".to_string(), Value::from(seq));
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert(
        "timestamp".to_string(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    match event.payload {
        Value::Object(fields) => {
            for (key, value) in fields {
                map.entry(key).or_insert(value);
            }
        }
        other => {
            map.insert("data".to_string(), other);
        }
    }
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let line = record(sink.seq, event);
        sink.seq += 1;
        let _ = writeln!(sink.writer, "{}", line);
        let _ = sink.writer.flush();
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}
