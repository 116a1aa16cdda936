//! Checkpoint persistence for conversation state snapshots
//!
//! Snapshots are keyed by conversation id. The file store appends one JSON
//! line per snapshot so the full step history of a conversation stays
//! inspectable; `get_latest` only ever reads the last parseable line.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::state::ConversationState;
use crate::workflow::Node;

/// One persisted snapshot line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointEntry {
    /// The node that ran immediately before this snapshot
    pub node: Node,
    pub timestamp: i64,
    pub state: ConversationState,
}

/// Keyed store for conversation state snapshots.
///
/// Distinct conversation ids are independent; callers must serialize
/// concurrent turns for the same id.
pub trait CheckpointStore: Send + Sync {
    /// Latest snapshot for a conversation, if any
    fn get_latest(&self, conversation_id: &str) -> std::io::Result<Option<ConversationState>>;

    /// Persist a snapshot taken after `node` ran
    fn put(
        &self,
        conversation_id: &str,
        node: Node,
        state: &ConversationState,
    ) -> std::io::Result<()>;
}

/// File-backed store: one JSONL file per conversation id
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Default checkpoint directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("obc")
            .join("checkpoints")
    }

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, conversation_id: &str) -> PathBuf {
        self.dir.join(format!("{}.jsonl", conversation_id))
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn get_latest(&self, conversation_id: &str) -> std::io::Result<Option<ConversationState>> {
        let path = self.path_for(conversation_id);
        if !path.exists() {
            return Ok(None);
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut latest = None;

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            // A torn trailing line from an interrupted write is skipped.
            if let Ok(entry) = serde_json::from_str::<CheckpointEntry>(&line) {
                latest = Some(entry.state);
            }
        }

        Ok(latest)
    }

    fn put(
        &self,
        conversation_id: &str,
        node: Node,
        state: &ConversationState,
    ) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let entry = CheckpointEntry {
            node,
            timestamp: chrono::Utc::now().timestamp_millis(),
            state: state.clone(),
        };

        let mut file = File::options()
            .create(true)
            .append(true)
            .open(self.path_for(conversation_id))?;
        writeln!(file, "{}", serde_json::to_string(&entry)?)?;
        Ok(())
    }
}

/// In-memory store holding only the latest snapshot per conversation
#[derive(Default)]
pub struct MemoryCheckpointStore {
    entries: Mutex<HashMap<String, ConversationState>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn get_latest(&self, conversation_id: &str) -> std::io::Result<Option<ConversationState>> {
        Ok(self.entries.lock().get(conversation_id).cloned())
    }

    fn put(
        &self,
        conversation_id: &str,
        _node: Node,
        state: &ConversationState,
    ) -> std::io::Result<()> {
        self.entries
            .lock()
            .insert(conversation_id.to_string(), state.clone());
        Ok(())
    }
}
