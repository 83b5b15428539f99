use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::core::message::Message;

/// A named, ordered transcript. The on-disk record is exactly this struct
/// as JSON: `{ "name": ..., "messages": [{ "role": ..., "content": ... }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub name: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// A fresh conversation seeded with a single system-context message.
    pub fn new(name: impl Into<String>, system_context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: vec![Message::system(system_context)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Derive the record file stem for a conversation name: spaces become
/// underscores, anything outside `[0-9A-Za-z_]` is dropped, case is
/// preserved. Distinct names can collide after sanitization; the store
/// treats that as last-save-wins.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}

/// One directory of conversation records, one JSON file per conversation.
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(name)))
    }

    /// Load every record in the store directory, sorted by name. A missing
    /// directory is an empty store; unreadable or malformed records are
    /// skipped rather than failing the listing.
    pub fn list_all(&self) -> Vec<Conversation> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut conversations = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match load_record(&path) {
                Ok(conversation) => conversations.push(conversation),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable conversation record"
                ),
            }
        }
        conversations.sort_by(|a, b| a.name.cmp(&b.name));
        conversations
    }

    /// Serialize the full record and replace any prior file for this name.
    /// The write goes through a temp file in the same directory and an
    /// atomic rename, so an interrupt mid-save leaves the previous record
    /// intact rather than a torn file.
    pub fn save(&self, conversation: &Conversation) -> Result<(), Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.dir)?;

        let contents = serde_json::to_string_pretty(conversation)?;
        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(contents.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(self.record_path(&conversation.name))?;
        Ok(())
    }
}

fn load_record(path: &Path) -> Result<Conversation, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
