use crate::domains::NewContact;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MESSAGES_FILE: &str = "messages.json";

/// The persisted form of an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl StoredMessage {
    pub fn new(contact: &NewContact, at: DateTime<Utc>) -> Self {
        Self {
            name: contact.name.as_ref().to_string(),
            email: contact.email.as_ref().to_string(),
            message: contact.message.as_ref().to_string(),
            at,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the message log")]
    Io(#[from] std::io::Error),
    #[error("The message log is not valid JSON")]
    Malformed(#[from] serde_json::Error),
}

/// Append-only record store backing the contact endpoint when mail delivery
/// is unavailable. Full read, append, full rewrite.
pub trait MessageStore: Send + Sync {
    fn read_all(&self) -> Result<Vec<StoredMessage>, StoreError>;
    fn append(&self, message: StoredMessage) -> Result<(), StoreError>;
}

/// File-backed store: a pretty-printed JSON array under the data directory.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(MESSAGES_FILE),
        }
    }
}

impl MessageStore for JsonFileStore {
    fn read_all(&self) -> Result<Vec<StoredMessage>, StoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&raw)?)
    }

    // Read-modify-rewrite is not atomic: two simultaneous appends can lose
    // one of the two records. Known limitation, volume is low.
    fn append(&self, message: StoredMessage) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let mut messages = self.read_all()?;
        messages.push(message);
        std::fs::write(&self.path, serde_json::to_string_pretty(&messages)?)?;
        Ok(())
    }
}
