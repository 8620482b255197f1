use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use client_logging::client_warn;
use tempfile::NamedTempFile;

/// Accessor over the single slot holding the session credential.
///
/// The core only ever reads the slot; `set` and `clear` exist for the
/// login/logout layer that owns credential lifetime.
pub trait TokenStore: Send + Sync {
    /// Current session credential, if any.
    fn get(&self) -> Option<String>;
    /// Stores a new credential.
    fn set(&self, token: &str);
    /// Drops the credential.
    fn clear(&self);
}

/// In-process credential slot, used by embeddings and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().expect("token slot lock").clone()
    }

    fn set(&self, token: &str) {
        *self.slot.lock().expect("token slot lock") = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.lock().expect("token slot lock") = None;
    }
}

/// File-backed credential slot. Reads tolerate a missing file; writes go
/// through a temp file and rename so a crash never leaves a torn token.
/// IO failures are logged and swallowed, matching best-effort client storage.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_atomic(&self, token: &str) -> io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(token.as_bytes())?;
        tmp.flush()?;
        // Replace existing file if present to keep determinism.
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let token = text.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                client_warn!("Failed to read credential from {:?}: {}", self.path, err);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Err(err) = self.write_atomic(token) {
            client_warn!("Failed to store credential at {:?}: {}", self.path, err);
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                client_warn!("Failed to clear credential at {:?}: {}", self.path, err);
            }
        }
    }
}
