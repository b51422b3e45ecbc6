// chat-widget/src/storage.rs
use common::models::session::GuestSession;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Persistence slot for the guest session record, scoped to one browser
/// context. Storage being unavailable is a recoverable condition: every
/// failure degrades to "no session" on read and a silent no-op on write,
/// so callers simply see an ephemeral session that does not survive reload.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Option<GuestSession>;
    fn save(&self, session: &GuestSession);
    fn clear(&self);
}

/// In-memory slot. This is both the degraded mode when durable storage is
/// unavailable and the default for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<GuestSession>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Option<GuestSession> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn save(&self, session: &GuestSession) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Durable slot holding one JSON session record in a file.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for JsonFileStorage {
    fn load(&self) -> Option<GuestSession> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Session storage unreadable: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!("Discarding corrupt session record: {}", e);
                None
            }
        }
    }

    fn save(&self, session: &GuestSession) {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Failed to serialize session: {}", e);
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, raw) {
            tracing::debug!("Session storage unwritable, continuing in-memory: {}", e);
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!("Failed to clear session storage: {}", e);
        }
    }
}
