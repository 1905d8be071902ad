use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque per-device identity, persisted alongside its creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_id: String,
    pub created_at: DateTime<Utc>,
}

impl DeviceIdentity {
    fn generate() -> Self {
        Self {
            device_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Injected session capability: resolves the stable per-device identifier
/// sent as the `x-user-id` header on every authenticated call.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn device_id(&self) -> Result<String>;
}

/// File-backed store. Generates a UUID v4 on first use, writes it exactly
/// once, and serves the cached value afterwards. Regenerated only if the
/// file is removed out of band.
pub struct FileSessionStore {
    path: PathBuf,
    cached: Mutex<Option<String>>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn device_id(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let identity: DeviceIdentity = serde_json::from_str(&contents)?;
                debug!("Loaded device identity from: {}", self.path.display());
                *cached = Some(identity.device_id.clone());
                Ok(identity.device_id)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let identity = DeviceIdentity::generate();
                let contents = serde_json::to_string_pretty(&identity)?;
                tokio::fs::write(&self.path, contents).await?;
                info!("Generated new device identity: {}", self.path.display());
                *cached = Some(identity.device_id.clone());
                Ok(identity.device_id)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store used by tests; counts writes so the write-once invariant
/// can be asserted.
pub struct MemorySessionStore {
    identity: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            identity: Mutex::new(None),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            identity: Mutex::new(Some(id.into())),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn device_id(&self) -> Result<String> {
        let mut identity = self.identity.lock().await;
        if let Some(id) = identity.as_ref() {
            return Ok(id.clone());
        }
        let generated = DeviceIdentity::generate();
        self.writes.fetch_add(1, Ordering::SeqCst);
        *identity = Some(generated.device_id.clone());
        Ok(generated.device_id)
    }
}
