use crate::error::{StorageError, StorageResult};
use crate::store::CredentialStore;
use lockin_core::DeviceIdentity;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Slot {
    identity: DeviceIdentity,
    failing: bool,
    writes: usize,
}

/// In-memory identity slot with failure injection.
///
/// Clones share the same slot, so a test can keep one clone to inspect what
/// the controller persisted.
///
/// ```
/// use lockin_core::DeviceIdentity;
/// use lockin_storage::{CredentialStore, MemoryCredentialStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryCredentialStore::new();
/// let probe = store.clone();
///
/// store.set_failing(true);
/// assert!(store.save(&DeviceIdentity::new("T1").unwrap()).await.is_err());
/// assert!(!probe.load().await.unwrap().is_paired());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Slot>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an identity already stored.
    pub fn with_identity(identity: DeviceIdentity) -> Self {
        let store = Self::new();
        store.slot().identity = identity;
        store
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every subsequent load and save fail.
    pub fn set_failing(&self, failing: bool) {
        self.slot().failing = failing;
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.slot().writes
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> StorageResult<DeviceIdentity> {
        let slot = self.slot();
        if slot.failing {
            return Err(StorageError::Unavailable("read failed".to_string()));
        }
        Ok(slot.identity.clone())
    }

    async fn save(&self, identity: &DeviceIdentity) -> StorageResult<()> {
        let mut slot = self.slot();
        if slot.failing {
            return Err(StorageError::Unavailable("write failed".to_string()));
        }
        slot.identity = identity.clone();
        slot.writes += 1;
        Ok(())
    }
}
