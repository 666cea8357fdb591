//! Deadline wrapper for blocking store calls

use super::{CredentialEntry, Persistence, PlatformStore};
use crate::error::PlatformError;
use crate::identity::StoreKey;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Runs each call of the wrapped store on a worker thread and gives up
/// after `timeout`.
///
/// A call that times out keeps running on its detached thread; its result is
/// discarded.
pub struct TimedStore {
    inner: Arc<dyn PlatformStore>,
    timeout: Duration,
}

impl TimedStore {
    /// Wrap `inner` with a per-call deadline
    #[must_use]
    pub fn new(inner: Arc<dyn PlatformStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn run<T, F>(&self, op: &'static str, call: F) -> Result<T, PlatformError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PlatformStore) -> Result<T, PlatformError> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        thread::Builder::new()
            .name(format!("credbridge-{op}"))
            .spawn(move || {
                let _ = tx.send(call(inner.as_ref()));
            })
            .map_err(|e| PlatformError::Backend(format!("Failed to spawn store worker: {}", e)))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                warn!(op, timeout = ?self.timeout, "Credential store call timed out");
                Err(PlatformError::TimedOut(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PlatformError::Backend(format!(
                "Credential store worker for {op} exited without a result"
            ))),
        }
    }
}

impl PlatformStore for TimedStore {
    fn write(&self, entry: &CredentialEntry) -> Result<(), PlatformError> {
        let entry = entry.clone();
        self.run("write", move |store| store.write(&entry))
    }

    fn read(&self, key: &StoreKey) -> Result<Option<CredentialEntry>, PlatformError> {
        let key = key.clone();
        self.run("read", move |store| store.read(&key))
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn persistence(&self, requested: Persistence) -> Persistence {
        self.inner.persistence(requested)
    }
}
