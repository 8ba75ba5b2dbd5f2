use crate::Result;
use crate::hierarchy::NoteStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Attachment state of the external store handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Detached,
    Attached,
}

/// Owns the external store handle and its idle timer.
///
/// Every query touches the lifecycle: attach if detached, then reset the
/// single-shot idle timer. The timer is never stacked. Reset is cancel-safe:
/// each touch bumps a generation counter under the state lock, and a pending
/// release only fires if its generation is still current, so a release racing
/// a new query can never drop a handle the query just refreshed.
pub(crate) struct StoreLifecycle {
    idle_timeout: Duration,
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    state: HandleState,
    epoch: u64,
    timer: Option<JoinHandle<()>>,
}

impl StoreLifecycle {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            inner: Arc::new(Mutex::new(Inner {
                state: HandleState::Detached,
                epoch: 0,
                timer: None,
            })),
        }
    }

    /// Attach the handle if detached and (re)start the idle timer.
    ///
    /// # Errors
    ///
    /// Returns the store's error when attaching fails; the state stays
    /// `Detached`.
    pub fn touch(&self, store: &Arc<dyn NoteStore>) -> Result<()> {
        let mut inner = lock(&self.inner);

        if inner.state == HandleState::Detached {
            store.attach()?;
            inner.state = HandleState::Attached;
            debug!("store handle attached");
        }

        inner.epoch += 1;
        let epoch = inner.epoch;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }

        let shared = Arc::clone(&self.inner);
        let store = Arc::clone(store);
        let timeout = self.idle_timeout;
        inner.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            release_if_current(&shared, store.as_ref(), epoch);
        }));

        Ok(())
    }

    /// Schedule an asynchronous release, for dismissal-style actions.
    pub fn release_soon(&self, store: &Arc<dyn NoteStore>) {
        let epoch = {
            let mut inner = lock(&self.inner);
            inner.epoch += 1;
            if let Some(timer) = inner.timer.take() {
                timer.abort();
            }
            inner.epoch
        };

        let shared = Arc::clone(&self.inner);
        let store = Arc::clone(store);
        tokio::spawn(async move {
            release_if_current(&shared, store.as_ref(), epoch);
        });
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        lock(&self.inner).state == HandleState::Attached
    }
}

fn release_if_current(shared: &Arc<Mutex<Inner>>, store: &dyn NoteStore, epoch: u64) {
    let mut inner = lock(shared);
    if inner.epoch == epoch && inner.state == HandleState::Attached {
        inner.state = HandleState::Detached;
        store.release();
        debug!("store handle released after idle timeout");
    }
}

fn lock(inner: &Arc<Mutex<Inner>>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
