use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ldp_types::{LdpError, LdpResult, ResourceIdentifier};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Exclusive hold on one resource. Released when dropped.
pub struct Lock {
    identifier: ResourceIdentifier,
    guard: Option<OwnedMutexGuard<()>>,
    on_release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Lock {
    /// Wrap a held guard. `on_release` runs after the guard is dropped.
    pub fn new(
        identifier: ResourceIdentifier,
        guard: OwnedMutexGuard<()>,
        on_release: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            identifier,
            guard: Some(guard),
            on_release: Some(Box::new(on_release)),
        }
    }

    pub fn identifier(&self) -> &ResourceIdentifier {
        &self.identifier
    }

    /// Release the lock now instead of at the end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        self.guard.take();
        if let Some(on_release) = self.on_release.take() {
            on_release();
        }
        tracing::trace!(identifier = %self.identifier, "lock released");
    }
}

impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("identifier", &self.identifier)
            .finish()
    }
}

/// Per-resource mutual exclusion.
#[async_trait]
pub trait ResourceLocker: Send + Sync {
    /// Wait until no other [`Lock`] on `identifier` is held, then take it.
    /// Locks on different identifiers never wait on each other.
    async fn acquire(&self, identifier: &ResourceIdentifier) -> LdpResult<Lock>;
}

/// Locker configuration.
#[derive(Clone, Debug)]
pub struct LockerConfig {
    /// Give up waiting after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

type LockTable = Mutex<HashMap<ResourceIdentifier, Arc<AsyncMutex<()>>>>;

/// In-process locker: one async mutex per identifier currently in use.
///
/// Entries are created on demand and dropped once no holder or waiter
/// remains, so the table only grows with the number of contended resources.
#[derive(Default)]
pub struct InMemoryResourceLocker {
    table: Arc<LockTable>,
    config: LockerConfig,
}

impl InMemoryResourceLocker {
    pub fn new(config: LockerConfig) -> Self {
        Self {
            table: Arc::default(),
            config,
        }
    }

    /// Number of identifiers with a holder or waiter.
    pub fn active(&self) -> usize {
        self.table.lock().expect("lock poisoned").len()
    }

    fn forget_if_idle(table: &LockTable, identifier: &ResourceIdentifier) {
        let mut map = table.lock().expect("lock poisoned");
        if map
            .get(identifier)
            .is_some_and(|mutex| Arc::strong_count(mutex) == 1)
        {
            map.remove(identifier);
        }
    }
}

#[async_trait]
impl ResourceLocker for InMemoryResourceLocker {
    async fn acquire(&self, identifier: &ResourceIdentifier) -> LdpResult<Lock> {
        let mutex = {
            let mut map = self.table.lock().expect("lock poisoned");
            map.entry(identifier.clone()).or_default().clone()
        };

        tracing::trace!(%identifier, "acquiring lock");
        let guard = match self.config.timeout {
            Some(limit) => match tokio::time::timeout(limit, mutex.lock_owned()).await {
                Ok(guard) => guard,
                Err(_) => {
                    Self::forget_if_idle(&self.table, identifier);
                    return Err(LdpError::LockTimeout {
                        identifier: identifier.to_string(),
                        waited: limit,
                    });
                }
            },
            None => mutex.lock_owned().await,
        };
        tracing::trace!(%identifier, "lock acquired");

        let table = Arc::clone(&self.table);
        let key = identifier.clone();
        Ok(Lock::new(identifier.clone(), guard, move || {
            Self::forget_if_idle(&table, &key)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(path: &str) -> ResourceIdentifier {
        ResourceIdentifier::parse(&format!("http://test.com{path}")).unwrap()
    }

    #[tokio::test]
    async fn second_acquire_waits_for_release() {
        let locker = InMemoryResourceLocker::new(LockerConfig { timeout: None });
        let first = locker.acquire(&id("/a")).await.unwrap();

        let blocked =
            tokio::time::timeout(Duration::from_millis(20), locker.acquire(&id("/a"))).await;
        assert!(blocked.is_err(), "second acquire must wait");

        first.release();
        let second = locker.acquire(&id("/a")).await.unwrap();
        assert_eq!(second.identifier(), &id("/a"));
    }

    #[tokio::test]
    async fn different_identifiers_do_not_block() {
        let locker = InMemoryResourceLocker::default();
        let _a = locker.acquire(&id("/a")).await.unwrap();
        let _b = locker.acquire(&id("/b")).await.unwrap();
        assert_eq!(locker.active(), 2);
    }

    #[tokio::test]
    async fn entries_are_dropped_when_idle() {
        let locker = InMemoryResourceLocker::default();
        {
            let _lock = locker.acquire(&id("/a")).await.unwrap();
            assert_eq!(locker.active(), 1);
        }
        assert_eq!(locker.active(), 0);
    }

    #[tokio::test]
    async fn timeout_reports_lock_timeout() {
        let locker = InMemoryResourceLocker::new(LockerConfig {
            timeout: Some(Duration::from_millis(10)),
        });
        let held = locker.acquire(&id("/a")).await.unwrap();
        match locker.acquire(&id("/a")).await {
            Err(LdpError::LockTimeout { identifier, .. }) => {
                assert_eq!(identifier, "http://test.com/a")
            }
            other => panic!("expected LockTimeout, got {other:?}"),
        }
        drop(held);
        assert_eq!(locker.active(), 0);
    }

    #[tokio::test]
    async fn waiters_are_served_after_release() {
        let locker = Arc::new(InMemoryResourceLocker::new(LockerConfig { timeout: None }));
        let first = locker.acquire(&id("/a")).await.unwrap();

        let waiter = {
            let locker = Arc::clone(&locker);
            tokio::spawn(async move { locker.acquire(&id("/a")).await.map(|l| l.release()) })
        };
        tokio::task::yield_now().await;
        assert_eq!(locker.active(), 1);
        drop(first);
        waiter.await.unwrap().unwrap();
        assert_eq!(locker.active(), 0);
    }
}
