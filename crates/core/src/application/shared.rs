// Shared Queue Manager - serialized access for concurrent callers

use crate::application::queue_manager::{
    QueueError, QueueManager, QueueSnapshot, TicketPosition,
};
use crate::application::stats::QueueStats;
use crate::domain::{CounterId, Department, Ticket};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable handle to one `QueueManager`.
///
/// Every mutation holds the write lock for its whole check-then-set sequence,
/// so two callers on the same idle counter cannot both win `call_next`.
/// Queries share the read lock and always see a complete state.
#[derive(Clone)]
pub struct SharedQueueManager {
    inner: Arc<RwLock<QueueManager>>,
}

impl SharedQueueManager {
    pub fn new(manager: QueueManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }

    // Poison is ignored: operations validate before mutating.
    fn read(&self) -> RwLockReadGuard<'_, QueueManager> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, QueueManager> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run an arbitrary query against one consistent state
    pub fn with_manager<R>(&self, f: impl FnOnce(&QueueManager) -> R) -> R {
        f(&*self.read())
    }

    pub fn add_counter(
        &self,
        id: &str,
        name: &str,
        department: Department,
    ) -> Result<(), QueueError> {
        self.write().add_counter(id, name, department)
    }

    pub fn enqueue(
        &self,
        department: &str,
        service: impl Into<String>,
    ) -> Result<Ticket, QueueError> {
        self.write().enqueue(department, service)
    }

    pub fn enqueue_for(
        &self,
        department: Department,
        service: impl Into<String>,
    ) -> Result<Ticket, QueueError> {
        self.write().enqueue_for(department, service)
    }

    pub fn call_next(&self, counter_id: &str) -> Result<Ticket, QueueError> {
        self.write().call_next(counter_id)
    }

    pub fn complete_service(&self, counter_id: &str) -> Result<Ticket, QueueError> {
        self.write().complete_service(counter_id)
    }

    pub fn mark_no_show(&self, counter_id: &str) -> Result<Ticket, QueueError> {
        self.write().mark_no_show(counter_id)
    }

    pub fn position_of(&self, token: &str) -> Result<TicketPosition, QueueError> {
        self.read().position_of(token)
    }

    pub fn pending_for(&self, department: Department) -> Vec<Ticket> {
        self.read().pending_for(department)
    }

    pub fn find_ticket(&self, token: &str) -> Option<Ticket> {
        self.read().find_ticket(token)
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.read().snapshot()
    }

    pub fn stats(&self) -> QueueStats {
        self.read().stats()
    }

    /// Registered counters as `(id, department, busy)`
    pub fn counters(&self) -> Vec<(CounterId, Department, bool)> {
        self.read()
            .state()
            .counters()
            .map(|c| (c.id.clone(), c.department, c.is_busy()))
            .collect()
    }
}
