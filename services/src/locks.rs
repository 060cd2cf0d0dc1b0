//! Per-instance-question mutual exclusion.
//!
//! Recording a submission holds the lock of one instance-question. A regrade
//! holds the locks of every instance-question of the assessment instance. Locks
//! are never waited on: a busy lock is reported as `ConcurrentModification`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::error::ServiceError;

#[derive(Clone, Default)]
pub struct InstanceQuestionLocks {
    registry: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

/// Held for as long as the instance-question must not be touched by anyone else.
#[derive(Debug)]
pub struct InstanceQuestionGuard {
    instance_question_id: i64,
    _guard: OwnedMutexGuard<()>,
}

impl InstanceQuestionGuard {
    pub fn instance_question_id(&self) -> i64 {
        self.instance_question_id
    }
}

impl InstanceQuestionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, instance_question_id: i64) -> Arc<AsyncMutex<()>> {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registry
            .entry(instance_question_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    pub fn try_acquire(&self, instance_question_id: i64) -> Result<InstanceQuestionGuard, ServiceError> {
        let guard = self
            .handle(instance_question_id)
            .try_lock_owned()
            .map_err(|_| ServiceError::ConcurrentModification { instance_question_id })?;

        Ok(InstanceQuestionGuard {
            instance_question_id,
            _guard: guard,
        })
    }

    /// Acquires every lock or none. Ids are taken in ascending order.
    pub fn try_acquire_all(&self, instance_question_ids: &[i64]) -> Result<Vec<InstanceQuestionGuard>, ServiceError> {
        let mut ids = instance_question_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            // Guards already taken are released when `guards` drops.
            guards.push(self.try_acquire(id)?);
        }
        Ok(guards)
    }

    pub fn is_locked(&self, instance_question_id: i64) -> bool {
        self.handle(instance_question_id).try_lock().is_err()
    }
}
