//! In-memory LockoutRepository for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use chrono::Utc;
use hg_shared::config::LockoutConfig;

use crate::domain::entities::lockout::{BruteForceCounter, GuardScope};
use crate::domain::value_objects::DeviceContext;
use crate::errors::DomainResult;

use super::r#trait::LockoutRepository;

/// Mock lockout repository keyed by (subject, scope).
///
/// A single mutex is the critical section, standing in for the row lock
/// the MySQL implementation takes.
pub struct MockLockoutRepository {
    counters: Arc<Mutex<HashMap<(String, GuardScope), BruteForceCounter>>>,
    config: LockoutConfig,
}

impl MockLockoutRepository {
    pub fn new(config: LockoutConfig) -> Self {
        Self {
            counters: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }
}

impl Default for MockLockoutRepository {
    fn default() -> Self {
        Self::new(LockoutConfig::default())
    }
}

#[async_trait]
impl LockoutRepository for MockLockoutRepository {
    async fn find(
        &self,
        subject_id: &str,
        scope: GuardScope,
    ) -> DomainResult<Option<BruteForceCounter>> {
        let counters = self.counters.lock().await;
        Ok(counters.get(&(subject_id.to_string(), scope)).cloned())
    }

    async fn record_failure(
        &self,
        subject_id: &str,
        scope: GuardScope,
        device: &DeviceContext,
    ) -> DomainResult<BruteForceCounter> {
        let mut counters = self.counters.lock().await;
        let counter = counters
            .entry((subject_id.to_string(), scope))
            .or_insert_with(|| BruteForceCounter::new(subject_id, scope, &self.config));

        counter.register_failure(Utc::now());
        counter.record_client(device.user_agent.clone(), device.ip.clone());
        Ok(counter.clone())
    }

    async fn record_success(&self, subject_id: &str, scope: GuardScope) -> DomainResult<()> {
        let mut counters = self.counters.lock().await;
        if let Some(counter) = counters.get_mut(&(subject_id.to_string(), scope)) {
            counter.register_success();
        }
        Ok(())
    }
}
