//! MySQL implementation of the LockoutRepository trait.
//!
//! Counter rows live in `auth_lockouts`, keyed by (subject_id, scope).
//! Both mutation paths read the row with `FOR UPDATE` inside a transaction
//! and run the entity arithmetic before writing back, so two concurrent
//! failures for the same subject serialize instead of losing an increment.
//! The failure path seeds the row with `INSERT IGNORE` first, so the locked
//! read always finds a row even when two first failures for the same subject
//! race each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row, Transaction};

use hg_core::domain::entities::lockout::{BruteForceCounter, GuardScope};
use hg_core::domain::entities::stamp::AuditStamp;
use hg_core::domain::value_objects::DeviceContext;
use hg_core::errors::{DomainError, DomainResult};
use hg_core::repositories::LockoutRepository;
use hg_shared::config::LockoutConfig;

const SELECT_COUNTER: &str = r#"
    SELECT subject_id, scope, strike, failed_attempts,
           window_started_at, last_failed_at, locked_until,
           threshold, window_seconds, base_lock_seconds, extended_lock_seconds,
           last_user_agent, last_ip, created_at, updated_at
    FROM auth_lockouts
    WHERE subject_id = ? AND scope = ?
"#;

/// MySQL implementation of LockoutRepository.
///
/// New counters are seeded from the `LockoutConfig` given at construction;
/// existing rows keep the tunables they were created with.
pub struct MySqlLockoutRepository {
    pool: MySqlPool,
    config: LockoutConfig,
}

impl MySqlLockoutRepository {
    pub fn new(pool: MySqlPool, config: LockoutConfig) -> Self {
        Self { pool, config }
    }

    /// Convert a database row to a BruteForceCounter entity
    fn row_to_counter(row: &sqlx::mysql::MySqlRow) -> Result<BruteForceCounter, DomainError> {
        let scope_raw: String = row.try_get("scope").map_err(|e| DomainError::Internal {
            message: format!("Failed to get scope: {}", e),
        })?;
        let scope = GuardScope::parse(&scope_raw).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown guard scope: {}", scope_raw),
        })?;

        Ok(BruteForceCounter {
            subject_id: row.try_get("subject_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get subject_id: {}", e),
            })?,
            scope,
            strike: row.try_get("strike").map_err(|e| DomainError::Internal {
                message: format!("Failed to get strike: {}", e),
            })?,
            failed_attempts: row
                .try_get("failed_attempts")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get failed_attempts: {}", e),
                })?,
            window_started_at: row
                .try_get::<Option<DateTime<Utc>>, _>("window_started_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get window_started_at: {}", e),
                })?,
            last_failed_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_failed_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_failed_at: {}", e),
                })?,
            locked_until: row
                .try_get::<Option<DateTime<Utc>>, _>("locked_until")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get locked_until: {}", e),
                })?,
            threshold: row.try_get("threshold").map_err(|e| DomainError::Internal {
                message: format!("Failed to get threshold: {}", e),
            })?,
            window_seconds: row
                .try_get("window_seconds")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get window_seconds: {}", e),
                })?,
            base_lock_seconds: row
                .try_get("base_lock_seconds")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get base_lock_seconds: {}", e),
                })?,
            extended_lock_seconds: row
                .try_get("extended_lock_seconds")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get extended_lock_seconds: {}", e),
                })?,
            last_user_agent: row
                .try_get("last_user_agent")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_user_agent: {}", e),
                })?,
            last_ip: row.try_get("last_ip").map_err(|e| DomainError::Internal {
                message: format!("Failed to get last_ip: {}", e),
            })?,
            stamp: AuditStamp {
                created_at: row
                    .try_get::<DateTime<Utc>, _>("created_at")
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to get created_at: {}", e),
                    })?,
                updated_at: row
                    .try_get::<DateTime<Utc>, _>("updated_at")
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to get updated_at: {}", e),
                    })?,
            },
        })
    }

    /// Load and lock the counter row inside the caller's transaction
    async fn lock_counter(
        tx: &mut Transaction<'_, MySql>,
        subject_id: &str,
        scope: GuardScope,
    ) -> DomainResult<Option<BruteForceCounter>> {
        let query = format!("{} FOR UPDATE", SELECT_COUNTER.trim_end());

        let row = sqlx::query(&query)
            .bind(subject_id)
            .bind(scope.as_str())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to lock lockout counter: {}", e),
            })?;

        row.as_ref().map(Self::row_to_counter).transpose()
    }

    /// Insert a pristine counter row if none exists yet.
    ///
    /// `INSERT IGNORE` makes the statement a no-op when the (subject_id, scope)
    /// key is already taken, so two racing first failures both end up with a
    /// row to lock instead of one of them dying on the primary key.
    async fn seed_counter(
        tx: &mut Transaction<'_, MySql>,
        counter: &BruteForceCounter,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
                INSERT IGNORE INTO auth_lockouts (
                    subject_id, scope, strike, failed_attempts,
                    threshold, window_seconds, base_lock_seconds,
                    extended_lock_seconds, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(counter.subject_id.clone())
        .bind(counter.scope.as_str())
        .bind(counter.strike)
        .bind(counter.failed_attempts)
        .bind(counter.threshold)
        .bind(counter.window_seconds)
        .bind(counter.base_lock_seconds)
        .bind(counter.extended_lock_seconds)
        .bind(counter.stamp.created_at)
        .bind(counter.stamp.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to seed lockout counter: {}", e),
        })?;

        Ok(())
    }

    /// Write the counter's mutable columns back inside the transaction
    async fn store_counter(
        tx: &mut Transaction<'_, MySql>,
        counter: &BruteForceCounter,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
                UPDATE auth_lockouts
                SET strike = ?, failed_attempts = ?, window_started_at = ?,
                    last_failed_at = ?, locked_until = ?,
                    last_user_agent = ?, last_ip = ?, updated_at = ?
                WHERE subject_id = ? AND scope = ?
            "#,
        )
        .bind(counter.strike)
        .bind(counter.failed_attempts)
        .bind(counter.window_started_at)
        .bind(counter.last_failed_at)
        .bind(counter.locked_until)
        .bind(counter.last_user_agent.clone())
        .bind(counter.last_ip.clone())
        .bind(counter.stamp.updated_at)
        .bind(counter.subject_id.clone())
        .bind(counter.scope.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to store lockout counter: {}", e),
        })?;

        Ok(())
    }
}

#[async_trait]
impl LockoutRepository for MySqlLockoutRepository {
    async fn find(
        &self,
        subject_id: &str,
        scope: GuardScope,
    ) -> DomainResult<Option<BruteForceCounter>> {
        let row = sqlx::query(SELECT_COUNTER)
            .bind(subject_id)
            .bind(scope.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find lockout counter: {}", e),
            })?;

        row.as_ref().map(Self::row_to_counter).transpose()
    }

    async fn record_failure(
        &self,
        subject_id: &str,
        scope: GuardScope,
        device: &DeviceContext,
    ) -> DomainResult<BruteForceCounter> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let seed = BruteForceCounter::new(subject_id, scope, &self.config);
        Self::seed_counter(&mut tx, &seed).await?;

        let mut counter = Self::lock_counter(&mut tx, subject_id, scope)
            .await?
            .ok_or_else(|| DomainError::Internal {
                message: format!("Lockout counter missing after seed: {}", subject_id),
            })?;

        counter.register_failure(Utc::now());
        counter.record_client(device.user_agent.clone(), device.ip.clone());

        Self::store_counter(&mut tx, &counter).await?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(counter)
    }

    async fn record_success(&self, subject_id: &str, scope: GuardScope) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        if let Some(mut counter) = Self::lock_counter(&mut tx, subject_id, scope).await? {
            counter.register_success();
            Self::store_counter(&mut tx, &counter).await?;
        }

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(())
    }
}
