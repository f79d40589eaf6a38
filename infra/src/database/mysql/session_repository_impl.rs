//! MySQL implementation of the SessionRepository trait.
//!
//! Refresh session rows live in `auth_sessions`. The cap-enforcing insert
//! and the rotation swap each run inside one transaction with the user's
//! rows locked, so concurrent logins cannot both pass the cap check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use hg_core::domain::entities::session::{Session, SessionStatus};
use hg_core::errors::{DomainError, DomainResult};
use hg_core::repositories::SessionRepository;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a Session entity
    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<Session, DomainError> {
        let status_raw: String = row.try_get("status").map_err(|e| DomainError::Internal {
            message: format!("Failed to get status: {}", e),
        })?;
        let status = SessionStatus::parse(&status_raw).ok_or_else(|| DomainError::Internal {
            message: format!("Unknown session status: {}", status_raw),
        })?;

        Ok(Session {
            id: row.try_get("id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get id: {}", e),
            })?,
            user_id: row.try_get("user_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get user_id: {}", e),
            })?,
            family_id: row.try_get("family_id").map_err(|e| DomainError::Internal {
                message: format!("Failed to get family_id: {}", e),
            })?,
            device_fingerprint: row.try_get("device_fingerprint").map_err(|e| {
                DomainError::Internal {
                    message: format!("Failed to get device_fingerprint: {}", e),
                }
            })?,
            token_hash: row.try_get("token_hash").map_err(|e| DomainError::Internal {
                message: format!("Failed to get token_hash: {}", e),
            })?,
            status,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get expires_at: {}", e),
                })?,
            user_agent: row.try_get("user_agent").map_err(|e| DomainError::Internal {
                message: format!("Failed to get user_agent: {}", e),
            })?,
            rotated_at: row
                .try_get::<Option<DateTime<Utc>>, _>("rotated_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get rotated_at: {}", e),
                })?,
            last_used_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_used_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get last_used_at: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get created_at: {}", e),
                })?,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, family_id, device_fingerprint, token_hash, \
     status, expires_at, user_agent, rotated_at, last_used_at, created_at";

const INSERT_SESSION: &str = r#"
    INSERT INTO auth_sessions (
        id, user_id, family_id, device_fingerprint, token_hash,
        status, expires_at, user_agent, rotated_at, last_used_at, created_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Bind a session's fields to the INSERT statement
fn insert_query(
    session: &Session,
) -> sqlx::query::Query<'static, sqlx::MySql, sqlx::mysql::MySqlArguments> {
    sqlx::query(INSERT_SESSION)
        .bind(session.id.clone())
        .bind(session.user_id)
        .bind(session.family_id.clone())
        .bind(session.device_fingerprint.clone())
        .bind(session.token_hash.clone())
        .bind(session.status.as_str())
        .bind(session.expires_at)
        .bind(session.user_agent.clone())
        .bind(session.rotated_at)
        .bind(session.last_used_at)
        .bind(session.created_at)
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Session>> {
        let query = format!(
            "SELECT {} FROM auth_sessions WHERE id = ? LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find session: {}", e),
            })?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn find_active(
        &self,
        user_id: i64,
        fingerprint: &str,
    ) -> DomainResult<Option<Session>> {
        let query = format!(
            "SELECT {} FROM auth_sessions \
             WHERE user_id = ? AND device_fingerprint = ? AND status = 'ACTIVE' \
             ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find active session: {}", e),
            })?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn create(&self, session: Session) -> DomainResult<Session> {
        insert_query(&session)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create session: {}", e),
            })?;

        Ok(session)
    }

    async fn create_bounded(&self, session: Session, max_sessions: u32) -> DomainResult<Session> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        // Lock the user's ACTIVE rows for the duration of the cap check
        let active_rows = sqlx::query(
            "SELECT id FROM auth_sessions \
             WHERE user_id = ? AND status = 'ACTIVE' \
             ORDER BY COALESCE(last_used_at, created_at) ASC \
             FOR UPDATE",
        )
        .bind(session.user_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count active sessions: {}", e),
        })?;

        if active_rows.len() as u32 >= max_sessions {
            let oldest_id: String =
                active_rows[0]
                    .try_get("id")
                    .map_err(|e| DomainError::Internal {
                        message: format!("Failed to get id: {}", e),
                    })?;

            sqlx::query("UPDATE auth_sessions SET status = 'REVOKED' WHERE id = ?")
                .bind(&oldest_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to evict oldest session: {}", e),
                })?;

            tracing::info!(
                user_id = session.user_id,
                session_id = %oldest_id,
                "Evicted least recently used session at cap"
            );
        }

        insert_query(&session)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to create session: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(session)
    }

    async fn touch(
        &self,
        id: &str,
        user_agent: Option<&str>,
        token_hash: Option<&str>,
    ) -> DomainResult<()> {
        let query = r#"
            UPDATE auth_sessions
            SET last_used_at = ?,
                user_agent = COALESCE(?, user_agent),
                token_hash = COALESCE(?, token_hash)
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(user_agent)
            .bind(token_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to touch session: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("session {}", id),
            });
        }

        Ok(())
    }

    async fn rotate(&self, old_id: &str, replacement: Session) -> DomainResult<Session> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let result = sqlx::query(
            "UPDATE auth_sessions SET status = 'USED', rotated_at = ? \
             WHERE id = ? AND status = 'ACTIVE'",
        )
        .bind(Utc::now())
        .bind(old_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to retire session: {}", e),
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("active session {}", old_id),
            });
        }

        insert_query(&replacement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to insert replacement session: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        Ok(replacement)
    }

    async fn count_active(&self, user_id: i64) -> DomainResult<u64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS cnt FROM auth_sessions WHERE user_id = ? AND status = 'ACTIVE'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to count sessions: {}", e),
        })?;

        let count: i64 = row.try_get("cnt").map_err(|e| DomainError::Internal {
            message: format!("Failed to get cnt: {}", e),
        })?;

        Ok(count as u64)
    }

    async fn oldest_active(&self, user_id: i64) -> DomainResult<Option<Session>> {
        let query = format!(
            "SELECT {} FROM auth_sessions \
             WHERE user_id = ? AND status = 'ACTIVE' \
             ORDER BY COALESCE(last_used_at, created_at) ASC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to find oldest session: {}", e),
            })?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn revoke_family(&self, family_id: &str) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET status = 'REVOKED' \
             WHERE family_id = ? AND status <> 'REVOKED'",
        )
        .bind(family_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to revoke session family: {}", e),
        })?;

        Ok(result.rows_affected())
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET status = 'REVOKED' \
             WHERE user_id = ? AND status <> 'REVOKED'",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Failed to revoke user sessions: {}", e),
        })?;

        Ok(result.rows_affected())
    }
}
