//! MySQL implementation of the IdentityRepository trait.
//!
//! User records live in `users` with roles in `user_roles`. Auth reads a
//! snapshot of the columns it needs; the only write this module owns is
//! the token version bump.

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};

use hg_core::domain::entities::subject::{AuthSubject, Role};
use hg_core::errors::{DomainError, DomainResult};
use hg_core::repositories::IdentityRepository;

const SELECT_USER: &str = r#"
    SELECT id, phone, token_version, is_active, is_blocked
    FROM users
"#;

/// MySQL implementation of IdentityRepository
pub struct MySqlIdentityRepository {
    pool: MySqlPool,
}

impl MySqlIdentityRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a user row plus its roles to an AuthSubject snapshot
    async fn row_to_subject(&self, row: &sqlx::mysql::MySqlRow) -> Result<AuthSubject, DomainError> {
        let user_id: i64 = row.try_get("id").map_err(|e| DomainError::Internal {
            message: format!("Failed to get id: {}", e),
        })?;

        let role_rows = sqlx::query("SELECT role FROM user_roles WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load roles: {}", e),
            })?;

        let mut roles = Vec::with_capacity(role_rows.len());
        for role_row in &role_rows {
            let raw: String = role_row.try_get("role").map_err(|e| DomainError::Internal {
                message: format!("Failed to get role: {}", e),
            })?;
            match Role::parse(&raw) {
                Some(role) => roles.push(role),
                None => {
                    tracing::warn!(user_id, role = %raw, "Skipping unknown role value");
                }
            }
        }

        Ok(AuthSubject {
            user_id,
            phone: row.try_get("phone").map_err(|e| DomainError::Internal {
                message: format!("Failed to get phone: {}", e),
            })?,
            roles,
            token_version: row
                .try_get("token_version")
                .map_err(|e| DomainError::Internal {
                    message: format!("Failed to get token_version: {}", e),
                })?,
            is_active: row.try_get("is_active").map_err(|e| DomainError::Internal {
                message: format!("Failed to get is_active: {}", e),
            })?,
            is_blocked: row.try_get("is_blocked").map_err(|e| DomainError::Internal {
                message: format!("Failed to get is_blocked: {}", e),
            })?,
        })
    }
}

#[async_trait]
impl IdentityRepository for MySqlIdentityRepository {
    async fn load_by_phone(&self, phone: &str) -> DomainResult<Option<AuthSubject>> {
        let query = format!("{} WHERE phone = ? LIMIT 1", SELECT_USER.trim_end());

        let row = sqlx::query(&query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load user by phone: {}", e),
            })?;

        match row {
            Some(row) => Ok(Some(self.row_to_subject(&row).await?)),
            None => Ok(None),
        }
    }

    async fn load_by_id(&self, user_id: i64) -> DomainResult<Option<AuthSubject>> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_USER.trim_end());

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load user by id: {}", e),
            })?;

        match row {
            Some(row) => Ok(Some(self.row_to_subject(&row).await?)),
            None => Ok(None),
        }
    }

    async fn bump_token_version(&self, user_id: i64) -> DomainResult<i64> {
        let mut tx = self.pool.begin().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to begin transaction: {}", e),
        })?;

        let result = sqlx::query("UPDATE users SET token_version = token_version + 1 WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to bump token version: {}", e),
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: format!("user {}", user_id),
            });
        }

        let row = sqlx::query("SELECT token_version FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to read token version: {}", e),
            })?;

        let version: i64 = row
            .try_get("token_version")
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to get token_version: {}", e),
            })?;

        tx.commit().await.map_err(|e| DomainError::Internal {
            message: format!("Failed to commit transaction: {}", e),
        })?;

        tracing::info!(user_id, version, "Bumped token version");
        Ok(version)
    }
}
