use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::claims::Role;

const USER_COLUMNS: &str =
    "id, username, password_hash, role, created_at, created_by, updated_at, updated_by";

/// Account record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, never exposed in JSON
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub created_by: Option<String>, // absent for seeded accounts
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub updated_by: Option<String>,
}

impl UserAccount {
    /// Find an account by exact, case-sensitive username.
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserAccount>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserAccount>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn list(db: &PgPool) -> sqlx::Result<Vec<UserAccount>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        sqlx::query_as::<_, UserAccount>(&sql).fetch_all(db).await
    }

    pub async fn insert(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        role: Role,
        created_by: Option<&str>,
    ) -> sqlx::Result<UserAccount> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, role, created_at, created_by) \
             VALUES ($1, $2, $3, now(), $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, UserAccount>(&sql)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .bind(created_by)
            .fetch_one(db)
            .await
    }

    /// Full-account update; returns the number of rows touched (0 when the
    /// id does not exist).
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        username: &str,
        password_hash: &str,
        role: Role,
        updated_by: &str,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            "UPDATE users \
             SET username = $2, password_hash = $3, role = $4, updated_at = now(), updated_by = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(updated_by)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = UserAccount {
            id: Uuid::new_v4(),
            username: "admin".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            role: Role::Admin,
            created_at: OffsetDateTime::now_utc(),
            created_by: None,
            updated_at: None,
            updated_by: None,
        };
        let json = serde_json::to_string(&user).expect("serialize user");
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"admin\""));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
