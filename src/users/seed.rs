use sqlx::PgPool;
use tracing::info;

use crate::auth::{claims::Role, password::hash_password};
use crate::users::repo::UserAccount;

/// Create the two default accounts on first startup.
///
/// Guarded by the existence of an `admin` account, so reruns are no-ops.
pub async fn ensure_seed_users(db: &PgPool) -> anyhow::Result<()> {
    if UserAccount::find_by_username(db, "admin").await?.is_some() {
        return Ok(());
    }

    UserAccount::insert(db, "admin", &hash_password("secret")?, Role::Admin, None).await?;
    UserAccount::insert(
        db,
        "testuser",
        &hash_password("password123")?,
        Role::User,
        None,
    )
    .await?;

    info!("default users initialized");
    Ok(())
}
