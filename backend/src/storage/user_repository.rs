use anyhow::{anyhow, Context, Result};
use sqlx::Row;

use crate::auth::{AuthUser, Role};
use crate::db::DbConnection;

/// Repository for user rows. User management lives elsewhere; this service
/// only resolves the acting user and seeds a first admin on an empty store.
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new user
    pub async fn store_user(&self, user: &AuthUser) -> Result<()> {
        sqlx::query("INSERT INTO users (id, name, role) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(user.role.as_str())
            .execute(self.db.pool())
            .await
            .context("failed to insert user")?;
        Ok(())
    }

    /// Retrieve a specific user by ID
    pub async fn get_user(&self, id: &str) -> Result<Option<AuthUser>> {
        let row = sqlx::query("SELECT id, name, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|r| {
            let role: String = r.get("role");
            Ok(AuthUser {
                id: r.get("id"),
                name: r.get("name"),
                role: Role::parse(&role)
                    .ok_or_else(|| anyhow!("user '{}' has unknown role '{}'", id, role))?,
            })
        })
        .transpose()
    }

    /// Total number of user rows
    pub async fn count_users(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("n"))
    }
}
