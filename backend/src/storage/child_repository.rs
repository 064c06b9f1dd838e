use anyhow::{Context, Result};
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::Child;

/// Repository for child rows. The schedule screen only ever reads
/// children; writes exist for seeding and tests.
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a new child
    pub async fn store_child(&self, child: &Child) -> Result<()> {
        sqlx::query("INSERT INTO children (id, name) VALUES (?, ?)")
            .bind(&child.id)
            .bind(&child.name)
            .execute(self.db.pool())
            .await
            .context("failed to insert child")?;
        Ok(())
    }

    /// Retrieve a specific child by ID
    pub async fn get_child(&self, id: &str) -> Result<Option<Child>> {
        let row = sqlx::query("SELECT id, name FROM children WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| Child {
            id: r.get("id"),
            name: r.get("name"),
        }))
    }

    /// List all children ordered by name
    pub async fn list_children(&self) -> Result<Vec<Child>> {
        let rows = sqlx::query("SELECT id, name FROM children ORDER BY name")
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows
            .iter()
            .map(|r| Child {
                id: r.get("id"),
                name: r.get("name"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_repo() -> ChildRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        ChildRepository::new(db)
    }

    fn child(name: &str) -> Child {
        Child {
            id: Child::generate_id(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn list_children_orders_by_name() {
        let repo = setup_repo().await;
        repo.store_child(&child("Siti")).await.unwrap();
        repo.store_child(&child("Aiman")).await.unwrap();
        repo.store_child(&child("Hafiz")).await.unwrap();

        let children = repo.list_children().await.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aiman", "Hafiz", "Siti"]);
    }

    #[tokio::test]
    async fn get_child_returns_none_for_unknown_id() {
        let repo = setup_repo().await;
        let result = repo.get_child("child::missing").await.unwrap();
        assert!(result.is_none());
    }
}
