//! Read-only access to children for selection lists and column
//! resolution. Creating and editing children belongs to a different
//! screen.

use tracing::info;

use crate::db::DbConnection;
use crate::domain::error::DomainResult;
use crate::domain::models::Child;
use crate::storage::ChildRepository;

#[derive(Clone)]
pub struct ChildService {
    repository: ChildRepository,
}

impl ChildService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: ChildRepository::new(db),
        }
    }

    /// All children ordered by name, for dropdown population
    pub async fn list_children(&self) -> DomainResult<Vec<Child>> {
        let children = self.repository.list_children().await?;
        info!("Listed {} children", children.len());
        Ok(children)
    }

    pub async fn get_child(&self, id: &str) -> DomainResult<Option<Child>> {
        Ok(self.repository.get_child(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_service() -> (ChildService, ChildRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (ChildService::new(db.clone()), ChildRepository::new(db))
    }

    #[tokio::test]
    async fn list_children_is_name_ordered() {
        let (service, repo) = setup_service().await;
        for name in ["Zara", "Aiman", "Hafiz"] {
            repo.store_child(&Child {
                id: Child::generate_id(),
                name: name.to_string(),
            })
            .await
            .unwrap();
        }

        let children = service.list_children().await.unwrap();
        let names: Vec<&str> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Aiman", "Hafiz", "Zara"]);
    }
}
