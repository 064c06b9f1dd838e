//! Flash notifications: localized success messages queued per user in the
//! key-value table and drained on the next page render.

use tracing::info;

use crate::db::DbConnection;
use crate::domain::error::DomainResult;

const FLASH_PREFIX: &str = "flash::";

pub const MSG_INSERT_SUCCESS: &str = "crud.insert_success";
pub const MSG_UPDATE_SUCCESS: &str = "crud.update_success";

/// Localize a message key. Unknown keys fall through verbatim so a missing
/// translation is visible rather than silent.
pub fn translate(key: &str) -> String {
    match key {
        MSG_INSERT_SUCCESS => "Berjaya disimpan.".to_string(),
        MSG_UPDATE_SUCCESS => "Berjaya dikemaskini.".to_string(),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct NotificationQueue {
    db: DbConnection,
}

impl NotificationQueue {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Queue a message key for the user's next rendered page
    pub async fn push(&self, user_id: &str, message_key: &str) -> DomainResult<()> {
        let key = Self::key(user_id);
        let mut keys = self.read_keys(&key).await?;
        keys.push(message_key.to_string());
        self.db
            .put_value(&key, &serde_json::to_string(&keys).map_err(anyhow::Error::from)?)
            .await?;
        info!("Queued notification '{}' for user {}", message_key, user_id);
        Ok(())
    }

    /// Drain the user's queue, returning the localized messages in the
    /// order they were queued
    pub async fn drain(&self, user_id: &str) -> DomainResult<Vec<String>> {
        let key = Self::key(user_id);
        let keys = self.read_keys(&key).await?;
        if !keys.is_empty() {
            self.db.delete_value(&key).await?;
        }
        Ok(keys.iter().map(|k| translate(k)).collect())
    }

    async fn read_keys(&self, key: &str) -> DomainResult<Vec<String>> {
        match self.db.get_value(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).map_err(anyhow::Error::from)?),
            None => Ok(Vec::new()),
        }
    }

    fn key(user_id: &str) -> String {
        format!("{}{}", FLASH_PREFIX, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_queue() -> NotificationQueue {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        NotificationQueue::new(db)
    }

    #[tokio::test]
    async fn drain_returns_localized_messages_in_order() {
        let queue = setup_queue().await;
        queue.push("user::abu", MSG_INSERT_SUCCESS).await.unwrap();
        queue.push("user::abu", MSG_UPDATE_SUCCESS).await.unwrap();

        let messages = queue.drain("user::abu").await.unwrap();
        assert_eq!(messages, vec!["Berjaya disimpan.", "Berjaya dikemaskini."]);
    }

    #[tokio::test]
    async fn drain_empties_the_queue() {
        let queue = setup_queue().await;
        queue.push("user::abu", MSG_INSERT_SUCCESS).await.unwrap();

        queue.drain("user::abu").await.unwrap();
        let again = queue.drain("user::abu").await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn queues_are_per_user() {
        let queue = setup_queue().await;
        queue.push("user::abu", MSG_INSERT_SUCCESS).await.unwrap();

        let other = queue.drain("user::siti").await.unwrap();
        assert!(other.is_empty());

        let own = queue.drain("user::abu").await.unwrap();
        assert_eq!(own.len(), 1);
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert_eq!(translate("crud.mystery"), "crud.mystery");
    }
}
