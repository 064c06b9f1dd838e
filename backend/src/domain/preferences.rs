//! Per-user persisted UI preferences, stored in the key-value table.
//! Currently the only preference is the "save and ..." redirect choice.

use shared::SaveAction;
use tracing::info;

use crate::db::DbConnection;
use crate::domain::error::DomainResult;

const SAVE_ACTION_PREFIX: &str = "save_action::";

/// Default when the user has never chosen: back to the list
const DEFAULT_SAVE_ACTION: SaveAction = SaveAction::SaveAndBack;

#[derive(Clone)]
pub struct PreferenceStore {
    db: DbConnection,
}

impl PreferenceStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// The user's stored save action, if any
    pub async fn save_action_for(&self, user_id: &str) -> DomainResult<Option<SaveAction>> {
        let value = self.db.get_value(&Self::key(user_id)).await?;
        Ok(value.as_deref().and_then(parse_save_action))
    }

    /// Persist the user's save action choice for subsequent saves
    pub async fn set_save_action(&self, user_id: &str, action: SaveAction) -> DomainResult<()> {
        info!("Saving redirect choice '{}' for user {}", save_action_str(action), user_id);
        self.db
            .put_value(&Self::key(user_id), save_action_str(action))
            .await?;
        Ok(())
    }

    /// Resolve the effective save action for this save: an explicit choice
    /// wins and is remembered; otherwise the stored preference, falling
    /// back to the default.
    pub async fn resolve(
        &self,
        user_id: &str,
        submitted: Option<SaveAction>,
    ) -> DomainResult<SaveAction> {
        match submitted {
            Some(action) => {
                self.set_save_action(user_id, action).await?;
                Ok(action)
            }
            None => Ok(self
                .save_action_for(user_id)
                .await?
                .unwrap_or(DEFAULT_SAVE_ACTION)),
        }
    }

    fn key(user_id: &str) -> String {
        format!("{}{}", SAVE_ACTION_PREFIX, user_id)
    }
}

fn save_action_str(action: SaveAction) -> &'static str {
    match action {
        SaveAction::SaveAndBack => "save_and_back",
        SaveAction::SaveAndEdit => "save_and_edit",
        SaveAction::SaveAndNew => "save_and_new",
    }
}

fn parse_save_action(value: &str) -> Option<SaveAction> {
    match value {
        "save_and_back" => Some(SaveAction::SaveAndBack),
        "save_and_edit" => Some(SaveAction::SaveAndEdit),
        "save_and_new" => Some(SaveAction::SaveAndNew),
        _ => None,
    }
}
