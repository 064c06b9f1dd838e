//! The schedule screen's operations: filtered listing, the shared
//! create/update form, delete, and the clone-and-redirect workflow.

use std::collections::HashMap;

use chrono::{NaiveTime, Utc};
use shared::{
    FormResponse, SaveAction, SaveResponse, ScheduleInput, ScheduleListRequest,
    ScheduleListResponse, ScheduleRow, Weekday,
};
use tracing::info;
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{Schedule, TIME_FORMAT};
use crate::domain::notifications::{NotificationQueue, MSG_INSERT_SUCCESS, MSG_UPDATE_SUCCESS};
use crate::domain::preferences::PreferenceStore;
use crate::domain::{fields, ChildService};
use crate::storage::ScheduleRepository;

/// Route prefix of the schedule screen; redirect targets are built on it
pub const BASE_PATH: &str = "/api/schedule";

#[derive(Clone)]
pub struct ScheduleService {
    schedules: ScheduleRepository,
    children: ChildService,
    preferences: PreferenceStore,
    notifications: NotificationQueue,
}

impl ScheduleService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            schedules: ScheduleRepository::new(db.clone()),
            children: ChildService::new(db.clone()),
            preferences: PreferenceStore::new(db.clone()),
            notifications: NotificationQueue::new(db),
        }
    }

    /// List schedules with the optional child and day filters applied
    /// conjunctively. Day values outside 1-7 are rejected, never silently
    /// unfiltered.
    pub async fn list(&self, request: ScheduleListRequest) -> DomainResult<ScheduleListResponse> {
        info!("Listing schedules with request: {:?}", request);

        let day = match request.day {
            Some(code) => Some(Weekday::from_code(code).ok_or_else(|| {
                DomainError::validation("day", "day must be between 1 and 7")
            })?),
            None => None,
        };

        let schedules = self
            .schedules
            .list(request.child_id.as_deref(), day)
            .await?;

        // Resolve child ids to display names in one pass
        let children = self.children.list_children().await?;
        let names: HashMap<&str, &str> = children
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let rows = schedules
            .iter()
            .map(|schedule| ScheduleRow {
                id: schedule.id.clone(),
                child_name: names
                    .get(schedule.child_id.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_default(),
                day_label: schedule.day.label().to_string(),
                start_time: schedule.start_time.format(TIME_FORMAT).to_string(),
                end_time: schedule.end_time.format(TIME_FORMAT).to_string(),
                name: schedule.name.clone(),
                class_url: schedule.class_url.clone(),
            })
            .collect();

        Ok(ScheduleListResponse {
            columns: fields::columns(),
            rows,
        })
    }

    /// The create form: the shared schema with resolved options
    pub async fn create_form(&self) -> DomainResult<FormResponse> {
        let children = self.children.list_children().await?;
        Ok(FormResponse {
            schema: fields::form_schema(&children),
            entry: None,
        })
    }

    /// The edit form: the same schema plus the current entry
    pub async fn edit_form(&self, id: &str) -> DomainResult<FormResponse> {
        let entry = self
            .schedules
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("schedule", id))?;
        let children = self.children.list_children().await?;
        Ok(FormResponse {
            schema: fields::form_schema(&children),
            entry: Some(entry.to_dto()),
        })
    }

    /// Create a schedule. The owner is always the acting user; any owner
    /// value in the payload is discarded.
    pub async fn create(
        &self,
        actor: &AuthUser,
        input: ScheduleInput,
    ) -> DomainResult<SaveResponse> {
        info!("Creating schedule for user {}", actor.id);

        let (day, start_time, end_time) = self.validate_input(&input).await?;

        let now = Utc::now();
        let schedule = Schedule {
            id: Schedule::generate_id(),
            user_id: actor.id.clone(),
            child_id: input.child_id.clone(),
            day,
            start_time,
            end_time,
            name: input.name.trim().to_string(),
            class_url: input.class_url.clone(),
            created_at: now,
            updated_at: now,
        };

        self.schedules.store(&schedule).await?;
        info!("Created schedule {} for child {}", schedule.id, schedule.child_id);

        self.notifications.push(&actor.id, MSG_INSERT_SUCCESS).await?;

        let action = self.preferences.resolve(&actor.id, input.save_action).await?;
        Ok(SaveResponse {
            redirect_to: redirect_for(action, &schedule.id),
            entry: schedule.to_dto(),
        })
    }

    /// Update a schedule with the same field set as create. The owner and
    /// creation timestamp are untouched.
    pub async fn update(
        &self,
        actor: &AuthUser,
        id: &str,
        input: ScheduleInput,
    ) -> DomainResult<SaveResponse> {
        info!("Updating schedule {} for user {}", id, actor.id);

        let existing = self
            .schedules
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("schedule", id))?;

        let (day, start_time, end_time) = self.validate_input(&input).await?;

        let updated = Schedule {
            id: existing.id.clone(),
            user_id: existing.user_id.clone(),
            child_id: input.child_id.clone(),
            day,
            start_time,
            end_time,
            name: input.name.trim().to_string(),
            class_url: input.class_url.clone(),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.schedules.update(&updated).await?;

        self.notifications.push(&actor.id, MSG_UPDATE_SUCCESS).await?;

        let action = self.preferences.resolve(&actor.id, input.save_action).await?;
        Ok(SaveResponse {
            redirect_to: redirect_for(action, &updated.id),
            entry: updated.to_dto(),
        })
    }

    /// Delete a schedule
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        info!("Deleting schedule {}", id);
        if self.schedules.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("schedule", id))
        }
    }

    /// Clone a schedule: shallow-duplicate every field except the
    /// identifier and persist the duplicate. The clone keeps the original
    /// owner. Each call creates a fresh duplicate; the caller redirects to
    /// the new entry's edit view only once persistence has succeeded.
    pub async fn clone_entry(&self, id: &str) -> DomainResult<shared::Schedule> {
        let source = self
            .schedules
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("schedule", id))?;

        let copy = source.replicate();
        self.schedules.store(&copy).await?;

        info!("Cloned schedule {} into {}", id, copy.id);
        Ok(copy.to_dto())
    }

    /// Payload validation beyond the declarative rules: time parsing, time
    /// ordering and the child reference.
    async fn validate_input(
        &self,
        input: &ScheduleInput,
    ) -> DomainResult<(Weekday, NaiveTime, NaiveTime)> {
        input.validate()?;

        // The range rule already bounds the code; this lookup cannot fail
        // for payloads that passed it.
        let day = Weekday::from_code(input.day)
            .ok_or_else(|| DomainError::validation("day", "day must be between 1 and 7"))?;

        let start_time = NaiveTime::parse_from_str(&input.start_time, TIME_FORMAT)
            .map_err(|_| DomainError::validation("start_time", "must be a time in HH:MM"))?;
        let end_time = NaiveTime::parse_from_str(&input.end_time, TIME_FORMAT)
            .map_err(|_| DomainError::validation("end_time", "must be a time in HH:MM"))?;
        if end_time <= start_time {
            return Err(DomainError::validation(
                "end_time",
                "must be after the start time",
            ));
        }

        if self.children.get_child(&input.child_id).await?.is_none() {
            return Err(DomainError::validation("child_id", "unknown child"));
        }

        Ok((day, start_time, end_time))
    }
}

/// Redirect target for the edit view of an entry
pub fn edit_path(id: &str) -> String {
    format!("{}/{}/edit", BASE_PATH, id)
}

fn redirect_for(action: SaveAction, id: &str) -> String {
    match action {
        SaveAction::SaveAndBack => BASE_PATH.to_string(),
        SaveAction::SaveAndEdit => edit_path(id),
        SaveAction::SaveAndNew => format!("{}/create", BASE_PATH),
    }
}
