//! Domain models for the schedule admin. These carry parsed types
//! (weekday, times, timestamps); the `shared` crate carries the wire shapes.

use chrono::{DateTime, NaiveTime, Utc};
use shared::Weekday;
use uuid::Uuid;

/// Time-of-day format used across storage and the API ("09:30")
pub const TIME_FORMAT: &str = "%H:%M";

/// A recurring class session for one child. Created by exactly one user
/// and belonging to exactly one child.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub id: String,
    pub user_id: String,
    pub child_id: String,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub name: String,
    pub class_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Generate a unique ID for a schedule
    pub fn generate_id() -> String {
        format!("schedule::{}", Uuid::new_v4())
    }

    /// Shallow duplicate with a freshly assigned identifier. Every other
    /// field is copied verbatim, including the original owner.
    pub fn replicate(&self) -> Schedule {
        let now = Utc::now();
        Schedule {
            id: Self::generate_id(),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    pub fn to_dto(&self) -> shared::Schedule {
        shared::Schedule {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            child_id: self.child_id.clone(),
            day: self.day,
            start_time: self.start_time.format(TIME_FORMAT).to_string(),
            end_time: self.end_time.format(TIME_FORMAT).to_string(),
            name: self.name.clone(),
            class_url: self.class_url.clone(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

/// A child as this service sees it: a display name for selection lists
/// and column resolution. Managed by a different screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub id: String,
    pub name: String,
}

impl Child {
    /// Generate a unique ID for a child
    pub fn generate_id() -> String {
        format!("child::{}", Uuid::new_v4())
    }

    pub fn to_dto(&self) -> shared::Child {
        shared::Child {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}
