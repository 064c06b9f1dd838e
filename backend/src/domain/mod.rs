//! Domain layer: the schedule screen's services, models, shared form
//! schema and error taxonomy.

pub mod child_service;
pub mod error;
pub mod fields;
pub mod models;
pub mod notifications;
pub mod preferences;
pub mod schedule_service;

pub use child_service::ChildService;
pub use notifications::NotificationQueue;
pub use schedule_service::ScheduleService;
