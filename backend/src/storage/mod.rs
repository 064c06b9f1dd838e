//! SQLite-backed repositories. Each repository owns a cloned handle to the
//! shared connection pool and exposes the row-level operations the domain
//! services need.

mod child_repository;
mod schedule_repository;
mod user_repository;

pub use child_repository::ChildRepository;
pub use schedule_repository::ScheduleRepository;
pub use user_repository::UserRepository;
