use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use shared::Weekday;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::{Schedule, TIME_FORMAT};

const SELECT_COLUMNS: &str =
    "id, user_id, child_id, day, start_time, end_time, name, class_url, created_at, updated_at";

/// Repository for schedule rows
#[derive(Clone)]
pub struct ScheduleRepository {
    db: DbConnection,
}

impl ScheduleRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a new schedule row
    pub async fn store(&self, schedule: &Schedule) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO schedules
                (id, user_id, child_id, day, start_time, end_time, name, class_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&schedule.id)
        .bind(&schedule.user_id)
        .bind(&schedule.child_id)
        .bind(schedule.day.code() as i64)
        .bind(schedule.start_time.format(TIME_FORMAT).to_string())
        .bind(schedule.end_time.format(TIME_FORMAT).to_string())
        .bind(&schedule.name)
        .bind(&schedule.class_url)
        .bind(schedule.created_at.to_rfc3339())
        .bind(schedule.updated_at.to_rfc3339())
        .execute(self.db.pool())
        .await
        .context("failed to insert schedule")?;
        Ok(())
    }

    /// Retrieve a specific schedule by ID
    pub async fn get(&self, id: &str) -> Result<Option<Schedule>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM schedules WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|r| Self::from_row(&r)).transpose()
    }

    /// List schedules, optionally restricted to one child and/or one day.
    /// Both filters compose conjunctively. Rows come back in week order,
    /// then by start time.
    pub async fn list(&self, child_id: Option<&str>, day: Option<Weekday>) -> Result<Vec<Schedule>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM schedules
            WHERE (?1 IS NULL OR child_id = ?1)
              AND (?2 IS NULL OR day = ?2)
            ORDER BY day, start_time
            "#,
            SELECT_COLUMNS
        ))
        .bind(child_id)
        .bind(day.map(|d| d.code() as i64))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    /// Overwrite an existing schedule row
    pub async fn update(&self, schedule: &Schedule) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET child_id = ?, day = ?, start_time = ?, end_time = ?,
                name = ?, class_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&schedule.child_id)
        .bind(schedule.day.code() as i64)
        .bind(schedule.start_time.format(TIME_FORMAT).to_string())
        .bind(schedule.end_time.format(TIME_FORMAT).to_string())
        .bind(&schedule.name)
        .bind(&schedule.class_url)
        .bind(schedule.updated_at.to_rfc3339())
        .bind(&schedule.id)
        .execute(self.db.pool())
        .await
        .context("failed to update schedule")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("schedule '{}' vanished during update", schedule.id));
        }
        Ok(())
    }

    /// Delete a schedule row.
    /// Returns true if the schedule was found and deleted, false otherwise
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of schedule rows
    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM schedules")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.get("n"))
    }

    fn from_row(row: &SqliteRow) -> Result<Schedule> {
        let id: String = row.get("id");
        let day_code: i64 = row.get("day");
        let day = u8::try_from(day_code)
            .ok()
            .and_then(Weekday::from_code)
            .ok_or_else(|| anyhow!("schedule '{}' has invalid day code {}", id, day_code))?;

        let start_time: String = row.get("start_time");
        let end_time: String = row.get("end_time");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");

        Ok(Schedule {
            user_id: row.get("user_id"),
            child_id: row.get("child_id"),
            day,
            start_time: NaiveTime::parse_from_str(&start_time, TIME_FORMAT)
                .with_context(|| format!("schedule '{}' has invalid start_time", id))?,
            end_time: NaiveTime::parse_from_str(&end_time, TIME_FORMAT)
                .with_context(|| format!("schedule '{}' has invalid end_time", id))?,
            name: row.get("name"),
            class_url: row.get("class_url"),
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("schedule '{}' has invalid created_at", id))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .with_context(|| format!("schedule '{}' has invalid updated_at", id))?
                .with_timezone(&Utc),
            id,
        })
    }
}
