use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Day-of-week enumeration used by the schedule list column, the list
/// filter and the form field. All three must consume this single table;
/// the integer codes follow the schedule rows in the database (1 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Integer code as stored in the database (1-7).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Localized display label (the admin UI is in Malay).
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Isnin",
            Weekday::Tuesday => "Selasa",
            Weekday::Wednesday => "Rabu",
            Weekday::Thursday => "Khamis",
            Weekday::Friday => "Jumaat",
            Weekday::Saturday => "Sabtu",
            Weekday::Sunday => "Ahad",
        }
    }

    /// Look up a weekday by its integer code. Codes outside 1-7 have no
    /// weekday and must be rejected by the caller.
    pub fn from_code(code: u8) -> Option<Weekday> {
        Weekday::ALL.get(code.checked_sub(1)? as usize).copied()
    }

    /// (code, label) pairs for dropdown rendering, in week order.
    pub fn options() -> Vec<SelectOption> {
        Weekday::ALL
            .iter()
            .map(|day| SelectOption {
                value: day.code().to_string(),
                label: day.label().to_string(),
            })
            .collect()
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Weekday::from_code(code).ok_or_else(|| format!("invalid day code: {}", code))
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> u8 {
        day.code()
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A child, as shown in selection lists. Children are managed elsewhere;
/// this service only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
}

/// Schedule ID in format: "schedule::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    /// ID of the user that created this schedule
    pub user_id: String,
    /// ID of the child this schedule belongs to
    pub child_id: String,
    pub day: Weekday,
    /// Time of day in "HH:MM"
    pub start_time: String,
    /// Time of day in "HH:MM"
    pub end_time: String,
    /// Subject name
    pub name: String,
    /// Optional meeting link opened when the class runs
    pub class_url: Option<String>,
    /// RFC 3339 timestamps
    pub created_at: String,
    pub updated_at: String,
}

/// Submitted field values for create and update. The same payload shape is
/// used by both operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScheduleInput {
    #[validate(length(min = 1, message = "a child must be selected"))]
    pub child_id: String,
    /// Day-of-week code; only 1-7 are valid
    #[validate(range(min = 1, max = 7, message = "day must be between 1 and 7"))]
    pub day: u8,
    pub start_time: String,
    pub end_time: String,
    #[validate(length(min = 1, max = 120, message = "subject name is required"))]
    pub name: String,
    #[validate(url(message = "must be a valid URL"))]
    pub class_url: Option<String>,
    /// Ignored on create: the owner is always the authenticated actor.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Redirect choice; when present it is persisted as the caller's
    /// preference for subsequent saves.
    #[serde(default)]
    pub save_action: Option<SaveAction>,
}

/// Where to go after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveAction {
    /// Return to the list view
    SaveAndBack,
    /// Stay on the saved entry's edit view
    SaveAndEdit,
    /// Go to an empty create form
    SaveAndNew,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub entry: Schedule,
    /// Computed from the effective save action
    pub redirect_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleListRequest {
    /// Restrict to schedules of this child
    pub child_id: Option<String>,
    /// Restrict to schedules on this day-of-week code (1-7)
    pub day: Option<u8>,
}

/// One rendered row of the schedule list. Foreign keys are resolved to
/// display values: the child's name and the weekday label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub id: String,
    pub child_name: String,
    pub day_label: String,
    pub start_time: String,
    pub end_time: String,
    pub name: String,
    pub class_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<ScheduleRow>,
}

/// A (value, label) pair for dropdown rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// How a form field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Searchable select backed by an entity
    Select,
    /// Select over a fixed option table
    SelectFromArray,
    Time,
    Text,
    Url,
}

/// One field of the create/update form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Options for select kinds; empty otherwise
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// One column of the list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub label: String,
}

/// The declarative form schema. Create and update consume the same schema;
/// the edit variant additionally carries the current entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Localized entity name shown in form headings
    pub entity: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    pub schema: FormSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Schedule>,
}

/// Queued flash messages for the acting user, already localized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_codes_cover_one_through_seven() {
        for code in 1..=7u8 {
            let day = Weekday::from_code(code).expect("code should map to a weekday");
            assert_eq!(day.code(), code);
        }
        assert!(Weekday::from_code(0).is_none());
        assert!(Weekday::from_code(8).is_none());
    }

    #[test]
    fn weekday_labels_are_localized() {
        assert_eq!(Weekday::Monday.label(), "Isnin");
        assert_eq!(Weekday::Wednesday.label(), "Rabu");
        assert_eq!(Weekday::Sunday.label(), "Ahad");
    }

    #[test]
    fn weekday_options_follow_week_order() {
        let options = Weekday::options();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0].value, "1");
        assert_eq!(options[0].label, "Isnin");
        assert_eq!(options[6].value, "7");
        assert_eq!(options[6].label, "Ahad");
    }

    #[test]
    fn weekday_deserialization_rejects_out_of_range() {
        let day: Result<Weekday, _> = serde_json::from_str("3");
        assert_eq!(day.unwrap(), Weekday::Wednesday);

        let invalid: Result<Weekday, _> = serde_json::from_str("9");
        assert!(invalid.is_err());
    }

    #[test]
    fn schedule_input_validates_url_and_day() {
        let input = ScheduleInput {
            child_id: "child::1".to_string(),
            day: 3,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            name: "Matematik".to_string(),
            class_url: Some("https://meet.google.com/abc".to_string()),
            user_id: None,
            save_action: None,
        };
        assert!(input.validate().is_ok());

        let bad_url = ScheduleInput {
            class_url: Some("not a url".to_string()),
            ..input.clone()
        };
        assert!(bad_url.validate().is_err());

        let bad_day = ScheduleInput { day: 8, ..input };
        assert!(bad_day.validate().is_err());
    }
}
