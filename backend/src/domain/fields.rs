//! The declarative field and column schema for the schedule screen.
//!
//! The list columns and the create/update form fields are defined here
//! once, in display order, and every consumer (list response, create form,
//! edit form) reads from these functions. Update deliberately has no
//! schema of its own.

use shared::{ColumnDef, FieldDef, FieldKind, FormSchema, SelectOption, Weekday};

use crate::domain::models::Child;

/// Localized entity name shown in headings ("schedule")
pub const ENTITY_NAME: &str = "Jadual";

const LABEL_CHILD: &str = "Anak";
const LABEL_DAY: &str = "Hari";
const LABEL_START_TIME: &str = "Mula Pada";
const LABEL_END_TIME: &str = "Akhir Pada";
const LABEL_NAME: &str = "Nama Subjek";
const LABEL_CLASS_URL: &str = "Link Kelas";

const CLASS_URL_HINT: &str =
    "Link Google Meet, Zoom atau apa-apa website yang perlu dibuka semasa kelas berjalan.";

/// Columns of the list view, in display order
pub fn columns() -> Vec<ColumnDef> {
    [
        ("child_id", LABEL_CHILD),
        ("day", LABEL_DAY),
        ("start_time", LABEL_START_TIME),
        ("end_time", LABEL_END_TIME),
        ("name", LABEL_NAME),
        ("class_url", LABEL_CLASS_URL),
    ]
    .into_iter()
    .map(|(name, label)| ColumnDef {
        name: name.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// The form schema consumed by both the create and the edit view.
/// `children` is expected in name order, as returned by the repository.
pub fn form_schema(children: &[Child]) -> FormSchema {
    let child_options = children
        .iter()
        .map(|child| SelectOption {
            value: child.id.clone(),
            label: child.name.clone(),
        })
        .collect();

    FormSchema {
        entity: ENTITY_NAME.to_string(),
        fields: vec![
            FieldDef {
                name: "child_id".to_string(),
                label: LABEL_CHILD.to_string(),
                kind: FieldKind::Select,
                options: child_options,
                hint: None,
            },
            FieldDef {
                name: "day".to_string(),
                label: LABEL_DAY.to_string(),
                kind: FieldKind::SelectFromArray,
                options: Weekday::options(),
                hint: None,
            },
            FieldDef {
                name: "start_time".to_string(),
                label: LABEL_START_TIME.to_string(),
                kind: FieldKind::Time,
                options: Vec::new(),
                hint: None,
            },
            FieldDef {
                name: "end_time".to_string(),
                label: LABEL_END_TIME.to_string(),
                kind: FieldKind::Time,
                options: Vec::new(),
                hint: None,
            },
            FieldDef {
                name: "name".to_string(),
                label: LABEL_NAME.to_string(),
                kind: FieldKind::Text,
                options: Vec::new(),
                hint: None,
            },
            FieldDef {
                name: "class_url".to_string(),
                label: LABEL_CLASS_URL.to_string(),
                kind: FieldKind::Url,
                options: Vec::new(),
                hint: Some(CLASS_URL_HINT.to_string()),
            },
        ],
    }
}
