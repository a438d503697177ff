// ABOUTME: Defines the wire record appended to the registration log and its derived forms.
// ABOUTME: Records are immutable facts; current state is always reconstructed from them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire format for log timestamps: minute resolution, no zone.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Sentinel slot value meaning the student sits that slot out.
pub const NOT_PARTICIPATING: &str = "Not participating";

/// What a record says happened to a registration. `Deleted` is a tombstone
/// and carries blank attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Created,
    Updated,
    Deleted,
}

/// The four fixed slots of the event day, ordered by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Slot {
    #[serde(rename = "10-11am")]
    Morning1,
    #[serde(rename = "11-12pm")]
    Morning2,
    #[serde(rename = "1-2pm")]
    Afternoon1,
    #[serde(rename = "2-3pm")]
    Afternoon2,
}

impl Slot {
    pub const ALL: [Slot; 4] = [
        Slot::Morning1,
        Slot::Morning2,
        Slot::Afternoon1,
        Slot::Afternoon2,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slot::Morning1 => "10-11am",
            Slot::Morning2 => "11-12pm",
            Slot::Afternoon1 => "1-2pm",
            Slot::Afternoon2 => "2-3pm",
        }
    }

    pub fn start_label(self) -> &'static str {
        match self {
            Slot::Morning1 => "10am",
            Slot::Morning2 => "11am",
            Slot::Afternoon1 => "1pm",
            Slot::Afternoon2 => "2pm",
        }
    }

    pub fn end_label(self) -> &'static str {
        match self {
            Slot::Morning1 => "11am",
            Slot::Morning2 => "12pm",
            Slot::Afternoon1 => "2pm",
            Slot::Afternoon2 => "3pm",
        }
    }

    pub fn from_label(label: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.label() == label)
    }
}

/// One chosen event (or the sentinel) per slot, as submitted and as logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotChoices {
    pub event_10_11: String,
    pub event_11_12: String,
    pub event_1_2: String,
    pub event_2_3: String,
}

impl SlotChoices {
    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Morning1 => &self.event_10_11,
            Slot::Morning2 => &self.event_11_12,
            Slot::Afternoon1 => &self.event_1_2,
            Slot::Afternoon2 => &self.event_2_3,
        }
    }

    /// True when every slot choice is blank, as a tombstone requires.
    pub fn is_blank(&self) -> bool {
        Slot::ALL.iter().all(|s| self.get(*s).trim().is_empty())
    }

    /// True when every slot carries a value (the sentinel counts as a value).
    pub fn is_complete(&self) -> bool {
        Slot::ALL.iter().all(|s| !self.get(*s).trim().is_empty())
    }
}

/// A single row of the append-only registration log. All fields are text on
/// the wire; the timestamp is parsed only during reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: String,
    pub school: String,
    pub grade: String,
    pub section: String,
    pub student: String,
    #[serde(flatten)]
    pub choices: SlotChoices,
    pub created_by: String,
    pub action: Action,
}

impl Record {
    pub fn parsed_timestamp(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
    }
}

/// A reconciled current registration, derived from the log. Never persisted;
/// rebuilt from records on every cache refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub student: String,
    pub grade: String,
    pub section: String,
    pub school: String,
    #[serde(flatten)]
    pub choices: SlotChoices,
    pub recorded_at: NaiveDateTime,
}

impl Registration {
    pub fn from_record(record: &Record, recorded_at: NaiveDateTime) -> Self {
        Self {
            student: record.student.clone(),
            grade: record.grade.clone(),
            section: record.section.clone(),
            school: record.school.clone(),
            choices: record.choices.clone(),
            recorded_at,
        }
    }
}
