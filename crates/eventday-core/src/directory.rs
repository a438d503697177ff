// ABOUTME: Static lookup tables loaded once at startup: fellow credentials and event options.
// ABOUTME: Fellows map to a school; the catalog maps grade -> slot -> ordered event options.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::record::{NOT_PARTICIPATING, Slot};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown slot label {label:?} for event {event:?}")]
    UnknownSlot { label: String, event: String },
}

/// A fellow's login credential and the school they register students for.
#[derive(Debug, Clone, Deserialize)]
pub struct Fellow {
    pub password: String,
    pub school: String,
}

/// Credential/school lookup keyed by fellow email.
#[derive(Debug, Default)]
pub struct FellowDirectory {
    fellows: HashMap<String, Fellow>,
}

impl FellowDirectory {
    pub fn new(fellows: HashMap<String, Fellow>) -> Self {
        Self { fellows }
    }

    /// Load the directory from a JSON map of `email -> {password, school}`.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&contents)?))
    }

    /// Check a login. A lookup miss and a password mismatch are
    /// indistinguishable to the caller.
    pub fn login_check(&self, email: &str, password: &str) -> Result<&str, AuthError> {
        match self.fellows.get(email) {
            Some(fellow) if fellow.password == password => Ok(&fellow.school),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn school_for(&self, email: &str) -> Option<&str> {
        self.fellows.get(email).map(|f| f.school.as_str())
    }
}

/// One catalog source row: an event offered to a grade at one or two slots.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub event: String,
    pub grade: String,
    pub slots: Vec<String>,
}

/// Per-grade slot options for the registration form, with the sentinel first
/// in every slot, plus the set of events that occupy two slots.
#[derive(Debug, Default)]
pub struct EventCatalog {
    options: HashMap<String, BTreeMap<Slot, Vec<String>>>,
    double_slot: BTreeSet<String>,
}

impl EventCatalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, DirectoryError> {
        let mut options: HashMap<String, BTreeMap<Slot, Vec<String>>> = HashMap::new();
        let mut double_slot = BTreeSet::new();

        for entry in entries {
            let grade = options.entry(entry.grade.clone()).or_insert_with(|| {
                Slot::ALL
                    .iter()
                    .map(|slot| (*slot, vec![NOT_PARTICIPATING.to_string()]))
                    .collect()
            });

            for label in &entry.slots {
                let slot = Slot::from_label(label).ok_or_else(|| DirectoryError::UnknownSlot {
                    label: label.clone(),
                    event: entry.event.clone(),
                })?;
                if let Some(events) = grade.get_mut(&slot) {
                    events.push(entry.event.clone());
                }
            }

            if entry.slots.len() >= 2 {
                double_slot.insert(entry.event.clone());
            }
        }

        Ok(Self {
            options,
            double_slot,
        })
    }

    /// Load the catalog from a JSON list of `{event, grade, slots}` entries.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let contents = fs::read_to_string(path)?;
        Self::from_entries(serde_json::from_str(&contents)?)
    }

    /// Unknown grade yields None; callers treat that as "no options".
    pub fn options_for(&self, grade: &str) -> Option<&BTreeMap<Slot, Vec<String>>> {
        self.options.get(grade)
    }

    pub fn is_double_slot(&self, event: &str) -> bool {
        self.double_slot.contains(event)
    }

    pub fn double_slot_events(&self) -> &BTreeSet<String> {
        &self.double_slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> FellowDirectory {
        let mut fellows = HashMap::new();
        fellows.insert(
            "fellow@school.org".to_string(),
            Fellow {
                password: "hunter2".to_string(),
                school: "Riverside".to_string(),
            },
        );
        FellowDirectory::new(fellows)
    }

    fn catalog() -> EventCatalog {
        EventCatalog::from_entries(vec![
            CatalogEntry {
                event: "Chess".to_string(),
                grade: "6".to_string(),
                slots: vec!["10-11am".to_string(), "1-2pm".to_string()],
            },
            CatalogEntry {
                event: "Debate".to_string(),
                grade: "6".to_string(),
                slots: vec!["11-12pm".to_string()],
            },
        ])
        .unwrap()
    }

    #[test]
    fn login_check_returns_school_on_match() {
        let dir = directory();
        let school = dir.login_check("fellow@school.org", "hunter2").unwrap();
        assert_eq!(school, "Riverside");
    }

    #[test]
    fn login_check_rejects_wrong_password_and_unknown_email() {
        let dir = directory();
        assert!(dir.login_check("fellow@school.org", "wrong").is_err());
        assert!(dir.login_check("nobody@school.org", "hunter2").is_err());
    }

    #[test]
    fn sentinel_is_first_option_in_every_slot() {
        let cat = catalog();
        let options = cat.options_for("6").unwrap();
        for slot in Slot::ALL {
            assert_eq!(options[&slot][0], NOT_PARTICIPATING);
        }
        assert_eq!(options[&Slot::Morning1][1], "Chess");
        assert_eq!(options[&Slot::Morning2][1], "Debate");
    }

    #[test]
    fn two_slot_event_is_flagged_double() {
        let cat = catalog();
        assert!(cat.is_double_slot("Chess"));
        assert!(!cat.is_double_slot("Debate"));
    }

    #[test]
    fn unknown_grade_has_no_options() {
        assert!(catalog().options_for("12").is_none());
    }

    #[test]
    fn unknown_slot_label_is_a_load_error() {
        let err = EventCatalog::from_entries(vec![CatalogEntry {
            event: "Chess".to_string(),
            grade: "6".to_string(),
            slots: vec!["4-5pm".to_string()],
        }])
        .unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownSlot { .. }));
    }

    #[test]
    fn directory_loads_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fellows.json");
        fs::write(
            &path,
            r#"{"fellow@school.org": {"password": "hunter2", "school": "Riverside"}}"#,
        )
        .unwrap();

        let loaded = FellowDirectory::load(&path).unwrap();
        assert_eq!(loaded.school_for("fellow@school.org"), Some("Riverside"));
    }

    #[test]
    fn catalog_loads_from_json_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        fs::write(
            &path,
            r#"[{"event": "Chess", "grade": "6", "slots": ["10-11am"]}]"#,
        )
        .unwrap();

        let loaded = EventCatalog::load(&path).unwrap();
        assert!(loaded.options_for("6").is_some());
    }
}
