// ABOUTME: Builds the per-event roster view from a set of reconciled registrations.
// ABOUTME: Students dedupe into slot sets; spans run earliest slot start to latest slot end.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::record::{NOT_PARTICIPATING, Registration, Slot};

/// One event's roster: who attends, at which slots, and the combined time
/// range over every slot the event occupies.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterEntry {
    pub students: BTreeMap<String, BTreeSet<Slot>>,
    pub time_span: String,
}

/// Group registrations by event name. A student attending the same event in
/// two slots appears once, with both slots in their set. Blank and sentinel
/// slot values never reach the roster.
pub fn aggregate(registrations: &[Registration]) -> BTreeMap<String, RosterEntry> {
    let mut rosters: BTreeMap<String, BTreeMap<String, BTreeSet<Slot>>> = BTreeMap::new();

    for registration in registrations {
        for slot in Slot::ALL {
            let choice = registration.choices.get(slot).trim();
            if choice.is_empty() || choice == NOT_PARTICIPATING {
                continue;
            }
            rosters
                .entry(choice.to_string())
                .or_default()
                .entry(registration.student.clone())
                .or_default()
                .insert(slot);
        }
    }

    rosters
        .into_iter()
        .map(|(event, students)| {
            let slots: BTreeSet<Slot> = students.values().flatten().copied().collect();
            let time_span = match (slots.first(), slots.last()) {
                (Some(first), Some(last)) => {
                    format!("{}-{}", first.start_label(), last.end_label())
                }
                // No slots left means no span, not a failure.
                _ => String::new(),
            };
            (event, RosterEntry { students, time_span })
        })
        .collect()
}
