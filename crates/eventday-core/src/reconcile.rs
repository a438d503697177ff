// ABOUTME: Reduces the raw registration log to current state per student, latest-wins.
// ABOUTME: Pure over its inputs; malformed timestamps abort the whole reconciliation.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::record::{Action, Record, Registration, TIMESTAMP_FORMAT};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("malformed record timestamp {value:?}: {source}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Fold the full log scan down to the current registrations owned by `owner`.
///
/// Per student, the record with the greatest timestamp wins; exact ties go to
/// the record scanned later, since minute-resolution stamps collide on
/// same-minute resubmits and the later append carries the newer intent. A
/// student whose winning record is a tombstone is absent from the output
/// entirely. Output order is unspecified.
pub fn reconcile(records: &[Record], owner: &str) -> Result<Vec<Registration>, ReconcileError> {
    let mut latest: HashMap<&str, (NaiveDateTime, &Record)> = HashMap::new();

    for record in records.iter().filter(|r| r.created_by == owner) {
        let ts = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).map_err(
            |source| ReconcileError::MalformedTimestamp {
                value: record.timestamp.clone(),
                source,
            },
        )?;

        match latest.get(record.student.as_str()) {
            Some((winning, _)) if ts < *winning => {}
            _ => {
                latest.insert(record.student.as_str(), (ts, record));
            }
        }
    }

    Ok(latest
        .into_values()
        .filter(|(_, record)| record.action != Action::Deleted)
        .map(|(ts, record)| Registration::from_record(record, ts))
        .collect())
}
