// ABOUTME: Caller-facing registration service: validated writes, cached reads, roster views.
// ABOUTME: Writes append to the log then invalidate; a failed append leaves the cache alone.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::aggregate::{RosterEntry, aggregate};
use crate::cache::{CacheError, Clock, SnapshotCache};
use crate::directory::{AuthError, EventCatalog, FellowDirectory};
use crate::record::{Action, Record, Registration, SlotChoices, TIMESTAMP_FORMAT};
use crate::store::{EventLogStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no current registration for {0:?}")]
    NotFound(String),

    #[error("unknown fellow {0:?}")]
    UnknownFellow(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Attributes a fellow submits when creating or updating a registration.
/// The school is never submitted; it comes from the fellow directory.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    pub student: String,
    pub grade: String,
    pub section: String,
    #[serde(flatten)]
    pub choices: SlotChoices,
}

/// Ties the write path, the snapshot cache, and the static lookups together
/// behind the API the request-handling layer calls. Constructed once at
/// process start and shared; never module-level state.
pub struct RegistrationService {
    directory: FellowDirectory,
    catalog: EventCatalog,
    store: Arc<dyn EventLogStore>,
    cache: SnapshotCache,
    clock: Arc<dyn Clock>,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn EventLogStore>,
        directory: FellowDirectory,
        catalog: EventCatalog,
        clock: Arc<dyn Clock>,
        cache_ttl: Duration,
    ) -> Self {
        let cache = SnapshotCache::new(Arc::clone(&store), Arc::clone(&clock), cache_ttl);
        Self {
            directory,
            catalog,
            store,
            cache,
            clock,
        }
    }

    pub fn login_check(&self, email: &str, password: &str) -> Result<&str, AuthError> {
        self.directory.login_check(email, password)
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// The owner's current registrations, via the snapshot cache.
    pub async fn list_registrations(
        &self,
        owner: &str,
    ) -> Result<Arc<Vec<Registration>>, ServiceError> {
        Ok(self.cache.get(owner).await?)
    }

    /// A single current registration by student name. A student whose latest
    /// record is a tombstone does not exist here.
    pub async fn registration(
        &self,
        owner: &str,
        student: &str,
    ) -> Result<Registration, ServiceError> {
        let registrations = self.cache.get(owner).await?;
        registrations
            .iter()
            .find(|r| r.student == student)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(student.to_string()))
    }

    pub async fn create_registration(
        &self,
        owner: &str,
        form: RegistrationForm,
    ) -> Result<(), ServiceError> {
        self.submit(owner, form, Action::Created).await
    }

    /// Update an existing registration. `student` names the target; the form
    /// may carry a corrected name, which supersedes under the new key.
    pub async fn update_registration(
        &self,
        owner: &str,
        student: &str,
        form: RegistrationForm,
    ) -> Result<(), ServiceError> {
        self.registration(owner, student).await?;
        self.submit(owner, form, Action::Updated).await
    }

    /// Append a tombstone for the student's registration.
    pub async fn delete_registration(&self, owner: &str, student: &str) -> Result<(), ServiceError> {
        self.registration(owner, student).await?;
        let tombstone = RegistrationForm {
            student: student.to_string(),
            grade: String::new(),
            section: String::new(),
            choices: SlotChoices::default(),
        };
        self.submit(owner, tombstone, Action::Deleted).await
    }

    /// The per-event roster view over the owner's current registrations.
    pub async fn event_roster(
        &self,
        owner: &str,
    ) -> Result<BTreeMap<String, RosterEntry>, ServiceError> {
        let registrations = self.cache.get(owner).await?;
        Ok(aggregate(&registrations))
    }

    async fn submit(
        &self,
        owner: &str,
        form: RegistrationForm,
        action: Action,
    ) -> Result<(), ServiceError> {
        validate(&form, action)?;

        let school = self
            .directory
            .school_for(owner)
            .ok_or_else(|| ServiceError::UnknownFellow(owner.to_string()))?;

        let record = Record {
            timestamp: self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
            school: if action == Action::Deleted {
                String::new()
            } else {
                school.to_string()
            },
            grade: form.grade,
            section: form.section,
            student: form.student,
            choices: form.choices,
            created_by: owner.to_string(),
            action,
        };

        // Append failure propagates without touching the cache, so reads keep
        // serving the last good snapshot.
        self.store.append(&record).await?;
        self.cache.invalidate(owner).await;
        tracing::info!(owner, student = %record.student, ?action, "registration event appended");
        Ok(())
    }
}

fn validate(form: &RegistrationForm, action: Action) -> Result<(), ServiceError> {
    if form.student.trim().is_empty() {
        return Err(ServiceError::Validation("student name is required".into()));
    }

    match action {
        Action::Deleted => {
            if !form.grade.trim().is_empty()
                || !form.section.trim().is_empty()
                || !form.choices.is_blank()
            {
                return Err(ServiceError::Validation(
                    "a tombstone must carry blank attributes".into(),
                ));
            }
        }
        Action::Created | Action::Updated => {
            if form.grade.trim().is_empty() {
                return Err(ServiceError::Validation("grade is required".into()));
            }
            if form.section.trim().is_empty() {
                return Err(ServiceError::Validation("section is required".into()));
            }
            if !form.choices.is_complete() {
                return Err(ServiceError::Validation(
                    "all four slot choices are required".into(),
                ));
            }
        }
    }

    Ok(())
}
