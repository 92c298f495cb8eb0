//! The schedule store: roster and assignments behind one authorization gate.
//!
//! Reads need no session and degrade to "no data" when the backend is down.
//! Mutations take the caller's [`Session`], check it, and either commit
//! fully or return an error. Notifications run only after a commit.

use crate::backend::{Backend, JsonFileBackend, SheetBackend, SheetsApi};
use crate::config::{Config, StorageConfig};
use crate::error::{PickupError, Result};
use crate::notify::{AssignmentEvent, Delivery, Notifier, WebhookNotifier};
use crate::paths;
use crate::person::Person;
use crate::reminder::{self, Reminder};
use crate::schedule::{Assignment, WeekSchedule};
use crate::session::Session;
use crate::week::{DayIndex, SlotKey, WeekKey};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub admin_secret: Option<String>,
    pub self_service_signup: bool,
    pub daily_reset: bool,
    pub country_code: String,
    pub reminder_template: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            admin_secret: None,
            self_service_signup: true,
            daily_reset: false,
            country_code: reminder::DEFAULT_COUNTRY_CODE.to_string(),
            reminder_template: reminder::DEFAULT_TEMPLATE.to_string(),
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admin_secret: config.auth.admin_secret(),
            self_service_signup: config.auth.self_service_signup,
            daily_reset: config.session.daily_reset,
            country_code: config.reminder.country_code.clone(),
            reminder_template: config.reminder.template.clone(),
        }
    }
}

/// Result of a committed assignment.
#[derive(Debug, Clone, Serialize)]
pub struct AssignReceipt {
    pub week: WeekKey,
    pub day: DayIndex,
    pub assignment: Assignment,
    /// What the slot held before, if it was overwritten.
    pub replaced: Option<Assignment>,
    pub deliveries: Vec<Delivery>,
}

// ---------------------------------------------------------------------------
// ScheduleStore
// ---------------------------------------------------------------------------

pub struct ScheduleStore {
    backend: Box<dyn Backend>,
    notifier: Option<Box<dyn Notifier>>,
    options: StoreOptions,
    clock: Box<dyn Fn() -> NaiveDate>,
}

impl ScheduleStore {
    pub fn new(backend: Box<dyn Backend>, options: StoreOptions) -> Self {
        Self {
            backend,
            notifier: None,
            options,
            clock: Box::new(|| chrono::Local::now().date_naive()),
        }
    }

    /// Build the backend and notifier described by `config`.
    pub fn open(root: &Path, config: &Config) -> Result<Self> {
        let backend: Box<dyn Backend> = match &config.storage {
            StorageConfig::JsonFile { path } => {
                Box::new(JsonFileBackend::new(paths::data_path(root, path)))
            }
            StorageConfig::Sheets {
                spreadsheet_id,
                token_env,
                base_url,
            } => {
                let token = std::env::var(token_env).map_err(|_| {
                    PickupError::BackendUnavailable(format!(
                        "sheets token variable '{token_env}' is not set"
                    ))
                })?;
                let mut api = SheetsApi::new(spreadsheet_id, token, config.notify.timeout())?;
                if let Some(url) = base_url {
                    api = api.with_base_url(url);
                }
                Box::new(SheetBackend::new(api))
            }
        };

        let mut store = Self::new(backend, StoreOptions::from_config(config));
        if config.notify.is_enabled() {
            let notifier = WebhookNotifier::new(
                config.notify.admin_webhook_url.clone(),
                config.notify.person_webhook_url.clone(),
                config.notify.app_url.clone().unwrap_or_default(),
                config.notify.timeout(),
            )?;
            store = store.with_notifier(Box::new(notifier));
        }
        Ok(store)
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn new_session(&self) -> Session {
        let mut session = Session::new(self.options.daily_reset);
        session.refresh(self.today());
        session
    }

    fn touch(&self, session: &mut Session) {
        if session.refresh(self.today()) {
            tracing::info!("admin session ended at day change");
        }
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    pub fn login(&self, session: &mut Session, password: &str) -> Result<()> {
        self.touch(session);
        let result = session.login(password, self.options.admin_secret.as_deref());
        match &result {
            Ok(()) => tracing::info!("admin login"),
            Err(e) => tracing::warn!(error = %e, "admin login refused"),
        }
        result
    }

    pub fn logout(&self, session: &mut Session) {
        self.touch(session);
        session.logout();
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    pub fn try_list_people(&self) -> Result<Vec<Person>> {
        self.backend.load_people()
    }

    /// The roster, or an empty one if the backend cannot be read.
    pub fn list_people(&self) -> Vec<Person> {
        self.try_list_people().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load people");
            Vec::new()
        })
    }

    pub fn add_person(
        &mut self,
        session: &mut Session,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Person> {
        self.touch(session);
        session.require_admin("add people")?;
        let person = Person::new(name, phone, email)?;
        if self
            .backend
            .load_people()?
            .iter()
            .any(|p| p.name == person.name)
        {
            return Err(PickupError::PersonExists(person.name));
        }
        self.backend.insert_person(&person)?;
        tracing::info!(name = %person.name, "person added");
        Ok(person)
    }

    /// Existing assignment snapshots of `name` are left as they are.
    pub fn remove_person(&mut self, session: &mut Session, name: &str) -> Result<()> {
        self.touch(session);
        session.require_admin("remove people")?;
        if !self.backend.delete_person(name)? {
            return Err(PickupError::PersonNotFound(name.to_string()));
        }
        tracing::info!(name, "person removed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Schedule
    // -----------------------------------------------------------------------

    pub fn try_get_schedule(&self, week: WeekKey) -> Result<WeekSchedule> {
        Ok(WeekSchedule::from_assignments(
            week,
            self.backend.load_week(week)?,
        ))
    }

    /// The week's slots, all empty if the backend cannot be read.
    pub fn get_schedule(&self, week: WeekKey) -> WeekSchedule {
        self.try_get_schedule(week).unwrap_or_else(|e| {
            tracing::warn!(%week, error = %e, "could not load schedule");
            WeekSchedule::empty(week)
        })
    }

    /// Book `person_name` into a slot, replacing any existing booking.
    ///
    /// Notifications are sent after the write and reported in the receipt.
    pub fn assign(
        &mut self,
        session: &mut Session,
        week: WeekKey,
        day: DayIndex,
        person_name: &str,
    ) -> Result<AssignReceipt> {
        self.touch(session);
        if !self.options.self_service_signup {
            session.require_admin("assign slots")?;
        }
        let person = self
            .backend
            .load_people()?
            .into_iter()
            .find(|p| p.name == person_name)
            .ok_or_else(|| PickupError::PersonInvalid(person_name.to_string()))?;

        let assignment = Assignment::snapshot(&person);
        let replaced = self.backend.load_week(week)?.remove(&day);
        self.backend.put_assignment(week, day, &assignment)?;
        tracing::info!(%week, day = %day, person = %person.name, "slot assigned");

        let event = AssignmentEvent {
            slot: SlotKey::new(week, day),
            assignment: assignment.clone(),
        };
        let deliveries = self
            .notifier
            .as_ref()
            .map(|n| n.notify_assignment(&event))
            .unwrap_or_default();

        Ok(AssignReceipt {
            week,
            day,
            assignment,
            replaced,
            deliveries,
        })
    }

    /// Clearing an empty slot succeeds without changing anything.
    pub fn clear(&mut self, session: &mut Session, week: WeekKey, day: DayIndex) -> Result<()> {
        self.touch(session);
        session.require_admin("clear slots")?;
        if self.backend.delete_assignment(week, day)? {
            tracing::info!(%week, day = %day, "slot cleared");
        } else {
            tracing::debug!(%week, day = %day, "slot already empty");
        }
        Ok(())
    }

    /// Remove every assignment of `week`. Returns how many were removed.
    pub fn reset_week(
        &mut self,
        session: &mut Session,
        week: WeekKey,
        confirmed: bool,
    ) -> Result<usize> {
        self.touch(session);
        session.require_admin("reset a week")?;
        if !confirmed {
            return Err(PickupError::ConfirmationRequired);
        }
        let removed = self.backend.delete_week(week)?;
        tracing::info!(%week, removed, "week reset");
        Ok(removed)
    }

    pub fn reminders(&self, week: WeekKey) -> Vec<Reminder> {
        reminder::week_reminders(
            &self.get_schedule(week),
            &self.options.reminder_template,
            &self.options.country_code,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
