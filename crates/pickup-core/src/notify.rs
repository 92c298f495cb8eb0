//! Best-effort assignment notifications.
//!
//! Notifiers run after the assignment is committed. Every outcome is
//! reported back as a [`Delivery`]; none of them is an error of the
//! assignment itself.

use crate::schedule::Assignment;
use crate::week::SlotKey;
use reqwest::blocking::Client;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Day/month as shown to people, e.g. `02/06`.
pub const DAY_DATE_FORMAT: &str = "%d/%m";

/// A committed assignment, as notifiers see it.
#[derive(Debug, Clone)]
pub struct AssignmentEvent {
    pub slot: SlotKey,
    pub assignment: Assignment,
}

impl AssignmentEvent {
    pub fn day_name(&self) -> &'static str {
        self.slot.day.label()
    }

    pub fn day_date(&self) -> String {
        self.slot.date().format(DAY_DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyTarget {
    Admin,
    Person,
}

impl fmt::Display for NotifyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotifyTarget::Admin => "admin",
            NotifyTarget::Person => "person",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub target: NotifyTarget,
    #[serde(rename = "outcome")]
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, DeliveryStatus::Failed(_))
    }
}

pub trait Notifier {
    fn notify_assignment(&self, event: &AssignmentEvent) -> Vec<Delivery>;
}

// ---------------------------------------------------------------------------
// Webhook payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct AdminPayload<'a> {
    person_name: &'a str,
    day_name: &'a str,
    day_date: &'a str,
    person_phone: &'a str,
    app_url: &'a str,
}

#[derive(Debug, Serialize)]
struct PersonPayload<'a> {
    person_email: &'a str,
    person_name: &'a str,
    day_name: &'a str,
    day_date: &'a str,
    app_url: &'a str,
}

// ---------------------------------------------------------------------------
// WebhookNotifier
// ---------------------------------------------------------------------------

/// Posts JSON to an admin webhook and, when the person has an email, to a
/// per-person webhook (for example an automation that sends the email).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    admin_url: Option<String>,
    person_url: Option<String>,
    app_url: String,
}

impl WebhookNotifier {
    pub fn new(
        admin_url: Option<String>,
        person_url: Option<String>,
        app_url: impl Into<String>,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            admin_url: admin_url.filter(|u| !u.trim().is_empty()),
            person_url: person_url.filter(|u| !u.trim().is_empty()),
            app_url: app_url.into(),
        })
    }

    fn post<T: Serialize>(&self, target: NotifyTarget, url: &str, payload: &T) -> Delivery {
        let status = match self.client.post(url).json(payload).send() {
            Ok(resp) if resp.status().is_success() => DeliveryStatus::Sent,
            Ok(resp) => DeliveryStatus::Failed(format!("webhook returned {}", resp.status())),
            Err(e) if e.is_timeout() => DeliveryStatus::Failed("webhook timed out".to_string()),
            Err(e) => DeliveryStatus::Failed(e.to_string()),
        };
        if let DeliveryStatus::Failed(reason) = &status {
            tracing::warn!(notify_target = %target, %reason, "notification failed");
        }
        Delivery { target, status }
    }
}

impl Notifier for WebhookNotifier {
    fn notify_assignment(&self, event: &AssignmentEvent) -> Vec<Delivery> {
        let a = &event.assignment;
        let day_date = event.day_date();
        let mut out = Vec::with_capacity(2);

        out.push(match &self.admin_url {
            Some(url) => self.post(
                NotifyTarget::Admin,
                url,
                &AdminPayload {
                    person_name: &a.person_name,
                    day_name: event.day_name(),
                    day_date: &day_date,
                    person_phone: &a.person_phone,
                    app_url: &self.app_url,
                },
            ),
            None => Delivery {
                target: NotifyTarget::Admin,
                status: DeliveryStatus::Skipped("no admin webhook configured".to_string()),
            },
        });

        out.push(match (&self.person_url, a.person_email.is_empty()) {
            (_, true) => Delivery {
                target: NotifyTarget::Person,
                status: DeliveryStatus::Skipped("person has no email".to_string()),
            },
            (None, false) => Delivery {
                target: NotifyTarget::Person,
                status: DeliveryStatus::Skipped("no person webhook configured".to_string()),
            },
            (Some(url), false) => self.post(
                NotifyTarget::Person,
                url,
                &PersonPayload {
                    person_email: &a.person_email,
                    person_name: &a.person_name,
                    day_name: event.day_name(),
                    day_date: &day_date,
                    app_url: &self.app_url,
                },
            ),
        });

        out
    }
}
