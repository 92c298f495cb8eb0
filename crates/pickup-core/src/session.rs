use crate::error::{PickupError, Result};
use crate::week::{week_key, WeekKey};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Guest,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Guest => "guest",
            Role::Admin => "admin",
        })
    }
}

/// Per-session context: the admin capability and the viewed week offset.
///
/// One is created per interactive session and dropped with it. Nothing
/// here is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    role: Role,
    week_offset: i64,
    last_seen: Option<NaiveDate>,
    daily_reset: bool,
}

impl Session {
    pub fn new(daily_reset: bool) -> Self {
        Self {
            role: Role::Guest,
            week_offset: 0,
            last_seen: None,
            daily_reset,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Compare `attempt` against the configured secret. A mismatch leaves
    /// the role untouched.
    pub fn login(&mut self, attempt: &str, secret: Option<&str>) -> Result<()> {
        let secret = secret.ok_or(PickupError::AdminNotConfigured)?;
        if attempt != secret {
            return Err(PickupError::AuthFailure);
        }
        self.role = Role::Admin;
        Ok(())
    }

    pub fn logout(&mut self) {
        self.role = Role::Guest;
    }

    /// Record that the session was touched on `today`. With daily reset on,
    /// the first touch on a new calendar day drops admin. Returns true when
    /// that happened.
    pub fn refresh(&mut self, today: NaiveDate) -> bool {
        let day_changed = self.last_seen.is_some_and(|seen| seen != today);
        self.last_seen = Some(today);
        if self.daily_reset && day_changed && self.is_admin() {
            self.role = Role::Guest;
            return true;
        }
        false
    }

    pub fn require_admin(&self, action: &'static str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(PickupError::Unauthorized(action))
        }
    }

    // -----------------------------------------------------------------------
    // Week navigation
    // -----------------------------------------------------------------------

    pub fn week_offset(&self) -> i64 {
        self.week_offset
    }

    pub fn next_week(&mut self) {
        self.week_offset = self.week_offset.saturating_add(1);
    }

    pub fn prev_week(&mut self) {
        self.week_offset = self.week_offset.saturating_sub(1);
    }

    pub fn this_week(&mut self) {
        self.week_offset = 0;
    }

    pub fn current_week(&self, today: NaiveDate) -> Result<WeekKey> {
        week_key(today, self.week_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn wrong_password_stays_guest() {
        let mut session = Session::new(false);
        assert!(matches!(
            session.login("nope", Some("secret")),
            Err(PickupError::AuthFailure)
        ));
        assert_eq!(session.role(), Role::Guest);
        assert!(session.require_admin("clear a slot").is_err());
    }

    #[test]
    fn login_and_logout() {
        let mut session = Session::new(false);
        session.login("secret", Some("secret")).unwrap();
        assert!(session.is_admin());
        session.logout();
        assert_eq!(session.role(), Role::Guest);
    }

    #[test]
    fn login_without_secret_is_refused() {
        let mut session = Session::new(false);
        assert!(matches!(
            session.login("", None),
            Err(PickupError::AdminNotConfigured)
        ));
    }

    #[test]
    fn failed_login_keeps_existing_admin() {
        let mut session = Session::new(false);
        session.login("secret", Some("secret")).unwrap();
        assert!(session.login("wrong", Some("secret")).is_err());
        assert!(session.is_admin());
    }

    #[test]
    fn daily_reset_drops_admin_on_new_day() {
        let mut session = Session::new(true);
        session.refresh(day("2024-06-02"));
        session.login("secret", Some("secret")).unwrap();
        assert!(!session.refresh(day("2024-06-02")));
        assert!(session.is_admin());
        assert!(session.refresh(day("2024-06-03")));
        assert_eq!(session.role(), Role::Guest);
    }

    #[test]
    fn without_daily_reset_admin_survives_midnight() {
        let mut session = Session::new(false);
        session.refresh(day("2024-06-02"));
        session.login("secret", Some("secret")).unwrap();
        assert!(!session.refresh(day("2024-06-03")));
        assert!(session.is_admin());
    }

    #[test]
    fn navigation_moves_current_week() {
        let today = day("2024-06-05");
        let mut session = Session::new(false);
        assert_eq!(session.current_week(today).unwrap().to_string(), "2024-06-02");
        session.next_week();
        session.next_week();
        assert_eq!(session.current_week(today).unwrap().to_string(), "2024-06-16");
        session.prev_week();
        session.prev_week();
        session.prev_week();
        assert_eq!(session.current_week(today).unwrap().to_string(), "2024-05-26");
        session.this_week();
        assert_eq!(session.week_offset(), 0);
    }
}
