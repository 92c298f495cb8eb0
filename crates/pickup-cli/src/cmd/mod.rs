pub mod config;
pub mod init;
pub mod people;
pub mod remind;
pub mod shell;
pub mod slot;
pub mod week;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use pickup_core::{
    config::Config,
    session::Session,
    store::ScheduleStore,
    week::{week_key, WeekKey},
};
use std::path::Path;

/// Open the configured store and a fresh session for this invocation,
/// logged in as admin when `password` is given.
pub fn open(root: &Path, password: Option<&str>) -> anyhow::Result<(ScheduleStore, Session)> {
    let config = Config::load(root).context("failed to load config")?;
    let store = ScheduleStore::open(root, &config).context("failed to open schedule")?;
    let mut session = store.new_session();
    if let Some(password) = password {
        store
            .login(&mut session, password)
            .context("admin login failed")?;
    }
    Ok((store, session))
}

/// Which week a command applies to. Defaults to the current week.
#[derive(Args, Debug, Clone, Default)]
pub struct WeekArgs {
    /// Weeks from the current one (negative for past weeks)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "week")]
    pub offset: Option<i64>,

    /// Any date inside the week (YYYY-MM-DD)
    #[arg(long)]
    pub week: Option<NaiveDate>,
}

impl WeekArgs {
    pub fn resolve(&self, today: NaiveDate) -> anyhow::Result<WeekKey> {
        let week = match self.week {
            Some(date) => WeekKey::containing(date)?,
            None => week_key(today, self.offset.unwrap_or(0))?,
        };
        Ok(week)
    }
}
