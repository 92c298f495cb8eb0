use super::{open, WeekArgs};
use crate::output::{print_json, print_table};
use pickup_core::reminder::Reminder;
use std::path::Path;

pub fn run(root: &Path, args: WeekArgs, json: bool) -> anyhow::Result<()> {
    let (store, _) = open(root, None)?;
    let week = args.resolve(store.today())?;
    show(&store.reminders(week), json)
}

pub fn show(reminders: &[Reminder], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&reminders);
    }
    if reminders.is_empty() {
        println!("No reminders: nobody with a phone is assigned this week.");
        return Ok(());
    }
    let rows = reminders
        .iter()
        .map(|r| {
            vec![
                r.day.to_string(),
                r.date.clone(),
                r.person_name.clone(),
                r.link.clone(),
            ]
        })
        .collect();
    print_table(&["DAY", "DATE", "PERSON", "WHATSAPP"], rows);
    Ok(())
}
