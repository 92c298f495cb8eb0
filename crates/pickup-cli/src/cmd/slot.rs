use super::{open, WeekArgs};
use crate::output::print_json;
use pickup_core::{
    notify::{DeliveryStatus, DAY_DATE_FORMAT},
    store::AssignReceipt,
    week::{DayIndex, SlotKey, WeekKey},
};
use std::path::Path;

pub fn assign(
    root: &Path,
    password: Option<&str>,
    args: WeekArgs,
    day: &str,
    name: &str,
    json: bool,
) -> anyhow::Result<()> {
    let (mut store, mut session) = open(root, password)?;
    let week = args.resolve(store.today())?;
    let day: DayIndex = day.parse()?;
    let receipt = store.assign(&mut session, week, day, name)?;
    report_assigned(&receipt, json)
}

pub fn clear(
    root: &Path,
    password: Option<&str>,
    args: WeekArgs,
    day: &str,
    json: bool,
) -> anyhow::Result<()> {
    let (mut store, mut session) = open(root, password)?;
    let week = args.resolve(store.today())?;
    let day: DayIndex = day.parse()?;
    store.clear(&mut session, week, day)?;
    report_cleared(week, day, json)
}

pub fn reset(
    root: &Path,
    password: Option<&str>,
    args: WeekArgs,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (mut store, mut session) = open(root, password)?;
    let week = args.resolve(store.today())?;
    let removed = store.reset_week(&mut session, week, yes)?;
    report_reset(week, removed, json)
}

// ---------------------------------------------------------------------------
// Reporting (shared with the shell)
// ---------------------------------------------------------------------------

pub fn report_assigned(receipt: &AssignReceipt, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(receipt);
    }

    let slot = SlotKey::new(receipt.week, receipt.day);
    println!(
        "Assigned {} to {} {}",
        receipt.assignment.person_name,
        receipt.day.label(),
        slot.date().format(DAY_DATE_FORMAT)
    );
    if let Some(previous) = &receipt.replaced {
        println!("  replaced: {}", previous.person_name);
    }
    for delivery in &receipt.deliveries {
        match &delivery.status {
            DeliveryStatus::Sent => println!("  notified: {}", delivery.target),
            DeliveryStatus::Failed(reason) => {
                println!("  notification to {} failed: {reason}", delivery.target)
            }
            DeliveryStatus::Skipped(_) => {}
        }
    }
    Ok(())
}

pub fn report_cleared(week: WeekKey, day: DayIndex, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({
            "week": week,
            "day": day,
            "cleared": true,
        }));
    }
    let date = SlotKey::new(week, day).date();
    println!("Cleared {} {}", day.label(), date.format(DAY_DATE_FORMAT));
    Ok(())
}

pub fn report_reset(week: WeekKey, removed: usize, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({ "week": week, "removed": removed }));
    }
    println!("Reset week {week}: removed {removed} assignment(s)");
    Ok(())
}
