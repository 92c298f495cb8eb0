use super::{open, WeekArgs};
use crate::output::{or_dash, print_json, print_table};
use pickup_core::{notify::DAY_DATE_FORMAT, schedule::WeekSchedule};
use std::path::Path;

pub fn run(root: &Path, args: WeekArgs, json: bool) -> anyhow::Result<()> {
    let (store, _) = open(root, None)?;
    let week = args.resolve(store.today())?;
    show(&store.get_schedule(week), json)
}

pub fn show(schedule: &WeekSchedule, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(schedule);
    }

    println!(
        "Week of {} to {}",
        schedule.week.start().format(DAY_DATE_FORMAT),
        schedule.week.end().format(DAY_DATE_FORMAT)
    );
    let rows = schedule
        .slots
        .iter()
        .map(|slot| {
            let (name, phone) = match &slot.assignment {
                Some(a) => (a.person_name.clone(), or_dash(&a.person_phone)),
                None => ("-".to_string(), "-".to_string()),
            };
            vec![
                slot.day.to_string(),
                slot.label.to_string(),
                slot.date.format(DAY_DATE_FORMAT).to_string(),
                name,
                phone,
            ]
        })
        .collect();
    print_table(&["#", "DAY", "DATE", "PERSON", "PHONE"], rows);
    Ok(())
}
