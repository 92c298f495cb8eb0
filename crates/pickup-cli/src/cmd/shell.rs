use super::{open, people, remind, slot, week};
use anyhow::{bail, Context};
use pickup_core::{
    session::Session,
    store::ScheduleStore,
    week::{DayIndex, WeekKey},
};
use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

const HELP: &str = "\
Commands:
  show | week                      show the selected week
  next | prev | today              move between weeks
  assign DAY NAME                  book NAME into DAY (0-5 or Sunday..Friday)
  clear DAY                        empty a slot (admin)
  reset --yes                      clear the whole week (admin)
  people                           list the roster
  people add NAME [--phone P] [--email E]
  people remove NAME               (admin)
  remind                           WhatsApp reminder links for the week
  login PASSWORD | logout
  help | quit";

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented session over stdin. One [`Session`] lives for the whole run.
pub fn run(root: &Path, password: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (mut store, mut session) = open(root, password)?;
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();

    if interactive {
        println!("Type 'help' for commands.");
    }
    week::show(&store.get_schedule(current_week(&store, &session)?), json)?;

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            match session.week_offset() {
                0 => print!("pickup[{}]> ", session.role()),
                n => print!("pickup[{} {n:+}w]> ", session.role()),
            }
            std::io::stdout().flush().context("failed to flush prompt")?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;
        match execute(&mut store, &mut session, line.trim(), json) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("error: {e:#}"),
        }
    }
    Ok(())
}

fn current_week(store: &ScheduleStore, session: &Session) -> anyhow::Result<WeekKey> {
    Ok(session.current_week(store.today())?)
}

fn execute(
    store: &mut ScheduleStore,
    session: &mut Session,
    line: &str,
    json: bool,
) -> anyhow::Result<Flow> {
    let (command, rest) = split_word(line);
    let args: Vec<&str> = rest.split_whitespace().collect();

    match command {
        "" => {}
        "help" | "?" => println!("{HELP}"),
        "quit" | "exit" => return Ok(Flow::Quit),
        "login" => {
            if rest.is_empty() {
                bail!("usage: login PASSWORD");
            }
            store.login(session, rest)?;
            println!("Logged in as admin.");
        }
        "logout" => {
            store.logout(session);
            println!("Logged out.");
        }
        "show" | "week" => show_week(store, session, json)?,
        "next" => {
            session.next_week();
            show_week(store, session, json)?;
        }
        "prev" => {
            session.prev_week();
            show_week(store, session, json)?;
        }
        "today" => {
            session.this_week();
            show_week(store, session, json)?;
        }
        "assign" => {
            let (day, name) = split_word(rest);
            if name.is_empty() {
                bail!("usage: assign DAY NAME");
            }
            let week = current_week(store, session)?;
            let day: DayIndex = day.parse()?;
            let receipt = store.assign(session, week, day, name)?;
            slot::report_assigned(&receipt, json)?;
        }
        "clear" => {
            let [day] = args.as_slice() else {
                bail!("usage: clear DAY");
            };
            let week = current_week(store, session)?;
            let day: DayIndex = day.parse()?;
            store.clear(session, week, day)?;
            slot::report_cleared(week, day, json)?;
        }
        "reset" => {
            let confirmed = matches!(args.as_slice(), ["--yes"] | ["yes"]);
            let week = current_week(store, session)?;
            let removed = store.reset_week(session, week, confirmed)?;
            slot::report_reset(week, removed, json)?;
        }
        "people" => match split_word(rest) {
            ("" | "list", "") => people::list(&store.try_list_people()?, json)?,
            ("add", entry) => {
                let entry = parse_person(entry)?;
                let person = store.add_person(
                    session,
                    &entry.name,
                    entry.phone.as_deref(),
                    entry.email.as_deref(),
                )?;
                people::report_added(&person, json)?;
            }
            ("remove", name) if !name.is_empty() => {
                store.remove_person(session, name)?;
                people::report_removed(name, json)?;
            }
            _ => bail!("usage: people [list | add NAME [--phone P] [--email E] | remove NAME]"),
        },
        "remind" => {
            let week = current_week(store, session)?;
            remind::show(&store.reminders(week), json)?;
        }
        other => bail!("unknown command '{other}', try 'help'"),
    }
    Ok(Flow::Continue)
}

fn show_week(store: &ScheduleStore, session: &Session, json: bool) -> anyhow::Result<()> {
    week::show(&store.get_schedule(current_week(store, session)?), json)
}

/// First word of `text` and the untouched remainder after it. Inner spacing
/// of the remainder is kept, so names and passwords match exactly.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

#[derive(Debug, Default, PartialEq)]
struct PersonEntry {
    name: String,
    phone: Option<String>,
    email: Option<String>,
}

/// `NAME [--phone P] [--email E]`. The name is everything before the first
/// flag, spacing included.
fn parse_person(text: &str) -> anyhow::Result<PersonEntry> {
    let mut entry = PersonEntry::default();
    let mut rest = text;
    let mut name: Option<&str> = None;
    while !rest.is_empty() {
        let (word, after) = split_word(rest);
        match word {
            "--phone" | "--email" => {
                let (value, after) = split_word(after);
                if value.is_empty() {
                    bail!("{word} needs a value");
                }
                if word == "--phone" {
                    entry.phone = Some(value.to_string());
                } else {
                    entry.email = Some(value.to_string());
                }
                rest = after;
            }
            _ if name.is_none() && rest.len() == text.len() => {
                let end = flag_position(rest).unwrap_or(rest.len());
                name = Some(rest[..end].trim_end());
                rest = &rest[end..];
            }
            other => bail!("unexpected '{other}' after flags"),
        }
    }
    entry.name = name.unwrap_or_default().to_string();
    Ok(entry)
}

/// Byte offset of the first ` --phone` or ` --email` word in `text`.
fn flag_position(text: &str) -> Option<usize> {
    text.match_indices("--")
        .map(|(i, _)| i)
        .find(|&i| {
            let before_ok = i == 0 || text[..i].ends_with(char::is_whitespace);
            let word = split_word(&text[i..]).0;
            before_ok && matches!(word, "--phone" | "--email")
        })
}
