use super::open;
use crate::output::{or_dash, print_json, print_table};
use clap::Subcommand;
use pickup_core::person::Person;
use std::path::Path;

#[derive(Subcommand)]
pub enum PeopleSubcommand {
    /// List the roster
    List,
    /// Add a person (admin)
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove a person (admin). Existing assignments keep their copy.
    Remove { name: String },
}

pub fn run(
    root: &Path,
    password: Option<&str>,
    subcmd: PeopleSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        PeopleSubcommand::List => {
            let (store, _) = open(root, None)?;
            list(&store.try_list_people()?, json)
        }
        PeopleSubcommand::Add { name, phone, email } => {
            let (mut store, mut session) = open(root, password)?;
            let person =
                store.add_person(&mut session, &name, phone.as_deref(), email.as_deref())?;
            report_added(&person, json)
        }
        PeopleSubcommand::Remove { name } => {
            let (mut store, mut session) = open(root, password)?;
            store.remove_person(&mut session, &name)?;
            report_removed(&name, json)
        }
    }
}

pub fn list(people: &[Person], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&people);
    }
    if people.is_empty() {
        println!("No people yet.");
        return Ok(());
    }
    let rows = people
        .iter()
        .map(|p| vec![p.name.clone(), or_dash(&p.phone), or_dash(&p.email)])
        .collect();
    print_table(&["NAME", "PHONE", "EMAIL"], rows);
    Ok(())
}

pub fn report_added(person: &Person, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(person);
    }
    println!("Added {}", person.name);
    Ok(())
}

pub fn report_removed(name: &str, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&serde_json::json!({ "name": name, "removed": true }));
    }
    println!("Removed {name}");
    Ok(())
}
