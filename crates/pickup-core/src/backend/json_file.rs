use super::Backend;
use crate::error::Result;
use crate::io::atomic_write;
use crate::person::Person;
use crate::schedule::{Assignment, WeekAssignments};
use crate::week::{DayIndex, SlotKey, WeekKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk document. Schedule keys are `<week_key>_<day_index>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub schedule: BTreeMap<String, Assignment>,
}

/// Single JSON file, fully rewritten on every mutation.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty document.
    pub fn read(&self) -> Result<Document> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Document::default());
        }
        Ok(serde_json::from_str(&data)?)
    }

    pub fn write(&self, doc: &Document) -> Result<()> {
        let data = serde_json::to_string_pretty(doc)?;
        atomic_write(&self.path, data.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "schedule file written");
        Ok(())
    }

    fn update<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T> {
        let mut doc = self.read()?;
        let out = f(&mut doc);
        self.write(&doc)?;
        Ok(out)
    }
}

impl Backend for JsonFileBackend {
    fn load_people(&self) -> Result<Vec<Person>> {
        Ok(self.read()?.people)
    }

    fn insert_person(&mut self, person: &Person) -> Result<()> {
        self.update(|doc| doc.people.push(person.clone()))
    }

    fn delete_person(&mut self, name: &str) -> Result<bool> {
        let mut doc = self.read()?;
        let before = doc.people.len();
        doc.people.retain(|p| p.name != name);
        if doc.people.len() == before {
            return Ok(false);
        }
        self.write(&doc)?;
        Ok(true)
    }

    fn load_week(&self, week: WeekKey) -> Result<WeekAssignments> {
        let doc = self.read()?;
        let mut out = WeekAssignments::new();
        for (key, assignment) in doc.schedule {
            match key.parse::<SlotKey>() {
                Ok(slot) if slot.week == week => {
                    out.insert(slot.day, assignment);
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(key = %key, error = %e, "skipping schedule entry"),
            }
        }
        Ok(out)
    }

    fn put_assignment(
        &mut self,
        week: WeekKey,
        day: DayIndex,
        assignment: &Assignment,
    ) -> Result<()> {
        let key = SlotKey::new(week, day).to_string();
        self.update(|doc| {
            doc.schedule.remove(&key);
            doc.schedule.insert(key, assignment.clone());
        })
    }

    fn delete_assignment(&mut self, week: WeekKey, day: DayIndex) -> Result<bool> {
        let mut doc = self.read()?;
        if doc
            .schedule
            .remove(&SlotKey::new(week, day).to_string())
            .is_none()
        {
            return Ok(false);
        }
        self.write(&doc)?;
        Ok(true)
    }

    fn delete_week(&mut self, week: WeekKey) -> Result<usize> {
        let mut doc = self.read()?;
        let before = doc.schedule.len();
        doc.schedule.retain(|key, _| {
            key.parse::<SlotKey>()
                .map(|slot| slot.week != week)
                .unwrap_or(true)
        });
        let removed = before - doc.schedule.len();
        if removed > 0 {
            self.write(&doc)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backend(dir: &TempDir) -> JsonFileBackend {
        JsonFileBackend::new(dir.path().join(".pickup/schedule.json"))
    }

    fn week() -> WeekKey {
        "2024-06-02".parse().unwrap()
    }

    fn day(i: usize) -> DayIndex {
        DayIndex::new(i).unwrap()
    }

    fn snapshot(name: &str) -> Assignment {
        Assignment {
            person_name: name.to_string(),
            person_phone: String::new(),
            person_email: String::new(),
        }
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let b = backend(&dir);
        assert!(b.load_people().unwrap().is_empty());
        assert!(b.load_week(week()).unwrap().is_empty());
    }

    #[test]
    fn document_layout_uses_slot_keys() {
        let dir = TempDir::new().unwrap();
        let mut b = backend(&dir);
        b.insert_person(&Person::new("Dana", Some("0501234567"), None).unwrap())
            .unwrap();
        b.put_assignment(week(), day(0), &snapshot("Dana")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(b.path()).unwrap()).unwrap();
        assert_eq!(raw["people"][0]["name"], "Dana");
        assert_eq!(raw["schedule"]["2024-06-02_0"]["person_name"], "Dana");
    }

    #[test]
    fn put_replaces_existing_slot() {
        let dir = TempDir::new().unwrap();
        let mut b = backend(&dir);
        b.put_assignment(week(), day(1), &snapshot("Dana")).unwrap();
        b.put_assignment(week(), day(1), &snapshot("Noa")).unwrap();
        let loaded = b.load_week(week()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&day(1)].person_name, "Noa");
    }

    #[test]
    fn delete_week_leaves_other_weeks() {
        let dir = TempDir::new().unwrap();
        let mut b = backend(&dir);
        let next = week().offset(1).unwrap();
        b.put_assignment(week(), day(0), &snapshot("Dana")).unwrap();
        b.put_assignment(week(), day(3), &snapshot("Noa")).unwrap();
        b.put_assignment(next, day(0), &snapshot("Dana")).unwrap();

        assert_eq!(b.delete_week(week()).unwrap(), 2);
        assert!(b.load_week(week()).unwrap().is_empty());
        assert_eq!(b.load_week(next).unwrap().len(), 1);
    }

    #[test]
    fn delete_reports_absence() {
        let dir = TempDir::new().unwrap();
        let mut b = backend(&dir);
        assert!(!b.delete_assignment(week(), day(2)).unwrap());
        assert!(!b.delete_person("Nobody").unwrap());
    }

    #[test]
    fn malformed_keys_are_skipped() {
        let dir = TempDir::new().unwrap();
        let b = backend(&dir);
        std::fs::create_dir_all(b.path().parent().unwrap()).unwrap();
        std::fs::write(
            b.path(),
            r#"{"people":[],"schedule":{"garbage":{"person_name":"X"},"2024-06-02_5":{"person_name":"Dana"}}}"#,
        )
        .unwrap();
        let loaded = b.load_week(week()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&day(5)].person_name, "Dana");
    }

    #[test]
    fn corrupt_file_is_a_backend_error() {
        let dir = TempDir::new().unwrap();
        let b = backend(&dir);
        std::fs::create_dir_all(b.path().parent().unwrap()).unwrap();
        std::fs::write(b.path(), "{not json").unwrap();
        assert!(b.load_people().unwrap_err().is_backend());
    }
}
