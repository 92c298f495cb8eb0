//! Persistence collaborators for the schedule store.
//!
//! Every backend stores the same two record sets: the roster and the slot
//! assignments. Writes either complete or return an error; there is no
//! partial write visible to the next read.

pub mod json_file;
pub mod sheet;
pub mod sheets_api;

use crate::error::Result;
use crate::person::Person;
use crate::schedule::{Assignment, WeekAssignments};
use crate::week::{DayIndex, WeekKey};

pub use json_file::JsonFileBackend;
pub use sheet::{MemoryWorkbook, SheetBackend, Workbook};
pub use sheets_api::SheetsApi;

pub trait Backend {
    fn load_people(&self) -> Result<Vec<Person>>;

    fn insert_person(&mut self, person: &Person) -> Result<()>;

    /// Returns false when no person had that name.
    fn delete_person(&mut self, name: &str) -> Result<bool>;

    fn load_week(&self, week: WeekKey) -> Result<WeekAssignments>;

    /// Store `assignment`, replacing whatever the slot held.
    fn put_assignment(&mut self, week: WeekKey, day: DayIndex, assignment: &Assignment)
        -> Result<()>;

    /// Returns false when the slot was already empty.
    fn delete_assignment(&mut self, week: WeekKey, day: DayIndex) -> Result<bool>;

    /// Remove every assignment of `week`. Returns how many were removed.
    fn delete_week(&mut self, week: WeekKey) -> Result<usize>;
}
