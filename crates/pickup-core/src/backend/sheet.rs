use super::Backend;
use crate::error::{PickupError, Result};
use crate::person::Person;
use crate::schedule::{Assignment, WeekAssignments};
use crate::week::{DayIndex, WeekKey};
use std::collections::BTreeMap;

pub const PEOPLE_TABLE: &str = "People";
pub const SCHEDULE_TABLE: &str = "Schedule";

const PEOPLE_COLUMNS: [&str; 2] = ["name", "phone"];
const SCHEDULE_COLUMNS: [&str; 4] = ["week_start", "day_index", "person_name", "person_phone"];

// ---------------------------------------------------------------------------
// Workbook
// ---------------------------------------------------------------------------

/// Row-oriented table storage, the way a spreadsheet exposes it.
pub trait Workbook {
    /// Every row of `table`, header first.
    fn rows(&self, table: &str) -> Result<Vec<Vec<String>>>;

    fn append_row(&mut self, table: &str, row: Vec<String>) -> Result<()>;

    /// `row_number` is 1-based and row 1 is the header.
    fn delete_row(&mut self, table: &str, row_number: usize) -> Result<()>;
}

/// In-process workbook.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    tables: BTreeMap<String, Vec<Vec<String>>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A workbook holding empty `People` and `Schedule` tables with the
    /// full header rows.
    pub fn with_default_tables() -> Self {
        Self::new()
            .with_table(PEOPLE_TABLE, &["name", "phone", "email"])
            .with_table(
                SCHEDULE_TABLE,
                &[
                    "week_start",
                    "day_index",
                    "person_name",
                    "person_phone",
                    "person_email",
                ],
            )
    }

    pub fn with_table(mut self, name: &str, header: &[&str]) -> Self {
        let header = header.iter().map(|c| c.to_string()).collect();
        self.tables.insert(name.to_string(), vec![header]);
        self
    }

    pub fn table(&self, name: &str) -> Option<&[Vec<String>]> {
        self.tables.get(name).map(|t| t.as_slice())
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Vec<Vec<String>>> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| PickupError::BackendUnavailable(format!("no table '{name}'")))
    }
}

impl Workbook for MemoryWorkbook {
    fn rows(&self, table: &str) -> Result<Vec<Vec<String>>> {
        self.table(table)
            .map(|t| t.to_vec())
            .ok_or_else(|| PickupError::BackendUnavailable(format!("no table '{table}'")))
    }

    fn append_row(&mut self, table: &str, row: Vec<String>) -> Result<()> {
        self.table_mut(table)?.push(row);
        Ok(())
    }

    fn delete_row(&mut self, table: &str, row_number: usize) -> Result<()> {
        let rows = self.table_mut(table)?;
        if row_number < 2 || row_number > rows.len() {
            return Err(PickupError::BackendUnavailable(format!(
                "row {row_number} out of range in '{table}'"
            )));
        }
        rows.remove(row_number - 1);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Header decoding
// ---------------------------------------------------------------------------

/// Column positions taken from a table's header row.
struct Header {
    table: String,
    columns: Vec<String>,
}

impl Header {
    fn parse(table: &str, rows: &[Vec<String>], required: &[&str]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(PickupError::Schema {
                table: table.to_string(),
                column: required.first().copied().unwrap_or_default().to_string(),
            });
        };
        let header = Self {
            table: table.to_string(),
            columns: first.iter().map(|c| c.trim().to_string()).collect(),
        };
        for column in required {
            header.require(column)?;
        }
        Ok(header)
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn require(&self, column: &str) -> Result<usize> {
        self.position(column).ok_or_else(|| PickupError::Schema {
            table: self.table.clone(),
            column: column.to_string(),
        })
    }

    /// Lay `values` out in header order. Columns the header lacks are dropped.
    fn encode(&self, values: &[(&str, &str)]) -> Vec<String> {
        let mut row = vec![String::new(); self.columns.len()];
        for (column, value) in values {
            if let Some(i) = self.position(column) {
                row[i] = value.to_string();
            }
        }
        row
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}

fn optional_cell(row: &[String], index: Option<usize>) -> String {
    index.map(|i| cell(row, i).to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// SheetBackend
// ---------------------------------------------------------------------------

/// `People` and `Schedule` tables decoded by header name.
#[derive(Debug, Clone)]
pub struct SheetBackend<W> {
    workbook: W,
}

struct ScheduleColumns {
    week: usize,
    day: usize,
    name: usize,
    phone: usize,
    email: Option<usize>,
}

impl<W: Workbook> SheetBackend<W> {
    pub fn new(workbook: W) -> Self {
        Self { workbook }
    }

    fn schedule(&self) -> Result<(Header, ScheduleColumns, Vec<Vec<String>>)> {
        let rows = self.workbook.rows(SCHEDULE_TABLE)?;
        let header = Header::parse(SCHEDULE_TABLE, &rows, &SCHEDULE_COLUMNS)?;
        let cols = ScheduleColumns {
            week: header.require("week_start")?,
            day: header.require("day_index")?,
            name: header.require("person_name")?,
            phone: header.require("person_phone")?,
            email: header.position("person_email"),
        };
        Ok((header, cols, rows))
    }

    /// 1-based row numbers of schedule rows matching `pred`, bottom first so
    /// they can be deleted in order.
    fn matching_rows(
        cols: &ScheduleColumns,
        rows: &[Vec<String>],
        pred: impl Fn(&str, Option<usize>) -> bool,
    ) -> Vec<usize> {
        let mut hits: Vec<usize> = rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, row)| pred(cell(row, cols.week), cell(row, cols.day).parse().ok()))
            .map(|(i, _)| i + 1)
            .collect();
        hits.reverse();
        hits
    }

    fn delete_rows(&mut self, rows: &[usize]) -> Result<()> {
        for &n in rows {
            self.workbook.delete_row(SCHEDULE_TABLE, n)?;
        }
        Ok(())
    }
}

impl<W: Workbook> Backend for SheetBackend<W> {
    fn load_people(&self) -> Result<Vec<Person>> {
        let rows = self.workbook.rows(PEOPLE_TABLE)?;
        let header = Header::parse(PEOPLE_TABLE, &rows, &PEOPLE_COLUMNS)?;
        let name = header.require("name")?;
        let phone = header.require("phone")?;
        let email = header.position("email");

        Ok(rows
            .iter()
            .skip(1)
            .filter(|row| !cell(row, name).is_empty())
            .map(|row| Person {
                name: cell(row, name).to_string(),
                phone: cell(row, phone).to_string(),
                email: optional_cell(row, email),
            })
            .collect())
    }

    fn insert_person(&mut self, person: &Person) -> Result<()> {
        let rows = self.workbook.rows(PEOPLE_TABLE)?;
        let header = Header::parse(PEOPLE_TABLE, &rows, &PEOPLE_COLUMNS)?;
        let row = header.encode(&[
            ("name", person.name.as_str()),
            ("phone", person.phone.as_str()),
            ("email", person.email.as_str()),
        ]);
        self.workbook.append_row(PEOPLE_TABLE, row)
    }

    fn delete_person(&mut self, name: &str) -> Result<bool> {
        let rows = self.workbook.rows(PEOPLE_TABLE)?;
        let header = Header::parse(PEOPLE_TABLE, &rows, &PEOPLE_COLUMNS)?;
        let col = header.require("name")?;
        let Some(index) = rows.iter().skip(1).position(|row| cell(row, col) == name) else {
            return Ok(false);
        };
        // +1 for the skipped header, +1 for 1-based numbering
        self.workbook.delete_row(PEOPLE_TABLE, index + 2)?;
        Ok(true)
    }

    fn load_week(&self, week: WeekKey) -> Result<WeekAssignments> {
        let (_, cols, rows) = self.schedule()?;
        let key = week.to_string();
        let mut out = WeekAssignments::new();
        for row in rows.iter().skip(1) {
            if cell(row, cols.week) != key {
                continue;
            }
            let day = match cell(row, cols.day)
                .parse::<usize>()
                .map_err(|_| PickupError::SlotInvalid(cell(row, cols.day).to_string()))
                .and_then(DayIndex::new)
            {
                Ok(day) => day,
                Err(e) => {
                    tracing::debug!(week = %key, error = %e, "skipping schedule row");
                    continue;
                }
            };
            if cell(row, cols.name).is_empty() {
                continue;
            }
            out.insert(
                day,
                Assignment {
                    person_name: cell(row, cols.name).to_string(),
                    person_phone: cell(row, cols.phone).to_string(),
                    person_email: optional_cell(row, cols.email),
                },
            );
        }
        Ok(out)
    }

    fn put_assignment(
        &mut self,
        week: WeekKey,
        day: DayIndex,
        assignment: &Assignment,
    ) -> Result<()> {
        let (header, cols, rows) = self.schedule()?;
        let key = week.to_string();
        let stale = Self::matching_rows(&cols, &rows, |w, d| w == key && d == Some(day.index()));

        let day_cell = day.to_string();
        let row = header.encode(&[
            ("week_start", key.as_str()),
            ("day_index", day_cell.as_str()),
            ("person_name", assignment.person_name.as_str()),
            ("person_phone", assignment.person_phone.as_str()),
            ("person_email", assignment.person_email.as_str()),
        ]);
        // The new row lands below every stale one, so their numbers hold. If
        // a delete fails afterwards, the last row still wins on read.
        self.workbook.append_row(SCHEDULE_TABLE, row)?;
        self.delete_rows(&stale)
    }

    fn delete_assignment(&mut self, week: WeekKey, day: DayIndex) -> Result<bool> {
        let (_, cols, rows) = self.schedule()?;
        let key = week.to_string();
        let hits = Self::matching_rows(&cols, &rows, |w, d| w == key && d == Some(day.index()));
        self.delete_rows(&hits)?;
        Ok(!hits.is_empty())
    }

    fn delete_week(&mut self, week: WeekKey) -> Result<usize> {
        let (_, cols, rows) = self.schedule()?;
        let key = week.to_string();
        let hits = Self::matching_rows(&cols, &rows, |w, _| w == key);
        self.delete_rows(&hits)?;
        Ok(hits.len())
    }
}
