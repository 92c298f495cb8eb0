use crate::person::Person;
use crate::week::{slot_dates, DayIndex, WeekKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Copy of a person taken when the slot was booked. Later roster edits or
/// removals never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub person_name: String,
    #[serde(default)]
    pub person_phone: String,
    #[serde(default)]
    pub person_email: String,
}

impl Assignment {
    pub fn snapshot(person: &Person) -> Self {
        Self {
            person_name: person.name.clone(),
            person_phone: person.phone.clone(),
            person_email: person.email.clone(),
        }
    }
}

/// Assignments of one week keyed by day, as backends return them.
pub type WeekAssignments = BTreeMap<DayIndex, Assignment>;

#[derive(Debug, Clone, Serialize)]
pub struct Slot {
    pub day: DayIndex,
    pub label: &'static str,
    pub date: NaiveDate,
    pub assignment: Option<Assignment>,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.assignment.is_none()
    }
}

/// Read model of one week: always every slot, in day order.
#[derive(Debug, Clone, Serialize)]
pub struct WeekSchedule {
    pub week: WeekKey,
    pub slots: Vec<Slot>,
}

impl WeekSchedule {
    pub fn from_assignments(week: WeekKey, mut assignments: WeekAssignments) -> Self {
        let slots = DayIndex::all()
            .zip(slot_dates(week))
            .map(|(day, date)| Slot {
                day,
                label: day.label(),
                date,
                assignment: assignments.remove(&day),
            })
            .collect();
        Self { week, slots }
    }

    pub fn empty(week: WeekKey) -> Self {
        Self::from_assignments(week, WeekAssignments::new())
    }

    pub fn get(&self, day: DayIndex) -> Option<&Assignment> {
        self.slots
            .get(day.index())
            .and_then(|s| s.assignment.as_ref())
    }

    pub fn assigned(&self) -> impl Iterator<Item = (&Slot, &Assignment)> {
        self.slots
            .iter()
            .filter_map(|s| s.assignment.as_ref().map(|a| (s, a)))
    }

    pub fn assigned_count(&self) -> usize {
        self.assigned().count()
    }
}
