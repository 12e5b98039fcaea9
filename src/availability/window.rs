use crate::calendar;
use crate::model::ShiftAssignment;
use chrono::{NaiveDate, Weekday};

/// Fenêtre d'analyse `[start, end]`, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ScanWindow {
    /// Du lundi situé `weeks` semaines avant `target` au vendredi de la
    /// semaine de `target`.
    pub fn for_target(target: NaiveDate, weeks: u32) -> Self {
        Self {
            start: calendar::previous_day_of_week(target, Weekday::Mon, weeks),
            end: calendar::next_day_of_week(target, Weekday::Fri),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

pub(super) fn filter_window<'a>(
    assignments: &'a [ShiftAssignment],
    window: ScanWindow,
) -> Vec<&'a ShiftAssignment> {
    assignments
        .iter()
        .filter(|a| window.contains(a.date))
        .collect()
}
