use crate::calendar;
use crate::model::{EngineerId, ShiftAssignment};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Jours ouvrés encadrant la date cible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacentDays {
    pub previous: NaiveDate,
    pub next: NaiveDate,
}

impl AdjacentDays {
    /// Un lundi regarde le vendredi précédent, un vendredi le lundi suivant.
    pub fn around(target: NaiveDate) -> Self {
        let previous = if target.weekday() == Weekday::Mon {
            calendar::previous_day_of_week(target, Weekday::Fri, 0)
        } else {
            calendar::previous_business_day(target)
        };
        let next = if target.weekday() == Weekday::Fri {
            calendar::next_day_of_week(target, Weekday::Mon)
        } else {
            calendar::next_business_day(target)
        };
        Self { previous, next }
    }

    /// Vrai si `date` tombe dans `[previous, next]`.
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.previous <= date && date <= self.next
    }
}

/// Écarte tout ingénieur ayant travaillé dans `[previous, next]`, d'après
/// l'historique complet (`all`) : un lundi suivant un vendredi cible sort de
/// la fenêtre mais compte quand même.
pub(super) fn filter_consecutive_days<'a>(
    candidates: Vec<&'a ShiftAssignment>,
    all: &[ShiftAssignment],
    adjacent: AdjacentDays,
) -> Vec<&'a ShiftAssignment> {
    let blocked: HashSet<&EngineerId> = all
        .iter()
        .filter(|a| adjacent.blocks(a.date))
        .map(|a| &a.engineer)
        .collect();

    candidates
        .into_iter()
        .filter(|a| !adjacent.blocks(a.date) && !blocked.contains(&a.engineer))
        .collect()
}
