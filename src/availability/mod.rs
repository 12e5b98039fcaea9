//! Pipeline de disponibilité : fenêtre → plafond d'heures → jours consécutifs.
//!
//! Le pipeline est pur : il ne lit que les affectations qu'on lui passe et
//! la configuration figée à la construction. Les ingénieurs jamais planifiés
//! sont ajoutés ailleurs (voir [`crate::query`]).

mod adjacent;
mod hours;
mod window;

pub use adjacent::AdjacentDays;
pub use window::ScanWindow;

use crate::config::AvailabilityConfig;
use crate::model::{EngineerId, ShiftAssignment};
use chrono::NaiveDate;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy)]
pub struct AvailabilityFilter {
    config: AvailabilityConfig,
}

impl AvailabilityFilter {
    pub fn new(config: AvailabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    pub fn scan_window(&self, target: NaiveDate) -> ScanWindow {
        ScanWindow::for_target(target, self.config.week_scan_period())
    }

    /// Étape 1 : affectations datées dans la fenêtre d'analyse.
    pub fn filter_window<'a>(
        &self,
        assignments: &'a [ShiftAssignment],
        target: NaiveDate,
    ) -> Vec<&'a ShiftAssignment> {
        window::filter_window(assignments, self.scan_window(target))
    }

    /// Étape 2 : plafond d'heures (comparaison stricte).
    pub fn filter_hours_cap<'a>(
        &self,
        windowed: Vec<&'a ShiftAssignment>,
    ) -> Vec<&'a ShiftAssignment> {
        hours::filter_hours_cap(
            windowed,
            self.config.max_shift_sum_hours(),
            self.config.hours_grouping(),
        )
    }

    /// Étape 3 : exclusion des jours ouvrés adjacents à `target`.
    pub fn filter_consecutive_days<'a>(
        &self,
        candidates: Vec<&'a ShiftAssignment>,
        all: &[ShiftAssignment],
        target: NaiveDate,
    ) -> Vec<&'a ShiftAssignment> {
        adjacent::filter_consecutive_days(candidates, all, AdjacentDays::around(target))
    }

    /// Ingénieurs ayant au moins une affectation qui passe les trois étapes.
    pub fn eligible_engineers(
        &self,
        assignments: &[ShiftAssignment],
        target: NaiveDate,
    ) -> BTreeSet<EngineerId> {
        let windowed = self.filter_window(assignments, target);
        let windowed_count = windowed.len();
        let capped = self.filter_hours_cap(windowed);
        let capped_count = capped.len();
        let kept = self.filter_consecutive_days(capped, assignments, target);

        let eligible: BTreeSet<EngineerId> = kept.into_iter().map(|a| a.engineer.clone()).collect();
        tracing::debug!(
            %target,
            total = assignments.len(),
            windowed = windowed_count,
            capped = capped_count,
            eligible = eligible.len(),
            "availability pipeline evaluated"
        );
        eligible
    }
}
