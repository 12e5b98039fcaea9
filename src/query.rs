use crate::availability::AvailabilityFilter;
use crate::config::AvailabilityConfig;
use crate::model::{Engineer, EngineerId, Roster};
use crate::store::{ShiftRepository, StoreError};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};

/// Ingénieurs sans aucune affectation, tout historique confondu.
pub fn never_scheduled(roster: &Roster) -> Vec<&Engineer> {
    let scheduled: HashSet<&EngineerId> = roster.assignments.iter().map(|a| &a.engineer).collect();
    roster
        .engineers
        .iter()
        .filter(|e| !scheduled.contains(&e.id))
        .collect()
}

/// Union « jamais planifiés » ∪ « éligibles au pipeline », sans doublon,
/// dans l'ordre du roster.
pub fn available_engineers(roster: &Roster, filter: &AvailabilityFilter, target: NaiveDate) -> Vec<Engineer> {
    let mut ids: BTreeSet<EngineerId> = filter.eligible_engineers(&roster.assignments, target);
    ids.extend(never_scheduled(roster).into_iter().map(|e| e.id.clone()));

    let mut seen: HashSet<&EngineerId> = HashSet::new();
    roster
        .engineers
        .iter()
        .filter(|e| ids.contains(&e.id) && seen.insert(&e.id))
        .cloned()
        .collect()
}

/// Surface de requête au-dessus d'un store.
pub struct EngineerQuery<'r, R: ShiftRepository + ?Sized> {
    repo: &'r R,
    filter: AvailabilityFilter,
}

impl<'r, R: ShiftRepository + ?Sized> EngineerQuery<'r, R> {
    pub fn new(repo: &'r R, config: AvailabilityConfig) -> Self {
        Self {
            repo,
            filter: AvailabilityFilter::new(config),
        }
    }

    pub fn filter(&self) -> &AvailabilityFilter {
        &self.filter
    }

    pub fn never_scheduled_engineers(&self) -> Result<Vec<Engineer>, StoreError> {
        let roster = self.repo.snapshot()?;
        Ok(never_scheduled(&roster).into_iter().cloned().collect())
    }

    pub fn find_available_engineers(&self, target: NaiveDate) -> Result<Vec<Engineer>, StoreError> {
        let roster = self.repo.snapshot()?;
        let available = available_engineers(&roster, &self.filter, target);
        tracing::info!(%target, available = available.len(), "available engineers computed");
        Ok(available)
    }
}
