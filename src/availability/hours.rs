use crate::config::HoursGrouping;
use crate::model::{EngineerId, ShiftAssignment};
use std::collections::{HashMap, HashSet};

/// Garde les affectations des ingénieurs ayant au moins un groupe dont la
/// somme d'heures est strictement inférieure au plafond.
pub(super) fn filter_hours_cap<'a>(
    windowed: Vec<&'a ShiftAssignment>,
    max_hours: u32,
    grouping: HoursGrouping,
) -> Vec<&'a ShiftAssignment> {
    let mut sums: HashMap<(&'a EngineerId, Option<u32>), u64> = HashMap::new();
    for &a in &windowed {
        let duration_key = match grouping {
            HoursGrouping::EngineerAndDuration => Some(a.duration_hours),
            HoursGrouping::Engineer => None,
        };
        *sums.entry((&a.engineer, duration_key)).or_default() += u64::from(a.duration_hours);
    }

    let allowed: HashSet<&'a EngineerId> = sums
        .into_iter()
        .filter(|(_, total)| *total < u64::from(max_hours))
        .map(|((engineer, _), _)| engineer)
        .collect();

    windowed
        .into_iter()
        .filter(|a| allowed.contains(&a.engineer))
        .collect()
}
