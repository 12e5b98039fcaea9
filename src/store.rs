//! Store des affectations : écriture par lot transactionnelle + requêtes.
//!
//! Une écriture passe toujours par une [`Transaction`] : le roster est copié,
//! modifié, puis publié seulement après `commit` (sauvegarde réussie).
//! Abandonner la transaction (erreur, `?`, panic) revient à un rollback.

use crate::model::{Engineer, EngineerId, ResolvedAssignment, Roster, ShiftAssignment};
use crate::storage::Storage;
use chrono::NaiveDate;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown engineer: {0}")]
    UnknownEngineer(String),
    #[error("duplicate engineer: {0}")]
    DuplicateEngineer(String),
    #[error("duplicate assignment: {0}")]
    DuplicateAssignment(String),
    #[error("invalid duration for assignment {0}: hours must be positive")]
    InvalidDuration(String),
    #[error("store lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Contrat complet du store : création par lot + lectures.
pub trait ShiftRepository {
    /// Vue cohérente de tout le roster.
    fn snapshot(&self) -> Result<Roster, StoreError>;

    fn engineers(&self) -> Result<Vec<Engineer>, StoreError>;

    /// Enregistre des ingénieurs (handle et id uniques), tout ou rien.
    fn add_engineers(&self, engineers: Vec<Engineer>) -> Result<Vec<Engineer>, StoreError>;

    /// Insère toutes les affectations, ou aucune.
    fn create_assignments(
        &self,
        assignments: Vec<ShiftAssignment>,
    ) -> Result<Vec<ShiftAssignment>, StoreError>;

    /// Lot d'une seule affectation.
    fn schedule_engineer_shift(
        &self,
        engineer: &EngineerId,
        date: NaiveDate,
        duration_hours: u32,
    ) -> Result<ShiftAssignment, StoreError> {
        let shift = ShiftAssignment::new(engineer.clone(), date, duration_hours);
        self.create_assignments(vec![shift.clone()])?;
        Ok(shift)
    }

    /// Toutes les affectations, chacune avec son ingénieur.
    fn find_all(&self) -> Result<Vec<ResolvedAssignment>, StoreError>;

    /// Affectations d'un ingénieur, par date croissante ; vide si aucune.
    fn find_by_engineer(&self, engineer: &EngineerId) -> Result<Vec<ShiftAssignment>, StoreError>;

    /// Idem, restreint à `[from, to]` inclus ; vide si `from > to`.
    fn find_by_engineer_between(
        &self,
        engineer: &EngineerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ShiftAssignment>, StoreError>;
}

/// Store en mémoire adossé à un [`Storage`] pour la durabilité.
pub struct ShiftStore<S: Storage> {
    storage: S,
    state: RwLock<Roster>,
}

impl<S: Storage> ShiftStore<S> {
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let roster = storage.load()?;
        tracing::debug!(
            engineers = roster.engineers.len(),
            assignments = roster.assignments.len(),
            "shift store opened"
        );
        Ok(Self {
            storage,
            state: RwLock::new(roster),
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Ouvre une transaction ; les autres écrivains attendent le verrou.
    pub fn begin(&self) -> Result<Transaction<'_, S>, StoreError> {
        let state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        let staged = state.clone();
        Ok(Transaction {
            storage: &self.storage,
            state,
            staged,
            committed: false,
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Roster>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }
}

impl<S: Storage> ShiftRepository for ShiftStore<S> {
    fn snapshot(&self) -> Result<Roster, StoreError> {
        Ok(self.read()?.clone())
    }

    fn engineers(&self) -> Result<Vec<Engineer>, StoreError> {
        Ok(self.read()?.engineers.clone())
    }

    fn add_engineers(&self, engineers: Vec<Engineer>) -> Result<Vec<Engineer>, StoreError> {
        if engineers.is_empty() {
            return Ok(engineers);
        }
        let mut tx = self.begin()?;
        for engineer in &engineers {
            tx.insert_engineer(engineer.clone())?;
        }
        tx.commit()?;
        Ok(engineers)
    }

    fn create_assignments(
        &self,
        assignments: Vec<ShiftAssignment>,
    ) -> Result<Vec<ShiftAssignment>, StoreError> {
        if assignments.is_empty() {
            return Ok(assignments);
        }
        let mut tx = self.begin()?;
        for assignment in &assignments {
            tx.insert_assignment(assignment.clone())?;
        }
        tx.commit()?;
        tracing::info!(count = assignments.len(), "shift assignments created");
        Ok(assignments)
    }

    fn find_all(&self) -> Result<Vec<ResolvedAssignment>, StoreError> {
        let roster = self.read()?;
        roster
            .assignments
            .iter()
            .map(|assignment| -> Result<ResolvedAssignment, StoreError> {
                let engineer = roster
                    .find_engineer_by_id(&assignment.engineer)
                    .ok_or_else(|| {
                        StoreError::UnknownEngineer(assignment.engineer.as_str().to_string())
                    })?;
                Ok(ResolvedAssignment {
                    assignment: assignment.clone(),
                    engineer: engineer.clone(),
                })
            })
            .collect()
    }

    fn find_by_engineer(&self, engineer: &EngineerId) -> Result<Vec<ShiftAssignment>, StoreError> {
        let roster = self.read()?;
        Ok(roster.assignments_of(engineer).into_iter().cloned().collect())
    }

    fn find_by_engineer_between(
        &self,
        engineer: &EngineerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ShiftAssignment>, StoreError> {
        if from > to {
            return Ok(Vec::new());
        }
        let roster = self.read()?;
        Ok(roster
            .assignments_of(engineer)
            .into_iter()
            .filter(|a| from <= a.date && a.date <= to)
            .cloned()
            .collect())
    }
}

/// Transaction d'écriture : copie de travail + verrou exclusif.
///
/// `commit` sauvegarde puis publie ; sans `commit`, le drop jette la copie.
pub struct Transaction<'s, S: Storage> {
    storage: &'s S,
    state: RwLockWriteGuard<'s, Roster>,
    staged: Roster,
    committed: bool,
}

impl<'s, S: Storage> Transaction<'s, S> {
    pub fn staged(&self) -> &Roster {
        &self.staged
    }

    pub fn insert_engineer(&mut self, engineer: Engineer) -> Result<(), StoreError> {
        if self.staged.find_engineer_by_id(&engineer.id).is_some() {
            return Err(StoreError::DuplicateEngineer(engineer.id.as_str().to_string()));
        }
        if self.staged.find_engineer_by_handle(&engineer.handle).is_some() {
            return Err(StoreError::DuplicateEngineer(engineer.handle));
        }
        self.staged.engineers.push(engineer);
        Ok(())
    }

    pub fn insert_assignment(&mut self, assignment: ShiftAssignment) -> Result<(), StoreError> {
        if self.staged.find_engineer_by_id(&assignment.engineer).is_none() {
            return Err(StoreError::UnknownEngineer(
                assignment.engineer.as_str().to_string(),
            ));
        }
        if assignment.duration_hours == 0 {
            return Err(StoreError::InvalidDuration(assignment.id.as_str().to_string()));
        }
        if self.staged.has_assignment(&assignment.id) {
            return Err(StoreError::DuplicateAssignment(
                assignment.id.as_str().to_string(),
            ));
        }
        self.staged.assignments.push(assignment);
        Ok(())
    }

    pub fn commit(mut self) -> Result<(), StoreError> {
        self.storage.save(&self.staged)?;
        *self.state = std::mem::take(&mut self.staged);
        self.committed = true;
        Ok(())
    }
}

impl<'s, S: Storage> Drop for Transaction<'s, S> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::warn!("transaction rolled back, staged changes discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store_with(engineers: &[&Engineer]) -> ShiftStore<MemoryStorage> {
        let store = ShiftStore::open(MemoryStorage::default()).unwrap();
        store
            .add_engineers(engineers.iter().map(|e| (*e).clone()).collect())
            .unwrap();
        store
    }

    /// Support dont la sauvegarde échoue toujours.
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn load(&self) -> anyhow::Result<Roster> {
            Ok(Roster {
                engineers: vec![Engineer {
                    id: EngineerId::new("e1"),
                    handle: "alice".into(),
                    display_name: "Alice".into(),
                }],
                assignments: Vec::new(),
            })
        }
        fn save(&self, _roster: &Roster) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn batch_with_unknown_engineer_is_rolled_back() {
        let alice = Engineer::new("alice", "Alice");
        let store = store_with(&[&alice]);

        let batch = vec![
            ShiftAssignment::new(alice.id.clone(), d(2024, 3, 4), 8),
            ShiftAssignment::new(alice.id.clone(), d(2024, 3, 5), 8),
            ShiftAssignment::new(EngineerId::new("ghost"), d(2024, 3, 6), 8),
        ];
        let err = store.create_assignments(batch).unwrap_err();
        assert!(matches!(err, StoreError::UnknownEngineer(ref id) if id == "ghost"));
        assert!(store.find_all().unwrap().is_empty());
        assert!(store.storage().load().unwrap().assignments.is_empty());
    }

    #[test]
    fn zero_duration_is_rejected() {
        let alice = Engineer::new("alice", "Alice");
        let store = store_with(&[&alice]);
        let err = store
            .schedule_engineer_shift(&alice.id, d(2024, 3, 4), 0)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDuration(_)));
        assert!(store.find_by_engineer(&alice.id).unwrap().is_empty());
    }

    #[test]
    fn duplicate_assignment_id_is_rejected() {
        let alice = Engineer::new("alice", "Alice");
        let store = store_with(&[&alice]);
        let shift = ShiftAssignment::new(alice.id.clone(), d(2024, 3, 4), 8);
        store.create_assignments(vec![shift.clone()]).unwrap();
        let err = store.create_assignments(vec![shift]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateAssignment(_)));
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn failed_save_leaves_state_untouched() {
        let store = ShiftStore::open(BrokenStorage).unwrap();
        let err = store
            .schedule_engineer_shift(&EngineerId::new("e1"), d(2024, 3, 4), 8)
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn dropped_transaction_discards_staged_changes() {
        let alice = Engineer::new("alice", "Alice");
        let store = store_with(&[&alice]);
        {
            let mut tx = store.begin().unwrap();
            tx.insert_assignment(ShiftAssignment::new(alice.id.clone(), d(2024, 3, 4), 8))
                .unwrap();
            assert_eq!(tx.staged().assignments.len(), 1);
        }
        assert!(store.snapshot().unwrap().assignments.is_empty());
    }

    #[test]
    fn find_by_engineer_sorts_and_filters() {
        let alice = Engineer::new("alice", "Alice");
        let bob = Engineer::new("bob", "Bob");
        let store = store_with(&[&alice, &bob]);
        store
            .create_assignments(vec![
                ShiftAssignment::new(alice.id.clone(), d(2024, 3, 12), 8),
                ShiftAssignment::new(bob.id.clone(), d(2024, 3, 5), 4),
                ShiftAssignment::new(alice.id.clone(), d(2024, 3, 4), 6),
                ShiftAssignment::new(alice.id.clone(), d(2024, 3, 20), 8),
            ])
            .unwrap();

        let dates: Vec<NaiveDate> = store
            .find_by_engineer(&alice.id)
            .unwrap()
            .iter()
            .map(|a| a.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 3, 4), d(2024, 3, 12), d(2024, 3, 20)]);

        let ranged = store
            .find_by_engineer_between(&alice.id, d(2024, 3, 4), d(2024, 3, 12))
            .unwrap();
        assert_eq!(ranged.len(), 2);
        assert!(store
            .find_by_engineer_between(&alice.id, d(2024, 3, 12), d(2024, 3, 4))
            .unwrap()
            .is_empty());
        assert!(store
            .find_by_engineer(&EngineerId::new("nobody"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn scheduled_shift_is_returned_as_stored() {
        let alice = Engineer::new("alice", "Alice");
        let storage = MemoryStorage::new(Roster {
            engineers: vec![alice.clone()],
            assignments: Vec::new(),
        });
        let store = ShiftStore::open(storage).unwrap();

        let created = store.schedule_engineer_shift(&alice.id, d(2024, 3, 4), 8).unwrap();
        assert_eq!(created.engineer, alice.id);
        assert_eq!(created.date, d(2024, 3, 4));
        assert_eq!(created.duration_hours, 8);
        assert_eq!(store.find_by_engineer(&alice.id).unwrap(), vec![created]);

        let err = store
            .schedule_engineer_shift(&EngineerId::new("ghost"), d(2024, 3, 4), 8)
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownEngineer(ref id) if id == "ghost"));
    }

    #[test]
    fn duplicate_handle_is_rejected() {
        let store = store_with(&[&Engineer::new("alice", "Alice")]);
        let err = store
            .add_engineers(vec![Engineer::new("alice", "Other Alice")])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEngineer(ref h) if h == "alice"));
        assert_eq!(store.engineers().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_batches_all_land() {
        let alice = Engineer::new("alice", "Alice");
        let store = store_with(&[&alice]);
        std::thread::scope(|scope| {
            for day in 1..=8u32 {
                let store = &store;
                let id = alice.id.clone();
                scope.spawn(move || {
                    store
                        .create_assignments(vec![ShiftAssignment::new(id, d(2024, 4, day), 2)])
                        .unwrap();
                });
            }
        });
        assert_eq!(store.find_by_engineer(&alice.id).unwrap().len(), 8);
        assert_eq!(store.storage().load().unwrap().assignments.len(), 8);
    }
}
