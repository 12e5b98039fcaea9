use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Engineer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EngineerId(String);

impl EngineerId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ingénieur planifiable. Son cycle de vie est géré hors de la lib.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engineer {
    pub id: EngineerId,
    pub handle: String,
    pub display_name: String,
}

impl Engineer {
    pub fn new<H: Into<String>, D: Into<String>>(handle: H, display_name: D) -> Self {
        Self {
            id: EngineerId::random(),
            handle: handle.into(),
            display_name: display_name.into(),
        }
    }
}

/// Identifiant fort pour ShiftAssignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Affectation d'un ingénieur à une journée, pour une durée en heures.
///
/// Immuable une fois persistée : le store ne connaît que la création.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub id: AssignmentId,
    pub engineer: EngineerId,
    pub date: NaiveDate,
    pub duration_hours: u32,
}

impl ShiftAssignment {
    pub fn new(engineer: EngineerId, date: NaiveDate, duration_hours: u32) -> Self {
        Self {
            id: AssignmentId::random(),
            engineer,
            date,
            duration_hours,
        }
    }
}

/// Affectation accompagnée de l'ingénieur propriétaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAssignment {
    pub assignment: ShiftAssignment,
    pub engineer: Engineer,
}

/// Roster complet : ingénieurs + affectations
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub engineers: Vec<Engineer>,
    pub assignments: Vec<ShiftAssignment>,
}

impl Roster {
    pub fn find_engineer_by_handle<'a>(&'a self, handle: &str) -> Option<&'a Engineer> {
        self.engineers.iter().find(|e| e.handle == handle)
    }
    pub fn find_engineer_by_id<'a>(&'a self, id: &EngineerId) -> Option<&'a Engineer> {
        self.engineers.iter().find(|e| &e.id == id)
    }
    pub fn has_assignment(&self, id: &AssignmentId) -> bool {
        self.assignments.iter().any(|a| &a.id == id)
    }

    /// Affectations d'un ingénieur, triées par date croissante (stable).
    pub fn assignments_of<'a>(&'a self, engineer: &EngineerId) -> Vec<&'a ShiftAssignment> {
        let mut out: Vec<&ShiftAssignment> = self
            .assignments
            .iter()
            .filter(|a| &a.engineer == engineer)
            .collect();
        out.sort_by_key(|a| a.date);
        out
    }
}
