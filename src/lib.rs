#![forbid(unsafe_code)]
//! BAU : cœur de planification des ingénieurs d'astreinte « business as usual ».
//!
//! - Disponibilité d'une date : fenêtre de semaines, plafond d'heures,
//!   exclusion des jours ouvrés adjacents.
//! - Store d'affectations transactionnel (tout ou rien), fichiers JSON/CSV.
//! - Dates calendaires uniquement, sans fuseau horaire.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod io;
pub mod model;
pub mod query;
pub mod storage;
pub mod store;

pub use availability::{AdjacentDays, AvailabilityFilter, ScanWindow};
pub use config::{AvailabilityConfig, ConfigError, HoursGrouping};
pub use model::{AssignmentId, Engineer, EngineerId, ResolvedAssignment, Roster, ShiftAssignment};
pub use query::{available_engineers, never_scheduled, EngineerQuery};
pub use storage::{JsonStorage, MemoryStorage, Storage};
pub use store::{ShiftRepository, ShiftStore, StoreError, Transaction};
