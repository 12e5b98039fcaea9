//! Paramètres de la recherche de disponibilité.
//!
//! Les deux valeurs réglables sont lues une fois, validées immédiatement,
//! puis figées dans un `AvailabilityConfig` immuable passé au pipeline.
//! Clés reconnues (format `Section:Clé`) :
//!
//! - `App:MAX_SHIFT_SUM_HOURS_DURATION` : plafond d'heures (entier > 0) ;
//! - `App:WEEK_SCAN_PERIOD` : profondeur de la fenêtre, en semaines (> 0) ;
//! - `App:HOURS_GROUPING` : optionnel, `engineer_and_duration` ou `engineer`.
//!
//! Sources : fichier JSON (`{"App": {...}}`) puis variables d'environnement
//! `BAU_<CLÉ>` qui prennent le dessus.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_SHIFT_SUM_HOURS_KEY: &str = "App:MAX_SHIFT_SUM_HOURS_DURATION";
pub const WEEK_SCAN_PERIOD_KEY: &str = "App:WEEK_SCAN_PERIOD";
pub const HOURS_GROUPING_KEY: &str = "App:HOURS_GROUPING";

const ENV_PREFIX: &str = "BAU_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid configuration value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("configuration value {0} must be a positive integer")]
    NotPositive(&'static str),
    #[error("reading configuration {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing configuration")]
    Parse(#[from] serde_json::Error),
}

/// Clé de regroupement du filtre de plafond d'heures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursGrouping {
    /// Somme par couple (ingénieur, durée).
    #[default]
    EngineerAndDuration,
    /// Somme par ingénieur, toutes durées confondues.
    Engineer,
}

impl FromStr for HoursGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engineer_and_duration" => Ok(Self::EngineerAndDuration),
            "engineer" => Ok(Self::Engineer),
            other => Err(format!("unknown hours grouping: {other}")),
        }
    }
}

/// Configuration validée ; il n'existe pas de valeur « à moitié construite ».
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityConfig {
    max_shift_sum_hours: u32,
    week_scan_period: u32,
    hours_grouping: HoursGrouping,
}

impl AvailabilityConfig {
    pub fn new(max_shift_sum_hours: u32, week_scan_period: u32) -> Result<Self, ConfigError> {
        if max_shift_sum_hours == 0 {
            return Err(ConfigError::NotPositive(MAX_SHIFT_SUM_HOURS_KEY));
        }
        if week_scan_period == 0 {
            return Err(ConfigError::NotPositive(WEEK_SCAN_PERIOD_KEY));
        }
        Ok(Self {
            max_shift_sum_hours,
            week_scan_period,
            hours_grouping: HoursGrouping::default(),
        })
    }

    pub fn with_hours_grouping(mut self, grouping: HoursGrouping) -> Self {
        self.hours_grouping = grouping;
        self
    }

    pub fn max_shift_sum_hours(&self) -> u32 {
        self.max_shift_sum_hours
    }
    pub fn week_scan_period(&self) -> u32 {
        self.week_scan_period
    }
    pub fn hours_grouping(&self) -> HoursGrouping {
        self.hours_grouping
    }

    /// Construit la configuration depuis une source clé → valeur brute.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max = required_positive(&lookup, MAX_SHIFT_SUM_HOURS_KEY)?;
        let weeks = required_positive(&lookup, WEEK_SCAN_PERIOD_KEY)?;
        let grouping = match non_empty(&lookup, HOURS_GROUPING_KEY) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: HOURS_GROUPING_KEY,
                value: raw,
            })?,
            None => HoursGrouping::default(),
        };
        Ok(Self::new(max, weeks)?.with_hours_grouping(grouping))
    }

    /// Variables d'environnement seules (`BAU_MAX_SHIFT_SUM_HOURS_DURATION`, ...).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let doc: Value = serde_json::from_str(raw)?;
        Self::from_lookup(|key| json_lookup(&doc, key))
    }

    /// Fichier JSON optionnel, surchargé par l'environnement.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let doc = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                serde_json::from_str(&raw)?
            }
            None => Value::Null,
        };
        let config = Self::from_lookup(|key| env_lookup(key).or_else(|| json_lookup(&doc, key)))?;
        tracing::debug!(
            max_shift_sum_hours = config.max_shift_sum_hours,
            week_scan_period = config.week_scan_period,
            hours_grouping = ?config.hours_grouping,
            "availability configuration loaded"
        );
        Ok(config)
    }
}

fn non_empty<F>(lookup: &F, key: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_positive<F>(lookup: &F, key: &'static str) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(lookup, key).ok_or(ConfigError::Missing(key))?;
    let value: u32 = raw
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw.clone() })?;
    if value == 0 {
        return Err(ConfigError::NotPositive(key));
    }
    Ok(value)
}

pub fn env_var_name(key: &str) -> String {
    let name = key.rsplit(':').next().unwrap_or(key);
    format!("{ENV_PREFIX}{name}")
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(env_var_name(key)).ok()
}

fn json_lookup(doc: &Value, key: &str) -> Option<String> {
    let node = key.split(':').try_fold(doc, |node, part| node.get(part))?;
    match node {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
