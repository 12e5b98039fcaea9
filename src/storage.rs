use crate::model::Roster;
use anyhow::{anyhow, Context};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un roster depuis un support.
    fn load(&self) -> anyhow::Result<Roster>;
    /// Sauvegarde de manière atomique : tout ou rien.
    fn save(&self, roster: &Roster) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    /// Un fichier absent vaut roster vide ; un fichier illisible est une erreur.
    fn load(&self) -> anyhow::Result<Roster> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Roster::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let roster: Roster = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(roster)
    }

    fn save(&self, roster: &Roster) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(roster)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Support en mémoire (tests, intégration dans un autre process).
#[derive(Debug, Default)]
pub struct MemoryStorage {
    roster: Mutex<Roster>,
}

impl MemoryStorage {
    pub fn new(roster: Roster) -> Self {
        Self { roster: Mutex::new(roster) }
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> anyhow::Result<Roster> {
        let guard = self
            .roster
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, roster: &Roster) -> anyhow::Result<()> {
        let mut guard = self
            .roster
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))?;
        *guard = roster.clone();
        Ok(())
    }
}
