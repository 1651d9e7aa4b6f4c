use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{Connection, Defaults};

pub const CONNECTIONS_FILE: &str = "connections.json";
pub const DEFAULTS_FILE: &str = "defaults.json";

/// Resolve the per-user configuration directory for this tool.
pub fn default_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| Error::Io(io::Error::other("could not find config directory")))?;
    Ok(base.join("ssm"))
}

/// Load/save of the ordered connection list backed by a single JSON file.
///
/// The file is re-read on every operation and rewritten wholesale on every
/// mutation. No locking: two processes mutating the store at once can race
/// on read-modify-write, which is an accepted limitation of a single-user
/// tool.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored connections, creating an empty store on first use.
    ///
    /// An empty or whitespace-only file decodes to an empty list. Anything
    /// else that is not valid JSON is a decode failure.
    pub fn load(&self) -> Result<Vec<Connection>> {
        if !self.path.exists() {
            tracing::info!("connections file missing, creating {}", self.path.display());
            fs::write(&self.path, "[]")?;
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the store with the full sequence, preserving its order.
    ///
    /// Truncate-then-write: a crash mid-write can corrupt the file, which
    /// the next `load` surfaces as a decode failure.
    pub fn save(&self, connections: &[Connection]) -> Result<()> {
        let content = serde_json::to_string_pretty(connections).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Load/save of the singleton defaults record.
#[derive(Debug)]
pub struct DefaultsStore {
    path: PathBuf,
}

impl DefaultsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the defaults, seeding the built-in fallback when the file is
    /// absent or empty.
    ///
    /// A present, well-formed record is returned as-is: fields omitted from
    /// the JSON decode to zero values and are not backfilled.
    pub fn load(&self) -> Result<Defaults> {
        if !self.path.exists() {
            return self.seed_fallback();
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return self.seed_fallback();
        }

        serde_json::from_str(&content).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the backing file with the serialized record.
    pub fn save(&self, defaults: &Defaults) -> Result<()> {
        let content = serde_json::to_string_pretty(defaults).map_err(|source| Error::Decode {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn seed_fallback(&self) -> Result<Defaults> {
        let defaults = Defaults::fallback();
        tracing::info!("seeding default settings at {}", self.path.display());
        self.save(&defaults)?;
        Ok(defaults)
    }
}
