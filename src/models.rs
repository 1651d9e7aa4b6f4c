use serde::{Deserialize, Serialize};

/// A stored SSH connection profile.
///
/// Identity is positional: no uniqueness is enforced on `name` or `host`,
/// and the stored order is meaningful. Fields omitted from the backing JSON
/// decode to their zero values, matching the historical on-disk format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub ssh_key: String,
}

/// The singleton defaults record used to fill unspecified profile fields.
///
/// A stored record that omits a field decodes that field to its zero value,
/// not to the built-in fallback. Backfill happens only when the whole file
/// is absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub port: u16,
    pub username: String,
    pub ssh_key: String,
}

impl Defaults {
    /// Built-in values used to seed a fresh installation.
    pub fn fallback() -> Self {
        let ssh_key = dirs::home_dir()
            .unwrap_or_default()
            .join(".ssh")
            .join("id_rsa");

        Self {
            port: 22,
            username: "root".to_string(),
            ssh_key: ssh_key.to_string_lossy().into_owned(),
        }
    }
}
