use crate::error::{Error, Result};
use crate::models::{Connection, Defaults};
use crate::store::{DefaultsStore, ProfileStore};

/// Raw user input for a new connection. Carried as typed text so the merge
/// with stored defaults happens in one place.
#[derive(Debug, Clone, Default)]
pub struct ConnectionInput {
    pub name: String,
    pub host: String,
    pub port: String,
    pub username: String,
    pub ssh_key: String,
}

/// Raw user input for a defaults edit.
#[derive(Debug, Clone, Default)]
pub struct DefaultsInput {
    pub port: String,
    pub username: String,
    pub ssh_key: String,
}

/// Outcome of a defaults edit. A port that failed to parse is reported here
/// as recoverable instead of failing the whole operation.
#[derive(Debug)]
pub struct DefaultsEdit {
    pub saved: Defaults,
    pub rejected_port: Option<String>,
}

/// Orchestrates all access to the two stores. Every operation re-reads the
/// backing files; the in-process view never outlives a single call.
pub struct ConnectionService {
    profiles: ProfileStore,
    defaults: DefaultsStore,
}

impl ConnectionService {
    pub fn new(profiles: ProfileStore, defaults: DefaultsStore) -> Self {
        Self { profiles, defaults }
    }

    pub fn list(&self) -> Result<Vec<Connection>> {
        self.profiles.load()
    }

    pub fn defaults(&self) -> Result<Defaults> {
        self.defaults.load()
    }

    /// Add a connection, substituting stored defaults for unspecified input.
    ///
    /// The port falls back whenever its text does not parse as a number;
    /// username and key fall back only when their text is empty. Name and
    /// host are stored verbatim, empty string included.
    pub fn add(&self, input: ConnectionInput) -> Result<Connection> {
        let defaults = self.defaults.load()?;

        let port = input.port.parse().unwrap_or(defaults.port);
        let username = if input.username.is_empty() {
            defaults.username
        } else {
            input.username
        };
        let ssh_key = if input.ssh_key.is_empty() {
            defaults.ssh_key
        } else {
            input.ssh_key
        };

        let connection = Connection {
            name: input.name,
            host: input.host,
            port,
            username,
            ssh_key,
        };

        let mut connections = self.profiles.load()?;
        connections.push(connection.clone());
        self.profiles.save(&connections)?;

        tracing::info!(
            "added connection {:?} ({} stored)",
            connection.name,
            connections.len()
        );
        Ok(connection)
    }

    /// Remove the connection at a 1-based position. The relative order of
    /// the remaining entries is preserved; nothing is written on a bounds
    /// failure.
    pub fn delete(&self, index: usize) -> Result<Connection> {
        let mut connections = self.profiles.load()?;
        check_bounds(index, connections.len())?;

        let removed = connections.remove(index - 1);
        self.profiles.save(&connections)?;

        tracing::info!("deleted connection {:?} at position {}", removed.name, index);
        Ok(removed)
    }

    /// Fetch the connection at a 1-based position for the launcher.
    pub fn resolve(&self, index: usize) -> Result<Connection> {
        let connections = self.profiles.load()?;
        check_bounds(index, connections.len())?;
        Ok(connections[index - 1].clone())
    }

    /// Overwrite stored defaults with the fields present in the input.
    ///
    /// Empty username/key input keeps the current value. Port text that is
    /// non-empty but unparseable also keeps the current value, reported in
    /// the outcome as a recoverable rejection; the edit still saves.
    pub fn edit_defaults(&self, input: DefaultsInput) -> Result<DefaultsEdit> {
        let mut defaults = self.defaults.load()?;
        let mut rejected_port = None;

        if !input.port.is_empty() {
            match input.port.parse() {
                Ok(port) => defaults.port = port,
                Err(_) => rejected_port = Some(input.port),
            }
        }
        if !input.username.is_empty() {
            defaults.username = input.username;
        }
        if !input.ssh_key.is_empty() {
            defaults.ssh_key = input.ssh_key;
        }

        self.defaults.save(&defaults)?;
        Ok(DefaultsEdit {
            saved: defaults,
            rejected_port,
        })
    }

    /// Parse a 1-based selection token typed by the user.
    pub fn parse_selection(token: &str) -> Result<usize> {
        token
            .parse()
            .map_err(|_| Error::InvalidInput(token.to_string()))
    }
}

fn check_bounds(index: usize, len: usize) -> Result<()> {
    if index < 1 || index > len {
        return Err(Error::OutOfRange { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CONNECTIONS_FILE, DEFAULTS_FILE};
    use tempfile::{tempdir, TempDir};

    fn service() -> (ConnectionService, TempDir) {
        let dir = tempdir().unwrap();
        let service = ConnectionService::new(
            ProfileStore::new(dir.path().join(CONNECTIONS_FILE)),
            DefaultsStore::new(dir.path().join(DEFAULTS_FILE)),
        );
        (service, dir)
    }

    fn input(name: &str, host: &str) -> ConnectionInput {
        ConnectionInput {
            name: name.to_string(),
            host: host.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn add_resolves_empty_fields_from_defaults() {
        let (service, dir) = service();
        std::fs::write(
            dir.path().join(DEFAULTS_FILE),
            r#"{"port": 22, "username": "root", "ssh_key": "/k"}"#,
        )
        .unwrap();

        let added = service.add(input("db1", "10.0.0.5")).unwrap();
        assert_eq!(
            added,
            Connection {
                name: "db1".to_string(),
                host: "10.0.0.5".to_string(),
                port: 22,
                username: "root".to_string(),
                ssh_key: "/k".to_string(),
            }
        );
        assert_eq!(service.list().unwrap(), vec![added]);
    }

    #[test]
    fn add_unparseable_port_falls_back_to_default() {
        let (service, dir) = service();
        std::fs::write(
            dir.path().join(DEFAULTS_FILE),
            r#"{"port": 2200, "username": "ops", "ssh_key": "/k"}"#,
        )
        .unwrap();

        let mut raw = input("a", "h");
        raw.port = "not-a-port".to_string();
        assert_eq!(service.add(raw).unwrap().port, 2200);
    }

    #[test]
    fn add_stores_name_and_host_verbatim_even_empty() {
        let (service, _dir) = service();

        let added = service.add(input("", "")).unwrap();
        assert_eq!(added.name, "");
        assert_eq!(added.host, "");
        // Unspecified fields come from the freshly seeded fallback defaults.
        assert_eq!(added.port, 22);
        assert_eq!(added.username, "root");
    }

    #[test]
    fn add_list_delete_scenario_preserves_order() {
        let (service, _dir) = service();

        service.add(input("a", "h1")).unwrap();
        service.add(input("b", "h2")).unwrap();

        let names: Vec<_> = service.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["a", "b"]);

        service.delete(1).unwrap();
        let names: Vec<_> = service.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["b"]);
    }

    #[test]
    fn delete_middle_keeps_relative_order() {
        let (service, _dir) = service();
        for (name, host) in [("a", "h1"), ("b", "h2"), ("c", "h3")] {
            service.add(input(name, host)).unwrap();
        }

        let removed = service.delete(2).unwrap();
        assert_eq!(removed.name, "b");

        let names: Vec<_> = service.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn delete_out_of_range_leaves_store_unchanged() {
        let (service, _dir) = service();
        service.add(input("a", "h1")).unwrap();
        service.add(input("b", "h2")).unwrap();

        assert!(matches!(
            service.delete(0),
            Err(Error::OutOfRange { index: 0, len: 2 })
        ));
        assert!(matches!(
            service.delete(3),
            Err(Error::OutOfRange { index: 3, len: 2 })
        ));
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn resolve_returns_selected_profile() {
        let (service, _dir) = service();
        service.add(input("a", "h1")).unwrap();
        service.add(input("b", "h2")).unwrap();

        assert_eq!(service.resolve(2).unwrap().name, "b");
        assert!(matches!(service.resolve(5), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn parse_selection_rejects_non_numeric_tokens() {
        assert_eq!(ConnectionService::parse_selection("3").unwrap(), 3);
        assert!(matches!(
            ConnectionService::parse_selection("b"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ConnectionService::parse_selection(""),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn edit_defaults_empty_input_keeps_current_values() {
        let (service, dir) = service();
        std::fs::write(
            dir.path().join(DEFAULTS_FILE),
            r#"{"port": 2200, "username": "ops", "ssh_key": "/k"}"#,
        )
        .unwrap();

        let edit = service.edit_defaults(DefaultsInput::default()).unwrap();
        assert!(edit.rejected_port.is_none());
        assert_eq!(edit.saved.port, 2200);
        assert_eq!(edit.saved.username, "ops");
        assert_eq!(edit.saved.ssh_key, "/k");
    }

    #[test]
    fn edit_defaults_rejects_bad_port_but_saves_the_rest() {
        let (service, _dir) = service();
        service.defaults().unwrap(); // seed fallback

        let edit = service
            .edit_defaults(DefaultsInput {
                port: "eleventy".to_string(),
                username: "admin".to_string(),
                ssh_key: String::new(),
            })
            .unwrap();

        assert_eq!(edit.rejected_port.as_deref(), Some("eleventy"));
        assert_eq!(edit.saved.port, 22);
        assert_eq!(edit.saved.username, "admin");
        assert_eq!(service.defaults().unwrap(), edit.saved);
    }
}
