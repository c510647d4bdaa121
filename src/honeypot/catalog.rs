//! Honeypot type catalog.
//!
//! A closed enumeration of recognized honeypot types loaded from a single
//! on-disk YAML document, falling back to two built-in defaults when the
//! document is missing. Reloaded when the file's mtime advances; consumers
//! always see an atomically-swapped snapshot, never a partially loaded one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{info, warn};

/// Configuration for a single honeypot type.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeConfig {
    /// Container ports this type's image exposes, e.g. `"22/tcp"`.
    #[serde(default)]
    pub ports: HashMap<String, String>,

    /// Named volumes to mount under `/app/<name>` in the container.
    #[serde(default)]
    pub volumes: Vec<String>,

    /// Passive port range `[start, end]`, published `p:p`, e.g. FTP data ports.
    #[serde(default)]
    pub passive_ports: Option<[u16; 2]>,
}

fn default_configs() -> HashMap<String, TypeConfig> {
    let mut map = HashMap::new();
    map.insert(
        "ssh".to_string(),
        TypeConfig {
            ports: HashMap::from([("22/tcp".to_string(), "honeypot_port".to_string())]),
            volumes: vec![],
            passive_ports: None,
        },
    );
    map.insert(
        "ftp".to_string(),
        TypeConfig {
            ports: HashMap::from([("21/tcp".to_string(), "honeypot_port".to_string())]),
            volumes: vec!["malware".to_string(), "logs".to_string()],
            passive_ports: Some([60000, 60100]),
        },
    );
    map
}

struct Snapshot {
    configs: HashMap<String, TypeConfig>,
    loaded_from_disk: bool,
    mtime: Option<SystemTime>,
}

/// Thread-safe, hot-reloadable view of the type catalog.
pub struct HoneypotCatalog {
    path: PathBuf,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl HoneypotCatalog {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshot = Self::read(&path);
        Self {
            path,
            snapshot: RwLock::new(Arc::new(snapshot)),
        }
    }

    fn read(path: &Path) -> Snapshot {
        let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        if mtime.is_none() {
            warn!(path = %path.display(), "honeypot type catalog not found, using built-in defaults");
            return Snapshot {
                configs: default_configs(),
                loaded_from_disk: false,
                mtime: None,
            };
        }
        match std::fs::read_to_string(path).and_then(|s| {
            serde_yaml::from_str::<HashMap<String, TypeConfig>>(&s)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }) {
            Ok(configs) => {
                info!(path = %path.display(), count = configs.len(), "loaded honeypot type catalog");
                Snapshot {
                    configs,
                    loaded_from_disk: true,
                    mtime,
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse honeypot type catalog, falling back to defaults");
                Snapshot {
                    configs: default_configs(),
                    loaded_from_disk: false,
                    mtime,
                }
            }
        }
    }

    /// Re-read the catalog from disk if its mtime has advanced since the
    /// last load, swapping the snapshot atomically.
    fn maybe_reload(&self) -> Arc<Snapshot> {
        let current = self.snapshot.read().clone();
        let disk_mtime = std::fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        let stale = match (disk_mtime, current.mtime) {
            (Some(disk), Some(loaded)) => disk > loaded,
            (Some(_), None) => true,
            _ => false,
        };
        if !stale {
            return current;
        }
        let fresh = Arc::new(Self::read(&self.path));
        *self.snapshot.write() = fresh.clone();
        fresh
    }

    pub fn type_exists(&self, honeypot_type: &str) -> bool {
        self.maybe_reload().configs.contains_key(honeypot_type)
    }

    pub fn get(&self, honeypot_type: &str) -> Option<TypeConfig> {
        self.maybe_reload().configs.get(honeypot_type).cloned()
    }

    pub fn available_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.maybe_reload().configs.keys().cloned().collect();
        types.sort();
        types
    }

    #[cfg(test)]
    pub fn loaded_from_disk(&self) -> bool {
        self.maybe_reload().loaded_from_disk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn falls_back_to_defaults_when_file_missing() {
        let catalog = HoneypotCatalog::load("/nonexistent/honeypot-types.yml");
        assert!(catalog.type_exists("ssh"));
        assert!(catalog.type_exists("ftp"));
        assert!(!catalog.loaded_from_disk());
    }

    #[test]
    fn loads_and_reloads_on_mtime_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.yml");
        std::fs::write(&path, "ssh:\n  ports: {\"22/tcp\": honeypot_port}\n").unwrap();

        let catalog = HoneypotCatalog::load(&path);
        assert!(catalog.type_exists("ssh"));
        assert!(!catalog.type_exists("http"));

        // Advance mtime and add a new type.
        std::thread::sleep(std::time::Duration::from_millis(10));
        let mut f = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "http:\n  ports: {{\"80/tcp\": honeypot_port}}").unwrap();
        let future = SystemTime::now() + std::time::Duration::from_secs(5);
        f.set_modified(future).ok();

        assert!(catalog.type_exists("http"));
    }
}
