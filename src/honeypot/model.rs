//! The `Honeypot` entity: name/image derivation, resource policy, labels,
//! and the port/volume mapping rules that come from the type catalog.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::TypeConfig;

/// A single `{username, password}` credential pair overridable at create time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Per-honeypot resource policy (spec §3.6). Defaults: 100000/50000/512m/512m.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePolicy {
    #[serde(default = "default_cpu_period")]
    pub cpu_period: i64,
    #[serde(default = "default_cpu_quota")]
    pub cpu_quota: i64,
    #[serde(default = "default_memory_limit")]
    pub memory_limit: String,
    #[serde(default = "default_memory_swap_limit")]
    pub memory_swap_limit: String,
}

impl Default for ResourcePolicy {
    fn default() -> Self {
        Self {
            cpu_period: default_cpu_period(),
            cpu_quota: default_cpu_quota(),
            memory_limit: default_memory_limit(),
            memory_swap_limit: default_memory_swap_limit(),
        }
    }
}

fn default_cpu_period() -> i64 {
    100_000
}
fn default_cpu_quota() -> i64 {
    50_000
}
fn default_memory_limit() -> String {
    "512m".into()
}
fn default_memory_swap_limit() -> String {
    "512m".into()
}

/// Canonicalize a memory limit: bare integers get an `m` suffix appended,
/// strings that already carry a unit pass through unchanged.
pub fn canonical_memory(value: &str) -> String {
    if value.chars().all(|c| c.is_ascii_digit()) {
        format!("{value}m")
    } else {
        value.to_string()
    }
}

/// Externally-rendered status vocabulary (spec §6.1): `running` → `started`.
pub fn render_status(runtime_status: &str) -> &'static str {
    match runtime_status {
        "running" => "started",
        "created" | "configured" => "created",
        "not found" | "not-found" => "not-found",
        _ => "exited",
    }
}

/// A managed honeypot record, reconstructable at any time from the runtime
/// via label discovery + inspect (spec §3.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Honeypot {
    pub honeypot_id: Option<String>,
    pub honeypot_type: String,
    pub honeypot_port: u16,
    pub honeypot_name: String,
    pub image: String,
    pub honeypot_status: String,
}

impl Honeypot {
    pub fn derive_name(honeypot_type: &str, port: u16) -> String {
        format!("hive-{honeypot_type}-{port}")
    }

    pub fn derive_image(honeypot_type: &str) -> String {
        format!("hive-{honeypot_type}-image")
    }

    pub fn labels(honeypot_type: &str, port: u16, owner_label: &str) -> HashMap<String, String> {
        HashMap::from([
            ("owner".to_string(), owner_label.to_string()),
            ("service".to_string(), "hive-honeypot-manager".to_string()),
            ("hive.type".to_string(), honeypot_type.to_string()),
            ("hive.port".to_string(), port.to_string()),
        ])
    }
}

/// Port mapping derivation (spec §4.4 "Port publication").
/// Returns `(container_port_spec, host_port)` pairs, e.g. `("22/tcp", 2222)`.
pub fn port_mapping(config: &TypeConfig, host_port: u16) -> Vec<(String, u16)> {
    let mut mapping = Vec::new();

    for container_port in config.ports.keys() {
        mapping.push((container_port.clone(), host_port));
    }

    if let Some([start, end]) = config.passive_ports {
        for p in start..=end {
            mapping.push((format!("{p}/tcp"), p));
        }
    }

    if mapping.is_empty() {
        mapping.push(("22/tcp".to_string(), host_port));
    }

    mapping
}

/// A decoded per-instance auth-details overlay (spec §6.1 `/auth-details`
/// and the honeypot's on-disk `config.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<Credential>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

impl AuthDetails {
    pub fn is_empty(&self) -> bool {
        self.authentication.is_none() && self.banner.is_none()
    }
}

pub fn ingestion_timestamp() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_canonical_name_and_image() {
        assert_eq!(Honeypot::derive_name("ssh", 2222), "hive-ssh-2222");
        assert_eq!(Honeypot::derive_image("ssh"), "hive-ssh-image");
    }

    #[test]
    fn renders_running_as_started() {
        assert_eq!(render_status("running"), "started");
        assert_eq!(render_status("exited"), "exited");
        assert_eq!(render_status("not found"), "not-found");
    }

    #[test]
    fn canonicalizes_bare_integer_memory_limits() {
        assert_eq!(canonical_memory("512"), "512m");
        assert_eq!(canonical_memory("512m"), "512m");
        assert_eq!(canonical_memory("1g"), "1g");
    }

    #[test]
    fn expands_passive_port_range_as_one_to_one() {
        let config = TypeConfig {
            ports: HashMap::from([("21/tcp".to_string(), "honeypot_port".to_string())]),
            volumes: vec![],
            passive_ports: Some([60000, 60002]),
        };
        let mapping = port_mapping(&config, 2121);
        assert!(mapping.contains(&("21/tcp".to_string(), 2121)));
        assert!(mapping.contains(&("60000/tcp".to_string(), 60000)));
        assert!(mapping.contains(&("60001/tcp".to_string(), 60001)));
        assert!(mapping.contains(&("60002/tcp".to_string(), 60002)));
    }
}
