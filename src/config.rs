//! Configuration loading.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level daemon configuration, loaded from a TOML file on boot.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    /// Enable debug-level logging regardless of `RUST_LOG`.
    #[serde(default)]
    pub debug: bool,

    pub honeypot_api: HttpBindConfiguration,
    pub infra_api: HttpBindConfiguration,

    #[serde(default)]
    pub runtime: RuntimeConfiguration,

    #[serde(default)]
    pub honeypot: HoneypotConfiguration,

    pub infra: InfraConfiguration,

    #[serde(default)]
    pub collector: CollectorConfiguration,
}

impl Configuration {
    /// Load configuration from a TOML file, resolving relative paths against
    /// the file's own directory.
    pub fn load(path: &str) -> Result<Self> {
        let config_path = std::path::Path::new(path);
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", path))?;

        let mut config: Configuration =
            toml::from_str(&content).with_context(|| "failed to parse configuration")?;

        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        if !config.honeypot.catalog_path.is_absolute() {
            config.honeypot.catalog_path = base_dir.join(&config.honeypot.catalog_path);
        }
        if !config.honeypot.volume_root.is_absolute() {
            config.honeypot.volume_root = base_dir.join(&config.honeypot.volume_root);
        }
        if !config.honeypot.build_context_root.is_absolute() {
            config.honeypot.build_context_root = base_dir.join(&config.honeypot.build_context_root);
        }
        if !config.infra.collector_build_context.is_absolute() {
            config.infra.collector_build_context = base_dir.join(&config.infra.collector_build_context);
        }

        Ok(config)
    }
}

/// A host/port pair one of the two HTTP control surfaces binds to.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpBindConfiguration {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl HttpBindConfiguration {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}

/// Podman runtime driver configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfiguration {
    #[serde(default = "default_podman_binary")]
    pub binary: String,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    #[serde(default = "default_network_name")]
    pub network_name: String,
}

impl Default for RuntimeConfiguration {
    fn default() -> Self {
        Self {
            binary: default_podman_binary(),
            command_timeout_secs: default_command_timeout(),
            network_name: default_network_name(),
        }
    }
}

fn default_podman_binary() -> String {
    "podman".into()
}

fn default_command_timeout() -> u64 {
    30
}

fn default_network_name() -> String {
    "hive-net".into()
}

/// Honeypot manager configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HoneypotConfiguration {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    #[serde(default = "default_volume_root")]
    pub volume_root: PathBuf,

    /// Directory holding one subdirectory per honeypot type, each with a
    /// `Dockerfile` and a `config.yaml` (read/written for auth overlays).
    #[serde(default = "default_build_context_root")]
    pub build_context_root: PathBuf,

    #[serde(default = "default_owner_label")]
    pub owner_label: String,
}

impl Default for HoneypotConfiguration {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            volume_root: default_volume_root(),
            build_context_root: default_build_context_root(),
            owner_label: default_owner_label(),
        }
    }
}

fn default_build_context_root() -> PathBuf {
    PathBuf::from("honeypots")
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("honeypot-types.yml")
}

fn default_volume_root() -> PathBuf {
    PathBuf::from("volumes")
}

fn default_owner_label() -> String {
    "hive".into()
}

/// Log infrastructure configuration (search, bus, collector images).
#[derive(Debug, Clone, Deserialize)]
pub struct InfraConfiguration {
    #[serde(default = "default_search_image")]
    pub search_image: String,

    #[serde(default = "default_dashboard_image")]
    pub dashboard_image: String,

    #[serde(default = "default_bus_image")]
    pub bus_image: String,

    #[serde(default = "default_collector_image")]
    pub collector_image: String,

    #[serde(default = "default_collector_build_context")]
    pub collector_build_context: PathBuf,
}

fn default_search_image() -> String {
    "docker.io/opensearchproject/opensearch:2".into()
}

fn default_dashboard_image() -> String {
    "docker.io/opensearchproject/opensearch-dashboards:2".into()
}

fn default_bus_image() -> String {
    "docker.io/library/nats:latest".into()
}

fn default_collector_image() -> String {
    "hive-log-collector:latest".into()
}

fn default_collector_build_context() -> PathBuf {
    PathBuf::from("log_collector")
}

/// Log collector enrichment pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfiguration {
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    #[serde(default = "default_opensearch_url")]
    pub opensearch_url: String,

    #[serde(default)]
    pub opensearch_user: Option<String>,

    #[serde(default)]
    pub opensearch_password: Option<String>,

    #[serde(default = "default_index_name")]
    pub index_name: String,

    #[serde(default = "default_geoip_path")]
    pub geoip_database_path: PathBuf,

    #[serde(default = "default_stream_name")]
    pub stream_name: String,

    #[serde(default = "default_stream_subject")]
    pub stream_subject: String,
}

impl Default for CollectorConfiguration {
    fn default() -> Self {
        Self {
            nats_url: default_nats_url(),
            opensearch_url: default_opensearch_url(),
            opensearch_user: None,
            opensearch_password: None,
            index_name: default_index_name(),
            geoip_database_path: default_geoip_path(),
            stream_name: default_stream_name(),
            stream_subject: default_stream_subject(),
        }
    }
}

fn default_nats_url() -> String {
    "nats://hive-nats:4222".into()
}

fn default_opensearch_url() -> String {
    "http://hive-opensearch:9200".into()
}

fn default_index_name() -> String {
    "hive-logs".into()
}

fn default_geoip_path() -> PathBuf {
    PathBuf::from("/app/GeoLite2-City.mmdb")
}

fn default_stream_name() -> String {
    "honeypot".into()
}

fn default_stream_subject() -> String {
    "honeypot.logs".into()
}

impl CollectorConfiguration {
    /// Build the collector's own configuration from its environment (spec
    /// §6.5): `OPENSEARCH_HOST`, `OPENSEARCH_USER`, `OPENSEARCH_PASSWORD`,
    /// `NATS_URL` are all required — this is the contract the collector's
    /// own container image runs under, independent of the daemon's TOML
    /// config file. Everything else keeps its built-in default.
    pub fn from_env() -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            std::env::var(key).with_context(|| format!("missing required environment variable {key}"))
        };

        let opensearch_url = required("OPENSEARCH_HOST")?;
        url::Url::parse(&opensearch_url)
            .with_context(|| format!("OPENSEARCH_HOST is not a valid URL with a scheme: {opensearch_url}"))?;

        Ok(Self {
            opensearch_url,
            opensearch_user: Some(required("OPENSEARCH_USER")?),
            opensearch_password: Some(required("OPENSEARCH_PASSWORD")?),
            nats_url: required("NATS_URL")?,
            ..Self::default()
        })
    }
}
