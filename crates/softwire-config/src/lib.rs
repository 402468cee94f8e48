//! Shared configuration for softwire tools.
//!
//! TOML defaults and named interface profiles, loaded through figment
//! (serialized defaults, then the config file, then `SOFTWIRE_*` environment
//! variables). A profile says where an interface's status snapshot comes
//! from and carries the MAP options it is configured with, so they can be
//! checked against `softwire_core::options`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use softwire_core::OptionCheck;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("interface profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--interface` is not given.
    pub default_interface: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named interface profiles.
    #[serde(default)]
    pub interfaces: HashMap<String, InterfaceProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Seconds to wait for the status command.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Program used to query interface status.
    #[serde(default = "default_ubus")]
    pub ubus: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            ubus: default_ubus(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_ubus() -> PathBuf {
    PathBuf::from("ubus")
}

/// A configured option value. The backend store is string-typed, but TOML
/// lets users write numbers and booleans naturally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => f.write_str(if *b { "1" } else { "0" }),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A named MAP interface.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InterfaceProfile {
    /// Interface section name as known to the backend (defaults to the
    /// profile name).
    pub section: Option<String>,

    /// Read the status snapshot from this file instead of querying ubus.
    pub snapshot: Option<PathBuf>,

    /// MAP options of the interface (`maptype`, `peeraddr`, ...).
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

impl InterfaceProfile {
    /// Section name, falling back to the profile name.
    pub fn section_name<'a>(&'a self, profile_name: &'a str) -> &'a str {
        self.section.as_deref().unwrap_or(profile_name)
    }

    /// Options rendered as the string values the backend would store.
    pub fn option_values(&self) -> BTreeMap<String, String> {
        self.options
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Check this profile's options against the MAP option schema.
    pub fn check_options(&self) -> Vec<OptionCheck> {
        softwire_core::options::validate_options(&self.option_values())
    }
}

impl Config {
    /// Resolve a profile by name, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &InterfaceProfile), ConfigError> {
        let name = name
            .or(self.default_interface.as_deref())
            .ok_or_else(|| ConfigError::Validation {
                field: "interface".into(),
                reason: "no interface given and no default_interface configured".into(),
            })?;
        self.interfaces
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.interfaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "softwire", "softwire").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("softwire");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SOFTWIRE_").split("__"))
}

/// Load the full Config from a specific file + environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_interface = "wan6_4"

[defaults]
output = "json"

[interfaces.wan6_4]
snapshot = "/tmp/wan6_4.json"

[interfaces.wan6_4.options]
maptype = "map-e"
peeraddr = "2001:db8:ffff::1"
ip6prefix = "2001:db8::"
ip4prefixlen = 24
legacymap = true

[interfaces.lw]
section = "wan_lw4o6"
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.profile_names(), vec!["lw", "wan6_4"]);

        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "wan6_4");
        assert_eq!(profile.section_name(name), "wan6_4");
        assert_eq!(
            profile.snapshot.as_deref(),
            Some(Path::new("/tmp/wan6_4.json"))
        );

        let (name, profile) = cfg.profile(Some("lw")).unwrap();
        assert_eq!(profile.section_name(name), "wan_lw4o6");
    }

    #[test]
    fn option_values_are_stringified() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let (_, profile) = cfg.profile(Some("wan6_4")).unwrap();

        let values = profile.option_values();
        assert_eq!(values.get("ip4prefixlen").map(String::as_str), Some("24"));
        assert_eq!(values.get("legacymap").map(String::as_str), Some("1"));
        assert!(profile.check_options().iter().all(OptionCheck::is_ok));
    }

    #[test]
    fn missing_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::ProfileNotFound { .. })
        ));
        assert!(matches!(
            cfg.profile(None),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.interfaces.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.interfaces.insert(
            "wan6_4".into(),
            InterfaceProfile {
                section: None,
                snapshot: Some(PathBuf::from("/tmp/status.json")),
                options: BTreeMap::from([("psidlen".to_owned(), OptionValue::Integer(8))]),
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (_, profile) = loaded.profile(Some("wan6_4")).unwrap();
        assert_eq!(profile.options.get("psidlen"), Some(&OptionValue::Integer(8)));
    }
}
