//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.roundtable/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::query::DEFAULT_SUBTASK_DEPTH;
use crate::core::roster::{DEFAULT_PERSONALITIES, DEFAULT_ROUNDS, Roster};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoundtableConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub roster: RosterConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub session_end: Option<SessionEnd>,
    pub subtask_depth: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RosterConfig {
    pub personalities: Option<Vec<String>>,
    pub selected: Option<Vec<String>>,
    pub lead: Option<String>,
    pub rounds: Option<u32>,
}

/// What happens when a response carries a final output and the history has
/// reached the expected number of turns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEnd {
    /// The session finishes; a new start is required.
    #[default]
    EndSession,
    /// The session stays open for follow-ups.
    KeepOpen,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/graphql";
const CONFIG_DIR: &str = ".roundtable";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub request_timeout: Option<Duration>,
    pub session_end: SessionEnd,
    pub subtask_depth: usize,
    pub roster: Roster,
}

/// Values supplied on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub rounds: Option<u32>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.roundtable/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_DIR).join("config.toml"))
}

/// Load config from `path`, or from `~/.roundtable/config.toml` when `None`.
///
/// If the default file doesn't exist, generates a commented-out default and
/// returns `RoundtableConfig::default()`. An explicit path that doesn't exist
/// is an error. A malformed file returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<RoundtableConfig, ConfigError> {
    if let Some(explicit) = path {
        return read_config(explicit);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RoundtableConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RoundtableConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<RoundtableConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: RoundtableConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Roundtable Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# endpoint = "http://localhost:5000/graphql"   # Or set ROUNDTABLE_ENDPOINT
# request_timeout_secs = 120                    # Or set ROUNDTABLE_TIMEOUT_SECS; unset = no timeout
# session_end = "end_session"                   # "end_session" or "keep_open"
# subtask_depth = 4                             # Plan subtask nesting requested from the server

# [roster]
# personalities = ["Helpful Assistant", "Sarcastic Assistant", "Domain Expert",
#                  "Creative Writer", "Code Generator", "Summarizer"]
# selected = ["Helpful Assistant"]
# lead = "Helpful Assistant"
# rounds = 3
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RoundtableConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &RoundtableConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("ROUNDTABLE_ENDPOINT"))
        .or_else(|| config.general.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Timeout: env → config → none
    let request_timeout = env("ROUNDTABLE_TIMEOUT_SECS")
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Ignoring ROUNDTABLE_TIMEOUT_SECS={:?}: {}", raw, e);
                None
            }
        })
        .or(config.general.request_timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    let available = config
        .roster
        .personalities
        .clone()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PERSONALITIES.iter().map(|s| s.to_string()).collect());
    let selected = config
        .roster
        .selected
        .clone()
        .unwrap_or_else(|| available.iter().take(1).cloned().collect());
    let lead = config
        .roster
        .lead
        .clone()
        .or_else(|| selected.first().cloned())
        .unwrap_or_default();
    let rounds = cli
        .rounds
        .or(config.roster.rounds)
        .unwrap_or(DEFAULT_ROUNDS);

    let roster = Roster::sanitized(available, selected, lead, rounds);
    debug!("Resolved roster: {:?}", roster);

    ResolvedConfig {
        endpoint,
        request_timeout,
        session_end: config.general.session_end.unwrap_or_default(),
        subtask_depth: config.general.subtask_depth.unwrap_or(DEFAULT_SUBTASK_DEPTH),
        roster,
    }
}
