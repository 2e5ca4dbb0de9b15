//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.faqchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::state::{
    ChatSettings, GREETING, HANDOFF_NOTICE, INITIAL_SUGGESTION_LIMIT, StaleReplies,
};
use crate::core::storage::default_storage_path;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FaqChatConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub greeting: Option<String>,
    pub handoff_notice: Option<String>,
    pub initial_suggestions: Option<usize>,
    pub stale_replies: Option<StaleReplies>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_STORAGE_FILE: &str = "faqchat-storage.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub storage_path: PathBuf,
    pub chat: ChatSettings,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub storage: Option<PathBuf>,
    pub stale_replies: Option<StaleReplies>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.faqchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".faqchat").join("config.toml"))
}

/// Load config from `~/.faqchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FaqChatConfig::default()`.
pub fn load_config() -> Result<FaqChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FaqChatConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path. Same missing-file behaviour as
/// [`load_config`].
pub fn load_config_from(path: &Path) -> Result<FaqChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(FaqChatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: FaqChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# faqchat configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost:3000"   # Or set FAQCHAT_BASE_URL
# request_timeout_secs = 30            # Unset = wait as long as the server takes

# [chat]
# greeting = "Hello. Ask a question or pick a suggested topic."
# handoff_notice = " You can contact a human at support@example.com."
# initial_suggestions = 6
# stale_replies = "show"               # "show" or "drop"

# [storage]
# path = "/home/me/.faqchat/storage.json"   # Or set FAQCHAT_STORAGE
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &FaqChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("FAQCHAT_BASE_URL").ok())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Storage: CLI → env → config → ~/.faqchat/storage.json → ./faqchat-storage.json
    let storage_path = cli
        .storage
        .clone()
        .or_else(|| std::env::var("FAQCHAT_STORAGE").ok().map(PathBuf::from))
        .or_else(|| config.storage.path.as_ref().map(PathBuf::from))
        .or_else(default_storage_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_FILE));

    let chat = ChatSettings {
        greeting: config
            .chat
            .greeting
            .clone()
            .unwrap_or_else(|| GREETING.to_string()),
        handoff_notice: config
            .chat
            .handoff_notice
            .clone()
            .unwrap_or_else(|| HANDOFF_NOTICE.to_string()),
        suggestion_limit: config
            .chat
            .initial_suggestions
            .unwrap_or(INITIAL_SUGGESTION_LIMIT),
        stale_replies: cli
            .stale_replies
            .or(config.chat.stale_replies)
            .unwrap_or_default(),
    };

    ResolvedConfig {
        base_url,
        request_timeout: config
            .server
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        storage_path,
        chat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = FaqChatConfig::default();
        assert!(config.server.base_url.is_none());
        assert!(config.chat.stale_replies.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = FaqChatConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.chat, ChatSettings::default());
        assert!(resolved.request_timeout.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = FaqChatConfig {
            server: ServerConfig {
                base_url: Some("http://help.internal:8080".to_string()),
                request_timeout_secs: Some(15),
            },
            chat: ChatConfig {
                greeting: Some("Hi there.".to_string()),
                handoff_notice: Some(" Call us.".to_string()),
                initial_suggestions: Some(3),
                stale_replies: Some(StaleReplies::Drop),
            },
            storage: StorageConfig {
                path: Some("/tmp/faqchat.json".to_string()),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(resolved.chat.greeting, "Hi there.");
        assert_eq!(resolved.chat.handoff_notice, " Call us.");
        assert_eq!(resolved.chat.suggestion_limit, 3);
        assert_eq!(resolved.chat.stale_replies, StaleReplies::Drop);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = FaqChatConfig {
            server: ServerConfig {
                base_url: Some("http://from-config".to_string()),
                ..Default::default()
            },
            chat: ChatConfig {
                stale_replies: Some(StaleReplies::Drop),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            base_url: Some("http://from-cli".to_string()),
            storage: Some(PathBuf::from("/tmp/cli.json")),
            stale_replies: Some(StaleReplies::Show),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.base_url, "http://from-cli");
        assert_eq!(resolved.storage_path, PathBuf::from("/tmp/cli.json"));
        assert_eq!(resolved.chat.stale_replies, StaleReplies::Show);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let config = FaqChatConfig {
            server: ServerConfig {
                request_timeout_secs: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(resolve(&config, &CliOverrides::default()).request_timeout.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[chat]
stale_replies = "drop"
"#;
        let config: FaqChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.stale_replies, Some(StaleReplies::Drop));
        assert!(config.chat.greeting.is_none());
        assert!(config.server.base_url.is_none());
    }

    #[test]
    fn test_missing_file_generates_commented_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faqchat").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.server.base_url.is_none());

        // The generated file is all comments, so it parses back to defaults
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.chat.initial_suggestions.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\nbase_url = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }
}
