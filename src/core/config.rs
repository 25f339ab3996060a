//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypoint/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! With no `[[pages]]` in the file, the built-in site map is used.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::pattern::{PatternRule, Predicate};
use crate::core::reminder::{Period, WeeklySchedule};
use crate::core::resolver::{
    DEFAULT_CONFIRMATION_WINDOW, ExitPolicy, ExitPolicyKind, NavigationResolver, ResolverSettings,
};
use crate::core::sitemap::{ConfigurationError, NavigationMap, SiteNode};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypointConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pages: Vec<PageEntry>,
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
    #[serde(default)]
    pub reminder: Option<ReminderConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub root_path: Option<String>,
    pub root_aliases: Option<Vec<String>>,
    pub exit_policy: Option<ExitPolicyKind>,
    pub confirmation_window_ms: Option<u64>,
    pub exit_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageEntry {
    pub path: String,
    pub parent: Option<String>,
    pub terminal: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PatternEntry {
    pub contains: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub target: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReminderConfig {
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub period: Option<Period>,
    #[serde(default)]
    pub days: Vec<u32>,
    pub start_path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ROOT_PATH: &str = "/index.html";
pub const DEFAULT_EXIT_MESSAGE: &str = "Press back again to exit";
pub const DEFAULT_START_PATH: &str = "/wat-test.html";
const DEFAULT_ROOT_ALIASES: [&str; 2] = ["/", "/index.html"];

/// The app's own page tree, used when the config file lists no pages.
pub fn default_pages() -> Vec<PageEntry> {
    fn page(path: &str, parent: &str) -> PageEntry {
        PageEntry {
            path: path.to_string(),
            parent: Some(parent.to_string()),
            terminal: None,
        }
    }

    vec![
        PageEntry {
            path: "/index.html".to_string(),
            parent: None,
            terminal: Some(true),
        },
        page("/initials.html", "/index.html"),
        page("/initials/academic-tests.html", "/initials.html"),
        page(
            "/initials/academic-tests/test-engine.html",
            "/initials/academic-tests.html",
        ),
        page("/initials/psychological-tests.html", "/initials.html"),
        page("/wat-test.html", "/index.html"),
        page("/results.html", "/index.html"),
        page("/settings.html", "/index.html"),
        page("/settings/notifications.html", "/settings.html"),
    ]
}

/// Fallback rules for the built-in site map. Narrow rules first.
pub fn default_patterns() -> Vec<PatternEntry> {
    vec![
        PatternEntry {
            contains: Some("/academic-tests/test".to_string()),
            target: "/initials/academic-tests.html".to_string(),
            ..Default::default()
        },
        PatternEntry {
            contains: Some("/psychological-tests/test".to_string()),
            target: "/initials/psychological-tests.html".to_string(),
            ..Default::default()
        },
        PatternEntry {
            prefix: Some("/initials/".to_string()),
            target: "/initials.html".to_string(),
            ..Default::default()
        },
        PatternEntry {
            suffix: Some("-result.html".to_string()),
            target: "/results.html".to_string(),
            ..Default::default()
        },
    ]
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub root_path: String,
    pub root_aliases: Vec<String>,
    pub exit_policy: ExitPolicy,
    pub exit_message: String,
    pub pages: Vec<PageEntry>,
    pub patterns: Vec<PatternEntry>,
    pub reminder: Option<WeeklySchedule>,
    pub start_path: String,
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

/// Returns the path to `~/.waypoint/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypoint").join("config.toml"))
}

/// Load config from `~/.waypoint/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WaypointConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<WaypointConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(WaypointConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(WaypointConfig::default());
    }

    load_config_from(&path)
}

/// Load config from an explicit path. A missing file is an error here.
pub fn load_config_from(path: &Path) -> Result<WaypointConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: WaypointConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Waypoint Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# root_path = "/index.html"              # Where unknown pages go back to
# root_aliases = ["/", "/index.html"]    # Paths treated as the app root
# exit_policy = "confirm"                # "immediate" or "confirm"
# confirmation_window_ms = 2000          # Double-tap window for "confirm"
# exit_message = "Press back again to exit"

# Without any [[pages]], the built-in site map is used.
# Each page sets exactly one of `parent` or `terminal = true`.
# [[pages]]
# path = "/index.html"
# terminal = true
#
# [[pages]]
# path = "/initials.html"
# parent = "/index.html"

# Fallback rules for unlisted pages, checked top to bottom.
# Each rule sets exactly one of `contains`, `prefix`, `suffix`.
# [[patterns]]
# contains = "/academic-tests/test"
# target = "/initials/academic-tests.html"
#
# [[patterns]]
# prefix = "/initials/"
# target = "/initials.html"

# [reminder]
# hour = 8                               # 1-12
# minute = 30
# period = "AM"                          # "AM" or "PM"
# days = [1, 3, 5]                       # 0 = Sunday ... 6 = Saturday
# start_path = "/wat-test.html"          # Opened by the "Start Test" action
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
///
/// `cli_policy` is from the `--exit-policy` flag (None = not specified).
pub fn resolve(config: &WaypointConfig, cli_policy: Option<ExitPolicyKind>) -> ResolvedConfig {
    resolve_with(config, cli_policy, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with<F>(
    config: &WaypointConfig,
    cli_policy: Option<ExitPolicyKind>,
    env: F,
) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Exit policy: CLI → env → config → default
    let policy_kind = cli_policy
        .or_else(|| env("WAYPOINT_EXIT_POLICY").and_then(|v| parse_policy(&v)))
        .or(config.general.exit_policy)
        .unwrap_or_default();

    // Window: env → config → default
    let window = env("WAYPOINT_CONFIRM_WINDOW_MS")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or(config.general.confirmation_window_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_CONFIRMATION_WINDOW);

    // Root path: env → config → default
    let root_path = env("WAYPOINT_ROOT_PATH")
        .or_else(|| config.general.root_path.clone())
        .unwrap_or_else(|| DEFAULT_ROOT_PATH.to_string());

    let root_aliases = config
        .general
        .root_aliases
        .clone()
        .unwrap_or_else(|| DEFAULT_ROOT_ALIASES.iter().map(|s| s.to_string()).collect());

    // Built-in tree only when the file defines no pages of its own.
    let (pages, patterns) = if config.pages.is_empty() {
        let patterns = if config.patterns.is_empty() {
            default_patterns()
        } else {
            config.patterns.clone()
        };
        (default_pages(), patterns)
    } else {
        (config.pages.clone(), config.patterns.clone())
    };

    let start_path = config
        .reminder
        .as_ref()
        .and_then(|r| r.start_path.clone())
        .unwrap_or_else(|| DEFAULT_START_PATH.to_string());

    ResolvedConfig {
        root_path,
        root_aliases,
        exit_policy: policy_kind.with_window(window),
        exit_message: config
            .general
            .exit_message
            .clone()
            .unwrap_or_else(|| DEFAULT_EXIT_MESSAGE.to_string()),
        pages,
        patterns,
        reminder: config.reminder.as_ref().and_then(reminder_schedule),
        start_path,
    }
}

fn parse_policy(value: &str) -> Option<ExitPolicyKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "immediate" => Some(ExitPolicyKind::Immediate),
        "confirm" => Some(ExitPolicyKind::Confirm),
        other => {
            warn!("Ignoring unknown WAYPOINT_EXIT_POLICY value {other:?}");
            None
        }
    }
}

fn reminder_schedule(config: &ReminderConfig) -> Option<WeeklySchedule> {
    Some(WeeklySchedule {
        hour: config.hour?,
        minute: config.minute.unwrap_or(0),
        period: config.period.unwrap_or(Period::Am),
        days: config.days.clone(),
        last_updated: None,
    })
}

// ============================================================================
// Building
// ============================================================================

impl PageEntry {
    fn to_node(&self) -> Result<SiteNode, ConfigurationError> {
        match (&self.parent, self.terminal.unwrap_or(false)) {
            (Some(parent), false) => Ok(SiteNode::Parent(parent.clone())),
            (None, true) => Ok(SiteNode::Terminal),
            _ => Err(ConfigurationError::AmbiguousNode {
                path: self.path.clone(),
            }),
        }
    }
}

impl PatternEntry {
    fn to_rule(&self, index: usize) -> Result<PatternRule, ConfigurationError> {
        let predicate = match (&self.contains, &self.prefix, &self.suffix) {
            (Some(n), None, None) => Predicate::Contains(n.clone()),
            (None, Some(n), None) => Predicate::Prefix(n.clone()),
            (None, None, Some(n)) => Predicate::Suffix(n.clone()),
            _ => return Err(ConfigurationError::AmbiguousPattern { index }),
        };
        Ok(PatternRule {
            predicate,
            target: self.target.clone(),
        })
    }
}

/// Builds the site map from resolved page entries.
pub fn build_map(config: &ResolvedConfig) -> Result<NavigationMap, ConfigurationError> {
    let entries = config
        .pages
        .iter()
        .map(|page| page.to_node().map(|node| (page.path.clone(), node)))
        .collect::<Result<Vec<_>, _>>()?;
    NavigationMap::new(entries)
}

/// Builds a ready-to-use resolver, failing fast on any config defect.
pub fn build_resolver(config: &ResolvedConfig) -> Result<NavigationResolver, ConfigurationError> {
    let map = build_map(config)?;
    let rules = config
        .patterns
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.to_rule(index))
        .collect::<Result<Vec<_>, _>>()?;

    let settings = ResolverSettings {
        root_path: config.root_path.clone(),
        root_aliases: config.root_aliases.clone(),
        exit_policy: config.exit_policy,
    };

    let resolver = NavigationResolver::new(map, rules, settings)?;
    info!(
        "Navigation resolver built: {} pages, {} patterns",
        resolver.map().len(),
        resolver.rules().len()
    );
    Ok(resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::Action;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = WaypointConfig::default();
        assert!(config.pages.is_empty());
        assert!(config.general.root_path.is_none());
        assert!(config.reminder.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&WaypointConfig::default(), None, no_env);
        assert_eq!(resolved.root_path, DEFAULT_ROOT_PATH);
        assert_eq!(resolved.root_aliases, vec!["/", "/index.html"]);
        assert_eq!(resolved.exit_policy, ExitPolicy::Immediate);
        assert_eq!(resolved.exit_message, DEFAULT_EXIT_MESSAGE);
        assert_eq!(resolved.pages.len(), default_pages().len());
        assert_eq!(resolved.patterns.len(), default_patterns().len());
        assert_eq!(resolved.start_path, DEFAULT_START_PATH);
    }

    #[test]
    fn test_builtin_site_map_is_valid() {
        let resolved = resolve_with(&WaypointConfig::default(), None, no_env);
        let resolver = build_resolver(&resolved).unwrap();
        assert_eq!(
            resolver.resolve("/initials/academic-tests/test7/test7.html", 0),
            Action::NavigateTo("/initials/academic-tests.html".into())
        );
        assert_eq!(
            resolver.resolve("/initials/other/page.html", 0),
            Action::NavigateTo("/initials.html".into())
        );
        assert_eq!(resolver.resolve("/index.html", 0), Action::Exit);
    }

    #[test]
    fn test_env_overrides_config() {
        let config = WaypointConfig {
            general: GeneralConfig {
                exit_policy: Some(ExitPolicyKind::Immediate),
                confirmation_window_ms: Some(1000),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, None, |key| match key {
            "WAYPOINT_EXIT_POLICY" => Some("Confirm".to_string()),
            "WAYPOINT_CONFIRM_WINDOW_MS" => Some("3500".to_string()),
            _ => None,
        });
        assert_eq!(
            resolved.exit_policy,
            ExitPolicy::Confirm { window: Duration::from_millis(3500) }
        );
    }

    #[test]
    fn test_cli_policy_wins() {
        let resolved = resolve_with(&WaypointConfig::default(), Some(ExitPolicyKind::Confirm), |key| {
            (key == "WAYPOINT_EXIT_POLICY").then(|| "immediate".to_string())
        });
        assert_eq!(
            resolved.exit_policy,
            ExitPolicy::Confirm { window: DEFAULT_CONFIRMATION_WINDOW }
        );
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let config = WaypointConfig {
            general: GeneralConfig {
                exit_policy: Some(ExitPolicyKind::Confirm),
                confirmation_window_ms: Some(900),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, None, |key| match key {
            "WAYPOINT_EXIT_POLICY" => Some("sometimes".to_string()),
            "WAYPOINT_CONFIRM_WINDOW_MS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(
            resolved.exit_policy,
            ExitPolicy::Confirm { window: Duration::from_millis(900) }
        );
    }

    #[test]
    fn test_toml_site_map() {
        let toml_str = r#"
[general]
root_path = "/"
exit_policy = "confirm"
confirmation_window_ms = 1500

[[pages]]
path = "/"
terminal = true

[[pages]]
path = "/hub.html"
parent = "/"

[[patterns]]
contains = "/hub/"
target = "/hub.html"
"#;
        let config: WaypointConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.patterns[0].contains.as_deref(), Some("/hub/"));

        let resolved = resolve_with(&config, None, no_env);
        assert_eq!(resolved.patterns.len(), 1);
        let resolver = build_resolver(&resolved).unwrap();
        assert_eq!(resolver.resolve("/hub/leaf3.html", 0), Action::NavigateTo("/hub.html".into()));
        assert_eq!(resolver.resolve("/", 0), Action::RequestExitConfirmation);
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[general]
exit_message = "Tap again to leave"
"#;
        let config: WaypointConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.exit_message.as_deref(), Some("Tap again to leave"));
        assert!(config.general.exit_policy.is_none());
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn test_page_with_parent_and_terminal_rejected() {
        let config = WaypointConfig {
            pages: vec![PageEntry {
                path: "/".into(),
                parent: Some("/x.html".into()),
                terminal: Some(true),
            }],
            ..Default::default()
        };
        let resolved = resolve_with(&config, None, no_env);
        let err = build_resolver(&resolved).unwrap_err();
        assert_eq!(err, ConfigurationError::AmbiguousNode { path: "/".into() });
    }

    #[test]
    fn test_pattern_with_two_predicates_rejected() {
        let config = WaypointConfig {
            patterns: vec![PatternEntry {
                contains: Some("/a/".into()),
                prefix: Some("/a".into()),
                suffix: None,
                target: "/index.html".into(),
            }],
            ..Default::default()
        };
        let resolved = resolve_with(&config, None, no_env);
        let err = build_resolver(&resolved).unwrap_err();
        assert_eq!(err, ConfigurationError::AmbiguousPattern { index: 0 });
    }

    #[test]
    fn test_reminder_section() {
        let toml_str = r#"
[reminder]
hour = 7
period = "PM"
days = [0, 6]
start_path = "/daily.html"
"#;
        let config: WaypointConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with(&config, None, no_env);
        let schedule = resolved.reminder.unwrap();
        assert_eq!(schedule.hour, 7);
        assert_eq!(schedule.minute, 0);
        assert_eq!(schedule.period, Period::Pm);
        assert_eq!(schedule.days, vec![0, 6]);
        assert_eq!(resolved.start_path, "/daily.html");
    }

    #[test]
    fn test_load_config_from_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("waypoint-does-not-exist/config.toml");
        assert!(matches!(load_config_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let dir = std::env::temp_dir().join(format!("waypoint-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        generate_default_config(&path);
        let config = load_config_from(&path).unwrap();
        assert!(config.pages.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }
}
