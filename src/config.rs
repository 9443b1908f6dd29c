use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;
use serde::de::Deserializer;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";
pub const APP_NAME: &str = "fetchlist";
pub const DEFAULT_SOURCE_URL: &str = "https://fetch-hiring.s3.amazonaws.com/hiring.json";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    /// File the configuration came from; `None` when running on defaults.
    pub config_path: Option<PathBuf>,
    pub source_url: String,
    pub log_level: String,
    pub keys: Keys,
    pub ui: UiConfig,
    /// Problems found while parsing that do not stop startup. Logged once
    /// the subscriber is up.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            keys: Keys::default(),
            ui: UiConfig::default(),
            warnings: Vec::new(),
        }
    }
}

// =============================================================================
// Key bindings
// =============================================================================

/// Key bindings for the browser. Each action accepts several keys.
#[derive(Debug, Clone)]
pub struct Keys {
    pub quit: Vec<String>,
    pub search: Vec<String>,
    pub cancel: Vec<String>,
    pub next: Vec<String>,
    pub prev: Vec<String>,
    pub group_next: Vec<String>,
    pub group_prev: Vec<String>,
    pub refresh: Vec<String>,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            quit: vec!["q".into()],
            search: vec!["/".into()],
            cancel: vec!["Esc".into()],
            next: vec!["Down".into(), "j".into()],
            prev: vec!["Up".into(), "k".into()],
            group_next: vec!["Tab".into(), "]".into()],
            group_prev: vec!["BackTab".into(), "[".into()],
            refresh: vec!["F5".into(), "r".into()],
        }
    }
}

fn normalize_binding(binding: &str) -> String {
    let trimmed = binding.trim();
    if trimmed.chars().count() == 1 {
        // Single character: preserve case (r != R)
        trimmed.to_string()
    } else {
        // Special key names: case-insensitive
        trimmed.to_ascii_lowercase()
    }
}

/// Check for collisions within a single context
fn check_context_collisions(bindings: &[(&str, &[String])], context_name: &str) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (action_name, keys) in bindings {
        for key in *keys {
            let normalized = normalize_binding(key);
            if normalized.is_empty() {
                continue;
            }
            if let Some(existing_action) = seen.get(&normalized) {
                bail!(
                    "key binding collision in {}: '{}' is bound to both '{}' and '{}'",
                    context_name,
                    key,
                    existing_action,
                    action_name
                );
            }
            seen.insert(normalized, action_name);
        }
    }

    Ok(())
}

/// While typing, only non-character keys reach the actions, so collisions
/// only matter in the result list.
fn validate_key_bindings(keys: &Keys) -> Result<()> {
    check_context_collisions(
        &[
            ("quit", &keys.quit),
            ("search", &keys.search),
            ("next", &keys.next),
            ("prev", &keys.prev),
            ("group_next", &keys.group_next),
            ("group_prev", &keys.group_prev),
            ("refresh", &keys.refresh),
        ],
        "[keys]",
    )?;
    check_context_collisions(
        &[("cancel", &keys.cancel), ("search", &keys.search)],
        "[keys] (search box)",
    )
}

// =============================================================================
// UI config
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub colors: UiColors,
}

#[derive(Debug, Clone)]
pub struct UiColors {
    pub border: RgbColor,
    pub selection_bg: RgbColor,
    pub selection_fg: RgbColor,
    pub status_fg: RgbColor,
    pub status_bg: RgbColor,
}

impl Default for UiColors {
    fn default() -> Self {
        UiColorsFile::default().into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl<'de> serde::Deserialize<'de> for RgbColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Array([u8; 3]),
            Map { r: u8, g: u8, b: u8 },
        }

        let helper = Helper::deserialize(deserializer)?;
        let (r, g, b) = match helper {
            Helper::Array(values) => (values[0], values[1], values[2]),
            Helper::Map { r, g, b } => (r, g, b),
        };
        Ok(RgbColor { r, g, b })
    }
}

// =============================================================================
// Config file structure
// =============================================================================

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    source: SourceFile,
    log: LogFile,
    keys: KeysFile,
    ui: UiFile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceFile {
    url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LogFile {
    level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum KeyBinding {
    Single(String),
    Multiple(Vec<String>),
}

impl KeyBinding {
    fn into_vec(self) -> Vec<String> {
        match self {
            KeyBinding::Single(s) => vec![s],
            KeyBinding::Multiple(v) => v,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct KeysFile {
    quit: Option<KeyBinding>,
    search: Option<KeyBinding>,
    cancel: Option<KeyBinding>,
    next: Option<KeyBinding>,
    prev: Option<KeyBinding>,
    group_next: Option<KeyBinding>,
    group_prev: Option<KeyBinding>,
    refresh: Option<KeyBinding>,
}

impl From<KeysFile> for Keys {
    fn from(file: KeysFile) -> Self {
        let defaults = Keys::default();
        let pick = |binding: Option<KeyBinding>, fallback: Vec<String>| {
            binding.map(KeyBinding::into_vec).unwrap_or(fallback)
        };
        Self {
            quit: pick(file.quit, defaults.quit),
            search: pick(file.search, defaults.search),
            cancel: pick(file.cancel, defaults.cancel),
            next: pick(file.next, defaults.next),
            prev: pick(file.prev, defaults.prev),
            group_next: pick(file.group_next, defaults.group_next),
            group_prev: pick(file.group_prev, defaults.group_prev),
            refresh: pick(file.refresh, defaults.refresh),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct UiFile {
    colors: UiColorsFile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct UiColorsFile {
    border: RgbColor,
    selection_bg: RgbColor,
    selection_fg: RgbColor,
    status_fg: RgbColor,
    status_bg: RgbColor,
}

impl Default for UiColorsFile {
    fn default() -> Self {
        Self {
            border: RgbColor::new(255, 165, 0),
            selection_bg: RgbColor::new(255, 165, 0),
            selection_fg: RgbColor::new(0, 0, 0),
            status_fg: RgbColor::new(255, 165, 0),
            status_bg: RgbColor::new(0, 0, 0),
        }
    }
}

impl From<UiColorsFile> for UiColors {
    fn from(file: UiColorsFile) -> Self {
        Self {
            border: file.border,
            selection_bg: file.selection_bg,
            selection_fg: file.selection_fg,
            status_fg: file.status_fg,
            status_bg: file.status_bg,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

fn config_root() -> Result<PathBuf> {
    let base = BaseDirs::new().context("unable to determine base directories")?;
    Ok(base.config_dir().join(APP_NAME))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_root()?.join(CONFIG_FILE_NAME))
}

/// Load configuration. An explicit path must exist; the default location may
/// be absent, in which case built-in defaults apply.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("configuration file not found at {}", path.display());
            }
            path.to_path_buf()
        }
        None => {
            let path = config_path()?;
            if !path.exists() {
                return Ok(Config::default());
            }
            path
        }
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read configuration file at {}", path.display()))?;

    let mut config =
        parse(&raw).with_context(|| format!("invalid configuration in {}", path.display()))?;
    config.config_path = Some(path);
    Ok(config)
}

pub fn parse(raw: &str) -> Result<Config> {
    let value: toml::Value = toml::from_str(raw).context("failed to parse as TOML")?;

    let warnings = unknown_keys(&value);

    let cfg_file: ConfigFile = value
        .try_into()
        .context("failed to deserialize configuration")?;

    let source_url = cfg_file
        .source
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_SOURCE_URL)
        .to_string();

    let log_level = cfg_file
        .log
        .level
        .as_deref()
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_ascii_lowercase();

    let keys: Keys = cfg_file.keys.into();
    validate_key_bindings(&keys)?;

    Ok(Config {
        config_path: None,
        source_url,
        log_level,
        keys,
        ui: UiConfig {
            colors: cfg_file.ui.colors.into(),
        },
        warnings,
    })
}

// =============================================================================
// Unknown key warnings
// =============================================================================

fn unknown_keys(value: &toml::Value) -> Vec<String> {
    let mut warnings = Vec::new();
    let Some(table) = value.as_table() else {
        return warnings;
    };

    collect_unknown(value, "", &["source", "log", "keys", "ui"], &mut warnings);

    if let Some(v) = table.get("source") {
        collect_unknown(v, "source.", &["url"], &mut warnings);
    }
    if let Some(v) = table.get("log") {
        collect_unknown(v, "log.", &["level"], &mut warnings);
    }
    if let Some(v) = table.get("keys") {
        collect_unknown(
            v,
            "keys.",
            &[
                "quit",
                "search",
                "cancel",
                "next",
                "prev",
                "group_next",
                "group_prev",
                "refresh",
            ],
            &mut warnings,
        );
    }
    if let Some(ui) = table.get("ui") {
        collect_unknown(ui, "ui.", &["colors"], &mut warnings);
        if let Some(colors) = ui.get("colors") {
            collect_unknown(
                colors,
                "ui.colors.",
                &[
                    "border",
                    "selection_bg",
                    "selection_fg",
                    "status_fg",
                    "status_bg",
                ],
                &mut warnings,
            );
        }
    }

    warnings
}

fn collect_unknown(value: &toml::Value, prefix: &str, known: &[&str], out: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        return;
    };
    let known_set: HashSet<&str> = known.iter().copied().collect();
    for key in table.keys() {
        if !known_set.contains(key.as_str()) {
            out.push(format!("unknown configuration key `{}{}`", prefix, key));
        }
    }
}
