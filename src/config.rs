use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "update-mangas";
const CONFIG_NAME: &str = "config";

pub const TOKEN_VAR: &str = "INTEGRATION_TOKEN";
pub const DATABASE_VAR: &str = "DATABASE_ID";
pub const API_URL_VAR: &str = "NOTION_API_URL";

const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
const DEFAULT_NOTION_VERSION: &str = "2021-08-16";
const DEFAULT_CATEGORY: &str = "Shonen Jump";

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub token: String,
    pub database_id: String,
    pub api_url: String,
    pub notion_version: String,
    /// Tag value selected by the bulk update.
    pub category: String,
    pub properties: PropertySchema,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            token: "".into(),
            database_id: "".into(),
            api_url: DEFAULT_API_URL.into(),
            notion_version: DEFAULT_NOTION_VERSION.into(),
            category: DEFAULT_CATEGORY.into(),
            properties: PropertySchema::default(),
        }
    }
}

impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("token", &redacted(&self.token))
            .field("database_id", &self.database_id)
            .field("api_url", &self.api_url)
            .field("notion_version", &self.notion_version)
            .field("category", &self.category)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Names of the database columns the tracker reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySchema {
    pub title: String,
    pub chapter: String,
    pub finished: String,
    pub category: String,
    pub category_kind: CategoryKind,
}

impl Default for PropertySchema {
    fn default() -> Self {
        Self {
            title: "Name".into(),
            chapter: "Last Chapter".into(),
            finished: "Finished".into(),
            category: "Category".into(),
            category_kind: CategoryKind::Select,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Select,
    MultiSelect,
}

pub(crate) fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Loads the config file, then layers `.env` and the process environment on top.
pub fn get_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let mut cfg = load_file(path)?;

    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "loaded .env");
    }

    apply_env(&mut cfg, |key| std::env::var(key).ok());
    cfg.database_id = normalize_database_id(&cfg.database_id)?;

    if cfg.token.is_empty() {
        tracing::warn!("{TOKEN_VAR} is not set, requests will be rejected");
    }
    if cfg.database_id.is_empty() {
        tracing::warn!("{DATABASE_VAR} is not set, requests will be rejected");
    }
    tracing::debug!(?cfg, "resolved config");

    Ok(cfg)
}

/// Reads the settings file when there is one. A missing file means defaults; nothing is written.
fn load_file(path: Option<&Path>) -> Result<TrackerConfig> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => match confy::get_configuration_file_path(APP_NAME, CONFIG_NAME) {
            Ok(path) => path,
            Err(err) => {
                tracing::debug!(%err, "no config directory, using defaults");
                return Ok(TrackerConfig::default());
            }
        },
    };

    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(TrackerConfig::default());
    }

    confy::load_path(&path).with_context(|| format!("load config from {}", path.display()))
}

fn apply_env(cfg: &mut TrackerConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup(TOKEN_VAR) {
        cfg.token = token;
    }
    if let Some(database_id) = lookup(DATABASE_VAR) {
        cfg.database_id = database_id;
    }
    if let Some(api_url) = lookup(API_URL_VAR) {
        cfg.api_url = api_url;
    }
}

/// Pulls the 32 hex digit id out of a pasted database URL. Anything else is kept as is.
pub fn normalize_database_id(raw: &str) -> Result<String> {
    let id_regex =
        Regex::new(r"(?i)([0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12})")?;
    let trimmed = raw.trim();
    let id = id_regex
        .captures(trimmed)
        .map(|c| c[1].replace('-', "").to_lowercase())
        .unwrap_or_else(|| trimmed.to_string());

    Ok(id)
}
