//! Process configuration.
//!
//! Built-in defaults, then `opendict.toml` in the working directory, then
//! `OPENDICT_*` variables (`__` separates sections, e.g. `OPENDICT_API__KEY`),
//! then the bare `PORT` and `DEBUG` variables. `FLASK_DEBUG` is read when
//! `DEBUG` is unset.
use std::env;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use opendict::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::utilities::str_to_bool;

const CONFIG_FILE: &str = "opendict.toml";
const API_KEY_VAR: &str = "OPENDICT_API__KEY";
const DEBUG_VARS: [&str; 2] = ["DEBUG", "FLASK_DEBUG"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub debug: bool,
    pub database_path: PathBuf,
    pub api: ApiConfig,
    pub lookup: LookupConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            debug: false,
            database_path: PathBuf::from("korean_dict.db"),
            api: ApiConfig::default(),
            lookup: LookupConfig::default(),
        }
    }
}

/// Result counts requested from the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub word_limit: usize,
    pub plain_limit: usize,
    pub proverb_limit: usize,
    /// Hits of a plain search that get their details fetched and grouped.
    pub max_grouped_items: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            word_limit: 20,
            plain_limit: 10,
            proverb_limit: 20,
            max_grouped_items: 5,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let mut config: Self = Self::figment().extract()?;
        if let Some(debug) = DEBUG_VARS.iter().find_map(|name| env::var(name).ok()) {
            config.debug = str_to_bool(debug).unwrap_or(false);
        }
        Ok(config)
    }

    fn figment() -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("OPENDICT_").split("__"))
            .merge(Env::raw().only(&["PORT"]));
        // Env values are parsed, so a digits-only key would turn into an integer.
        match env::var(API_KEY_VAR) {
            Ok(key) => figment.merge(Serialized::default("api.key", key)),
            Err(_) => figment,
        }
    }
}
