use crate::table::Columns;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    pub table: Option<PathBuf>,
    #[serde(default)]
    pub key_column: Option<String>,
    #[serde(default)]
    pub value_column: Option<String>,
    #[serde(default)]
    pub expected_entries: Option<usize>,
    #[serde(skip)]
    pub table_source: Option<TableSource>,
}

/// Where the table path was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableSource {
    Env,
    Config,
    Cli,
}

pub const KEYS: [&str; 4] = ["table", "key_column", "value_column", "expected_entries"];

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&path).context("read config file")?;
        let mut cfg: Config = serde_yaml::from_str(&data).context("parse config yaml")?;
        if cfg.table.is_some() {
            cfg.table_source = Some(TableSource::Config);
        }
        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("create config dir")?;
        }
        let data = serde_yaml::to_string(&self).context("serialize config")?;
        let mut f = fs::File::create(&path).context("create config file")?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = f.metadata()?.permissions();
            perms.set_mode(0o600);
            f.set_permissions(perms)?;
        }
        f.write_all(data.as_bytes()).context("write config file")?;
        Ok(())
    }

    /// `GEOWAIT_CONFIG` if set, else `config.yaml` in the platform config dir.
    pub fn config_path() -> Result<PathBuf> {
        Self::config_path_with(process_env)
    }

    pub fn config_path_with(var: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
        if let Some(p) = var("GEOWAIT_CONFIG").filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(p));
        }
        let proj = ProjectDirs::from("", "", "geowait").context("resolve config dir")?;
        Ok(proj.config_dir().join("config.yaml"))
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(process_env)
    }

    /// Apply `GEOWAIT_*` overrides read through `var`.
    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty_env = |name: &str| var(name).filter(|v| !v.is_empty());
        if let Some(v) = non_empty_env("GEOWAIT_TABLE") {
            self.table = Some(PathBuf::from(v));
            self.table_source = Some(TableSource::Env);
        }
        if let Some(v) = non_empty_env("GEOWAIT_KEY_COLUMN") {
            self.key_column = Some(v);
        }
        if let Some(v) = non_empty_env("GEOWAIT_VALUE_COLUMN") {
            self.value_column = Some(v);
        }
    }

    pub fn apply_cli(&mut self, cli: &crate::cli::Cli) {
        if let Some(table) = cli.table.clone() {
            self.table = Some(table);
            self.table_source = Some(TableSource::Cli);
        }
        if let Some(key) = cli.key_column.clone() {
            self.key_column = Some(key);
        }
        if let Some(value) = cli.value_column.clone() {
            self.value_column = Some(value);
        }
    }

    pub fn columns(&self) -> Columns {
        let defaults = Columns::default();
        Columns {
            key: self.key_column.clone().unwrap_or(defaults.key),
            value: self.value_column.clone().unwrap_or(defaults.value),
        }
    }

    pub fn table_path(&self) -> Result<&Path> {
        self.table
            .as_deref()
            .context("no scale table configured; pass --table or set GEOWAIT_TABLE")
    }

    pub fn table_source_label(&self) -> &'static str {
        match self.table_source {
            Some(TableSource::Env) => "env",
            Some(TableSource::Config) => "config",
            Some(TableSource::Cli) => "cli",
            None => "none",
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "table" => self.table = Some(PathBuf::from(value)),
            "key_column" => self.key_column = Some(value.to_string()),
            "value_column" => self.value_column = Some(value.to_string()),
            "expected_entries" => {
                let n = value
                    .parse::<usize>()
                    .with_context(|| format!("expected_entries must be a count, got `{}`", value))?;
                self.expected_entries = Some(n);
            }
            _ => anyhow::bail!("unsupported key `{}`; expected one of {}", key, KEYS.join(", ")),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "table" => self.table.as_ref().map(|p| p.display().to_string()),
            "key_column" => Some(self.columns().key),
            "value_column" => Some(self.columns().value),
            "expected_entries" => self.expected_entries.map(|n| n.to_string()),
            _ => None,
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
