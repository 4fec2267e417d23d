use crate::error::{FilmPulseError, Result};
use crate::types::config::FilmPulseConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "filmpulse.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".filmpulse/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/filmpulse/config.toml";
pub const DEFAULT_STORE_FILE: &str = ".filmpulse/scores.db";

/// Global, project and local files merged in that order. Any of them may be
/// missing; with none present the built-in defaults apply.
pub fn load_config(root: &Path) -> Result<FilmPulseConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<FilmPulseConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: FilmPulseConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| FilmPulseError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Store location: explicit override, then `[store] path` relative to the
/// config root, then the default file under the root.
pub fn resolve_store_path(root: &Path, cfg: &FilmPulseConfig, over: Option<&Path>) -> PathBuf {
    if let Some(path) = over {
        return path.to_path_buf();
    }
    match cfg.store_path() {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => root.join(path),
        None => root.join(DEFAULT_STORE_FILE),
    }
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    debug!(path = %path.display(), "merging config file");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| FilmPulseError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
