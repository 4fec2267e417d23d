use crate::error::{FilmPulseError, Result};
use crate::signals::MarketSignals;
use crate::types::film::{Film, FilmId, Genre, Language, Platform};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Film description as written by a producer. `id` is assigned on first
/// registration when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilmManifest {
    pub id: Option<FilmId>,
    pub title: String,
    pub genre: Genre,
    pub language: Language,
    pub budget: f64,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    pub platform: Platform,
    #[serde(default = "default_cast_popularity")]
    pub cast_popularity: f64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub production_house: Option<String>,
    #[serde(default)]
    pub signals: Option<MarketSignals>,
}

fn default_cast_popularity() -> f64 {
    7.0
}

impl FilmManifest {
    /// Splits the manifest into a registered film and its own signals.
    pub fn register(self) -> (Film, MarketSignals) {
        let film = Film {
            id: self.id.unwrap_or_else(FilmId::generate),
            title: self.title,
            genre: self.genre,
            language: self.language,
            budget: self.budget,
            release_date: self.release_date,
            platform: self.platform,
            cast_popularity: self.cast_popularity,
            owner_id: self.owner_id,
            director: self.director,
            production_house: self.production_house,
        };
        (film, self.signals.unwrap_or_default())
    }
}

pub fn is_manifest_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("json") | Some("toml")
    )
}

pub fn load_manifest(path: &Path) -> Result<FilmManifest> {
    if !path.exists() {
        return Err(FilmPulseError::PathNotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw)
            .map_err(|e| FilmPulseError::InvalidInput(format!("{}: {}", path.display(), e))),
        Some("toml") => toml::from_str(&raw)
            .map_err(|e| FilmPulseError::InvalidInput(format!("{}: {}", path.display(), e))),
        _ => Err(FilmPulseError::InvalidInput(format!(
            "unsupported manifest type (expected .json or .toml): {}",
            path.display()
        ))),
    }
}
