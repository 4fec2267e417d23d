use crate::error::{FilmPulseError, Result};
use crate::types::config::SignalsConfig;
use crate::types::film::{Film, FilmId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Externally sourced metrics consumed by the input normalizer. Every field
/// is optional; the normalizer falls back to policy for anything missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketSignals {
    /// Sentiment-derived hype, 0-100.
    #[serde(default)]
    pub hype_score: Option<f64>,
    /// Audience-model genre fit, 0-1.
    #[serde(default)]
    pub genre_affinity: Option<f64>,
    /// Saturation of the release slot, 0-1 (1 = fully crowded).
    #[serde(default)]
    pub market_crowding: Option<f64>,
    /// Externally computed release window fit, 0-1.
    #[serde(default)]
    pub release_fit: Option<f64>,
}

impl MarketSignals {
    pub fn validate(&self) -> Result<()> {
        if let Some(hype) = self.hype_score {
            if !(0.0..=100.0).contains(&hype) {
                return Err(FilmPulseError::InvalidInput(format!(
                    "hype_score must be between 0 and 100 (found {hype})"
                )));
            }
        }
        for (name, value) in [
            ("genre_affinity", self.genre_affinity),
            ("market_crowding", self.market_crowding),
            ("release_fit", self.release_fit),
        ] {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(FilmPulseError::InvalidInput(format!(
                        "{name} must be between 0.0 and 1.0 (found {value})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Fields set on `self` win; unset fields are taken from `fallback`.
    pub fn or(self, fallback: MarketSignals) -> Self {
        Self {
            hype_score: self.hype_score.or(fallback.hype_score),
            genre_affinity: self.genre_affinity.or(fallback.genre_affinity),
            market_crowding: self.market_crowding.or(fallback.market_crowding),
            release_fit: self.release_fit.or(fallback.release_fit),
        }
    }
}

impl From<SignalsConfig> for MarketSignals {
    fn from(cfg: SignalsConfig) -> Self {
        Self {
            hype_score: cfg.hype_score,
            genre_affinity: cfg.genre_affinity,
            market_crowding: cfg.market_crowding,
            release_fit: cfg.release_fit,
        }
    }
}

/// Source of upstream signals (sentiment engine, audience model, market
/// data). A failure here fails the whole analysis.
pub trait SignalProvider: Send + Sync {
    fn signals(&self, film: &Film) -> Result<MarketSignals>;
}

/// Returns the same signals for every film.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSignals(pub MarketSignals);

impl SignalProvider for StaticSignals {
    fn signals(&self, _film: &Film) -> Result<MarketSignals> {
        Ok(self.0)
    }
}

/// Signals keyed by film, with a shared fallback for films that have none
/// or only some fields set.
#[derive(Debug, Clone, Default)]
pub struct FilmSignals {
    by_film: BTreeMap<FilmId, MarketSignals>,
    fallback: MarketSignals,
}

impl FilmSignals {
    pub fn new(fallback: MarketSignals) -> Self {
        Self {
            by_film: BTreeMap::new(),
            fallback,
        }
    }

    pub fn insert(&mut self, id: FilmId, signals: MarketSignals) {
        self.by_film.insert(id, signals);
    }
}

impl SignalProvider for FilmSignals {
    fn signals(&self, film: &Film) -> Result<MarketSignals> {
        Ok(self
            .by_film
            .get(&film.id)
            .copied()
            .unwrap_or_default()
            .or(self.fallback))
    }
}
