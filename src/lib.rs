//! Discoverability scoring for registered films: input normalization, a fixed
//! weighted composite, letter grades and a per-film score store.

pub mod batch;
pub mod config;
pub mod error;
pub mod manifest;
pub mod report;
pub mod score;
pub mod signals;
pub mod store;
pub mod types;

pub use error::{FilmPulseError, Result};
pub use score::{compute_discoverability, Engine};
pub use signals::{MarketSignals, SignalProvider};
pub use store::{ScoreRecord, ScoreStore};
pub use types::film::{Film, FilmId, Genre, Language, Platform};
pub use types::scoring::{DiscoverabilityBreakdown, DiscoverabilityResult, Grade};
