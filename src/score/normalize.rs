use crate::error::Result;
use crate::signals::MarketSignals;
use crate::types::config::ScoringPolicy;
use crate::types::film::Film;
use crate::types::scoring::{DiscoverabilityBreakdown, SubScore};

const GENRE_SHARE: f64 = 0.40;
const LANGUAGE_SHARE: f64 = 0.35;
const CAST_SHARE: f64 = 0.25;

pub fn normalize(
    film: &Film,
    signals: &MarketSignals,
    policy: &ScoringPolicy,
) -> Result<DiscoverabilityBreakdown> {
    film.validate()?;
    signals.validate()?;

    Ok(DiscoverabilityBreakdown {
        audience_match: audience_match(film, signals, policy),
        buzz_score: buzz_score(signals, policy),
        competition_index: competition_index(film, signals, policy),
        budget_efficiency: budget_efficiency(film, policy),
        release_timing: release_timing(film, signals, policy),
    })
}

pub fn audience_match(film: &Film, signals: &MarketSignals, policy: &ScoringPolicy) -> SubScore {
    let genre_fit = signals
        .genre_affinity
        .or_else(|| policy.genre_affinity.get(&film.genre).copied())
        .unwrap_or(policy.defaults.genre_affinity);
    let language_reach = policy
        .language_reach
        .get(&film.language)
        .copied()
        .unwrap_or(policy.defaults.language_reach);
    let cast = ((film.cast_popularity - 1.0) / 9.0).clamp(0.0, 1.0);
    let platform = policy
        .platform_affinity
        .get(&film.platform)
        .copied()
        .unwrap_or(1.0);

    let score = GENRE_SHARE * genre_fit + LANGUAGE_SHARE * language_reach + CAST_SHARE * cast;
    (score * platform).clamp(0.0, 1.0)
}

pub fn buzz_score(signals: &MarketSignals, policy: &ScoringPolicy) -> SubScore {
    match signals.hype_score {
        Some(hype) => (hype / 100.0).clamp(0.0, 1.0),
        None => policy.defaults.neutral_buzz,
    }
}

/// Higher means a less crowded release slot.
pub fn competition_index(film: &Film, signals: &MarketSignals, policy: &ScoringPolicy) -> SubScore {
    let crowding = signals
        .market_crowding
        .or_else(|| {
            film.release_month()
                .map(|month| policy.monthly_crowding[month as usize - 1])
        })
        .unwrap_or(policy.defaults.crowding);
    (1.0 - crowding).clamp(0.0, 1.0)
}

/// Piecewise against the genre's budget quartiles: scaled down under p25,
/// linear through the p25..p75 band, logarithmic above p75.
pub fn budget_efficiency(film: &Film, policy: &ScoringPolicy) -> SubScore {
    let benchmark = policy.budget_benchmark(film.genre);
    let (p25, p75) = (benchmark.p25, benchmark.p75);
    let budget = film.budget;

    let score = if budget < p25 {
        (0.3 * budget / p25).max(0.1)
    } else if budget <= p75 {
        0.5 + 0.45 * (budget - p25) / (p75 - p25)
    } else {
        0.95 + 0.05 * ((budget - p75) / p75).ln_1p()
    };
    score.clamp(0.0, 1.0)
}

pub fn release_timing(film: &Film, signals: &MarketSignals, policy: &ScoringPolicy) -> SubScore {
    signals
        .release_fit
        .or_else(|| {
            film.release_month()
                .map(|month| policy.release_timing[month as usize - 1])
        })
        .unwrap_or(policy.defaults.release_timing)
}
