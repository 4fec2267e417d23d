use crate::error::FilmPulseError;
use crate::types::film::{Genre, Language, Platform};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilmPulseConfig {
    pub store: Option<StoreConfig>,
    pub signals: Option<SignalsConfig>,
    pub policy: Option<PolicyConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: Option<StoreBackend>,
    pub path: Option<PathBuf>,
}

/// Signal values used when a CLI run does not pass them explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalsConfig {
    pub hype_score: Option<f64>,
    pub genre_affinity: Option<f64>,
    pub market_crowding: Option<f64>,
    pub release_fit: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    pub language_reach: Option<BTreeMap<Language, f64>>,
    pub genre_affinity: Option<BTreeMap<Genre, f64>>,
    pub platform_affinity: Option<BTreeMap<Platform, f64>>,
    pub genre_budget: Option<BTreeMap<Genre, BudgetBenchmark>>,
    pub release_timing: Option<Vec<f64>>,
    pub monthly_crowding: Option<Vec<f64>>,
    pub defaults: Option<PolicyDefaultsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyDefaultsConfig {
    pub neutral_buzz: Option<f64>,
    pub release_timing: Option<f64>,
    pub crowding: Option<f64>,
    pub genre_affinity: Option<f64>,
    pub language_reach: Option<f64>,
}

/// Budget quartiles (currency units) for a genre.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BudgetBenchmark {
    pub p25: f64,
    pub p75: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyDefaults {
    pub neutral_buzz: f64,
    pub release_timing: f64,
    pub crowding: f64,
    pub genre_affinity: f64,
    pub language_reach: f64,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            neutral_buzz: 0.5,
            release_timing: 0.65,
            crowding: 0.6,
            genre_affinity: 0.65,
            language_reach: 0.70,
        }
    }
}

/// Coefficient tables consumed by the input normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    pub language_reach: BTreeMap<Language, f64>,
    pub genre_affinity: BTreeMap<Genre, f64>,
    pub platform_affinity: BTreeMap<Platform, f64>,
    /// Indexed by `Genre::index`.
    pub genre_budget: [BudgetBenchmark; 6],
    /// Indexed by month - 1.
    pub release_timing: [f64; 12],
    /// Indexed by month - 1.
    pub monthly_crowding: [f64; 12],
    pub defaults: PolicyDefaults,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        let language_reach = BTreeMap::from([
            (Language::Hindi, 0.88),
            (Language::English, 0.72),
            (Language::Tamil, 0.65),
            (Language::Telugu, 0.67),
            (Language::Bengali, 0.55),
            (Language::Marathi, 0.50),
        ]);
        // Same order as Genre::ALL
        let genre_budget = [
            BudgetBenchmark { p25: 3e7, p75: 1.5e8 },
            BudgetBenchmark { p25: 1e7, p75: 6e7 },
            BudgetBenchmark { p25: 1.5e7, p75: 8e7 },
            BudgetBenchmark { p25: 1e7, p75: 5e7 },
            BudgetBenchmark { p25: 8e6, p75: 4e7 },
            BudgetBenchmark { p25: 5e6, p75: 3e7 },
        ];
        Self {
            language_reach,
            genre_affinity: BTreeMap::new(),
            platform_affinity: BTreeMap::new(),
            genre_budget,
            // Republic Day, Valentine's, Holi, IPL, summer, Eid, post-Eid,
            // monsoon, Sep, Navratri, Diwali, Christmas
            release_timing: [
                0.80, 0.65, 0.70, 0.60, 0.55, 0.65, 0.70, 0.58, 0.62, 0.85, 0.88, 0.82,
            ],
            monthly_crowding: [
                0.70, 0.60, 0.65, 0.50, 0.55, 0.72, 0.68, 0.60, 0.65, 0.55, 0.45, 0.50,
            ],
            defaults: PolicyDefaults::default(),
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), FilmPulseError> {
        for (name, table) in [
            ("language_reach", fractions(&self.language_reach)),
            ("genre_affinity", fractions(&self.genre_affinity)),
            ("platform_affinity", fractions(&self.platform_affinity)),
            ("release_timing", self.release_timing.to_vec()),
            ("monthly_crowding", self.monthly_crowding.to_vec()),
        ] {
            ensure_fractions(&format!("policy.{name}"), &table)?;
        }

        let defaults = &self.defaults;
        ensure_fractions(
            "policy.defaults",
            &[
                defaults.neutral_buzz,
                defaults.release_timing,
                defaults.crowding,
                defaults.genre_affinity,
                defaults.language_reach,
            ],
        )?;

        for genre in Genre::ALL {
            ensure_benchmark(
                &format!("policy.genre_budget.{genre:?}"),
                &self.budget_benchmark(genre),
            )?;
        }
        Ok(())
    }

    pub fn budget_benchmark(&self, genre: Genre) -> BudgetBenchmark {
        self.genre_budget[genre.index()]
    }
}

fn fractions<K>(table: &BTreeMap<K, f64>) -> Vec<f64> {
    table.values().copied().collect()
}

fn ensure_fractions(name: &str, values: &[f64]) -> Result<(), FilmPulseError> {
    if values.iter().any(|value| !(0.0..=1.0).contains(value)) {
        return Err(FilmPulseError::ConfigParse(format!(
            "{name} values must be between 0.0 and 1.0"
        )));
    }
    Ok(())
}

fn ensure_benchmark(name: &str, benchmark: &BudgetBenchmark) -> Result<(), FilmPulseError> {
    if !(benchmark.p25 > 0.0 && benchmark.p75 > benchmark.p25) {
        return Err(FilmPulseError::ConfigParse(format!(
            "{name} requires 0 < p25 < p75 (found p25={}, p75={})",
            benchmark.p25, benchmark.p75
        )));
    }
    Ok(())
}

fn month_table(name: &str, values: &[f64]) -> Result<[f64; 12], FilmPulseError> {
    values.try_into().map_err(|_| {
        FilmPulseError::ConfigParse(format!(
            "{name} must list exactly 12 monthly values (found {})",
            values.len()
        ))
    })
}

impl FilmPulseConfig {
    pub fn store_backend(&self) -> StoreBackend {
        self.store
            .as_ref()
            .and_then(|store| store.backend)
            .unwrap_or(StoreBackend::Sqlite)
    }

    pub fn store_path(&self) -> Option<&PathBuf> {
        self.store.as_ref().and_then(|store| store.path.as_ref())
    }

    pub fn signal_defaults(&self) -> SignalsConfig {
        self.signals.clone().unwrap_or_default()
    }

    /// Built-in policy with every configured table or value laid over it.
    pub fn scoring_policy(&self) -> Result<ScoringPolicy, FilmPulseError> {
        let mut policy = ScoringPolicy::default();
        let Some(overrides) = &self.policy else {
            return Ok(policy);
        };

        if let Some(table) = &overrides.language_reach {
            policy.language_reach.extend(table.iter().map(|(k, v)| (*k, *v)));
        }
        if let Some(table) = &overrides.genre_affinity {
            policy.genre_affinity.extend(table.iter().map(|(k, v)| (*k, *v)));
        }
        if let Some(table) = &overrides.platform_affinity {
            policy
                .platform_affinity
                .extend(table.iter().map(|(k, v)| (*k, *v)));
        }
        if let Some(table) = &overrides.genre_budget {
            for (genre, benchmark) in table {
                policy.genre_budget[genre.index()] = *benchmark;
            }
        }
        if let Some(values) = &overrides.release_timing {
            policy.release_timing = month_table("policy.release_timing", values)?;
        }
        if let Some(values) = &overrides.monthly_crowding {
            policy.monthly_crowding = month_table("policy.monthly_crowding", values)?;
        }
        if let Some(defaults) = &overrides.defaults {
            let base = policy.defaults;
            policy.defaults = PolicyDefaults {
                neutral_buzz: defaults.neutral_buzz.unwrap_or(base.neutral_buzz),
                release_timing: defaults.release_timing.unwrap_or(base.release_timing),
                crowding: defaults.crowding.unwrap_or(base.crowding),
                genre_affinity: defaults.genre_affinity.unwrap_or(base.genre_affinity),
                language_reach: defaults.language_reach.unwrap_or(base.language_reach),
            };
        }
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), FilmPulseError> {
        self.scoring_policy()?.validate()?;

        if let Some(signals) = &self.signals {
            if let Some(hype) = signals.hype_score {
                if !(0.0..=100.0).contains(&hype) {
                    return Err(FilmPulseError::ConfigParse(
                        "signals.hype_score must be between 0 and 100".to_string(),
                    ));
                }
            }
            let fractions = [
                signals.genre_affinity,
                signals.market_crowding,
                signals.release_fit,
            ];
            ensure_fractions("signals", &fractions.into_iter().flatten().collect::<Vec<_>>())?;
        }

        if let Some(path) = self.store_path() {
            if path.as_os_str().is_empty() {
                return Err(FilmPulseError::ConfigParse(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> FilmPulseConfig {
        toml::from_str(raw).expect("config should parse")
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(ScoringPolicy::default().validate().is_ok());
    }

    #[test]
    fn every_genre_has_its_own_budget_benchmark() {
        let policy = ScoringPolicy::default();
        assert_eq!(
            policy.budget_benchmark(Genre::Action),
            BudgetBenchmark { p25: 3e7, p75: 1.5e8 }
        );
        assert_eq!(
            policy.budget_benchmark(Genre::Drama),
            BudgetBenchmark { p25: 8e6, p75: 4e7 }
        );
        assert_eq!(
            policy.budget_benchmark(Genre::Horror),
            BudgetBenchmark { p25: 5e6, p75: 3e7 }
        );
    }

    #[test]
    fn empty_config_resolves_to_default_policy() {
        let cfg = parse("");
        assert_eq!(cfg.store_backend(), StoreBackend::Sqlite);
        assert_eq!(
            cfg.scoring_policy().expect("policy should resolve"),
            ScoringPolicy::default()
        );
    }

    #[test]
    fn policy_tables_override_per_key() {
        let cfg = parse(
            r#"
[policy.language_reach]
Tamil = 0.90

[policy.genre_budget.Horror]
p25 = 1e6
p75 = 2e7

[policy.defaults]
neutral_buzz = 0.4
"#,
        );
        let policy = cfg.scoring_policy().expect("policy should resolve");
        assert_eq!(policy.language_reach[&Language::Tamil], 0.90);
        assert_eq!(policy.language_reach[&Language::Hindi], 0.88);
        assert_eq!(policy.budget_benchmark(Genre::Horror).p25, 1e6);
        assert_eq!(policy.defaults.neutral_buzz, 0.4);
        assert_eq!(policy.defaults.release_timing, 0.65);
    }

    #[test]
    fn validate_rejects_short_month_tables() {
        let cfg = parse(
            r#"
[policy]
release_timing = [0.5, 0.5, 0.5]
"#,
        );
        let err = cfg.validate().expect_err("short table should be rejected");
        assert!(err.to_string().contains("exactly 12"));
    }

    #[test]
    fn validate_rejects_out_of_range_fractions() {
        let cfg = parse(
            r#"
[policy.platform_affinity]
OTT = 1.4
"#,
        );
        assert!(matches!(cfg.validate(), Err(FilmPulseError::ConfigParse(_))));
    }

    #[test]
    fn validate_rejects_inverted_budget_benchmark() {
        let cfg = parse(
            r#"
[policy.genre_budget.Drama]
p25 = 5e7
p75 = 1e7
"#,
        );
        let err = cfg.validate().expect_err("inverted benchmark should be rejected");
        assert!(err.to_string().contains("p25 < p75"));
    }

    #[test]
    fn validate_rejects_hype_outside_percent_range() {
        let cfg = parse(
            r#"
[signals]
hype_score = 140.0
"#,
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn store_backend_parses_lowercase() {
        let cfg = parse(
            r#"
[store]
backend = "memory"
"#,
        );
        assert_eq!(cfg.store_backend(), StoreBackend::Memory);
    }
}
