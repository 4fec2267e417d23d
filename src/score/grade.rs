use crate::types::scoring::Grade;
use serde::Serialize;

pub const GRADE_A_MIN: u8 = 80;
pub const GRADE_B_MIN: u8 = 65;
pub const GRADE_C_MIN: u8 = 50;

pub fn grade_for(score: u8) -> Grade {
    match score {
        s if s >= GRADE_A_MIN => Grade::A,
        s if s >= GRADE_B_MIN => Grade::B,
        s if s >= GRADE_C_MIN => Grade::C,
        _ => Grade::D,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseRecommendation {
    pub window: String,
    pub platform_strategy: &'static str,
    pub rationale: &'static str,
}

/// Release strategy by score band. `release_month` names the window for
/// top-band films when the film has a planned date.
pub fn release_recommendation(score: u8, release_month: Option<u32>) -> ReleaseRecommendation {
    if score >= GRADE_A_MIN {
        ReleaseRecommendation {
            window: release_month
                .map(release_window_label)
                .unwrap_or_else(|| "Diwali / Summer Blockbuster".to_string()),
            platform_strategy: "Simultaneous theatrical + OTT",
            rationale: "High discoverability and budget suit premium release slots.",
        }
    } else if score >= GRADE_B_MIN {
        ReleaseRecommendation {
            window: "Long weekend / Holiday release".to_string(),
            platform_strategy: "OTT premiere + limited theatrical",
            rationale: "Mid-tier metrics suit a strategic OTT-first run with selective cinemas.",
        }
    } else {
        ReleaseRecommendation {
            window: "Mid-week OTT drop".to_string(),
            platform_strategy: "OTT exclusive",
            rationale: "Smaller reach is best served by a direct-to-OTT strategy.",
        }
    }
}

pub fn release_window_label(month: u32) -> String {
    match month {
        1 => "Republic Day Weekend".to_string(),
        2 => "Valentine's Day Window".to_string(),
        3 => "Holi Release".to_string(),
        6 => "Eid Window".to_string(),
        10 => "Navratri / Durga Puja".to_string(),
        11 => "Diwali (Peak Window)".to_string(),
        12 => "Christmas / New Year".to_string(),
        other => format!("Month {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_higher_grade() {
        assert_eq!(grade_for(80), Grade::A);
        assert_eq!(grade_for(79), Grade::B);
        assert_eq!(grade_for(65), Grade::B);
        assert_eq!(grade_for(64), Grade::C);
        assert_eq!(grade_for(50), Grade::C);
        assert_eq!(grade_for(49), Grade::D);
    }

    #[test]
    fn extremes() {
        assert_eq!(grade_for(100), Grade::A);
        assert_eq!(grade_for(0), Grade::D);
    }

    #[test]
    fn top_band_recommendation_names_the_release_window() {
        let rec = release_recommendation(85, Some(11));
        assert_eq!(rec.window, "Diwali (Peak Window)");
        assert_eq!(rec.platform_strategy, "Simultaneous theatrical + OTT");
    }

    #[test]
    fn low_band_recommends_ott_exclusive() {
        let rec = release_recommendation(40, Some(11));
        assert_eq!(rec.platform_strategy, "OTT exclusive");
    }

    #[test]
    fn unnamed_months_get_a_generic_label() {
        assert_eq!(release_window_label(4), "Month 4");
    }
}
