//! Qualitative sub-scores: tag quality, investment risk, pros/cons and comparisons

use serde::{Deserialize, Serialize};

use crate::property::ConstructionPhase;

/// Tags that raise the quality score
pub const POSITIVE_TAGS: [&str; 9] = [
    "favorite",
    "near transit",
    "good lighting",
    "security",
    "view",
    "balcony",
    "full amenities",
    "new",
    "well kept",
];

/// Tags that lower the quality score
pub const NEGATIVE_TAGS: [&str; 6] = [
    "noise",
    "delivery delay risk",
    "lacking services",
    "old",
    "needs renovation",
    "poorly kept",
];

/// Tags surfaced as pros / cons in the housing summary
const PRO_TAGS: [&str; 5] = ["near transit", "good lighting", "security", "view", "balcony"];
const CON_TAGS: [&str; 3] = ["noise", "delivery delay risk", "lacking services"];

/// Subjective quality in [0, 1].
///
/// Starts neutral at 0.5 and moves 0.1 per matching positive or negative tag.
pub fn quality_score<S: AsRef<str>>(tags: &[S]) -> f64 {
    let mut score: f64 = 0.5;

    for tag in tags {
        let tag = tag.as_ref().to_lowercase();
        if POSITIVE_TAGS.iter().any(|pt| tag.contains(pt)) {
            score += 0.1;
        }
        if NEGATIVE_TAGS.iter().any(|nt| tag.contains(nt)) {
            score -= 0.1;
        }
    }

    score.clamp(0.0, 1.0)
}

/// Coarse investment risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Risk sub-score for the investment score (1 = safest)
    pub fn score(&self) -> f64 {
        match self {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 0.5,
            RiskLevel::High => 0.0,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        f.write_str(label)
    }
}

/// Facts used to bucket investment risk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskInputs {
    /// Only set for off-plan properties
    pub construction_phase: Option<ConstructionPhase>,
    /// Developer rating on a 0-10 scale
    pub developer_rating: Option<f64>,
    /// Net cap rate in percent
    pub net_cap_rate: f64,
    pub vacancy_rate_percent: f64,
}

/// Sum risk points and bucket them: 5+ high, 3-4 medium, otherwise low
pub fn assess_investment_risk(inputs: &RiskInputs) -> RiskLevel {
    let mut points = 0;

    points += match inputs.construction_phase {
        Some(ConstructionPhase::Launch) | Some(ConstructionPhase::Foundation) => 2,
        Some(ConstructionPhase::Structure) => 1,
        _ => 0,
    };

    if let Some(rating) = inputs.developer_rating {
        if rating < 5.0 {
            points += 2;
        } else if rating < 7.0 {
            points += 1;
        }
    }

    if inputs.net_cap_rate < 4.0 {
        points += 2;
    } else if inputs.net_cap_rate < 6.0 {
        points += 1;
    }

    if inputs.vacancy_rate_percent > 10.0 {
        points += 2;
    } else if inputs.vacancy_rate_percent > 5.0 {
        points += 1;
    }

    match points {
        p if p >= 5 => RiskLevel::High,
        p if p >= 3 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// What the housing summary knows about one property
#[derive(Debug, Clone, PartialEq)]
pub struct HousingProfile<'a> {
    pub price_per_sqm: f64,
    pub median_price_per_sqm: f64,
    pub condo_fee: f64,
    pub median_condo_fee: f64,
    /// Percent; `None` when the income is unknown
    pub payment_to_income_ratio: Option<f64>,
    /// `None` when no budget is set
    pub total_cost_vs_budget: Option<f64>,
    pub tags: &'a [String],
}

/// Human-readable strengths and weaknesses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProsAndCons {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Derive pros and cons from market medians, affordability and tags
pub fn housing_pros_and_cons(profile: &HousingProfile<'_>) -> ProsAndCons {
    let mut summary = ProsAndCons::default();

    if profile.price_per_sqm < profile.median_price_per_sqm * 0.9 {
        summary.pros.push("Price per m² below the area median".to_string());
    } else if profile.price_per_sqm > profile.median_price_per_sqm * 1.1 {
        summary.cons.push("Price per m² above the area median".to_string());
    }

    if profile.condo_fee < profile.median_condo_fee * 0.8 {
        summary.pros.push("Low condo fee for the area".to_string());
    } else if profile.condo_fee > profile.median_condo_fee * 1.2 {
        summary.cons.push("High condo fee for the area".to_string());
    }

    if let Some(ratio) = profile.payment_to_income_ratio {
        if ratio > 35.0 {
            summary.cons.push("Installment takes more than 35% of income".to_string());
        } else if ratio < 25.0 {
            summary.pros.push("Comfortable installment relative to income".to_string());
        }
    }

    if profile.total_cost_vs_budget.is_some_and(|c| c > 1.2) {
        summary.cons.push("Total cost above the planned budget".to_string());
    }

    let lowered: Vec<String> = profile.tags.iter().map(|t| t.to_lowercase()).collect();
    let has_tag = |needle: &str| lowered.iter().any(|t| t.contains(needle));

    summary.pros.extend(PRO_TAGS.iter().filter(|&&t| has_tag(t)).map(|t| capitalize(t)));
    summary.cons.extend(CON_TAGS.iter().filter(|&&t| has_tag(t)).map(|t| capitalize(t)));

    summary
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Position of `value` within [min, max], clamped to [0, 1]; 0.5 when the range is empty
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

/// Outcome of comparing two properties on one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Better,
    Worse,
    Equal,
}

/// Compare `value` against `reference`; differences under 1% count as equal
pub fn compare_values(value: f64, reference: f64, higher_is_better: bool) -> Comparison {
    const THRESHOLD: f64 = 0.01;

    let scale = reference.abs();
    let diff = (value - reference).abs();
    let equal = if scale == 0.0 {
        diff == 0.0
    } else {
        diff / scale < THRESHOLD
    };
    if equal {
        return Comparison::Equal;
    }

    match (higher_is_better, value > reference) {
        (true, true) | (false, false) => Comparison::Better,
        _ => Comparison::Worse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quality_score() {
        assert_eq!(quality_score::<&str>(&[]), 0.5);
        assert_abs_diff_eq!(quality_score(&["Good lighting", "balcony"]), 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(quality_score(&["street noise"]), 0.4, epsilon = 1e-12);

        let glowing: Vec<String> = POSITIVE_TAGS.iter().map(|t| t.to_string()).collect();
        assert_eq!(quality_score(&glowing), 1.0);
        let grim: Vec<String> = NEGATIVE_TAGS.iter().map(|t| t.to_string()).collect();
        assert_eq!(quality_score(&grim), 0.0);
    }

    #[test]
    fn test_risk_levels() {
        let safe = RiskInputs {
            construction_phase: None,
            developer_rating: None,
            net_cap_rate: 7.0,
            vacancy_rate_percent: 3.0,
        };
        assert_eq!(assess_investment_risk(&safe), RiskLevel::Low);

        let middling = RiskInputs {
            net_cap_rate: 5.0,
            vacancy_rate_percent: 8.0,
            developer_rating: Some(6.0),
            ..safe
        };
        assert_eq!(assess_investment_risk(&middling), RiskLevel::Medium);

        let shaky = RiskInputs {
            construction_phase: Some(ConstructionPhase::Launch),
            developer_rating: Some(4.0),
            net_cap_rate: 3.0,
            vacancy_rate_percent: 12.0,
        };
        assert_eq!(assess_investment_risk(&shaky), RiskLevel::High);
        assert_eq!(RiskLevel::High.score(), 0.0);
    }

    #[test]
    fn test_pros_and_cons() {
        let tags = vec!["Near transit".to_string(), "traffic noise".to_string()];
        let profile = HousingProfile {
            price_per_sqm: 8_000.0,
            median_price_per_sqm: 10_000.0,
            condo_fee: 1_500.0,
            median_condo_fee: 1_000.0,
            payment_to_income_ratio: Some(20.0),
            total_cost_vs_budget: Some(1.3),
            tags: &tags,
        };
        let summary = housing_pros_and_cons(&profile);

        assert_eq!(
            summary.pros,
            vec![
                "Price per m² below the area median",
                "Comfortable installment relative to income",
                "Near transit",
            ]
        );
        assert_eq!(
            summary.cons,
            vec![
                "High condo fee for the area",
                "Total cost above the planned budget",
                "Noise",
            ]
        );
    }

    #[test]
    fn test_pros_and_cons_without_income() {
        let tags: Vec<String> = Vec::new();
        let profile = HousingProfile {
            price_per_sqm: 10_000.0,
            median_price_per_sqm: 10_000.0,
            condo_fee: 1_000.0,
            median_condo_fee: 1_000.0,
            payment_to_income_ratio: None,
            total_cost_vs_budget: None,
            tags: &tags,
        };
        assert_eq!(housing_pros_and_cons(&profile), ProsAndCons::default());
    }

    #[test]
    fn test_normalize_and_compare() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(15.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);

        assert_eq!(compare_values(100.5, 100.0, true), Comparison::Equal);
        assert_eq!(compare_values(110.0, 100.0, true), Comparison::Better);
        assert_eq!(compare_values(110.0, 100.0, false), Comparison::Worse);
        assert_eq!(compare_values(5.0, 0.0, true), Comparison::Better);
        assert_eq!(compare_values(0.0, 0.0, true), Comparison::Equal);
    }
}
