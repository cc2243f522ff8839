//! Decoding of the 15-slot network output into horizon forecasts and trends.
//!
//! | slot  | meaning                                   |
//! |-------|-------------------------------------------|
//! | 0..3  | expected progress, accuracy, dropout risk |
//! | 3..6  | completion likelihood for modules 1-3     |
//! | 6     | weeks to completion (× 12)                |
//! | 7     | intervention flag                         |
//! | 8     | overall success probability               |
//! | 9..12 | intervention triggers                     |
//! | 12..15| progress, accuracy, engagement trends     |
//!
//! All comparisons are strict, so a value sitting exactly on a threshold
//! falls into the lower bracket.

use crate::models::{
    LongTermForecast, MediumTermForecast, PredictionInput, ProjectedOutcome, ShortTermForecast,
    Tier, Trajectory, Trend, TrendSummary,
};
use crate::weights::OUTPUT_SIZE;

pub const MAX_INTERVENTIONS: usize = 4;
const HORIZON_WEEKS: f64 = 12.0;
const MODULE_THRESHOLD: f64 = 0.6;

const INTERVENTION_TRIGGERS: [(f64, &str); 3] = [
    (0.7, "personalized reinforcement sessions"),
    (0.6, "adjust methodology to dyslexia type"),
    (0.5, "incorporate gamification"),
];

/// Everything in a `PredictionResult` except the confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub short_term: ShortTermForecast,
    pub medium_term: MediumTermForecast,
    pub long_term: LongTermForecast,
    pub trends: TrendSummary,
}

pub fn interpret(output: &[f64; OUTPUT_SIZE], input: &PredictionInput) -> Interpretation {
    Interpretation {
        short_term: ShortTermForecast {
            expected_progress: percent(output[0]),
            expected_accuracy: percent(output[1]),
            risk_of_dropout: percent(output[2]),
            timeframe: "1-2 weeks",
        },
        medium_term: MediumTermForecast {
            modules_to_complete: modules_to_complete(output, &input.current_progress),
            estimated_completion_time: (output[6] * HORIZON_WEEKS).round() as u32,
            intervention_needed: output[7] > 0.6,
            timeframe: "1 month",
        },
        long_term: LongTermForecast {
            overall_success_probability: percent(output[8]),
            recommended_interventions: recommended_interventions(output, input),
            projected_outcome: projected_outcome(output[8]),
            timeframe: "3 months",
        },
        trends: TrendSummary {
            progress_trend: classify_trend(output[12]),
            accuracy_trend: classify_trend(output[13]),
            engagement_trend: classify_engagement(output[14]),
            overall_trajectory: classify_trajectory(&output[12..15]),
        },
    }
}

fn percent(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

/// Modules 1-3 that are unfinished and likely to be completed.
fn modules_to_complete(output: &[f64; OUTPUT_SIZE], progress: &[f64]) -> Vec<u8> {
    (0..3)
        .filter(|&i| {
            let current = progress.get(i).copied().unwrap_or(0.0);
            current < 100.0 && output[3 + i] > MODULE_THRESHOLD
        })
        .map(|i| (i + 1) as u8)
        .collect()
}

fn recommended_interventions(output: &[f64; OUTPUT_SIZE], input: &PredictionInput) -> Vec<String> {
    let mut interventions: Vec<String> = INTERVENTION_TRIGGERS
        .iter()
        .zip(&output[9..12])
        .filter(|((threshold, _), value)| **value > *threshold)
        .map(|((_, text), _)| text.to_string())
        .collect();
    interventions.push(input.dyslexia_profile.kind.strategy().to_string());
    interventions.truncate(MAX_INTERVENTIONS);
    interventions
}

pub fn projected_outcome(value: f64) -> ProjectedOutcome {
    if value > 0.8 {
        ProjectedOutcome::Excellent
    } else if value > 0.6 {
        ProjectedOutcome::Good
    } else if value > 0.4 {
        ProjectedOutcome::Fair
    } else {
        ProjectedOutcome::Concerning
    }
}

pub fn classify_trend(value: f64) -> Trend {
    if value > 0.6 {
        Trend::Improving
    } else if value < 0.4 {
        Trend::Worsening
    } else {
        Trend::Stable
    }
}

pub fn classify_engagement(value: f64) -> Tier {
    if value > 0.7 {
        Tier::High
    } else if value < 0.4 {
        Tier::Low
    } else {
        Tier::Medium
    }
}

pub fn classify_trajectory(values: &[f64]) -> Trajectory {
    let average = mean(values);
    if average > 0.6 {
        Trajectory::Positive
    } else if average < 0.4 {
        Trajectory::Concerning
    } else {
        Trajectory::Neutral
    }
}

/// Arithmetic mean; an empty slice averages to 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DyslexiaLevel, DyslexiaProfile, DyslexiaType};

    fn input(progress: Vec<f64>, kind: DyslexiaType) -> PredictionInput {
        PredictionInput {
            student_id: "s-1".to_string(),
            current_progress: progress,
            accuracy_trends: Vec::new(),
            session_frequency: Vec::new(),
            motivation_indicators: Vec::new(),
            dyslexia_profile: DyslexiaProfile {
                level: DyslexiaLevel::Leve,
                kind,
                has_kinesthetic: false,
            },
        }
    }

    #[test]
    fn trend_boundaries_are_exact() {
        assert_eq!(classify_trend(0.61), Trend::Improving);
        assert_eq!(classify_trend(0.39), Trend::Worsening);
        assert_eq!(classify_trend(0.50), Trend::Stable);
        assert_eq!(classify_trend(0.6), Trend::Stable);
        assert_eq!(classify_trend(0.4), Trend::Stable);
        assert_eq!(classify_engagement(0.71), Tier::High);
        assert_eq!(classify_engagement(0.39), Tier::Low);
        assert_eq!(classify_engagement(0.50), Tier::Medium);
        assert_eq!(classify_engagement(0.7), Tier::Medium);
    }

    #[test]
    fn outcome_brackets_use_strict_comparisons() {
        assert_eq!(projected_outcome(0.81), ProjectedOutcome::Excellent);
        assert_eq!(projected_outcome(0.8), ProjectedOutcome::Good);
        assert_eq!(projected_outcome(0.6), ProjectedOutcome::Fair);
        assert_eq!(projected_outcome(0.4), ProjectedOutcome::Concerning);
    }

    #[test]
    fn trajectory_averages_trend_slots() {
        assert_eq!(classify_trajectory(&[0.9, 0.9, 0.3]), Trajectory::Positive);
        assert_eq!(classify_trajectory(&[0.1, 0.5, 0.5]), Trajectory::Concerning);
        assert_eq!(classify_trajectory(&[0.6, 0.4, 0.5]), Trajectory::Neutral);
        assert_eq!(classify_trajectory(&[]), Trajectory::Concerning);
    }

    #[test]
    fn high_outputs_decode_to_full_forecast() {
        let output = [0.9; OUTPUT_SIZE];
        let result = interpret(&output, &input(vec![100.0, 50.0], DyslexiaType::Superficial));

        assert_eq!(result.short_term.expected_progress, 90);
        assert_eq!(result.short_term.risk_of_dropout, 90);
        // Module 1 is already complete; module 3 has no progress reported.
        assert_eq!(result.medium_term.modules_to_complete, vec![2, 3]);
        assert_eq!(result.medium_term.estimated_completion_time, 11);
        assert!(result.medium_term.intervention_needed);
        assert_eq!(result.long_term.overall_success_probability, 90);
        assert_eq!(
            result.long_term.recommended_interventions,
            vec![
                "personalized reinforcement sessions".to_string(),
                "adjust methodology to dyslexia type".to_string(),
                "incorporate gamification".to_string(),
                DyslexiaType::Superficial.strategy().to_string(),
            ]
        );
        assert_eq!(result.long_term.projected_outcome, ProjectedOutcome::Excellent);
        assert_eq!(result.trends.overall_trajectory, Trajectory::Positive);
        assert_eq!(result.trends.engagement_trend, Tier::High);
    }

    #[test]
    fn completed_modules_are_never_scheduled() {
        let output = [0.99; OUTPUT_SIZE];
        let result = interpret(&output, &input(vec![100.0; 6], DyslexiaType::Mixta));
        assert!(result.medium_term.modules_to_complete.is_empty());
    }

    #[test]
    fn interventions_keep_trigger_order_and_always_end_with_strategy() {
        let mut output = [0.2; OUTPUT_SIZE];
        output[9] = 0.65; // below 0.7, skipped
        output[10] = 0.65;
        output[11] = 0.55;
        for kind in [
            DyslexiaType::Fonologica,
            DyslexiaType::Superficial,
            DyslexiaType::Mixta,
            DyslexiaType::Kinestesica,
        ] {
            let result = interpret(&output, &input(Vec::new(), kind));
            let list = &result.long_term.recommended_interventions;
            assert!(list.len() <= MAX_INTERVENTIONS);
            assert_eq!(
                list,
                &vec![
                    "adjust methodology to dyslexia type".to_string(),
                    "incorporate gamification".to_string(),
                    kind.strategy().to_string(),
                ]
            );
        }
    }

    #[test]
    fn mean_of_empty_slice_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 3.0]), 2.0);
    }
}
