//! Confidence score from input completeness.
//!
//! A reported value of exactly zero counts as missing, so a genuine 0% week
//! lowers confidence the same way an unobserved week does.

use crate::models::PredictionInput;
use crate::normalize::{ACCURACY_SLOTS, MOTIVATION_SLOTS, PROGRESS_SLOTS, SESSION_SLOTS};

const PROGRESS_WEIGHT: f64 = 0.30;
const ACCURACY_WEIGHT: f64 = 0.25;
const SESSION_WEIGHT: f64 = 0.25;
const MOTIVATION_WEIGHT: f64 = 0.20;

/// Share of the first `slots` entries that are present and non-zero.
fn completeness(values: &[f64], slots: usize) -> f64 {
    if slots == 0 {
        return 0.0;
    }
    let present = values.iter().take(slots).filter(|&&v| v != 0.0).count();
    present as f64 / slots as f64
}

/// Weighted completeness as a rounded percentage in 0..=100.
pub fn score(input: &PredictionInput) -> u32 {
    let groups = [
        (completeness(&input.current_progress, PROGRESS_SLOTS), PROGRESS_WEIGHT),
        (completeness(&input.accuracy_trends, ACCURACY_SLOTS), ACCURACY_WEIGHT),
        (completeness(&input.session_frequency, SESSION_SLOTS), SESSION_WEIGHT),
        (
            completeness(&input.motivation_indicators, MOTIVATION_SLOTS),
            MOTIVATION_WEIGHT,
        ),
    ];

    let total_weight: f64 = groups.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0;
    }
    let weighted: f64 = groups.iter().map(|(c, w)| c * w).sum();
    let ratio = (weighted / total_weight).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DyslexiaLevel, DyslexiaProfile, DyslexiaType};

    fn input(
        progress: Vec<f64>,
        accuracy: Vec<f64>,
        sessions: Vec<f64>,
        motivation: Vec<f64>,
    ) -> PredictionInput {
        PredictionInput {
            student_id: "s-1".to_string(),
            current_progress: progress,
            accuracy_trends: accuracy,
            session_frequency: sessions,
            motivation_indicators: motivation,
            dyslexia_profile: DyslexiaProfile {
                level: DyslexiaLevel::Severo,
                kind: DyslexiaType::Fonologica,
                has_kinesthetic: false,
            },
        }
    }

    #[test]
    fn all_zero_input_has_no_confidence() {
        let zeros = input(vec![0.0; 6], vec![0.0; 4], vec![0.0; 4], vec![0.0; 3]);
        assert_eq!(score(&zeros), 0);
        let empty = input(Vec::new(), Vec::new(), Vec::new(), Vec::new());
        assert_eq!(score(&empty), 0);
    }

    #[test]
    fn complete_input_is_fully_confident() {
        let full = input(vec![10.0; 6], vec![50.0; 4], vec![2.0; 4], vec![70.0; 3]);
        assert_eq!(score(&full), 100);
    }

    #[test]
    fn partial_progress_is_weighted() {
        let partial = input(
            vec![80.0, 60.0, 40.0, 0.0, 0.0, 0.0],
            vec![70.0, 75.0, 80.0, 85.0],
            vec![3.0, 4.0, 5.0, 6.0],
            vec![60.0, 65.0, 70.0],
        );
        // 0.5 * 0.30 + 0.25 + 0.25 + 0.20
        assert_eq!(score(&partial), 85);
    }

    #[test]
    fn values_beyond_nominal_length_do_not_inflate_confidence() {
        let long = input(vec![10.0; 12], vec![50.0; 8], vec![2.0; 8], vec![70.0; 6]);
        assert_eq!(score(&long), 100);
    }
}
