//! Qualitative student analysis.
//!
//! Same shape as the forecaster: normalized input → bias-free Xavier layers
//! (20 → 16 relu → 12 tanh → 8 sigmoid) → threshold decoding.

use rand::Rng;

use crate::interpret::mean;
use crate::models::{DyslexiaType, Observation, PerformanceLabel, Tier};
use crate::network::{relu, sigmoid};
use crate::normalize::INPUT_SIZE;
use crate::weights::{initialize, Matrix};

const HIDDEN1: usize = 16;
const HIDDEN2: usize = 12;
const OUTPUT: usize = 8;
const FLAG_THRESHOLD: f64 = 0.6;
const MAX_RECOMMENDATIONS: usize = 4;

const AREAS: [(&str, &str); 3] = [
    ("reading accuracy", "guided reading with immediate feedback"),
    ("practice consistency", "short daily practice routine"),
    ("session engagement", "interactive exercises with visible rewards"),
];

/// Anything that can turn a normalized feature vector into an observation.
pub trait StudentAnalyzer {
    fn analyze(&self, normalized: &[f64; INPUT_SIZE]) -> Observation;
}

#[derive(Clone, Debug)]
pub struct AnalysisEngine {
    layers: [Matrix; 3],
}

impl AnalysisEngine {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            layers: [
                initialize(INPUT_SIZE, HIDDEN1, rng),
                initialize(HIDDEN1, HIDDEN2, rng),
                initialize(HIDDEN2, OUTPUT, rng),
            ],
        }
    }

    pub fn with_layers(layers: [Matrix; 3]) -> Self {
        Self { layers }
    }

    fn forward(&self, input: &[f64; INPUT_SIZE]) -> Vec<f64> {
        let h1: Vec<f64> = self.layers[0].multiply(input).into_iter().map(relu).collect();
        let h2: Vec<f64> = self.layers[1].multiply(&h1).into_iter().map(f64::tanh).collect();
        self.layers[2].multiply(&h2).into_iter().map(sigmoid).collect()
    }
}

impl StudentAnalyzer for AnalysisEngine {
    fn analyze(&self, normalized: &[f64; INPUT_SIZE]) -> Observation {
        let output = self.forward(normalized);
        decode(&output, normalized)
    }
}

fn decode(output: &[f64], normalized: &[f64; INPUT_SIZE]) -> Observation {
    let overall_performance = match output[0] {
        v if v > 0.75 => PerformanceLabel::Excellent,
        v if v > 0.55 => PerformanceLabel::Good,
        v if v > 0.35 => PerformanceLabel::NeedsImprovement,
        _ => PerformanceLabel::Struggling,
    };

    let flagged = |range: std::ops::Range<usize>| -> Vec<usize> {
        output[range]
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > FLAG_THRESHOLD)
            .map(|(i, _)| i)
            .collect()
    };
    let strengths: Vec<String> = flagged(1..4)
        .into_iter()
        .map(|i| AREAS[i].0.to_string())
        .collect();
    let weak_areas = flagged(4..7);
    let weaknesses: Vec<String> = weak_areas.iter().map(|&i| AREAS[i].0.to_string()).collect();

    let risk_level = match output[7] {
        v if v > 0.66 => Tier::High,
        v if v < 0.33 => Tier::Low,
        _ => Tier::Medium,
    };
    let motivation_level = match mean(&normalized[14..17]) {
        v if v > 0.7 => Tier::High,
        v if v < 0.4 => Tier::Low,
        _ => Tier::Medium,
    };

    let mut recommendations: Vec<String> =
        weak_areas.iter().map(|&i| AREAS[i].1.to_string()).collect();
    recommendations.push(decode_type(normalized[18]).strategy().to_string());
    recommendations.truncate(MAX_RECOMMENDATIONS);

    let narrative = format!(
        "Overall performance is {} with {} risk and {} motivation.",
        overall_performance.as_str(),
        risk_level.as_str(),
        motivation_level.as_str()
    );

    Observation {
        overall_performance,
        strengths,
        weaknesses,
        recommendations,
        risk_level,
        motivation_level,
        narrative,
    }
}

/// Inverts the dyslexia-type slot encoding.
fn decode_type(slot: f64) -> DyslexiaType {
    if slot <= 0.375 {
        DyslexiaType::Fonologica
    } else if slot <= 0.625 {
        DyslexiaType::Superficial
    } else if slot <= 0.875 {
        DyslexiaType::Mixta
    } else {
        DyslexiaType::Kinestesica
    }
}
