use rand::Rng;
use tracing::debug;

use crate::interpret::{interpret, Interpretation};
use crate::models::{PredictionInput, PredictionResult};
use crate::normalize::normalize;
use crate::network::propagate;
use crate::quality;
use crate::rng::{create_rng, WeightPolicy};
use crate::weights::WeightSet;

/// Progress forecaster. Weights are drawn once at construction and never change.
#[derive(Clone, Debug)]
pub struct PredictionEngine {
    weights: WeightSet,
}

impl PredictionEngine {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_weights(WeightSet::generate(rng))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(&mut create_rng(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(&mut WeightPolicy::Fresh.rng())
    }

    pub fn with_policy(policy: WeightPolicy) -> Self {
        Self::new(&mut policy.rng())
    }

    pub fn with_weights(weights: WeightSet) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn predict(&self, input: &PredictionInput) -> PredictionResult {
        let features = normalize(input);
        let output = propagate(&features, &self.weights);
        debug!(
            student = %input.student_id,
            level = input.dyslexia_profile.level.as_str(),
            kind = input.dyslexia_profile.kind.as_str(),
            ?output,
            "network output"
        );

        let Interpretation {
            short_term,
            medium_term,
            long_term,
            trends,
        } = interpret(&output, input);
        let confidence = quality::score(input);

        PredictionResult {
            short_term,
            medium_term,
            long_term,
            trends,
            confidence,
        }
    }
}
