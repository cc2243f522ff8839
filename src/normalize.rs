//! Encoding of student telemetry into the fixed 20-slot feature vector.
//!
//! Layout: progress(6) + accuracy(4) + sessions(4) + motivation(3) + profile(3) = 20.
//! Percentage slots are divided by 100 without clamping; only session counts are capped.

use crate::models::{DyslexiaLevel, DyslexiaProfile, DyslexiaType, PredictionInput};

pub const INPUT_SIZE: usize = 20;

pub const PROGRESS_SLOTS: usize = 6;
pub const ACCURACY_SLOTS: usize = 4;
pub const SESSION_SLOTS: usize = 4;
pub const MOTIVATION_SLOTS: usize = 3;

const SESSION_CAP: f64 = 10.0;

pub fn normalize(input: &PredictionInput) -> [f64; INPUT_SIZE] {
    let mut vector = [0.0; INPUT_SIZE];
    let mut offset = 0;

    offset = fill(&mut vector, offset, &input.current_progress, PROGRESS_SLOTS, percent);
    offset = fill(&mut vector, offset, &input.accuracy_trends, ACCURACY_SLOTS, percent);
    offset = fill(&mut vector, offset, &input.session_frequency, SESSION_SLOTS, |v| {
        (v / SESSION_CAP).min(1.0)
    });
    offset = fill(
        &mut vector,
        offset,
        &input.motivation_indicators,
        MOTIVATION_SLOTS,
        percent,
    );

    encode_profile(&input.dyslexia_profile, &mut vector[offset..]);
    vector
}

fn percent(value: f64) -> f64 {
    value / 100.0
}

/// Writes `slots` transformed values starting at `offset`; absent values stay 0.
fn fill(
    vector: &mut [f64; INPUT_SIZE],
    offset: usize,
    source: &[f64],
    slots: usize,
    transform: impl Fn(f64) -> f64,
) -> usize {
    for (slot, value) in vector[offset..offset + slots].iter_mut().zip(source) {
        *slot = transform(*value);
    }
    offset + slots
}

fn encode_profile(profile: &DyslexiaProfile, out: &mut [f64]) {
    out[0] = match profile.level {
        DyslexiaLevel::Leve => 0.33,
        DyslexiaLevel::Moderado => 0.66,
        DyslexiaLevel::Severo => 1.0,
    };
    out[1] = match profile.kind {
        DyslexiaType::Fonologica => 0.25,
        DyslexiaType::Superficial => 0.5,
        DyslexiaType::Mixta => 0.75,
        DyslexiaType::Kinestesica => 1.0,
    };
    out[2] = if profile.has_kinesthetic { 1.0 } else { 0.0 };
}
