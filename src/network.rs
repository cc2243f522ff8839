//! Feed-forward pass: 20 → 32 (leaky relu) → 24 (relu) → 16 (tanh) → 15 (sigmoid).

use crate::normalize::INPUT_SIZE;
use crate::weights::{Matrix, WeightSet, OUTPUT_SIZE};

const LEAKY_SLOPE: f64 = 0.01;

pub fn leaky_relu(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        LEAKY_SLOPE * x
    }
}

pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn layer(input: &[f64], weights: &Matrix, activation: fn(f64) -> f64) -> Vec<f64> {
    let mut out = weights.multiply(input);
    for v in &mut out {
        *v = activation(*v);
    }
    out
}

/// Runs the four layers in order. Outputs lie in (0, 1).
pub fn propagate(input: &[f64; INPUT_SIZE], weights: &WeightSet) -> [f64; OUTPUT_SIZE] {
    let hidden1 = layer(input, &weights.w1, leaky_relu);
    let hidden2 = layer(&hidden1, &weights.w2, relu);
    let hidden3 = layer(&hidden2, &weights.w3, f64::tanh);
    let output = layer(&hidden3, &weights.w4, sigmoid);

    let mut result = [0.0; OUTPUT_SIZE];
    result.copy_from_slice(&output);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use proptest::prelude::*;

    #[test]
    fn activations_match_definitions() {
        assert_eq!(leaky_relu(2.0), 2.0);
        assert_eq!(leaky_relu(-2.0), -0.02);
        assert_eq!(relu(-3.0), 0.0);
        assert_eq!(relu(3.0), 3.0);
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn zero_weights_produce_half_everywhere() {
        let output = propagate(&[1.0; INPUT_SIZE], &WeightSet::constant(0.0));
        assert!(output.iter().all(|&o| o == 0.5));
    }

    #[test]
    fn positive_weights_push_outputs_above_half() {
        // h1 = 2.0, h2 = 6.4, h3 = tanh(15.36) ~ 1, out = sigmoid(~1.6)
        let output = propagate(&[1.0; INPUT_SIZE], &WeightSet::constant(0.1));
        for &o in &output {
            assert!((o - sigmoid(1.6)).abs() < 1e-9, "unexpected output {o}");
        }
    }

    #[test]
    fn leaky_relu_lets_negative_signal_through() {
        // h1 = -0.02 each; relu(32 * -0.02 * -0.1) = 0.064 keeps the signal alive.
        let output = propagate(&[1.0; INPUT_SIZE], &WeightSet::constant(-0.1));
        let h3 = (24.0 * 0.064 * -0.1f64).tanh();
        let expected = sigmoid(16.0 * h3 * -0.1);
        for &o in &output {
            assert!((o - expected).abs() < 1e-9, "unexpected output {o}");
        }
    }

    proptest! {
        #[test]
        fn proptest_outputs_strictly_inside_unit_interval(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(0.0f64..1.0, INPUT_SIZE),
        ) {
            let weights = WeightSet::generate(&mut create_rng(seed));
            let input: [f64; INPUT_SIZE] = inputs.try_into().expect("input size should match");
            let output = propagate(&input, &weights);
            prop_assert_eq!(output.len(), OUTPUT_SIZE);
            prop_assert!(output.iter().all(|&o| o > 0.0 && o < 1.0));
        }
    }
}
