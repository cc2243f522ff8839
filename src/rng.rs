use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// How each engine instance obtains its weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightPolicy {
    /// New entropy-seeded weights per instance; identical input yields different output.
    #[default]
    Fresh,
    /// Every instance is built from the same seed and is reproducible.
    Seeded(u64),
}

impl WeightPolicy {
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or(WeightPolicy::Fresh, WeightPolicy::Seeded)
    }

    pub fn rng(self) -> ChaCha12Rng {
        match self {
            WeightPolicy::Fresh => ChaCha12Rng::from_entropy(),
            WeightPolicy::Seeded(seed) => create_rng(seed),
        }
    }

    pub fn describe(self) -> String {
        match self {
            WeightPolicy::Fresh => "fresh random weights".to_string(),
            WeightPolicy::Seeded(seed) => format!("seeded weights ({seed})"),
        }
    }
}
