use crate::sampler::random_source::interface::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct RandomSourceRand {
    rng: StdRng,
}

impl RandomSourceRand {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    #[allow(dead_code)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSourceRand {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for RandomSourceRand {
    fn next_in_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }
}
