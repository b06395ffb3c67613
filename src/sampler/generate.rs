use crate::error::SampleError;
use crate::sampler::random_source::interface::RandomSource;
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SampleRequest {
    pub min: i64,
    pub max: i64,
    pub count: usize,
}

impl Default for SampleRequest {
    fn default() -> Self {
        Self {
            min: 1,
            max: 45,
            count: 6,
        }
    }
}

impl SampleRequest {
    /// How many distinct integers `[min, max]` holds.
    pub fn available(&self) -> u128 {
        if self.max < self.min {
            0
        } else {
            (self.max as i128 - self.min as i128 + 1) as u128
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.count as u128 <= self.available()
    }
}

/// Draws `count` distinct integers from `[min, max]` and returns them ascending.
///
/// Infeasible requests are rejected before the first draw, so the rejection
/// loop below always terminates.
pub fn generate(
    request: SampleRequest,
    random_source: &mut dyn RandomSource,
) -> Result<Vec<i64>, SampleError> {
    if !request.is_feasible() {
        return Err(SampleError::InvalidRange {
            min: request.min,
            max: request.max,
            count: request.count,
        });
    }

    let mut drawn = BTreeSet::new();
    while drawn.len() < request.count {
        let value = random_source.next_in_range(request.min, request.max);
        if (request.min..=request.max).contains(&value) {
            drawn.insert(value);
        }
    }

    Ok(drawn.into_iter().collect())
}
