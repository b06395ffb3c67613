use crate::sampler::random_source::interface::RandomSource;

/// Replays a fixed list of values, starting over once the list runs out.
#[derive(Debug, Clone)]
pub struct RandomSourceSequence {
    values: Vec<i64>,
    position: usize,
    draws: usize,
}

impl RandomSourceSequence {
    pub fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            position: 0,
            draws: 0,
        }
    }

    #[allow(dead_code)]
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for RandomSourceSequence {
    fn next_in_range(&mut self, min: i64, _max: i64) -> i64 {
        self.draws += 1;
        if self.values.is_empty() {
            return min;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }
}
