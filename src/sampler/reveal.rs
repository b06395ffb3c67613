/// Staggered reveal of an already generated sequence.
///
/// Every restart or cancel bumps `generation`; ticks carrying an older
/// generation are ignored, which is how a pending reveal gets cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealSchedule {
    numbers: Vec<i64>,
    revealed: usize,
    generation: u64,
}

impl RevealSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart(&mut self, numbers: Vec<i64>) -> u64 {
        self.generation += 1;
        self.numbers = numbers;
        self.revealed = 0;
        self.generation
    }

    /// Reveals one more number. Returns `None` for a stale generation,
    /// otherwise whether further numbers are still hidden.
    pub fn advance(&mut self, generation: u64) -> Option<bool> {
        if generation != self.generation || self.is_complete() {
            return None;
        }
        self.revealed += 1;
        Some(!self.is_complete())
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.numbers.clear();
        self.revealed = 0;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn visible(&self) -> &[i64] {
        &self.numbers[..self.revealed]
    }

    pub fn hidden_count(&self) -> usize {
        self.numbers.len() - self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.revealed == self.numbers.len()
    }
}
