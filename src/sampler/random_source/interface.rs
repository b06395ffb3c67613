pub trait RandomSource: Send {
    /// Uniform integer in `[min, max]`, both ends inclusive. Callers guarantee `min <= max`.
    fn next_in_range(&mut self, min: i64, max: i64) -> i64;
}
