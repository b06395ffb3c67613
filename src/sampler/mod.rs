pub mod generate;
pub mod random_source;
pub mod reveal;
#[cfg(test)]
mod tests;
