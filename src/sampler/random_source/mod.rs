#[cfg(test)]
pub mod impl_fake;
pub mod impl_rand;
pub mod interface;
