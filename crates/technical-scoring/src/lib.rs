pub mod backend;
pub mod indicators;
pub mod scorer;

#[cfg(test)]
mod indicators_tests;

pub use backend::*;
pub use indicators::*;
pub use scorer::*;
