//! Fundamental sub-factors: earnings momentum, valuation and business quality.
//!
//! All three are additive point tables on top of the configured base score.
//! A metric that is missing or not a real number contributes nothing; an
//! entirely missing input group resolves to the neutral score.

pub mod momentum;
pub mod quality;
pub mod valuation;

pub use momentum::MomentumScorer;
pub use quality::FundamentalScorer;
pub use valuation::ValuationScorer;
