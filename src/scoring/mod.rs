//! Signal scoring engine: normalization, domain matching, and scoring

pub mod matcher;
pub mod normalizer;
pub mod scorer;

pub use matcher::DomainMatcher;
pub use normalizer::{NormalizedDocument, TextNormalizer};
pub use scorer::{AlignmentScorer, ScoreReport};
