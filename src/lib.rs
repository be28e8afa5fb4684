//! Resume signals library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod ontology;
pub mod output;
pub mod scoring;

pub use config::Config;
pub use error::{Result, SignalScorerError};
pub use ontology::Ontology;
