//! Loading resume and job-posting documents into plain text

pub mod loader;
pub mod text_extractor;

pub use loader::{DocumentFormat, DocumentLoader};
