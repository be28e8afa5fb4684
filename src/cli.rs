//! CLI interface for the resume signals tool

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-signals")]
#[command(about = "Ontology-driven resume and job description signal scoring")]
#[command(
    long_about = "Score a resume against a job description using a signal-domain ontology and SOC occupational groups"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Target SOC occupational group (default: predicted from the job
        /// description)
        #[arg(short, long)]
        group: Option<String>,

        /// Path to an ontology JSON file (default: built-in ontology)
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Ontology inspection commands
    Ontology {
        #[command(subcommand)]
        action: OntologyAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum OntologyAction {
    /// List signal domains and their term counts
    Domains {
        /// Path to an ontology JSON file (default: built-in ontology)
        #[arg(long)]
        ontology: Option<PathBuf>,

        /// Show every term per domain
        #[arg(short, long)]
        terms: bool,
    },

    /// List SOC occupational groups and their preferred domains
    Groups {
        /// Path to an ontology JSON file (default: built-in ontology)
        #[arg(long)]
        ontology: Option<PathBuf>,
    },

    /// Validate an ontology JSON file
    Validate {
        /// Path to the ontology JSON file
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(parse_output_format("md").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let path = PathBuf::from("resume.PDF");
        assert!(validate_file_extension(&path, &["pdf", "txt"]).is_ok());

        let path = PathBuf::from("resume.docx");
        assert!(validate_file_extension(&path, &["pdf", "txt"]).is_err());

        let path = PathBuf::from("resume");
        assert!(validate_file_extension(&path, &["pdf"]).is_err());
    }
}
