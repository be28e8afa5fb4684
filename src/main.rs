//! Resume signals: ontology-driven resume and job description scoring

mod cli;
mod config;
mod error;
mod input;
mod ontology;
mod output;
mod scoring;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, OntologyAction};
use config::Config;
use error::{Result, SignalScorerError};
use indicatif::{ProgressBar, ProgressStyle};
use input::DocumentLoader;
use log::{error, info};
use ontology::Ontology;
use output::formatter::ReportGenerator;
use output::report::{ReportMetadata, SignalReport};
use scoring::{AlignmentScorer, TextNormalizer};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: &Option<PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Resolve the ontology: explicit CLI path, then config path, then builtin.
fn load_ontology(cli_path: Option<&PathBuf>, config: &Config) -> Result<Ontology> {
    let path = cli_path.or(config.ontology.path.as_ref());
    match path {
        Some(path) => {
            info!("Loading ontology from {}", path.display());
            Ontology::from_json_file(path)
        }
        None => Ok(Ontology::builtin()),
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            group,
            ontology,
            detailed,
            output,
            save,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| SignalScorerError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["pdf", "txt", "md"]).map_err(|e| {
                SignalScorerError::InvalidInput(format!("Job description file: {}", e))
            })?;

            let output_format =
                cli::parse_output_format(&output).map_err(SignalScorerError::InvalidInput)?;

            let started = Instant::now();
            let ontology = load_ontology(ontology.as_ref(), &config)?;
            info!(
                "Ontology loaded: {} domains, {} terms, {} groups",
                ontology.domains.len(),
                ontology.term_count(),
                ontology.groups.len()
            );

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner());

            let mut loader = DocumentLoader::new();
            spinner.set_message(format!("Extracting {}", resume.display()));
            let resume_text = loader.load(&resume).await?;
            spinner.set_message(format!("Extracting {}", job.display()));
            let job_text = loader.load(&job).await?;
            spinner.finish_and_clear();

            let normalizer = TextNormalizer::new(config.scoring.min_token_len);
            let resume_doc =
                normalizer.normalize(&resume_text, &resume.to_string_lossy())?;
            let job_doc = normalizer.normalize(&job_text, &job.to_string_lossy())?;

            info!(
                "Normalized resume: {} tokens, job description: {} tokens",
                resume_doc.token_count(),
                job_doc.token_count()
            );

            let scorer = AlignmentScorer::new(&ontology, &config.scoring)?;
            let analysis = scorer.analyze(
                &resume_doc,
                &resume.to_string_lossy(),
                &job_doc,
                &job.to_string_lossy(),
                group.as_deref(),
            )?;

            let report = SignalReport::new(
                analysis,
                ReportMetadata {
                    generated_at: chrono::Utc::now(),
                    tool_version: env!("CARGO_PKG_VERSION").to_string(),
                    resume_file: resume.to_string_lossy().to_string(),
                    job_file: job.to_string_lossy().to_string(),
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    ontology_domains: ontology.domains.len(),
                    ontology_terms: ontology.term_count(),
                    resume_words: resume_doc.raw_word_count(),
                    job_words: job_doc.raw_word_count(),
                },
            );

            let generator = ReportGenerator::new(
                config.output.color_output,
                detailed || config.output.detailed,
            );
            println!("{}", generator.format(&report, output_format)?);

            if let Some(save_path) = save {
                generator.save(&report, output_format, &save_path)?;
                println!("Report saved to {}", save_path.display());
            }
        }

        Commands::Ontology { action } => match action {
            OntologyAction::Domains { ontology, terms } => {
                let ontology = load_ontology(ontology.as_ref(), &config)?;
                println!("Signal domains ({}):\n", ontology.domains.len());
                for domain in &ontology.domains {
                    println!("  {} ({} terms)", domain.name, domain.terms.len());
                    if terms {
                        println!("    {}", domain.terms.join(", "));
                    }
                }
            }

            OntologyAction::Groups { ontology } => {
                let ontology = load_ontology(ontology.as_ref(), &config)?;
                println!("SOC occupational groups ({}):\n", ontology.groups.len());
                for group in &ontology.groups {
                    println!("  {}", group.name);
                    println!("    Preferred domains: {}", group.signal_domains.join(", "));
                    if !group.example_titles.is_empty() {
                        println!("    Example titles: {}", group.example_titles.join(", "));
                    }
                }
            }

            OntologyAction::Validate { path } => match Ontology::from_json_file(&path) {
                Ok(ontology) => {
                    println!(
                        "Ontology is valid: {} domains, {} terms, {} groups",
                        ontology.domains.len(),
                        ontology.term_count(),
                        ontology.groups.len()
                    );
                }
                Err(e) => {
                    println!("Ontology is invalid: {}", e);
                    return Err(e);
                }
            },
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("Current configuration\n");
                println!("Match policy: {:?}", config.scoring.match_policy);
                println!("Overlap policy: {:?}", config.scoring.overlap_policy);
                println!("Minimum token length: {}", config.scoring.min_token_len);
                println!(
                    "Near-miss threshold: {:.2}",
                    config.scoring.near_miss_threshold
                );
                println!(
                    "Visibility threshold: {:.1}",
                    config.scoring.visibility_threshold
                );
                println!("Max gaps per domain: {}", config.scoring.max_gaps_per_domain);
                match &config.ontology.path {
                    Some(path) => println!("Ontology: {}", path.display()),
                    None => println!("Ontology: built-in"),
                }
                println!("Output format: {:?}", config.output.format);
            }

            Some(ConfigAction::Reset) => {
                let default_config = Config::default();
                default_config.save()?;
                println!("Configuration reset to defaults");
            }
        },
    }

    Ok(())
}
