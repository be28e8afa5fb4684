//! Output formatters: console, JSON, and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, SignalScorerError};
use crate::output::report::SignalReport;
use colored::Colorize;
use std::path::Path;

/// Trait for formatting signal reports
pub trait OutputFormatter {
    fn format_report(&self, report: &SignalReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and compact presentation
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for downstream tooling
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for shareable reports
pub struct MarkdownFormatter;

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn paint(&self, text: &str, pct: f64) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        if pct >= 70.0 {
            text.green().to_string()
        } else if pct >= 40.0 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &SignalReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut out = String::new();

        out.push_str(&format!("{}\n", self.heading("Signal Alignment Report")));
        out.push_str(&format!(
            "Resume: {}  |  Job: {}\n\n",
            report.metadata.resume_file, report.metadata.job_file
        ));

        let group_label = if analysis.group_overridden {
            format!("{} (manual override)", analysis.target_group)
        } else {
            analysis.target_group.clone()
        };
        out.push_str(&format!("Target group: {}\n", group_label));
        if !analysis.suggested_titles.is_empty() {
            out.push_str(&format!(
                "Suggested titles: {}\n",
                analysis.suggested_titles.join(", ")
            ));
        }
        out.push('\n');

        let coverage_pct = analysis.coverage.ratio * 100.0;
        out.push_str(&format!(
            "Coverage: {} ({} of {} job-description terms)\n",
            self.paint(&format!("{:.1}%", coverage_pct), coverage_pct),
            analysis.coverage.matched_terms,
            analysis.coverage.total_jd_terms
        ));
        out.push_str(&format!(
            "Alignment score: {:.4} (mean normalized signal over {})\n",
            analysis.alignment_score,
            analysis.critical_domains.join(", ")
        ));
        out.push_str(&format!(
            "Trust: {}   Visibility: {}\n",
            self.paint(&format!("{:.1}", analysis.trust_score), analysis.trust_score),
            self.paint(
                &format!("{:.1}", analysis.visibility_score),
                analysis.visibility_score
            )
        ));
        out.push_str(&format!("Verdict: {}\n\n", report.verdict));

        out.push_str(&format!("{}\n", self.heading("Domain coverage")));
        for domain in &analysis.domain_coverage {
            if domain.jd_term_count == 0 {
                continue;
            }
            out.push_str(&format!(
                "  {:<36} {} ({}/{})\n",
                domain.domain,
                self.paint(&format!("{:>5.1}%", domain.coverage_pct), domain.coverage_pct),
                domain.matched_term_count,
                domain.jd_term_count
            ));
        }

        let gapped: Vec<_> = analysis
            .domain_coverage
            .iter()
            .filter(|d| !d.missing_terms.is_empty())
            .collect();
        if !gapped.is_empty() {
            out.push_str(&format!("\n{}\n", self.heading("Missing terms")));
            for domain in gapped {
                let terms: Vec<String> = domain
                    .missing_terms
                    .iter()
                    .map(|gap| match &gap.near_miss {
                        Some(near) => {
                            format!("{} (close to \"{}\")", gap.term, near.resume_token)
                        }
                        None => gap.term.clone(),
                    })
                    .collect();
                out.push_str(&format!("  {}: {}\n", domain.domain, terms.join(", ")));
            }
        }

        if self.detailed {
            out.push_str(&format!("\n{}\n", self.heading("Group ranking")));
            for group in &analysis.group_scores {
                out.push_str(&format!("  {:<48} {:.4}\n", group.group, group.score));
            }

            out.push_str(&format!("\n{}\n", self.heading("Resume domain signals")));
            for score in &analysis.resume.domain_scores {
                if score.count == 0 {
                    continue;
                }
                let terms: Vec<String> = score
                    .matched_terms
                    .iter()
                    .map(|t| format!("{} x{}", t.term, t.count))
                    .collect();
                out.push_str(&format!(
                    "  {:<36} {:>3} hits  [{}]\n",
                    score.domain,
                    score.count,
                    terms.join(", ")
                ));
            }

            out.push_str(&format!("\n{}\n", self.heading("Optimization prompt")));
            out.push_str(&format!("  {}\n", report.hyperprompt));
        }

        out.push_str(&format!(
            "\nGenerated in {}ms with {} domains / {} terms\n",
            report.metadata.processing_time_ms,
            report.metadata.ontology_domains,
            report.metadata.ontology_terms
        ));

        Ok(out)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &SignalReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &SignalReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut out = String::new();

        out.push_str("# Signal Alignment Report\n\n");
        out.push_str(&format!(
            "- **Resume:** {}\n- **Job description:** {}\n- **Generated:** {}\n\n",
            report.metadata.resume_file,
            report.metadata.job_file,
            report.metadata.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        out.push_str("## Summary\n\n");
        out.push_str(&format!("- **Target group:** {}", analysis.target_group));
        if analysis.group_overridden {
            out.push_str(" _(manual override)_");
        }
        out.push('\n');
        out.push_str(&format!(
            "- **Coverage:** {:.1}% ({} of {} terms)\n",
            analysis.coverage.ratio * 100.0,
            analysis.coverage.matched_terms,
            analysis.coverage.total_jd_terms
        ));
        out.push_str(&format!(
            "- **Alignment score:** {:.4}\n- **Trust:** {:.1}\n- **Visibility:** {:.1}\n",
            analysis.alignment_score, analysis.trust_score, analysis.visibility_score
        ));
        out.push_str(&format!("- **Verdict:** {}\n\n", report.verdict));

        out.push_str("## Domain coverage\n\n");
        out.push_str("| Domain | Coverage | Matched | JD terms |\n");
        out.push_str("|--------|---------:|--------:|---------:|\n");
        for domain in &analysis.domain_coverage {
            if domain.jd_term_count == 0 {
                continue;
            }
            out.push_str(&format!(
                "| {} | {:.1}% | {} | {} |\n",
                domain.domain,
                domain.coverage_pct,
                domain.matched_term_count,
                domain.jd_term_count
            ));
        }
        out.push('\n');

        let gapped: Vec<_> = analysis
            .domain_coverage
            .iter()
            .filter(|d| !d.missing_terms.is_empty())
            .collect();
        if !gapped.is_empty() {
            out.push_str("## Missing terms\n\n");
            for domain in gapped {
                out.push_str(&format!("**{}**\n\n", domain.domain));
                for gap in &domain.missing_terms {
                    match &gap.near_miss {
                        Some(near) => out.push_str(&format!(
                            "- {} (resume has \"{}\", {:.0}% similar)\n",
                            gap.term,
                            near.resume_token,
                            near.similarity * 100.0
                        )),
                        None => out.push_str(&format!("- {}\n", gap.term)),
                    }
                }
                out.push('\n');
            }
        }

        if !analysis.suggested_titles.is_empty() {
            out.push_str("## Suggested titles\n\n");
            for title in &analysis.suggested_titles {
                out.push_str(&format!("- {}\n", title));
            }
            out.push('\n');
        }

        out.push_str("## Optimization prompt\n\n");
        out.push_str(&format!("> {}\n", report.hyperprompt));

        Ok(out)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

/// Coordinates formatters and optional save-to-file
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter,
        }
    }

    pub fn format(&self, report: &SignalReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }

    pub fn save(&self, report: &SignalReport, format: OutputFormat, path: &Path) -> Result<()> {
        // never write colored escape sequences to a file
        let content = match format {
            OutputFormat::Console => {
                ConsoleFormatter::new(false, self.console_formatter.detailed)
                    .format_report(report)?
            }
            other => self.format(report, other)?,
        };

        std::fs::write(path, content).map_err(|e| {
            SignalScorerError::OutputFormatting(format!(
                "Failed to write report to {}: {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ontology::Ontology;
    use crate::output::report::ReportMetadata;
    use crate::scoring::{AlignmentScorer, TextNormalizer};
    use chrono::Utc;

    fn sample_report() -> SignalReport {
        let ontology = Ontology::builtin();
        let scorer = AlignmentScorer::new(&ontology, &Config::default().scoring).unwrap();
        let normalizer = TextNormalizer::default();

        let resume = normalizer
            .normalize(
                "Project manager with agile delivery, stakeholder management, and growth impact.",
                "resume",
            )
            .unwrap();
        let job = normalizer
            .normalize(
                "Seeking leadership with agile, scrum, stakeholder management, and strategy.",
                "job",
            )
            .unwrap();

        let analysis = scorer
            .analyze(&resume, "resume.txt", &job, "job.txt", None)
            .unwrap();

        SignalReport::new(
            analysis,
            ReportMetadata {
                generated_at: Utc::now(),
                tool_version: "0.1.0".to_string(),
                resume_file: "resume.txt".to_string(),
                job_file: "job.txt".to_string(),
                processing_time_ms: 1,
                ontology_domains: ontology.domains.len(),
                ontology_terms: ontology.term_count(),
                resume_words: resume.raw_word_count(),
                job_words: job.raw_word_count(),
            },
        )
    }

    #[test]
    fn test_console_format_mentions_core_fields() {
        let report = sample_report();
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&report).unwrap();

        assert!(output.contains("Signal Alignment Report"));
        assert!(output.contains("Coverage:"));
        assert!(output.contains(&report.analysis.target_group));
    }

    #[test]
    fn test_json_round_trips() {
        let report = sample_report();
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_report(&report).unwrap();

        let parsed: SignalReport = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.analysis.target_group, report.analysis.target_group);
    }

    #[test]
    fn test_markdown_has_coverage_table() {
        let report = sample_report();
        let output = MarkdownFormatter.format_report(&report).unwrap();

        assert!(output.starts_with("# Signal Alignment Report"));
        assert!(output.contains("| Domain | Coverage |"));
        assert!(output.contains("## Optimization prompt"));
    }

    #[test]
    fn test_generator_routes_by_format() {
        let report = sample_report();
        let generator = ReportGenerator::new(false, false);

        assert!(generator
            .format(&report, OutputFormat::Json)
            .unwrap()
            .starts_with('{'));
        assert!(generator
            .format(&report, OutputFormat::Markdown)
            .unwrap()
            .starts_with('#'));
    }
}
