//! Final report assembly: analysis plus metadata, verdict, and the
//! generated optimization prompt

use crate::scoring::scorer::AlignmentAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The complete report handed to formatters and, optionally, to an external
/// suggestion generator. The engine itself never calls any AI provider; the
/// hyperprompt is plain text for the caller to use or ignore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    pub analysis: AlignmentAnalysis,
    /// One-line reading of the coverage ratio.
    pub verdict: String,
    /// Generated optimization prompt naming the target group, critical
    /// domains, and top missing terms.
    pub hyperprompt: String,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub processing_time_ms: u64,
    pub ontology_domains: usize,
    pub ontology_terms: usize,
    pub resume_words: usize,
    pub job_words: usize,
}

impl SignalReport {
    pub fn new(analysis: AlignmentAnalysis, metadata: ReportMetadata) -> Self {
        let verdict = verdict_for(analysis.coverage.ratio);
        let hyperprompt = generate_hyperprompt(&analysis);

        Self {
            analysis,
            verdict,
            hyperprompt,
            metadata,
        }
    }
}

fn verdict_for(coverage_ratio: f64) -> String {
    let pct = (coverage_ratio * 100.0).round() as u8;
    match pct {
        90..=100 => "Excellent signal coverage for this role".to_string(),
        70..=89 => "Strong coverage - minor vocabulary gaps remain".to_string(),
        50..=69 => "Moderate coverage - several signal gaps to close".to_string(),
        30..=49 => "Weak coverage - significant vocabulary gaps".to_string(),
        _ => "Poor coverage - the resume misses most of this role's signals".to_string(),
    }
}

/// Build an optimization prompt from the analysis: target group, critical
/// domains, and up to ten missing terms drawn from the critical domains
/// (top three per domain).
fn generate_hyperprompt(analysis: &AlignmentAnalysis) -> String {
    let mut top_gaps: Vec<&str> = Vec::new();
    for coverage in &analysis.domain_coverage {
        if !analysis.critical_domains.contains(&coverage.domain) {
            continue;
        }
        for gap in coverage.missing_terms.iter().take(3) {
            top_gaps.push(&gap.term);
        }
    }
    top_gaps.truncate(10);

    let mut parts = vec![
        format!(
            "You are optimizing a resume for a role in {}.",
            analysis.target_group
        ),
        format!(
            "Critical skill domains: {}.",
            analysis.critical_domains.join(", ")
        ),
    ];

    if !top_gaps.is_empty() {
        parts.push(format!(
            "Key missing terms to incorporate: {}.",
            top_gaps.join(", ")
        ));
    }

    parts.push(
        "Maintain authentic voice while strategically incorporating relevant terminology."
            .to_string(),
    );

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::scorer::{
        CoverageSummary, DomainCoverage, GapTerm, GroupScore, ScoreReport,
    };

    fn analysis_with_gaps() -> AlignmentAnalysis {
        let empty_report = ScoreReport {
            source: "test".to_string(),
            token_count: 10,
            domain_scores: vec![],
        };
        AlignmentAnalysis {
            resume: empty_report.clone(),
            job: empty_report,
            target_group: "Management Occupations".to_string(),
            group_overridden: false,
            group_scores: vec![GroupScore {
                group: "Management Occupations".to_string(),
                score: 0.1,
            }],
            alignment_score: 0.05,
            critical_domains: vec!["Leadership & Influence".to_string()],
            suggested_titles: vec!["Project Manager".to_string()],
            domain_coverage: vec![DomainCoverage {
                domain: "Leadership & Influence".to_string(),
                jd_term_count: 4,
                matched_term_count: 2,
                coverage_pct: 50.0,
                missing_terms: vec![
                    GapTerm {
                        term: "strategy".to_string(),
                        near_miss: None,
                    },
                    GapTerm {
                        term: "stakeholder management".to_string(),
                        near_miss: None,
                    },
                ],
            }],
            coverage: CoverageSummary {
                total_jd_terms: 4,
                matched_terms: 2,
                ratio: 0.5,
            },
            trust_score: 50.0,
            visibility_score: 100.0,
        }
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            generated_at: Utc::now(),
            tool_version: "0.1.0".to_string(),
            resume_file: "resume.txt".to_string(),
            job_file: "job.txt".to_string(),
            processing_time_ms: 3,
            ontology_domains: 1,
            ontology_terms: 4,
            resume_words: 100,
            job_words: 80,
        }
    }

    #[test]
    fn test_hyperprompt_names_group_and_gaps() {
        let report = SignalReport::new(analysis_with_gaps(), metadata());
        assert!(report.hyperprompt.contains("Management Occupations"));
        assert!(report.hyperprompt.contains("Leadership & Influence"));
        assert!(report.hyperprompt.contains("strategy"));
        assert!(report.hyperprompt.contains("stakeholder management"));
    }

    #[test]
    fn test_verdict_tiers() {
        assert!(verdict_for(0.95).contains("Excellent"));
        assert!(verdict_for(0.75).contains("Strong"));
        assert!(verdict_for(0.55).contains("Moderate"));
        assert!(verdict_for(0.35).contains("Weak"));
        assert!(verdict_for(0.10).contains("Poor"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = SignalReport::new(analysis_with_gaps(), metadata());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"target_group\""));
        assert!(json.contains("\"hyperprompt\""));
    }
}
