//! Per-domain scoring, group alignment, and resume/JD comparison

use crate::config::ScoringConfig;
use crate::error::{Result, SignalScorerError};
use crate::ontology::Ontology;
use crate::scoring::matcher::DomainMatcher;
use crate::scoring::normalizer::NormalizedDocument;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// Scores normalized documents against one immutable ontology.
///
/// Every call is a pure function of its inputs; the scorer holds no mutable
/// state and may be shared freely across threads.
pub struct AlignmentScorer<'a> {
    ontology: &'a Ontology,
    matcher: DomainMatcher,
    scoring: ScoringConfig,
}

/// Per-domain scores for a single document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub source: String,
    /// Candidate token count, the denominator of normalized scores.
    pub token_count: usize,
    pub domain_scores: Vec<DomainScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub domain: String,
    /// Credited occurrences under the configured match policy.
    pub count: usize,
    /// Count divided by token count, size-invariant across documents.
    pub normalized: f64,
    pub matched_terms: Vec<TermCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// A ranked occupational-group score derived from a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group: String,
    pub score: f64,
}

/// Resume coverage of the job description's vocabulary for one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCoverage {
    pub domain: String,
    /// Domain terms that appear in the job description.
    pub jd_term_count: usize,
    /// Of those, the terms also present in the resume.
    pub matched_term_count: usize,
    /// matched / jd terms, as a percentage.
    pub coverage_pct: f64,
    pub missing_terms: Vec<GapTerm>,
}

/// A job-description term the resume lacks, optionally annotated with the
/// closest resume token when it looks like a near miss (e.g. a spelling or
/// word-form variant). Near misses never affect scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapTerm {
    pub term: String,
    pub near_miss: Option<NearMiss>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMiss {
    pub resume_token: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub total_jd_terms: usize,
    pub matched_terms: usize,
    pub ratio: f64,
}

/// Full resume-vs-job-description analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentAnalysis {
    pub resume: ScoreReport,
    pub job: ScoreReport,
    /// The occupational group scored against: predicted from the job
    /// description, or a caller override.
    pub target_group: String,
    pub group_overridden: bool,
    /// All groups ranked by predicted fit to the job description.
    pub group_scores: Vec<GroupScore>,
    /// Mean normalized resume score over the target group's preferred
    /// domains.
    pub alignment_score: f64,
    pub critical_domains: Vec<String>,
    pub suggested_titles: Vec<String>,
    pub domain_coverage: Vec<DomainCoverage>,
    pub coverage: CoverageSummary,
    /// Mean coverage of the critical domains, 0-100.
    pub trust_score: f64,
    /// Share of gap-carrying domains whose coverage still clears the
    /// visibility threshold, 0-100.
    pub visibility_score: f64,
}

impl<'a> AlignmentScorer<'a> {
    pub fn new(ontology: &'a Ontology, scoring: &ScoringConfig) -> Result<Self> {
        let matcher =
            DomainMatcher::new(ontology, scoring.match_policy, scoring.overlap_policy)?;
        Ok(Self {
            ontology,
            matcher,
            scoring: scoring.clone(),
        })
    }

    pub fn ontology(&self) -> &Ontology {
        self.ontology
    }

    pub fn term_pattern_count(&self) -> usize {
        self.matcher.pattern_count()
    }

    /// Score one document against every signal domain.
    pub fn score(&self, doc: &NormalizedDocument, source: &str) -> Result<ScoreReport> {
        let token_count = doc.token_count();
        if token_count == 0 {
            return Err(SignalScorerError::EmptyDocument(format!(
                "No scorable content in {}",
                source
            )));
        }

        let domain_scores = self
            .matcher
            .match_document(doc)
            .into_iter()
            .map(|matches| DomainScore {
                domain: matches.domain,
                count: matches.count,
                normalized: matches.count as f64 / token_count as f64,
                matched_terms: matches
                    .term_counts
                    .into_iter()
                    .map(|(term, count)| TermCount { term, count })
                    .collect(),
            })
            .collect();

        Ok(ScoreReport {
            source: source.to_string(),
            token_count,
            domain_scores,
        })
    }

    /// Aggregate alignment of a scored document against one group: the mean
    /// of the normalized scores of that group's preferred domains.
    pub fn alignment_for_group(&self, report: &ScoreReport, group_name: &str) -> Result<f64> {
        let group = self.ontology.group(group_name).ok_or_else(|| {
            SignalScorerError::InvalidInput(format!("Unknown occupational group: {}", group_name))
        })?;

        let mut total = 0.0;
        for domain_name in &group.signal_domains {
            total += report
                .domain_scores
                .iter()
                .find(|d| &d.domain == domain_name)
                .map(|d| d.normalized)
                .unwrap_or(0.0);
        }
        Ok(total / group.signal_domains.len() as f64)
    }

    /// Rank every occupational group by fit to the given (job description)
    /// report: mean normalized score over the group's preferred domains.
    pub fn rank_groups(&self, jd_report: &ScoreReport) -> Vec<GroupScore> {
        let mut scores: Vec<GroupScore> = self
            .ontology
            .groups
            .iter()
            .map(|group| GroupScore {
                group: group.name.clone(),
                // group names are validated at load, lookup cannot fail
                score: self
                    .alignment_for_group(jd_report, &group.name)
                    .unwrap_or(0.0),
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.group.cmp(&b.group))
        });
        scores
    }

    /// Full resume-vs-job-description analysis against the predicted or
    /// overridden occupational group.
    pub fn analyze(
        &self,
        resume: &NormalizedDocument,
        resume_source: &str,
        job: &NormalizedDocument,
        job_source: &str,
        group_override: Option<&str>,
    ) -> Result<AlignmentAnalysis> {
        let resume_report = self.score(resume, resume_source)?;
        let job_report = self.score(job, job_source)?;

        let group_scores = self.rank_groups(&job_report);

        let (target_group, group_overridden) = match group_override {
            Some(name) => (name.to_string(), true),
            None => {
                let top = group_scores.first().ok_or_else(|| {
                    SignalScorerError::Configuration(
                        "Ontology defines no occupational groups".to_string(),
                    )
                })?;
                (top.group.clone(), false)
            }
        };

        let group = self.ontology.group(&target_group).ok_or_else(|| {
            SignalScorerError::InvalidInput(format!(
                "Unknown occupational group: {}",
                target_group
            ))
        })?;

        let alignment_score = self.alignment_for_group(&resume_report, &target_group)?;

        let critical_domains = group.signal_domains.clone();
        let suggested_titles = group.example_titles.clone();

        let domain_coverage = self.domain_coverage(resume, job);
        let coverage = summarize_coverage(&domain_coverage);

        let trust_score = trust_score(&domain_coverage, &critical_domains);
        let visibility_score =
            visibility_score(&domain_coverage, self.scoring.visibility_threshold);

        Ok(AlignmentAnalysis {
            resume: resume_report,
            job: job_report,
            target_group,
            group_overridden,
            group_scores,
            alignment_score,
            critical_domains,
            suggested_titles,
            domain_coverage,
            coverage,
            trust_score,
            visibility_score,
        })
    }

    /// For each domain: which of its terms the job description uses, how
    /// many of those the resume covers, and which are missing.
    fn domain_coverage(
        &self,
        resume: &NormalizedDocument,
        job: &NormalizedDocument,
    ) -> Vec<DomainCoverage> {
        self.ontology
            .domains
            .iter()
            .map(|domain| {
                let jd_terms: Vec<&str> = self
                    .matcher
                    .terms_for_domain(&domain.name)
                    .into_iter()
                    .filter(|term| job.contains_candidate(term))
                    .collect();

                let (matched, missing): (Vec<&str>, Vec<&str>) = jd_terms
                    .iter()
                    .copied()
                    .partition(|term| resume.contains_candidate(term));

                let coverage_pct = if jd_terms.is_empty() {
                    0.0
                } else {
                    matched.len() as f64 / jd_terms.len() as f64 * 100.0
                };

                let missing_terms = missing
                    .iter()
                    .take(self.scoring.max_gaps_per_domain)
                    .map(|term| GapTerm {
                        term: term.to_string(),
                        near_miss: self.find_near_miss(term, resume),
                    })
                    .collect();

                DomainCoverage {
                    domain: domain.name.clone(),
                    jd_term_count: jd_terms.len(),
                    matched_term_count: matched.len(),
                    coverage_pct,
                    missing_terms,
                }
            })
            .collect()
    }

    /// The closest resume token to a missing single-word term, when it
    /// clears the similarity threshold. Phrases are not fuzzied.
    fn find_near_miss(&self, term: &str, resume: &NormalizedDocument) -> Option<NearMiss> {
        if term.contains(' ') {
            return None;
        }

        let mut best: Option<NearMiss> = None;
        for token in resume.tokens() {
            let similarity = jaro_winkler(term, token);
            if similarity >= self.scoring.near_miss_threshold
                && best.as_ref().map_or(true, |b| similarity > b.similarity)
            {
                best = Some(NearMiss {
                    resume_token: token.clone(),
                    similarity,
                });
            }
        }
        best
    }
}

fn summarize_coverage(domain_coverage: &[DomainCoverage]) -> CoverageSummary {
    let total_jd_terms: usize = domain_coverage.iter().map(|d| d.jd_term_count).sum();
    let matched_terms: usize = domain_coverage.iter().map(|d| d.matched_term_count).sum();
    let ratio = if total_jd_terms == 0 {
        0.0
    } else {
        matched_terms as f64 / total_jd_terms as f64
    };

    CoverageSummary {
        total_jd_terms,
        matched_terms,
        ratio,
    }
}

/// Mean coverage of the critical domains that the job description actually
/// exercises.
fn trust_score(domain_coverage: &[DomainCoverage], critical_domains: &[String]) -> f64 {
    let scores: Vec<f64> = domain_coverage
        .iter()
        .filter(|d| critical_domains.contains(&d.domain) && d.jd_term_count > 0)
        .map(|d| d.coverage_pct)
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Of the domains carrying gaps, the share whose coverage still clears the
/// threshold. No gaps at all is full visibility (when anything matched).
fn visibility_score(domain_coverage: &[DomainCoverage], threshold: f64) -> f64 {
    let gap_domains: Vec<&DomainCoverage> = domain_coverage
        .iter()
        .filter(|d| !d.missing_terms.is_empty())
        .collect();

    if gap_domains.is_empty() {
        if domain_coverage.iter().any(|d| d.jd_term_count > 0) {
            100.0
        } else {
            0.0
        }
    } else {
        let hits = gap_domains
            .iter()
            .filter(|d| d.coverage_pct > threshold)
            .count();
        hits as f64 / gap_domains.len() as f64 * 100.0
    }
}
