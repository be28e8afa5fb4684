//! Domain term matching with greedy longest-match semantics

use crate::config::{MatchPolicy, OverlapPolicy};
use crate::error::{Result, SignalScorerError};
use crate::ontology::Ontology;
use crate::scoring::normalizer::NormalizedDocument;
use aho_corasick::AhoCorasick;
use log::warn;
use std::collections::HashMap;

/// Matches ontology terms against normalized documents.
///
/// All domain terms are compiled into a single leftmost-longest automaton so
/// that an occurrence of "project management" is never also credited to
/// "management", and "teamwork" never credits a domain that only declares
/// "team". Each adjacency segment is scanned separately with word-boundary
/// validation, so a phrase never bridges a token that normalization dropped.
pub struct DomainMatcher {
    automaton: AhoCorasick,
    patterns: Vec<TermPattern>,
    domain_names: Vec<String>,
    match_policy: MatchPolicy,
    overlap_policy: OverlapPolicy,
}

/// One deduplicated normalized term and the domains declaring it, in
/// ontology declaration order.
#[derive(Debug, Clone)]
struct TermPattern {
    term: String,
    domain_indices: Vec<usize>,
}

/// Occurrence counts for one domain within one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainMatches {
    pub domain: String,
    /// Total credited occurrences under the active match policy.
    pub count: usize,
    /// Per-term occurrence counts, in first-seen order.
    pub term_counts: Vec<(String, usize)>,
}

impl DomainMatcher {
    pub fn new(
        ontology: &Ontology,
        match_policy: MatchPolicy,
        overlap_policy: OverlapPolicy,
    ) -> Result<Self> {
        let domain_names: Vec<String> = ontology.domains.iter().map(|d| d.name.clone()).collect();

        let mut patterns: Vec<TermPattern> = Vec::new();
        let mut index_by_term: HashMap<String, usize> = HashMap::new();

        for (domain_idx, domain) in ontology.domains.iter().enumerate() {
            for raw_term in &domain.terms {
                let term = Self::normalize_term(raw_term);
                if term.is_empty() {
                    // A malformed term definition skips that term only,
                    // never the whole scoring run.
                    warn!(
                        "Skipping unmatchable term {:?} in domain '{}'",
                        raw_term, domain.name
                    );
                    continue;
                }

                match index_by_term.get(&term) {
                    Some(&idx) => {
                        let declaring = &mut patterns[idx].domain_indices;
                        if !declaring.contains(&domain_idx) {
                            declaring.push(domain_idx);
                        }
                    }
                    None => {
                        index_by_term.insert(term.clone(), patterns.len());
                        patterns.push(TermPattern {
                            term,
                            domain_indices: vec![domain_idx],
                        });
                    }
                }
            }
        }

        if patterns.is_empty() {
            return Err(SignalScorerError::Configuration(
                "Ontology contains no matchable terms".to_string(),
            ));
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(patterns.iter().map(|p| p.term.as_str()))
            .map_err(|e| {
                SignalScorerError::Scoring(format!("Failed to build term matcher: {}", e))
            })?;

        Ok(Self {
            automaton,
            patterns,
            domain_names,
            match_policy,
            overlap_policy,
        })
    }

    /// Count term occurrences per domain within a normalized document.
    pub fn match_document(&self, doc: &NormalizedDocument) -> Vec<DomainMatches> {
        // term occurrence counts per domain, term keyed by pattern index
        let mut counts: Vec<HashMap<usize, usize>> =
            vec![HashMap::new(); self.domain_names.len()];

        for segment in doc.segments() {
            let bytes = segment.as_bytes();

            for mat in self.automaton.find_iter(segment) {
                if !word_bounded(bytes, mat.start(), mat.end()) {
                    continue;
                }

                let pattern_idx = mat.pattern().as_usize();
                let declaring = &self.patterns[pattern_idx].domain_indices;

                match self.overlap_policy {
                    OverlapPolicy::FirstDeclared => {
                        let first = declaring[0];
                        *counts[first].entry(pattern_idx).or_insert(0) += 1;
                    }
                    OverlapPolicy::AllDomains => {
                        for &domain_idx in declaring {
                            *counts[domain_idx].entry(pattern_idx).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        self.domain_names
            .iter()
            .enumerate()
            .map(|(domain_idx, name)| {
                let mut term_counts: Vec<(String, usize)> = counts[domain_idx]
                    .iter()
                    .map(|(&pattern_idx, &count)| {
                        let credited = match self.match_policy {
                            MatchPolicy::Frequency => count,
                            MatchPolicy::Presence => 1,
                        };
                        (self.patterns[pattern_idx].term.clone(), credited)
                    })
                    .collect();
                term_counts.sort_by(|a, b| a.0.cmp(&b.0));

                let count = term_counts.iter().map(|(_, c)| c).sum();

                DomainMatches {
                    domain: name.clone(),
                    count,
                    term_counts,
                }
            })
            .collect()
    }

    /// Normalized terms credited to the given domain under the active
    /// overlap policy, used for presence checks during gap analysis.
    pub fn terms_for_domain(&self, domain: &str) -> Vec<&str> {
        let Some(domain_idx) = self.domain_names.iter().position(|n| n == domain) else {
            return Vec::new();
        };

        self.patterns
            .iter()
            .filter(|p| match self.overlap_policy {
                OverlapPolicy::FirstDeclared => p.domain_indices[0] == domain_idx,
                OverlapPolicy::AllDomains => p.domain_indices.contains(&domain_idx),
            })
            .map(|p| p.term.as_str())
            .collect()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Terms are normalized with the same token policy as documents:
    /// lower-case, single spaces, edge punctuation stripped per word.
    fn normalize_term(term: &str) -> String {
        term.split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A match only counts when it spans whole tokens of a space-joined
/// segment. Hyphens are token-internal, so "team" does not bound-match
/// inside "team-building" either.
fn word_bounded(bytes: &[u8], start: usize, end: usize) -> bool {
    let left_ok = start == 0 || bytes[start - 1] == b' ';
    let right_ok = end == bytes.len() || bytes[end] == b' ';
    left_ok && right_ok
}
