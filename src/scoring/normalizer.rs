//! Text normalization into a matchable token / phrase stream

use crate::error::{Result, SignalScorerError};
use regex::Regex;
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Default minimum token length, matching the original word-length cutoff.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Largest phrase window emitted by the candidate stream.
pub const MAX_NGRAM: usize = 3;

pub struct TextNormalizer {
    url_regex: Regex,
    email_regex: Regex,
    camel_case_regex: Regex,
    min_token_len: usize,
}

/// A normalized document: lower-cased tokens with edge punctuation stripped
/// and internal hyphens preserved, grouped into adjacency segments. A
/// dropped token (too short, pure number, pure punctuation) ends the current
/// segment, so words it separated in the source text never form a phrase.
/// The same document can be re-scanned for any number of domains without
/// re-normalizing.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    tokens: Vec<String>,
    /// Runs of source-adjacent tokens, as index ranges into `tokens`.
    segments: Vec<Range<usize>>,
    /// Each segment's tokens joined with single spaces.
    segment_texts: Vec<String>,
    raw_word_count: usize,
    raw_char_count: usize,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_LEN)
    }
}

impl TextNormalizer {
    pub fn new(min_token_len: usize) -> Self {
        let url_regex = Regex::new(r"https?://\S+").expect("Invalid URL regex");
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");
        let camel_case_regex = Regex::new(r"([a-z])([A-Z])").expect("Invalid camelCase regex");

        Self {
            url_regex,
            email_regex,
            camel_case_regex,
            min_token_len,
        }
    }

    /// Normalize raw extracted text into a candidate stream.
    ///
    /// Fails with `EmptyDocument` when nothing survives normalization, so
    /// callers can distinguish a data-quality problem from a low score.
    pub fn normalize(&self, text: &str, source: &str) -> Result<NormalizedDocument> {
        let raw_word_count = text.unicode_words().count();
        let raw_char_count = text.chars().count();

        let mut cleaned = self.url_regex.replace_all(text, " ").to_string();
        cleaned = self.email_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self
            .camel_case_regex
            .replace_all(&cleaned, "$1 $2")
            .to_string();

        let mut tokens = Vec::new();
        let mut segments: Vec<Range<usize>> = Vec::new();
        let mut segment_start: Option<usize> = None;

        for raw in cleaned.split_whitespace() {
            let token = Self::trim_edge_punctuation(raw).to_lowercase();
            let keep = token.len() >= self.min_token_len
                && !token.chars().all(|c| c.is_ascii_digit());

            if keep {
                segment_start.get_or_insert(tokens.len());
                tokens.push(token);
            } else if let Some(start) = segment_start.take() {
                segments.push(start..tokens.len());
            }
        }
        if let Some(start) = segment_start {
            segments.push(start..tokens.len());
        }

        if tokens.is_empty() {
            return Err(SignalScorerError::EmptyDocument(format!(
                "No scorable content in {}",
                source
            )));
        }

        let segment_texts = segments
            .iter()
            .map(|range| tokens[range.clone()].join(" "))
            .collect();

        Ok(NormalizedDocument {
            tokens,
            segments,
            segment_texts,
            raw_word_count,
            raw_char_count,
        })
    }

    /// Strip leading/trailing punctuation while preserving internal hyphens,
    /// so "decision-making," stays one phrase-matchable unit.
    fn trim_edge_punctuation(token: &str) -> &str {
        token.trim_matches(|c: char| !c.is_alphanumeric())
    }
}

impl NormalizedDocument {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Token count, the denominator for size-invariant normalized scores.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// The adjacency segments as space-joined strings. Phrase matching with
    /// word-boundary checks against each segment is equivalent to scanning
    /// the token and n-gram stream with greedy longest-match, and never
    /// bridges a dropped token.
    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.segment_texts.iter().map(|s| s.as_str())
    }

    /// Restartable candidate stream: every token, followed by every 2- and
    /// 3-token window within an adjacency segment. Call again to re-scan.
    pub fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        let unigrams = self.tokens.iter().cloned();
        let ngrams = (2..=MAX_NGRAM).flat_map(move |n| {
            self.segments.iter().flat_map(move |range| {
                self.tokens[range.clone()]
                    .windows(n)
                    .map(|window| window.join(" "))
            })
        });
        unigrams.chain(ngrams)
    }

    /// Membership test used for term presence checks during gap analysis.
    /// Phrases of any length are accepted, but must fall inside a single
    /// adjacency segment, mirroring what the matcher can credit.
    pub fn contains_candidate(&self, phrase: &str) -> bool {
        let words = phrase.split_whitespace().count();
        match words {
            0 => false,
            1 => self.tokens.iter().any(|t| t == phrase),
            n => self.segments.iter().any(|range| {
                self.tokens[range.clone()]
                    .windows(n)
                    .any(|window| window.join(" ") == phrase)
            }),
        }
    }

    pub fn raw_word_count(&self) -> usize {
        self.raw_word_count
    }

    pub fn raw_char_count(&self) -> usize {
        self.raw_char_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> NormalizedDocument {
        TextNormalizer::default().normalize(text, "test").unwrap()
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let doc = normalize("Drove 20% Growth, and measurable IMPACT!");
        assert!(doc.tokens().contains(&"growth".to_string()));
        assert!(doc.tokens().contains(&"impact".to_string()));
        // "20%" trims to a pure number and is dropped
        assert!(!doc.tokens().iter().any(|t| t.contains('2')));
    }

    #[test]
    fn test_preserves_internal_hyphens() {
        let doc = normalize("Strong decision-making and cross-functional work.");
        assert!(doc.tokens().contains(&"decision-making".to_string()));
        assert!(doc.tokens().contains(&"cross-functional".to_string()));
    }

    #[test]
    fn test_collapses_whitespace_runs() {
        let doc = normalize("alpha\t\tbeta\n\n  gamma\u{00A0}delta");
        assert_eq!(doc.tokens(), &["alpha", "beta", "gamma", "delta"]);
        // whitespace runs alone never split a segment
        assert_eq!(
            doc.segments().collect::<Vec<_>>(),
            vec!["alpha beta gamma delta"]
        );
    }

    #[test]
    fn test_strips_urls_and_emails() {
        let doc = normalize("See https://example.com/profile or jane@example.com for details");
        assert!(doc.tokens().iter().all(|t| !t.contains("example.com")));
        assert!(doc.tokens().contains(&"details".to_string()));
    }

    #[test]
    fn test_dropped_tokens_split_segments() {
        // "2024" is dropped, so "project" and "management" were never
        // adjacent in the source and must not form a phrase
        let doc = normalize("project 2024 management review");
        assert_eq!(doc.tokens(), &["project", "management", "review"]);
        assert_eq!(
            doc.segments().collect::<Vec<_>>(),
            vec!["project", "management review"]
        );
        assert!(!doc.contains_candidate("project management"));
        assert!(doc.contains_candidate("management review"));

        let candidates: Vec<String> = doc.candidates().collect();
        assert!(!candidates.contains(&"project management".to_string()));
        assert!(candidates.contains(&"management review".to_string()));
    }

    #[test]
    fn test_short_tokens_split_segments() {
        let doc = normalize("team to lead generation");
        assert!(!doc.contains_candidate("team lead"));
        assert!(doc.contains_candidate("lead generation"));
    }

    #[test]
    fn test_candidate_stream_includes_ngrams() {
        let doc = normalize("project management office lead");
        let candidates: Vec<String> = doc.candidates().collect();
        assert!(candidates.contains(&"project".to_string()));
        assert!(candidates.contains(&"project management".to_string()));
        assert!(candidates.contains(&"project management office".to_string()));
        // 4 unigrams + 3 bigrams + 2 trigrams
        assert_eq!(candidates.len(), 9);
    }

    #[test]
    fn test_candidate_stream_is_restartable() {
        let doc = normalize("alpha beta gamma");
        let first: Vec<String> = doc.candidates().collect();
        let second: Vec<String> = doc.candidates().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_contains_candidate_phrases() {
        let doc = normalize("stakeholder management and agile delivery");
        assert!(doc.contains_candidate("stakeholder management"));
        assert!(doc.contains_candidate("agile"));
        assert!(!doc.contains_candidate("risk management"));
    }

    #[test]
    fn test_contains_candidate_beyond_window_size() {
        let doc = normalize("global software development life cycle expertise");
        assert!(doc.contains_candidate("software development life cycle"));
        assert!(!doc.contains_candidate("development life cycle governance"));
    }

    #[test]
    fn test_empty_input_fails() {
        let result = TextNormalizer::default().normalize("  \n\t ... 12 42 ", "resume");
        assert!(matches!(
            result,
            Err(crate::error::SignalScorerError::EmptyDocument(_))
        ));
    }

    #[test]
    fn test_camel_case_split() {
        let doc = normalize("Used projectManagement tooling");
        assert!(doc.tokens().contains(&"project".to_string()));
        assert!(doc.tokens().contains(&"management".to_string()));
    }
}
