//! Signal-domain and SOC-group ontology: types, loading, validation
//!
//! The ontology is built once at startup (from a JSON file or the compiled-in
//! default) and passed by reference into every scoring call. It is never
//! mutated after construction.

use crate::error::{Result, SignalScorerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A named cluster of related vocabulary representing one dimension of
/// professional signal (e.g. "Leadership & Influence").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalDomain {
    pub name: String,
    /// Case-insensitive terms and short phrases, in declaration order.
    pub terms: Vec<String>,
}

/// A standard occupational classification group, annotated with the signal
/// domains most relevant to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationalGroup {
    pub name: String,
    /// Descriptive only, never used in scoring.
    #[serde(default)]
    pub example_titles: Vec<String>,
    /// 2-4 preferred signal-domain names, in priority order.
    pub signal_domains: Vec<String>,
}

/// The combined static definition of signal domains and occupational groups.
///
/// Domain declaration order matters: it drives first-domain-wins resolution
/// for terms that appear in more than one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    pub domains: Vec<SignalDomain>,
    pub groups: Vec<OccupationalGroup>,
}

/// On-disk shape used by the original ontology.json files:
/// `{"SignalDomains": {name: [terms]}, "SOC_Groups": {name: {...}}}`.
#[derive(Debug, Deserialize)]
struct OntologyFile {
    #[serde(rename = "SignalDomains")]
    signal_domains: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "SOC_Groups")]
    soc_groups: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GroupFile {
    #[serde(default)]
    example_titles: Vec<String>,
    #[serde(default)]
    signal_domains: Vec<String>,
}

impl Ontology {
    /// Build and validate an ontology from parts.
    pub fn new(domains: Vec<SignalDomain>, groups: Vec<OccupationalGroup>) -> Result<Self> {
        let ontology = Self { domains, groups };
        ontology.validate()?;
        Ok(ontology)
    }

    /// Load an ontology from a JSON file in the `SignalDomains`/`SOC_Groups`
    /// shape.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse an ontology from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: OntologyFile = serde_json::from_str(content)
            .map_err(|e| SignalScorerError::Configuration(format!("Invalid ontology JSON: {}", e)))?;

        let mut domains = Vec::new();
        for (name, value) in file.signal_domains {
            let terms: Vec<String> = serde_json::from_value(value).map_err(|e| {
                SignalScorerError::Configuration(format!(
                    "Signal domain '{}' must map to a list of terms: {}",
                    name, e
                ))
            })?;
            domains.push(SignalDomain { name, terms });
        }

        let mut groups = Vec::new();
        for (name, value) in file.soc_groups {
            let group: GroupFile = serde_json::from_value(value).map_err(|e| {
                SignalScorerError::Configuration(format!("Invalid SOC group '{}': {}", name, e))
            })?;
            groups.push(OccupationalGroup {
                name,
                example_titles: group.example_titles,
                signal_domains: group.signal_domains,
            });
        }

        Self::new(domains, groups)
    }

    /// Structural validation: non-empty domains, and every preferred-domain
    /// name referenced by a group must exist.
    pub fn validate(&self) -> Result<()> {
        if self.domains.is_empty() {
            return Err(SignalScorerError::Configuration(
                "Ontology defines no signal domains".to_string(),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for domain in &self.domains {
            if domain.name.trim().is_empty() {
                return Err(SignalScorerError::Configuration(
                    "Signal domain with empty name".to_string(),
                ));
            }
            if domain.terms.is_empty() {
                return Err(SignalScorerError::Configuration(format!(
                    "Signal domain '{}' has no terms",
                    domain.name
                )));
            }
            if !seen.insert(domain.name.as_str()) {
                return Err(SignalScorerError::Configuration(format!(
                    "Duplicate signal domain '{}'",
                    domain.name
                )));
            }
        }

        for group in &self.groups {
            if group.signal_domains.is_empty() {
                return Err(SignalScorerError::Configuration(format!(
                    "SOC group '{}' lists no signal domains",
                    group.name
                )));
            }
            for domain_name in &group.signal_domains {
                if !seen.contains(domain_name.as_str()) {
                    return Err(SignalScorerError::Configuration(format!(
                        "SOC group '{}' references unknown signal domain '{}'",
                        group.name, domain_name
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn domain(&self, name: &str) -> Option<&SignalDomain> {
        self.domains.iter().find(|d| d.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&OccupationalGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn domain_names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn term_count(&self) -> usize {
        self.domains.iter().map(|d| d.terms.len()).sum()
    }

    /// The compiled-in default ontology: nine signal domains of business
    /// vocabulary and five SOC groups with their preferred domains.
    pub fn builtin() -> Self {
        let domains = vec![
            domain(
                "Leadership & Influence",
                &[
                    "project management", "project manager", "team leadership",
                    "stakeholder management", "scrum master", "product owner", "manager",
                    "director", "coordination", "planning", "execution", "delivery",
                    "milestone", "leadership", "vision", "strategy", "oversight",
                    "team lead", "cross-functional", "program management",
                    "change management",
                ],
            ),
            domain(
                "Systems & Structure",
                &[
                    "agile", "scrum", "waterfall", "kanban", "methodology", "process",
                    "workflow", "sdlc", "requirements", "specifications", "deliverables",
                    "timeline", "budget", "scope", "quality assurance", "testing",
                    "deployment", "implementation", "integration", "project lifecycle",
                    "framework", "standards", "configuration", "governance",
                ],
            ),
            domain(
                "AI & Technical Literacy",
                &[
                    "technology", "software", "information technology", "technical",
                    "systems", "development", "programming", "database", "cloud",
                    "security", "networking", "applications", "digital", "engineering",
                    "hardware", "technical requirements",
                ],
            ),
            domain(
                "Communication Strategy",
                &[
                    "communication", "collaboration", "documentation", "reporting",
                    "meeting", "stakeholder", "team", "coordination", "facilitation",
                    "presentation", "client", "customer", "vendor", "partner",
                    "interdisciplinary",
                ],
            ),
            domain(
                "Data & Evidence",
                &[
                    "analysis", "reporting", "metrics", "performance", "measurement",
                    "evaluation", "quality", "testing", "documentation", "data",
                    "tracking", "monitoring", "kpis", "dashboard", "assessment",
                    "review", "audit", "validation",
                ],
            ),
            domain(
                "Outcomes & Impact",
                &[
                    "results", "outcomes", "success", "performance", "improvement",
                    "efficiency", "productivity", "roi", "value", "impact", "goals",
                    "objectives", "delivery", "achievements", "optimization",
                    "cost reduction", "benefit", "growth",
                ],
            ),
            domain(
                "Risk & Compliance",
                &[
                    "risk management", "compliance", "standards", "policies",
                    "procedures", "security", "safety", "audit", "quality",
                    "regulatory", "governance",
                ],
            ),
            domain(
                "Adaptation & Flexibility",
                &[
                    "change", "flexibility", "adaptability", "problem solving",
                    "troubleshooting", "innovation", "improvement", "scalability",
                    "agility", "evolution",
                ],
            ),
            domain(
                "Collaboration & Relational Work",
                &[
                    "teamwork", "collaboration", "partnership", "coordination",
                    "support", "communication", "relationship", "shared goals",
                    "trust",
                ],
            ),
        ];

        let groups = vec![
            group(
                "Management Occupations",
                &["Project Manager", "Program Director", "Operations Manager"],
                &[
                    "Leadership & Influence",
                    "Systems & Structure",
                    "Outcomes & Impact",
                ],
            ),
            group(
                "Computer and Mathematical Occupations",
                &["Software Engineer", "Systems Analyst", "Data Engineer"],
                &[
                    "AI & Technical Literacy",
                    "Systems & Structure",
                    "Data & Evidence",
                ],
            ),
            group(
                "AI, Data & UX Leadership Occupations",
                &["Data Science Lead", "AI Product Manager", "UX Research Lead"],
                &[
                    "AI & Technical Literacy",
                    "Data & Evidence",
                    "Leadership & Influence",
                ],
            ),
            group(
                "Life, Physical, and Social Science Occupations",
                &["Research Scientist", "Lab Manager", "Policy Analyst"],
                &[
                    "Data & Evidence",
                    "Risk & Compliance",
                    "Communication Strategy",
                ],
            ),
            group(
                "Education, Training, and Library Occupations",
                &["Instructional Designer", "Training Manager", "Curriculum Lead"],
                &[
                    "Communication Strategy",
                    "Collaboration & Relational Work",
                    "Adaptation & Flexibility",
                ],
            ),
        ];

        // The builtin data is known-consistent; validation cannot fail here.
        Self { domains, groups }
    }
}

fn domain(name: &str, terms: &[&str]) -> SignalDomain {
    SignalDomain {
        name: name.to_string(),
        terms: terms.iter().map(|t| t.to_string()).collect(),
    }
}

fn group(name: &str, titles: &[&str], domains: &[&str]) -> OccupationalGroup {
    OccupationalGroup {
        name: name.to_string(),
        example_titles: titles.iter().map(|t| t.to_string()).collect(),
        signal_domains: domains.iter().map(|d| d.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let ontology = Ontology::builtin();
        assert!(ontology.validate().is_ok());
        assert_eq!(ontology.domains.len(), 9);
        assert_eq!(ontology.groups.len(), 5);
        assert!(ontology.term_count() > 100);
    }

    #[test]
    fn test_group_lookup() {
        let ontology = Ontology::builtin();
        let mgmt = ontology.group("Management Occupations").unwrap();
        assert!(mgmt.signal_domains.contains(&"Leadership & Influence".to_string()));
        assert!(!mgmt.example_titles.is_empty());
        assert!(ontology.group("Unknown Occupations").is_none());
    }

    #[test]
    fn test_missing_domain_reference_is_configuration_error() {
        let domains = vec![SignalDomain {
            name: "Outcomes & Impact".to_string(),
            terms: vec!["impact".to_string()],
        }];
        let groups = vec![OccupationalGroup {
            name: "Management Occupations".to_string(),
            example_titles: vec![],
            signal_domains: vec!["Leadership & Influence".to_string()],
        }];

        let err = Ontology::new(domains, groups).unwrap_err();
        match err {
            SignalScorerError::Configuration(msg) => {
                assert!(msg.contains("Leadership & Influence"));
                assert!(msg.contains("Management Occupations"));
            }
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_domain_terms_rejected() {
        let domains = vec![SignalDomain {
            name: "Empty".to_string(),
            terms: vec![],
        }];
        let result = Ontology::new(domains, vec![]);
        assert!(matches!(result, Err(SignalScorerError::Configuration(_))));
    }

    #[test]
    fn test_duplicate_domain_rejected() {
        let domains = vec![
            SignalDomain {
                name: "Data & Evidence".to_string(),
                terms: vec!["data".to_string()],
            },
            SignalDomain {
                name: "Data & Evidence".to_string(),
                terms: vec!["metrics".to_string()],
            },
        ];
        let result = Ontology::new(domains, vec![]);
        assert!(matches!(result, Err(SignalScorerError::Configuration(_))));
    }

    #[test]
    fn test_load_from_json() {
        let json = r#"{
            "SignalDomains": {
                "Outcomes & Impact": ["impact", "roi", "growth"],
                "Leadership & Influence": ["leadership", "strategy"]
            },
            "SOC_Groups": {
                "Management Occupations": {
                    "example_titles": ["Project Manager"],
                    "signal_domains": ["Leadership & Influence", "Outcomes & Impact"]
                }
            }
        }"#;

        let ontology = Ontology::from_json_str(json).unwrap();
        assert_eq!(ontology.domains.len(), 2);
        assert_eq!(ontology.groups.len(), 1);
        assert_eq!(
            ontology.domain("Outcomes & Impact").unwrap().terms,
            vec!["impact", "roi", "growth"]
        );
    }

    #[test]
    fn test_load_rejects_bad_reference() {
        let json = r#"{
            "SignalDomains": {"Outcomes & Impact": ["impact"]},
            "SOC_Groups": {
                "Management Occupations": {"signal_domains": ["Nonexistent Domain"]}
            }
        }"#;

        let err = Ontology::from_json_str(json).unwrap_err();
        match err {
            SignalScorerError::Configuration(msg) => assert!(msg.contains("Nonexistent Domain")),
            other => panic!("expected Configuration error, got {:?}", other),
        }
    }
}
