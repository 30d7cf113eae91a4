use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Target audience for a generated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl SummaryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLevel::Beginner => "beginner",
            SummaryLevel::Intermediate => "intermediate",
            SummaryLevel::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "beginner" => Some(SummaryLevel::Beginner),
            "intermediate" => Some(SummaryLevel::Intermediate),
            "expert" => Some(SummaryLevel::Expert),
            _ => None,
        }
    }

    pub fn audience_hint(&self) -> &'static str {
        match self {
            SummaryLevel::Beginner => {
                "a curious reader with no background in the field; avoid jargon, explain every concept"
            }
            SummaryLevel::Intermediate => {
                "a graduate student familiar with the field; keep standard terminology, explain novel ideas"
            }
            SummaryLevel::Expert => {
                "a researcher working in this area; be dense, precise, and focus on what is new"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Mindmap,
}

impl DiagramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Mindmap => "mindmap",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flowchart" => Some(DiagramKind::Flowchart),
            "sequence" => Some(DiagramKind::Sequence),
            "mindmap" => Some(DiagramKind::Mindmap),
            _ => None,
        }
    }

    /// Mermaid header expected on the first meaningful line of the output.
    pub fn mermaid_header(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequenceDiagram",
            DiagramKind::Mindmap => "mindmap",
        }
    }
}

/// A code fragment extracted or reconstructed from the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub description: String,
    pub code: String,
    pub language: String,
}

/// A cited work extracted from the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub authors: String,
    pub year: Option<String>,
}

/// A retrieval-grounded observation about the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
}

/// Derived outputs persisted on the project record. Each field is
/// independently regenerable; none of them carries its context block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectArtifacts {
    pub summaries: HashMap<SummaryLevel, String>,
    pub diagrams: HashMap<DiagramKind, String>,
    pub code_snippets: Vec<CodeSnippet>,
    pub references: Vec<Reference>,
    pub insights: Vec<Insight>,
}

impl ProjectArtifacts {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
            && self.diagrams.is_empty()
            && self.code_snippets.is_empty()
            && self.references.is_empty()
            && self.insights.is_empty()
    }
}

/// Which artifact a regeneration request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSelector {
    Summary(SummaryLevel),
    Diagram(DiagramKind),
    CodeSnippets,
    References,
    Insights,
}

impl ArtifactSelector {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactSelector::Summary(_) => "summary",
            ArtifactSelector::Diagram(_) => "diagram",
            ArtifactSelector::CodeSnippets => "code_snippets",
            ArtifactSelector::References => "references",
            ArtifactSelector::Insights => "insights",
        }
    }

    /// Canned retrieval query used when the caller supplies none.
    pub fn default_rag_query(&self) -> &'static str {
        match self {
            ArtifactSelector::Summary(_) => "main contributions, methodology and findings",
            ArtifactSelector::Diagram(_) => "system architecture, pipeline and methodology",
            ArtifactSelector::CodeSnippets => "algorithms, pseudocode and implementation details",
            ArtifactSelector::References => "cited works, related research and prior art",
            ArtifactSelector::Insights => "limitations, implications and open questions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_level_parse_round_trip() {
        for level in [
            SummaryLevel::Beginner,
            SummaryLevel::Intermediate,
            SummaryLevel::Expert,
        ] {
            assert_eq!(SummaryLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(SummaryLevel::parse("phd"), None);
    }

    #[test]
    fn test_diagram_kind_parse_is_case_insensitive() {
        assert_eq!(DiagramKind::parse("Flowchart"), Some(DiagramKind::Flowchart));
        assert_eq!(DiagramKind::parse("SEQUENCE"), Some(DiagramKind::Sequence));
        assert_eq!(DiagramKind::parse("pie"), None);
    }

    #[test]
    fn test_empty_artifacts() {
        let mut artifacts = ProjectArtifacts::default();
        assert!(artifacts.is_empty());

        artifacts
            .summaries
            .insert(SummaryLevel::Intermediate, "a summary".to_string());
        assert!(!artifacts.is_empty());
    }

    #[test]
    fn test_artifacts_serde_round_trip() {
        let mut artifacts = ProjectArtifacts::default();
        artifacts
            .summaries
            .insert(SummaryLevel::Expert, "dense summary".to_string());
        artifacts
            .diagrams
            .insert(DiagramKind::Flowchart, "flowchart TD\n    a --> b".to_string());
        artifacts.references.push(Reference {
            title: "Attention Is All You Need".to_string(),
            authors: "Vaswani et al.".to_string(),
            year: Some("2017".to_string()),
        });

        let json = serde_json::to_string(&artifacts).unwrap();
        let back: ProjectArtifacts = serde_json::from_str(&json).unwrap();
        assert_eq!(artifacts, back);
    }
}
