use serde::{Deserialize, Serialize};

use crate::application::services::generation_orchestrator::GeneratedArtifact;
use crate::domain::entities::{ArtifactSelector, DiagramKind, SummaryLevel};

#[derive(Debug, Deserialize)]
pub struct RegenerateRequestDto {
    /// One of: summary, diagram, code_snippets, references, insights.
    pub kind: String,
    pub level: Option<String>,
    pub diagram: Option<String>,
    pub instruction: Option<String>,
    pub rag_query: Option<String>,
    pub include_external: Option<bool>,
}

impl RegenerateRequestDto {
    pub fn selector(&self) -> Result<ArtifactSelector, String> {
        match self.kind.to_lowercase().as_str() {
            "summary" => {
                let level = match self.level.as_deref() {
                    Some(raw) => SummaryLevel::parse(raw)
                        .ok_or_else(|| format!("unknown summary level: {}", raw))?,
                    None => SummaryLevel::Intermediate,
                };
                Ok(ArtifactSelector::Summary(level))
            }
            "diagram" => {
                let kind = match self.diagram.as_deref() {
                    Some(raw) => DiagramKind::parse(raw)
                        .ok_or_else(|| format!("unknown diagram kind: {}", raw))?,
                    None => DiagramKind::Flowchart,
                };
                Ok(ArtifactSelector::Diagram(kind))
            }
            "code_snippets" => Ok(ArtifactSelector::CodeSnippets),
            "references" => Ok(ArtifactSelector::References),
            "insights" => Ok(ArtifactSelector::Insights),
            other => Err(format!("unknown artifact kind: {}", other)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegenerateResponseDto {
    pub kind: String,
    pub content: serde_json::Value,
}

impl RegenerateResponseDto {
    pub fn from_artifact(selector: ArtifactSelector, artifact: &GeneratedArtifact) -> Self {
        let content = match artifact {
            GeneratedArtifact::Prose(text) => serde_json::Value::String(text.clone()),
            GeneratedArtifact::Diagram(markup) => serde_json::Value::String(markup.clone()),
            GeneratedArtifact::CodeSnippets(snippets) => {
                serde_json::to_value(snippets).unwrap_or_default()
            }
            GeneratedArtifact::References(references) => {
                serde_json::to_value(references).unwrap_or_default()
            }
            GeneratedArtifact::Insights(insights) => {
                serde_json::to_value(insights).unwrap_or_default()
            }
        };
        Self {
            kind: selector.label().to_string(),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(kind: &str) -> RegenerateRequestDto {
        RegenerateRequestDto {
            kind: kind.to_string(),
            level: None,
            diagram: None,
            instruction: None,
            rag_query: None,
            include_external: None,
        }
    }

    #[test]
    fn test_summary_defaults_to_intermediate() {
        let selector = dto("summary").selector().unwrap();
        assert_eq!(
            selector,
            ArtifactSelector::Summary(SummaryLevel::Intermediate)
        );
    }

    #[test]
    fn test_explicit_level_and_diagram() {
        let mut request = dto("summary");
        request.level = Some("expert".to_string());
        assert_eq!(
            request.selector().unwrap(),
            ArtifactSelector::Summary(SummaryLevel::Expert)
        );

        let mut request = dto("diagram");
        request.diagram = Some("mindmap".to_string());
        assert_eq!(
            request.selector().unwrap(),
            ArtifactSelector::Diagram(DiagramKind::Mindmap)
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(dto("poem").selector().is_err());
        let mut request = dto("summary");
        request.level = Some("wizard".to_string());
        assert!(request.selector().is_err());
    }
}
