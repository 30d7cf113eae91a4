use std::sync::{Arc, LazyLock};

use futures::future::join_all;
use regex::Regex;
use serde_json::Value;

use crate::application::ports::generation_provider::{
    GenerationProvider, GenerationProviderError,
};
use crate::application::services::prompts::SYSTEM_PAPER_ANALYST;
use crate::domain::entities::{CodeSnippet, ContextBlock, DiagramKind, Insight, Reference};

/// Output below this size, or without a body line, is not a usable diagram.
const MIN_DIAGRAM_CHARS: usize = 20;

static FENCE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```\s*$")
        .expect("static fence pattern")
});

/// Expected shape of one generation call's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    Prose,
    CodeSnippets,
    References,
    Insights,
    Diagram(DiagramKind),
}

impl OutputShape {
    fn format_rules(&self) -> String {
        match self {
            OutputShape::Prose => {
                "Output format: plain prose paragraphs. No markdown headers, no code fences."
                    .to_string()
            }
            OutputShape::CodeSnippets => {
                r#"Output format: ONLY a JSON array, no code fences, no commentary.
Each element: {"description": string, "code": string, "language": string}."#
                    .to_string()
            }
            OutputShape::References => {
                r#"Output format: ONLY a JSON array, no code fences, no commentary.
Each element: {"title": string, "authors": string, "year": string or null}."#
                    .to_string()
            }
            OutputShape::Insights => {
                r#"Output format: ONLY a JSON array, no code fences, no commentary.
Each element: {"title": string, "detail": string}."#
                    .to_string()
            }
            OutputShape::Diagram(kind) => format!(
                "Output format: Mermaid markup only, starting with `{}`. No code fences, no prose.",
                kind.mermaid_header()
            ),
        }
    }

    /// What a structured shape degrades to when its output cannot be parsed.
    pub fn empty_default(&self) -> GeneratedArtifact {
        match self {
            OutputShape::Prose => GeneratedArtifact::Prose(String::new()),
            OutputShape::CodeSnippets => GeneratedArtifact::CodeSnippets(Vec::new()),
            OutputShape::References => GeneratedArtifact::References(Vec::new()),
            OutputShape::Insights => GeneratedArtifact::Insights(Vec::new()),
            OutputShape::Diagram(kind) => GeneratedArtifact::Diagram(fallback_diagram(*kind)),
        }
    }
}

/// One generation call: an instruction plus the shape its output must take.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub label: &'static str,
    pub instruction: String,
    pub shape: OutputShape,
}

impl PromptSpec {
    pub fn new(label: &'static str, instruction: String, shape: OutputShape) -> Self {
        Self {
            label,
            instruction,
            shape,
        }
    }
}

/// A structurally-valid parsed result. Content is best-effort; only the shape
/// is guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedArtifact {
    Prose(String),
    CodeSnippets(Vec<CodeSnippet>),
    References(Vec<Reference>),
    Insights(Vec<Insight>),
    Diagram(String),
}

pub struct GenerationOrchestrator {
    provider: Arc<dyn GenerationProvider>,
}

impl GenerationOrchestrator {
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// Issue one generation call and clean/parse its output into the spec's
    /// shape. Parse failures never surface as errors: a structured shape
    /// degrades to its empty default, a degenerate diagram to the fixed
    /// fallback. Only provider failures propagate.
    pub async fn generate(
        &self,
        spec: &PromptSpec,
        context: &ContextBlock,
    ) -> Result<GeneratedArtifact, GenerationProviderError> {
        let prompt = format!(
            "{}\n\n{}\n\n{}",
            spec.instruction,
            spec.shape.format_rules(),
            context.render()
        );
        let raw = self.provider.complete(SYSTEM_PAPER_ANALYST, &prompt).await?;
        Ok(parse_output(spec.label, spec.shape, &raw))
    }

    /// Dispatch every spec at once and await them jointly; one spec's result
    /// never blocks or cancels a sibling's dispatch. Batch-level policy on
    /// provider failures is the caller's decision.
    pub async fn generate_batch(
        &self,
        specs: &[PromptSpec],
        context: &ContextBlock,
    ) -> Vec<Result<GeneratedArtifact, GenerationProviderError>> {
        join_all(specs.iter().map(|spec| self.generate(spec, context))).await
    }
}

fn parse_output(label: &str, shape: OutputShape, raw: &str) -> GeneratedArtifact {
    match shape {
        OutputShape::Prose => GeneratedArtifact::Prose(raw.trim().to_string()),
        OutputShape::Diagram(kind) => GeneratedArtifact::Diagram(clean_diagram(raw, kind)),
        OutputShape::CodeSnippets | OutputShape::References | OutputShape::Insights => {
            let cleaned = strip_code_fences(raw);
            let value: Value = match serde_json::from_str(&cleaned) {
                Ok(value) => value,
                Err(error) => {
                    tracing::warn!(artifact = label, %error, "generation output is not valid JSON; substituting empty default");
                    return shape.empty_default();
                }
            };
            let Some(items) = as_item_array(&value) else {
                tracing::warn!(artifact = label, "generation output is not a JSON array; substituting empty default");
                return shape.empty_default();
            };
            match shape {
                OutputShape::CodeSnippets => {
                    GeneratedArtifact::CodeSnippets(coerce_all(items, coerce_code_snippet))
                }
                OutputShape::References => {
                    GeneratedArtifact::References(coerce_all(items, coerce_reference))
                }
                OutputShape::Insights => {
                    GeneratedArtifact::Insights(coerce_all(items, coerce_insight))
                }
                _ => unreachable!("structured shapes only"),
            }
        }
    }
}

/// Remove a surrounding markdown code fence (with optional language tag).
pub fn strip_code_fences(raw: &str) -> String {
    match FENCE_BLOCK.captures(raw) {
        Some(caps) => caps[1].to_string(),
        None => raw.trim().to_string(),
    }
}

/// The model sometimes wraps the requested array in an object; accept the
/// first array found one level down.
fn as_item_array(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.values().find_map(|v| v.as_array()),
        _ => None,
    }
}

fn coerce_all<T>(items: &[Value], coerce: fn(&Value) -> Option<T>) -> Vec<T> {
    let coerced: Vec<T> = items.iter().filter_map(coerce).collect();
    if coerced.len() < items.len() {
        tracing::warn!(
            dropped = items.len() - coerced.len(),
            "dropped malformed items from generation output"
        );
    }
    coerced
}

fn string_field(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn coerce_code_snippet(item: &Value) -> Option<CodeSnippet> {
    Some(CodeSnippet {
        description: string_field(item, "description")?,
        code: string_field(item, "code")?,
        language: string_field(item, "language").unwrap_or_else(|| "text".to_string()),
    })
}

fn coerce_reference(item: &Value) -> Option<Reference> {
    let year = match item.get("year") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Some(Reference {
        title: string_field(item, "title")?,
        authors: string_field(item, "authors").unwrap_or_default(),
        year,
    })
}

fn coerce_insight(item: &Value) -> Option<Insight> {
    Some(Insight {
        title: string_field(item, "title")?,
        detail: string_field(item, "detail")
            .or_else(|| string_field(item, "description"))
            .unwrap_or_default(),
    })
}

/// Strip fences and control characters, normalize line endings, and replace a
/// degenerate result with a fixed minimal diagram so the caller never renders
/// an empty canvas.
pub fn clean_diagram(raw: &str, kind: DiagramKind) -> String {
    let stripped = strip_code_fences(raw);
    let normalized = stripped.replace("\r\n", "\n").replace('\r', "\n");
    let printable: String = normalized
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    let cleaned = printable.trim().to_string();

    let body_lines = cleaned.lines().filter(|l| !l.trim().is_empty()).count();
    if cleaned.chars().count() < MIN_DIAGRAM_CHARS || body_lines < 2 {
        tracing::warn!(kind = kind.as_str(), "degenerate diagram output; substituting fallback");
        return fallback_diagram(kind);
    }
    cleaned
}

pub fn fallback_diagram(kind: DiagramKind) -> String {
    match kind {
        DiagramKind::Flowchart => {
            "flowchart TD\n    paper[\"Paper\"] --> analysis[\"Analysis\"]".to_string()
        }
        DiagramKind::Sequence => {
            "sequenceDiagram\n    participant Reader\n    participant Paper\n    Reader->>Paper: read"
                .to_string()
        }
        DiagramKind::Mindmap => "mindmap\n  root((Paper))\n    Analysis".to_string(),
    }
}
