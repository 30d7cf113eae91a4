use crate::domain::entities::{DiagramKind, SummaryLevel};

pub const SYSTEM_PAPER_ANALYST: &str = r#"You are a research-paper analysis assistant. You read scientific papers and produce faithful, well-structured derived material. Ground every statement in the provided context. Never invent citations, numbers, or results that the context does not support."#;

pub const SYSTEM_TERM_EXTRACTOR: &str = r#"You extract search terms. Reply with terms only, no commentary."#;

pub fn summary_instruction(level: SummaryLevel) -> String {
    format!(
        r#"Write a summary of the paper described in the context below for {}.

Cover: the problem addressed, the approach, the key results, and why they matter.
Length: 3-5 paragraphs."#,
        level.audience_hint()
    )
}

pub fn diagram_instruction(kind: DiagramKind) -> String {
    let focus = match kind {
        DiagramKind::Flowchart => "the method or system pipeline described in the paper",
        DiagramKind::Sequence => "the interactions between the components or actors described in the paper",
        DiagramKind::Mindmap => "the paper's main concepts and how they relate",
    };
    format!(
        r#"Draw a Mermaid diagram of {}.

The first line must be `{}`. Keep node labels short (under 6 words). Use only
plain Mermaid syntax, no styling directives."#,
        focus,
        kind.mermaid_header()
    )
}

pub fn code_snippets_instruction() -> String {
    r#"Extract the algorithms, pseudocode, or notable implementation details from the
paper in the context below, as runnable-style code. If the paper contains no
explicit code, reconstruct the central algorithm faithfully from its description.
Return at most 5 snippets."#
        .to_string()
}

pub fn references_instruction() -> String {
    r#"List the works the paper in the context below cites or builds on. Include only
references actually mentioned in the context. Return at most 10 entries."#
        .to_string()
}

pub fn insights_instruction() -> String {
    r#"State the most useful insights a reader should take away from the paper in the
context below: strengths, limitations, practical implications, and open
questions. Return 3 to 6 insights."#
        .to_string()
}

/// Wraps a user-supplied regeneration instruction so it still answers from the
/// assembled context rather than from thin air.
pub fn custom_instruction(instruction: &str) -> String {
    format!(
        r#"{}

Answer using only the context below."#,
        instruction.trim()
    )
}

pub fn key_terms_prompt(excerpt: &str, max_terms: usize) -> String {
    format!(
        r#"From this paper excerpt, give the {} most useful web-search terms for
understanding its subject matter. One term per line, no numbering.

---
{}
---"#,
        max_terms, excerpt
    )
}

/// Split a key-term reply into clean terms: one per line or comma-separated,
/// stripped of list markers.
pub fn parse_key_terms(response: &str, max_terms: usize) -> Vec<String> {
    response
        .split(['\n', ','])
        .map(|t| t.trim().trim_start_matches(['-', '*', '•']).trim())
        .map(|t| t.trim_matches('"'))
        .filter(|t| !t.is_empty() && t.len() < 80)
        .map(|t| t.to_string())
        .take(max_terms)
        .collect()
}
