/// A snippet fetched from the web for one extracted key term. Ephemeral; it
/// is folded into a context block and never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalContextItem {
    pub term: String,
    pub snippet: String,
    pub source_url: String,
}

/// One provenance-labelled slice of an assembled context block.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSection {
    pub heading: &'static str,
    pub body: String,
}

pub const RAG_SECTION: &str = "RETRIEVED PASSAGES";
pub const EXTERNAL_SECTION: &str = "EXTERNAL CONTEXT";
pub const PRIMARY_SECTION: &str = "PAPER EXCERPT";

/// The prompt-ready context handed to a generation call. Sections keep a
/// fixed order (retrieved, external, primary) so the model can weigh
/// provenance; absent sections are simply omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextBlock {
    sections: Vec<ContextSection>,
}

impl ContextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_section(&mut self, heading: &'static str, body: String) {
        if !body.trim().is_empty() {
            self.sections.push(ContextSection { heading, body });
        }
    }

    pub fn sections(&self) -> &[ContextSection] {
        &self.sections
    }

    pub fn section(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)
            .map(|s| s.body.as_str())
    }

    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("### {}\n{}", s.heading, s.body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_are_dropped() {
        let mut block = ContextBlock::new();
        block.push_section(RAG_SECTION, "   ".to_string());
        block.push_section(PRIMARY_SECTION, "the paper text".to_string());

        assert_eq!(block.sections().len(), 1);
        assert!(block.section(RAG_SECTION).is_none());
        assert_eq!(block.section(PRIMARY_SECTION), Some("the paper text"));
    }

    #[test]
    fn test_render_keeps_insertion_order() {
        let mut block = ContextBlock::new();
        block.push_section(RAG_SECTION, "passage one".to_string());
        block.push_section(EXTERNAL_SECTION, "a web snippet".to_string());
        block.push_section(PRIMARY_SECTION, "the excerpt".to_string());

        let rendered = block.render();
        let rag_at = rendered.find(RAG_SECTION).unwrap();
        let ext_at = rendered.find(EXTERNAL_SECTION).unwrap();
        let primary_at = rendered.find(PRIMARY_SECTION).unwrap();
        assert!(rag_at < ext_at && ext_at < primary_at);
        assert!(rendered.contains("### RETRIEVED PASSAGES\npassage one"));
    }
}
