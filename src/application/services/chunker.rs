use crate::domain::entities::DocumentChunk;

/// Splits raw paper text into bounded, overlapping chunks for embedding.
///
/// Break points are chosen inside each window by preference: paragraph break,
/// sentence break, word break, hard character cut. A break is never taken
/// before half the window, so chunks stay reasonably sized. All bounds are in
/// characters, not bytes, so multi-byte text never splits mid-scalar.
#[derive(Debug, Clone)]
pub struct TextChunker {
    target_size: usize,
    overlap: usize,
}

impl TextChunker {
    pub fn new(target_size: usize, overlap: usize) -> Self {
        let target_size = target_size.max(1);
        Self {
            target_size,
            overlap: overlap.min(target_size.saturating_sub(1)),
        }
    }

    pub fn target_size(&self) -> usize {
        self.target_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lazy, restartable chunk sequence. Empty input yields no chunks.
    pub fn chunk(&self, text: &str) -> Chunks {
        Chunks {
            chars: text.chars().collect(),
            target_size: self.target_size,
            overlap: self.overlap,
            start: 0,
            sequence: 0,
            done: false,
        }
    }
}

pub struct Chunks {
    chars: Vec<char>,
    target_size: usize,
    overlap: usize,
    start: usize,
    sequence: usize,
    done: bool,
}

impl Chunks {
    /// Best break position in (start, window_end], searched backwards and
    /// never before the middle of the window.
    fn break_point(&self, start: usize, window_end: usize) -> usize {
        let min_end = start + self.target_size / 2;

        // Paragraph break: end just after a blank line.
        for i in (min_end.max(start + 2)..window_end).rev() {
            if self.chars[i] == '\n' && self.chars[i - 1] == '\n' {
                return i + 1;
            }
        }

        // Sentence break: terminal punctuation followed by whitespace, or a
        // single newline.
        for i in (min_end.max(start + 1)..window_end).rev() {
            let c = self.chars[i - 1];
            if c == '\n' {
                return i;
            }
            if matches!(c, '.' | '!' | '?') && self.chars[i].is_whitespace() {
                return i;
            }
        }

        // Word break.
        for i in (min_end.max(start + 1)..window_end).rev() {
            if self.chars[i].is_whitespace() {
                return i + 1;
            }
        }

        window_end
    }
}

impl Iterator for Chunks {
    type Item = DocumentChunk;

    fn next(&mut self) -> Option<DocumentChunk> {
        if self.done || self.start >= self.chars.len() {
            return None;
        }

        let len = self.chars.len();
        let window_end = (self.start + self.target_size).min(len);
        let end = if window_end == len {
            self.done = true;
            len
        } else {
            self.break_point(self.start, window_end)
        };

        let text: String = self.chars[self.start..end].iter().collect();
        let chunk = DocumentChunk::new(text, self.sequence);
        self.sequence += 1;

        if !self.done {
            // Step back by the overlap, but always make progress.
            self.start = end.saturating_sub(self.overlap).max(self.start + 1);
        }

        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_text(total_chars: usize) -> String {
        let mut text = String::new();
        let mut i = 0;
        while text.chars().count() < total_chars {
            text.push_str(&format!("Sentence number {} states a finding. ", i));
            i += 1;
            if i % 7 == 0 {
                text.push_str("\n\n");
            }
        }
        text.chars().take(total_chars).collect()
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = TextChunker::new(1000, 100);
        assert_eq!(chunker.chunk("").count(), 0);
    }

    #[test]
    fn test_short_text_yields_single_chunk() {
        let chunker = TextChunker::new(1000, 100);
        let chunks: Vec<_> = chunker.chunk("A short abstract.").collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text(), "A short abstract.");
        assert_eq!(chunks[0].sequence_index(), 0);
    }

    #[test]
    fn test_size_bound_holds() {
        let chunker = TextChunker::new(200, 40);
        let text = sentence_text(5_000);
        for chunk in chunker.chunk(&text) {
            assert!(chunk.len_chars() <= 200, "chunk exceeded target size");
        }
    }

    #[test]
    fn test_sequence_indices_are_ordered() {
        let chunker = TextChunker::new(200, 40);
        let text = sentence_text(3_000);
        for (i, chunk) in chunker.chunk(&text).enumerate() {
            assert_eq!(chunk.sequence_index(), i);
        }
    }

    #[test]
    fn test_coverage_reconstructs_original() {
        let chunker = TextChunker::new(300, 50);
        let text = sentence_text(4_321);
        let chunks: Vec<_> = chunker.chunk(&text).collect();
        assert!(chunks.len() > 1);

        let mut reconstructed: String = chunks[0].text().to_string();
        for chunk in &chunks[1..] {
            reconstructed.extend(chunk.text().chars().skip(50));
        }
        assert_eq!(reconstructed, text);
    }

    #[test]
    fn test_adjacent_chunks_share_overlap() {
        let chunker = TextChunker::new(1000, 100);
        let text = sentence_text(50_000);
        let chunks: Vec<_> = chunker.chunk(&text).collect();

        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].text().chars().collect();
            let tail: String = prev[prev.len() - 100..].iter().collect();
            let head: String = pair[1].text().chars().take(100).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn test_fifty_thousand_char_scenario() {
        let chunker = TextChunker::new(1000, 100);
        let text = sentence_text(50_000);
        let chunks: Vec<_> = chunker.chunk(&text).collect();

        assert!(chunks.len() >= 45, "expected >= 45 chunks, got {}", chunks.len());
        for chunk in &chunks {
            assert!(chunk.len_chars() <= 1000);
        }
    }

    #[test]
    fn test_unbreakable_text_falls_back_to_hard_cut() {
        let chunker = TextChunker::new(100, 10);
        let text: String = "x".repeat(550);
        let chunks: Vec<_> = chunker.chunk(&text).collect();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len_chars() <= 100);
        }
        let mut reconstructed: String = chunks[0].text().to_string();
        for chunk in &chunks[1..] {
            reconstructed.extend(chunk.text().chars().skip(10));
        }
        assert_eq!(reconstructed, text);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let chunker = TextChunker::new(50, 5);
        let text = "λ-calculus und Maßtheorie. ".repeat(40);
        let chunks: Vec<_> = chunker.chunk(&text).collect();
        for chunk in &chunks {
            assert!(chunk.len_chars() <= 50);
        }
        let mut reconstructed: String = chunks[0].text().to_string();
        for chunk in &chunks[1..] {
            reconstructed.extend(chunk.text().chars().skip(5));
        }
        assert_eq!(reconstructed, text);
    }

    #[test]
    fn test_paragraph_breaks_preferred() {
        let chunker = TextChunker::new(120, 0);
        let text = format!("{}\n\n{}", "a".repeat(80), "b".repeat(80));
        let chunks: Vec<_> = chunker.chunk(&text).collect();
        // The first chunk should end at the paragraph boundary, not mid-word.
        assert!(chunks[0].text().ends_with("\n\n"));
    }
}
