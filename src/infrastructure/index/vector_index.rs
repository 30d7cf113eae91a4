use serde::{Deserialize, Serialize};

use crate::domain::entities::DocumentChunk;

#[derive(Debug)]
pub enum VectorIndexError {
    /// Embeddings are not uniform-dimension, or chunks and embeddings differ
    /// in length.
    DimensionMismatch(String),
    /// No readable index at the expected location; callers fall back to
    /// assembling context without retrieval.
    IndexNotFound(String),
    Storage(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::DimensionMismatch(msg) => {
                write!(f, "Dimension mismatch: {}", msg)
            }
            VectorIndexError::IndexNotFound(msg) => write!(f, "Index not found: {}", msg),
            VectorIndexError::Storage(msg) => write!(f, "Index storage error: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub sequence_index: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// One chunk returned from a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
    pub sequence_index: usize,
}

/// An immutable in-memory similarity index over one project's chunks.
/// Re-ingestion builds a fresh index; nothing mutates an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Construct from parallel chunk/embedding arrays.
    pub fn build(
        chunks: &[DocumentChunk],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self, VectorIndexError> {
        if chunks.len() != embeddings.len() {
            return Err(VectorIndexError::DimensionMismatch(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        for (chunk, embedding) in chunks.iter().zip(&embeddings) {
            if embedding.len() != dimension {
                return Err(VectorIndexError::DimensionMismatch(format!(
                    "chunk {} has dimension {}, expected {}",
                    chunk.sequence_index(),
                    embedding.len(),
                    dimension
                )));
            }
        }

        let entries = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry {
                sequence_index: chunk.sequence_index(),
                text: chunk.text().to_string(),
                embedding,
            })
            .collect();

        Ok(Self { dimension, entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top-k entries by cosine similarity, descending; ties resolve to the
    /// earlier chunk in document order.
    pub fn query(&self, query_vector: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                text: entry.text.clone(),
                score: cosine_similarity(query_vector, &entry.embedding),
                sequence_index: entry.sequence_index,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.sequence_index.cmp(&b.sequence_index))
        });

        scored.truncate(k);
        scored
    }
}

/// Cosine similarity; 0.0 for mismatched dimensions or zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot / (magnitude_a * magnitude_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(texts: &[&str]) -> Vec<DocumentChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| DocumentChunk::new(t.to_string(), i))
            .collect()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_build_rejects_uneven_dimensions() {
        let result = VectorIndex::build(
            &chunks(&["a", "b"]),
            vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]],
        );
        assert!(matches!(result, Err(VectorIndexError::DimensionMismatch(_))));
    }

    #[test]
    fn test_build_rejects_length_mismatch() {
        let result = VectorIndex::build(&chunks(&["a", "b"]), vec![vec![1.0, 0.0]]);
        assert!(matches!(result, Err(VectorIndexError::DimensionMismatch(_))));
    }

    #[test]
    fn test_query_orders_by_similarity() {
        // Chunk #2 (index 1) points the same way as the query.
        let index = VectorIndex::build(
            &chunks(&["intro", "methodology", "conclusion"]),
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.5, 0.5, 0.0],
            ],
        )
        .unwrap();

        let results = index.query(&[0.0, 1.0, 0.0], 3);
        assert_eq!(results[0].text, "methodology");
        assert!(results[0].score > results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[test]
    fn test_query_respects_k() {
        let index = VectorIndex::build(
            &chunks(&["a", "b", "c", "d"]),
            vec![vec![1.0, 0.0]; 4],
        )
        .unwrap();
        assert_eq!(index.query(&[1.0, 0.0], 2).len(), 2);
        assert_eq!(index.query(&[1.0, 0.0], 10).len(), 4);
    }

    #[test]
    fn test_ties_break_by_sequence_order() {
        let index = VectorIndex::build(
            &chunks(&["third", "first", "second"]),
            vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();

        let results = index.query(&[1.0, 0.0], 3);
        let order: Vec<usize> = results.iter().map(|r| r.sequence_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = VectorIndex::build(&[], vec![]).unwrap();
        assert!(index.is_empty());
        assert!(index.query(&[1.0, 0.0], 5).is_empty());
    }
}
