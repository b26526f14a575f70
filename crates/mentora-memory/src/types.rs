// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types for the long-term memory system.

use serde::{Deserialize, Serialize};

/// A durable memory fact stored by the memory system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier for this record.
    pub id: String,
    /// User this record belongs to.
    pub owner: String,
    /// Record kind (raw history vs. distilled summary).
    pub kind: MemoryKind,
    /// The factual content of this record.
    pub text: String,
    /// Embedding vector for semantic search.
    #[serde(skip)]
    pub embedding: Vec<f32>,
    /// Opaque metadata carried alongside the required fields.
    pub metadata: serde_json::Value,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

/// Kind of a long-term memory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryKind {
    /// A raw message committed verbatim.
    History,
    /// A distilled fact extracted from conversation.
    Summary,
}

impl MemoryKind {
    /// Convert to string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::History => "history",
            MemoryKind::Summary => "summary",
        }
    }

    /// Parse from a storage string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "summary" => MemoryKind::Summary,
            _ => MemoryKind::History,
        }
    }
}

/// A retrieval result produced per query. Never persisted.
#[derive(Debug, Clone)]
pub struct RankedChunk {
    /// The matched text.
    pub text: String,
    /// Where the chunk came from (collection name or record kind).
    pub source: String,
    /// Raw similarity score against the query.
    pub score: f32,
}

/// Stock phrases that are never worth remembering.
pub const TRIVIAL_STOPLIST: [&str; 10] = [
    "hi", "hello", "hey", "ok", "okay", "thanks", "thank you", "sure", "yes", "no",
];

/// Clean up a text for storage: trim and strip stray bracket/quote wrapping
/// left over from model output.
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .trim_matches(['[', ']', '"', '\''])
        .trim()
        .to_string()
}

/// Canonical comparison form: lowercased with inner whitespace collapsed.
pub fn comparison_key(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a text is too short or too stock to be worth storing.
pub fn is_trivial_text(text: &str) -> bool {
    let normalized = normalize_text(text).to_lowercase();
    if normalized.is_empty() {
        return true;
    }
    if TRIVIAL_STOPLIST.contains(&normalized.as_str()) {
        return true;
    }
    normalized.chars().count() < 10
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// The embedding provider does not L2-normalize its output, so this computes
/// the full quotient rather than a plain dot product. Zero-norm inputs score
/// 0.0 instead of dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_kind_round_trips() {
        assert_eq!(MemoryKind::History.as_str(), "history");
        assert_eq!(MemoryKind::Summary.as_str(), "summary");
        assert_eq!(MemoryKind::from_str_value("history"), MemoryKind::History);
        assert_eq!(MemoryKind::from_str_value("summary"), MemoryKind::Summary);
        // Unknown values read as History rather than failing.
        assert_eq!(MemoryKind::from_str_value("other"), MemoryKind::History);
    }

    #[test]
    fn normalize_strips_wrapping_artifacts() {
        assert_eq!(normalize_text("  plain text  "), "plain text");
        assert_eq!(normalize_text("[\"wants to learn Rust\"]"), "wants to learn Rust");
        assert_eq!(normalize_text("'single quoted'"), "single quoted");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn comparison_key_collapses_whitespace_and_case() {
        assert_eq!(
            comparison_key("  Loves   Backend\tDevelopment "),
            "loves backend development"
        );
        assert_eq!(comparison_key("same"), comparison_key("SAME"));
    }

    #[test]
    fn stoplist_entries_are_trivial() {
        for entry in TRIVIAL_STOPLIST {
            assert!(is_trivial_text(entry), "{entry:?} should be trivial");
        }
        // Case-insensitive.
        assert!(is_trivial_text("Thank You"));
        assert!(is_trivial_text("  OK  "));
    }

    #[test]
    fn short_text_is_trivial() {
        assert!(is_trivial_text(""));
        assert!(is_trivial_text("rust"));
        assert!(is_trivial_text("123456789")); // 9 chars
        assert!(!is_trivial_text("1234567890")); // 10 chars
        assert!(!is_trivial_text("wants to learn backend development"));
    }

    #[test]
    fn vec_to_blob_roundtrip() {
        let original = vec![0.1_f32, 0.2, 0.3, -0.5, 1.0];
        let blob = vec_to_blob(&original);
        let recovered = blob_to_vec(&blob);
        assert_eq!(original.len(), recovered.len());
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn vec_to_blob_768_dim() {
        let vec768: Vec<f32> = (0..768).map(|i| i as f32 / 768.0).collect();
        let blob = vec_to_blob(&vec768);
        assert_eq!(blob.len(), 768 * 4);
        let recovered = blob_to_vec(&blob);
        assert_eq!(recovered.len(), 768);
    }

    #[test]
    fn cosine_similarity_identical() {
        let v = vec![0.3f32, 0.5, 0.2];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6, "identical vectors should score ~1.0, got {sim}");
    }

    #[test]
    fn cosine_similarity_unnormalized_magnitudes() {
        // Same direction, different magnitude: still ~1.0 with the full quotient.
        let a = vec![1.0f32, 2.0, 3.0];
        let b = vec![2.0f32, 4.0, 6.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 1.0).abs() < 1e-6, "parallel vectors should score ~1.0, got {sim}");
    }

    #[test]
    fn cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < f32::EPSILON);
    }

    #[test]
    fn cosine_similarity_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim + 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn cosine_similarity_zero_norm_is_zero() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }
}
