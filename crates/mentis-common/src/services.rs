//! Traits for the external read-only collaborators.
//!
//! Lexical statistics and sentence segmentation are provided by the caller
//! and injected into the pipeline; implementations must be shareable across
//! documents (`Send + Sync`) since batch processing runs documents in
//! parallel.

use crate::types::{OffsetRange, Token};

/// Corpus-level lexical statistics: stop-word membership and inverse
/// document frequency of software-name terms.
pub trait CorpusStats: Send + Sync {
    /// True if `word` (already lowercased by the caller) is a common English
    /// stop word.
    fn is_stopword(&self, word: &str) -> bool;

    /// Specificity of `term` across the reference corpus, or `None` when the
    /// term is unknown. Unknown is not zero: an unknown term may still
    /// propagate, a zero-specificity term never does.
    fn term_idf(&self, term: &str) -> Option<f64>;
}

/// Sentence-boundary detection over an already tokenized text.
pub trait SentenceSegmenter: Send + Sync {
    /// Return ordered, non-overlapping sentence intervals covering `text`.
    /// No returned boundary may fall strictly inside any `forbidden` span.
    fn segment(
        &self,
        text: &str,
        tokens: &[Token],
        forbidden: &[OffsetRange],
    ) -> Vec<OffsetRange>;
}
