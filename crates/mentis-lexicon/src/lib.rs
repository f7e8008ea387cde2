//! Lexical resources for software-mention extraction.
//!
//! A [`Lexicon`] bundles the three read-only lexical services the engine
//! needs: an English stop-word set, per-term inverse document frequencies
//! estimated over a reference corpus, and a token-level software vocabulary.
//! It is constructed once at startup and shared by reference across all
//! documents; it holds no mutable state.
//!
//! Two constructors are provided:
//! - [`Lexicon::with_embedded_subset`]: stop words only, no IDF table.
//!   Fast startup, suitable for tests and propagation-by-default behavior
//!   (unknown IDF means a term may still propagate).
//! - [`Lexicon::from_files`]: full vocabulary and IDF tables loaded from
//!   plain-text resource files.

mod stopwords;

use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use tracing::info;

use mentis_common::services::CorpusStats;
use mentis_common::{MentisError, Result};

pub struct Lexicon {
    stopwords: AHashSet<&'static str>,
    idf: AHashMap<String, f64>,
    vocabulary: AHashSet<String>,
}

impl Lexicon {
    /// Stop words only; every term has unknown specificity and the software
    /// vocabulary is empty.
    pub fn with_embedded_subset() -> Self {
        let lexicon = Self {
            stopwords: stopwords::ENGLISH_STOPWORDS.iter().copied().collect(),
            idf: AHashMap::new(),
            vocabulary: AHashSet::new(),
        };
        info!("Lexicon (embedded): {} stop words", lexicon.stopwords.len());
        lexicon
    }

    /// Load the software vocabulary (one name per line) and the IDF table
    /// (tab-separated `term<TAB>idf` lines) from resource files.
    ///
    /// Vocabulary lines are split into tokens; tokens of length > 1 enter
    /// the token-level vocabulary used for lexical look-ups.
    pub fn from_files(
        vocabulary_path: impl AsRef<Path>,
        idf_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let mut lexicon = Self::with_embedded_subset();

        let vocab_file = std::fs::File::open(vocabulary_path.as_ref())?;
        for line in BufReader::new(vocab_file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            for token in tokenize_vocabulary_line(&line) {
                if token.chars().count() > 1 {
                    lexicon.vocabulary.insert(token);
                }
            }
        }

        let idf_file = std::fs::File::open(idf_path.as_ref())?;
        for (line_no, line) in BufReader::new(idf_file).lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, '\t');
            let term = parts.next().unwrap_or_default();
            let value = parts.next().ok_or_else(|| {
                MentisError::Lexicon(format!("missing idf value at line {}", line_no + 1))
            })?;
            let idf: f64 = value.trim().parse().map_err(|_| {
                MentisError::Lexicon(format!("invalid idf value at line {}: {value}", line_no + 1))
            })?;
            lexicon.idf.insert(term.to_string(), idf);
        }

        info!(
            "Lexicon loaded: {} vocabulary tokens, {} idf terms",
            lexicon.vocabulary.len(),
            lexicon.idf.len()
        );
        Ok(lexicon)
    }

    /// Token-level lexical look-up against the software vocabulary.
    pub fn in_software_vocabulary(&self, token: &str) -> bool {
        self.vocabulary.contains(token)
    }
}

impl CorpusStats for Lexicon {
    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    fn term_idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }
}

/// Split a vocabulary line into alphanumeric runs; punctuation and
/// whitespace separate tokens and are dropped.
fn tokenize_vocabulary_line(line: &str) -> Vec<String> {
    line.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_stopwords() {
        let lexicon = Lexicon::with_embedded_subset();
        assert!(lexicon.is_stopword("the"));
        assert!(lexicon.is_stopword("which"));
        assert!(!lexicon.is_stopword("matlab"));
    }

    #[test]
    fn test_embedded_idf_is_unknown() {
        let lexicon = Lexicon::with_embedded_subset();
        assert_eq!(lexicon.term_idf("SPSS"), None);
    }

    #[test]
    fn test_from_files() {
        let mut vocab = tempfile::NamedTempFile::new().unwrap();
        writeln!(vocab, "SPSS").unwrap();
        writeln!(vocab, "scikit-learn").unwrap();
        writeln!(vocab, "R").unwrap();

        let mut idf = tempfile::NamedTempFile::new().unwrap();
        writeln!(idf, "SPSS\t8.25").unwrap();
        writeln!(idf, "the\t0.0").unwrap();

        let lexicon = Lexicon::from_files(vocab.path(), idf.path()).unwrap();
        assert!(lexicon.in_software_vocabulary("SPSS"));
        assert!(lexicon.in_software_vocabulary("scikit"));
        assert!(lexicon.in_software_vocabulary("learn"));
        // single-character tokens are not indexed
        assert!(!lexicon.in_software_vocabulary("R"));

        assert_eq!(lexicon.term_idf("SPSS"), Some(8.25));
        assert_eq!(lexicon.term_idf("the"), Some(0.0));
        assert_eq!(lexicon.term_idf("Stata"), None);
    }

    #[test]
    fn test_malformed_idf_line_is_an_error() {
        let vocab = tempfile::NamedTempFile::new().unwrap();
        let mut idf = tempfile::NamedTempFile::new().unwrap();
        writeln!(idf, "SPSS").unwrap();
        assert!(Lexicon::from_files(vocab.path(), idf.path()).is_err());
    }
}
