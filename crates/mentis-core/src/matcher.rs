//! Multi-pattern term matching over tokenized text.
//!
//! Uses an Aho-Corasick automaton with `MatchKind::LeftmostLongest` for
//! linear-time matching: when several loaded terms match at the same
//! position the longest wins, and equal-length candidates resolve to the
//! first loaded. Matches are reported as inclusive token-index intervals
//! and never overlap.
//!
//! Matching is token-aligned, not substring: a term only matches whole
//! tokens, so the single-character term "R" never fires inside "Rust". This
//! is done by rendering every token as `SEP text SEP` (SEP = U+001F, a
//! control byte that cannot appear in document text) and wrapping the
//! patterns the same way.

use aho_corasick::{AhoCorasick, MatchKind};

use mentis_common::{MentisError, Result, Token};

use crate::normalize::collapse_whitespace;

const SEP: char = '\u{1F}';

/// An inclusive `[first, last]` interval over token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch {
    pub first: usize,
    pub last: usize,
}

/// A registered multi-token term, stored as analyzer parts. Whitespace runs
/// are kept as single `" "` parts so delimiter handling stays configurable
/// at match time.
#[derive(Debug, Clone)]
struct TermEntry {
    parts: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TermMatcher {
    terms: Vec<TermEntry>,
}

impl TermMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Register a term. With `normalize`, internal newlines and whitespace
    /// runs are collapsed first. Terms that analyze to nothing are rejected.
    pub fn load(&mut self, term: &str, normalize: bool) -> Result<()> {
        let term = if normalize {
            collapse_whitespace(term)
        } else {
            term.to_string()
        };
        let parts = analyze(&term);
        if parts.iter().all(|p| p == " ") {
            return Err(MentisError::EmptyTerm);
        }
        self.terms.push(TermEntry { parts });
        Ok(())
    }

    /// Find every occurrence of any loaded term in `tokens`.
    ///
    /// With `ignore_delimiters`, whitespace tokens are elided from the
    /// sequence (and whitespace parts from the terms) before matching, so
    /// "Microsoft Excel" matches across a line break.
    pub fn find(
        &self,
        tokens: &[Token],
        ignore_delimiters: bool,
        case_sensitive: bool,
    ) -> Result<Vec<TokenMatch>> {
        if self.terms.is_empty() || tokens.is_empty() {
            return Ok(Vec::new());
        }

        // token indices that take part in matching
        let kept: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.text.is_empty() && !(ignore_delimiters && t.is_delimiter()))
            .map(|(i, _)| i)
            .collect();
        if kept.is_empty() {
            return Ok(Vec::new());
        }

        // haystack: every kept token rendered as SEP text SEP
        let mut haystack = String::new();
        let mut block_starts = Vec::with_capacity(kept.len());
        let mut block_ends = Vec::with_capacity(kept.len());
        for &i in &kept {
            block_starts.push(haystack.len());
            haystack.push(SEP);
            push_sanitized(&mut haystack, &tokens[i].text, case_sensitive);
            haystack.push(SEP);
            block_ends.push(haystack.len());
        }

        let mut patterns = Vec::with_capacity(self.terms.len());
        for entry in &self.terms {
            let mut pattern = String::new();
            for part in &entry.parts {
                if ignore_delimiters && part == " " {
                    continue;
                }
                if pattern.is_empty() {
                    pattern.push(SEP);
                } else {
                    // closing SEP of the previous token, opening SEP of this one
                    pattern.push(SEP);
                    pattern.push(SEP);
                }
                push_sanitized(&mut pattern, part, case_sensitive);
            }
            pattern.push(SEP);
            patterns.push(pattern);
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| MentisError::Pipeline(format!("term automaton: {e}")))?;

        let mut matches = Vec::new();
        for mat in automaton.find_iter(&haystack) {
            // match boundaries always land on block boundaries by construction
            let first = match block_starts.binary_search(&mat.start()) {
                Ok(k) => k,
                Err(_) => continue,
            };
            let last = match block_ends.binary_search(&mat.end()) {
                Ok(k) => k,
                Err(_) => continue,
            };
            matches.push(TokenMatch { first: kept[first], last: kept[last] });
        }
        Ok(matches)
    }
}

fn push_sanitized(out: &mut String, text: &str, case_sensitive: bool) {
    for c in text.chars() {
        if c == SEP {
            continue;
        }
        if case_sensitive {
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
    }
}

/// Split text into matcher parts: alphanumeric runs, single punctuation
/// characters, and `" "` for whitespace runs.
pub fn analyze(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphanumeric() {
            current.push(c);
            let next_alnum = chars.peek().map_or(false, |n| n.is_alphanumeric());
            if !next_alnum {
                parts.push(std::mem::take(&mut current));
            }
        } else if c.is_whitespace() {
            if parts.last().map(String::as_str) != Some(" ") {
                parts.push(" ".to_string());
            }
        } else {
            parts.push(c.to_string());
        }
    }
    parts
}

/// Tokenize plain text with the same splitting rules as [`analyze`],
/// producing tokens with document-global offsets. Whitespace runs become
/// single delimiter tokens with their original text preserved, so local
/// character offsets reconstructed from token lengths stay exact.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let c = chars[i];
        if c.is_alphanumeric() {
            while i < chars.len() && chars[i].is_alphanumeric() {
                i += 1;
            }
        } else if c.is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
        } else {
            i += 1;
        }
        let text: String = chars[start..i].iter().collect();
        tokens.push(Token::new(text, start));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_texts(matcher: &TermMatcher, tokens: &[Token]) -> Vec<String> {
        matcher
            .find(tokens, true, true)
            .unwrap()
            .iter()
            .map(|m| {
                tokens[m.first..=m.last]
                    .iter()
                    .map(|t| t.text.as_str())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_analyze_splits_runs() {
        assert_eq!(analyze("scikit-learn"), vec!["scikit", "-", "learn"]);
        assert_eq!(analyze("R 3.4"), vec!["R", " ", "3", ".", "4"]);
    }

    #[test]
    fn test_empty_term_rejected() {
        let mut matcher = TermMatcher::new();
        assert!(matcher.load("", true).is_err());
        assert!(matcher.load("  \n ", true).is_err());
        assert!(matcher.load("R", true).is_ok());
    }

    #[test]
    fn test_whole_token_matching_only() {
        let mut matcher = TermMatcher::new();
        matcher.load("R", true).unwrap();
        let tokens = tokenize("Rust versus R in practice");
        let found = find_texts(&matcher, &tokens);
        assert_eq!(found, vec!["R"]);
    }

    #[test]
    fn test_longest_match_wins() {
        let mut matcher = TermMatcher::new();
        matcher.load("Excel", true).unwrap();
        matcher.load("Microsoft Excel", true).unwrap();
        let tokens = tokenize("data in Microsoft Excel sheets");
        let matches = matcher.find(&tokens, true, true).unwrap();
        assert_eq!(matches.len(), 1);
        let text: String = tokens[matches[0].first..=matches[0].last]
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(text, "Microsoft Excel");
    }

    #[test]
    fn test_consecutive_occurrences_do_not_merge() {
        let mut matcher = TermMatcher::new();
        matcher.load("R", true).unwrap();
        let tokens = tokenize("R R R");
        let matches = matcher.find(&tokens, true, true).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let mut matcher = TermMatcher::new();
        matcher.load("MATLAB", true).unwrap();
        let tokens = tokenize("implemented in Matlab scripts");
        assert!(matcher.find(&tokens, true, true).unwrap().is_empty());
        assert_eq!(matcher.find(&tokens, true, false).unwrap().len(), 1);
    }

    #[test]
    fn test_multiword_term_across_delimiters() {
        let mut matcher = TermMatcher::new();
        matcher.load("GraphPad Prism", true).unwrap();
        let tokens = tokenize("using GraphPad\nPrism for plots");
        let matches = matcher.find(&tokens, true, true).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(tokens[matches[0].first].text, "GraphPad");
        assert_eq!(tokens[matches[0].last].text, "Prism");
    }

    #[test]
    fn test_hyphenated_term() {
        let mut matcher = TermMatcher::new();
        matcher.load("scikit-learn", true).unwrap();
        let tokens = tokenize("We used scikit-learn 0.24");
        let matches = matcher.find(&tokens, true, true).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(tokens[matches[0].first].text, "scikit");
        assert_eq!(tokens[matches[0].last].text, "learn");
    }
}
