//! Decoding of tagger output into labeled spans.
//!
//! The sequence tagger emits one label per token. Contiguous tokens with the
//! same non-Other label form one span; whitespace tokens act as glue inside
//! a run and never open one. Unknown label strings are a decode error for
//! the whole sequence: a tagger emitting labels we cannot interpret is a
//! caller bug, not a degraded document.

use mentis_common::{ComponentLabel, MentisError, OffsetRange, Result, Span, Token};

/// Decode per-token labels over a token sequence into spans with local
/// character offsets, document-global ranges and token index ranges.
pub fn decode<S: AsRef<str>>(tokens: &[Token], labels: &[S]) -> Result<Vec<Span>> {
    if tokens.len() != labels.len() {
        return Err(MentisError::Pipeline(format!(
            "label/token length mismatch: {} labels for {} tokens",
            labels.len(),
            tokens.len()
        )));
    }

    let parsed = labels
        .iter()
        .map(|l| ComponentLabel::parse(l.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    // local character offset of each token within this sequence
    let mut local = Vec::with_capacity(tokens.len() + 1);
    let mut acc = 0;
    for token in tokens {
        local.push(acc);
        acc += token.text.chars().count();
    }
    local.push(acc);

    let mut spans = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_delimiter() || parsed[i] == ComponentLabel::Other {
            i += 1;
            continue;
        }
        let label = parsed[i];
        let mut last = i;
        let mut j = i + 1;
        while j < tokens.len() {
            if tokens[j].is_delimiter() {
                j += 1;
                continue;
            }
            if parsed[j] == label {
                last = j;
                j += 1;
            } else {
                break;
            }
        }

        let raw_text: String = tokens[i..=last].iter().map(|t| t.text.as_str()).collect();
        spans.push(Span {
            label,
            raw_text,
            start: local[i],
            end: local[last + 1],
            doc_range: OffsetRange::new(tokens[i].offset, tokens[last].end()),
            token_range: OffsetRange::new(i, last + 1),
        });
        i = j;
    }
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::tokenize;

    #[test]
    fn test_contiguous_same_label_merges() {
        let tokens = tokenize("Microsoft Excel 2016");
        // [Microsoft][ ][Excel][ ][2016]
        let labels = ["creator", "creator", "creator", "other", "version"];
        let spans = decode(&tokens, &labels).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, ComponentLabel::Creator);
        assert_eq!(spans[0].raw_text, "Microsoft Excel");
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 15);
        assert_eq!(spans[1].raw_text, "2016");
    }

    #[test]
    fn test_whitespace_glues_but_never_opens() {
        let tokens = tokenize("SPSS Statistics");
        // the delimiter carries a stale label but only glues the run
        let labels = ["software", "other", "software"];
        let spans = decode(&tokens, &labels).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].raw_text, "SPSS Statistics");
        assert_eq!(spans[0].token_range, OffsetRange::new(0, 3));
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let tokens = tokenize("R");
        let err = decode(&tokens, &["banana"]).unwrap_err();
        assert!(matches!(err, MentisError::Label(_)));
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let tokens = tokenize("R v2");
        assert!(decode(&tokens, &["software"]).is_err());
    }

    #[test]
    fn test_all_other_yields_no_spans() {
        let tokens = tokenize("no mentions here");
        let labels = vec!["other"; tokens.len()];
        assert!(decode(&tokens, &labels).unwrap().is_empty());
    }

    #[test]
    fn test_doc_ranges_follow_token_offsets() {
        let mut tokens = tokenize("used R here");
        // simulate a paragraph starting mid-document
        for t in &mut tokens {
            t.offset += 100;
        }
        let labels = ["other", "other", "software", "other", "other"];
        let spans = decode(&tokens, &labels).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].doc_range, OffsetRange::new(105, 106));
        // local offsets stay sequence-relative
        assert_eq!(spans[0].start, 5);
        assert_eq!(spans[0].end, 6);
    }
}
