//! Sentence context assignment.
//!
//! Each entity gets the sentence containing its name span as textual
//! context. Sentence segmentation itself is an external collaborator
//! ([`SentenceSegmenter`]); this module prepares the forbidden split
//! positions (no boundary may cut through a component span or an attached
//! reference callout), applies the result, and optionally rebases component
//! offsets to be sentence-relative. All offsets are character offsets.

use mentis_common::services::SentenceSegmenter;
use mentis_common::{Entity, OffsetRange, Token};

/// Assign each entity its containing sentence.
///
/// `text` is the rendering of `tokens`; when `None` it is reconstructed by
/// concatenating token texts. With `rebase`, component offsets are rewritten
/// relative to the sentence start and `context_offset` records the sentence
/// start in the document-global space.
pub fn add_context(
    entities: &mut [Entity],
    text: Option<&str>,
    tokens: &[Token],
    rebase: bool,
    segmenter: &dyn SentenceSegmenter,
) {
    if entities.is_empty() {
        return;
    }

    // offset of the sequence within the complete document tokenization
    let offset_shift = tokens.first().map_or(0, |t| t.offset);

    // spans that sentence segmentation must not cut through; reference
    // callout offsets are global and need shifting into the local space
    let mut forbidden = Vec::new();
    for entity in entities.iter() {
        for component in entity.components() {
            forbidden.push(component.local_range());
        }
        for bib_ref in &entity.bib_refs {
            forbidden.push(OffsetRange::new(
                bib_ref.start.saturating_sub(offset_shift),
                bib_ref.end.saturating_sub(offset_shift),
            ));
        }
    }

    let rendered;
    let text = match text {
        Some(t) => t,
        None => {
            rendered = tokens.iter().map(|t| t.text.as_str()).collect::<String>();
            &rendered
        }
    };

    let mut sentences = segmenter.segment(text, tokens, &forbidden);
    if sentences.is_empty() {
        // degraded segmentation: the whole text is one sentence
        sentences = vec![OffsetRange::new(0, text.chars().count())];
    }

    for entity in entities.iter_mut() {
        if !entity.name.is_valid() {
            // ill-formed tagger output: skip the entity, not the document
            continue;
        }
        let start = entity.name.start;
        let end = entity.name.end;

        let Some(sentence) = sentences
            .iter()
            .find(|s| s.start <= start && end <= s.end)
            .copied()
        else {
            continue;
        };

        entity.context = Some(char_slice(text, sentence.start, sentence.end));
        if rebase {
            for component in [&mut entity.name]
                .into_iter()
                .chain(entity.version.as_mut())
                .chain(entity.creator.as_mut())
                .chain(entity.url.as_mut())
            {
                component.start = component.start.saturating_sub(sentence.start);
                component.end = component.end.saturating_sub(sentence.start);
            }
            entity.context_offset = Some(sentence.start + offset_shift);
        }
    }
}

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}

/// Rule-based sentence splitter used as the bundled fallback: a sentence
/// ends after `.`, `!` or `?` followed by whitespace, unless the boundary
/// falls strictly inside a forbidden span. Production callers are expected
/// to inject a proper segmenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleSegmenter;

impl SentenceSegmenter for RuleSegmenter {
    fn segment(
        &self,
        text: &str,
        _tokens: &[Token],
        forbidden: &[OffsetRange],
    ) -> Vec<OffsetRange> {
        let chars: Vec<char> = text.chars().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;
        while i < chars.len() {
            let c = chars[i];
            let next_is_space = chars.get(i + 1).map_or(true, |n| n.is_whitespace());
            if matches!(c, '.' | '!' | '?') && next_is_space {
                let boundary = i + 1;
                let inside = forbidden
                    .iter()
                    .any(|f| f.start < boundary && boundary < f.end);
                if !inside {
                    sentences.push(OffsetRange::new(start, boundary));
                    // next sentence starts at the next non-whitespace char
                    let mut next = boundary;
                    while next < chars.len() && chars[next].is_whitespace() {
                        next += 1;
                    }
                    start = next;
                    i = next;
                    continue;
                }
            }
            i += 1;
        }
        if start < chars.len() {
            sentences.push(OffsetRange::new(start, chars.len()));
        }
        sentences
    }
}
