//! Document-level propagation of recognized software names.
//!
//! Once the tagger has found a software name somewhere in a document, other
//! occurrences of the same name elsewhere in the document are very likely
//! mentions too, provided the name is specific enough. This module
//! builds a term index and per-document frequency/specificity profiles from
//! the already-recognized entities, then re-scans token sequences and
//! creates propagated entities for matches that pass the specificity gate
//! and do not overlap an already-annotated region.

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use mentis_common::config::PropagationConfig;
use mentis_common::services::{CorpusStats, SentenceSegmenter};
use mentis_common::{ComponentLabel, Entity, OffsetRange, Result, Span, Token};

use crate::context;
use crate::interval;
use crate::matcher::TermMatcher;
use crate::normalize::collapse_whitespace;

/// Document-global ranges already covered by a recognized component; used to
/// keep propagation away from annotated text.
pub fn prepare_place_taken(entities: &[Entity]) -> Vec<OffsetRange> {
    entities
        .iter()
        .flat_map(|e| e.components().map(|c| c.doc_range))
        .collect()
}

/// Load every recognized software name (raw and normalized form) into a
/// term matcher, each term at most once.
///
/// Bare capitalized common words are skipped: a tagger slip on "The" must
/// not flood the document with propagated mentions.
pub fn build_term_index(
    entities: &[Entity],
    stats: &dyn CorpusStats,
) -> Result<TermMatcher> {
    let mut matcher = TermMatcher::new();
    let mut added: AHashSet<String> = AHashSet::new();

    for entity in entities {
        let term = collapse_whitespace(&entity.name.raw_text);
        if term.is_empty() {
            continue;
        }
        if is_capitalized_stopword(&term, stats) {
            debug!("not propagating capitalized stop word {term:?}");
            continue;
        }
        if added.insert(term.clone()) {
            matcher.load(&term, false)?;
        }
        let norm = &entity.normalized_form;
        if !norm.is_empty() && norm != &term && added.insert(norm.clone()) {
            matcher.load(norm, false)?;
        }
    }
    Ok(matcher)
}

/// Case-sensitive, delimiter-ignoring occurrence counts of each distinct
/// name term across `tokens` (normally the whole document tokenization).
pub fn build_frequencies(
    entities: &[Entity],
    tokens: &[Token],
) -> Result<AHashMap<String, usize>> {
    let mut frequencies = AHashMap::new();
    for entity in entities {
        let term = collapse_whitespace(&entity.name.raw_text);
        if term.is_empty() || frequencies.contains_key(&term) {
            continue;
        }
        let mut single = TermMatcher::new();
        single.load(&term, false)?;
        let count = single.find(tokens, true, true)?.len();
        frequencies.insert(term, count);
    }
    Ok(frequencies)
}

/// Specificity (idf) of each distinct raw/normalized name term, looked up
/// once per term. Terms unknown to the corpus statistics are absent from
/// the map; unknown is not zero.
pub fn build_term_profiles(
    entities: &[Entity],
    stats: &dyn CorpusStats,
) -> AHashMap<String, f64> {
    let mut profiles = AHashMap::new();
    let mut seen: AHashSet<String> = AHashSet::new();
    for entity in entities {
        let term = collapse_whitespace(&entity.name.raw_text);
        for candidate in [term, entity.normalized_form.clone()] {
            if candidate.is_empty() || !seen.insert(candidate.clone()) {
                continue;
            }
            if let Some(idf) = stats.term_idf(&candidate) {
                profiles.insert(candidate, idf);
            }
        }
    }
    profiles
}

/// Scan `tokens` for occurrences of indexed terms and append propagated
/// entities for the matches that pass the specificity gate.
///
/// A match is accepted unless its `frequency * idf` score is known and at
/// or below the configured threshold: a term that appears in effectively
/// every document never propagates, a term unknown to the corpus always
/// may. Accepted spans are registered in `place_taken` so subsequent passes
/// over other sequences cannot re-annotate them.
#[allow(clippy::too_many_arguments)]
pub fn propagate(
    tokens: &[Token],
    entities: &mut Vec<Entity>,
    term_profiles: &AHashMap<String, f64>,
    matcher: &TermMatcher,
    place_taken: &mut Vec<OffsetRange>,
    frequencies: &AHashMap<String, usize>,
    cfg: &PropagationConfig,
    segmenter: &dyn SentenceSegmenter,
    normalize: &dyn Fn(&str) -> String,
) -> Result<()> {
    if tokens.is_empty() || matcher.is_empty() {
        return Ok(());
    }
    let matches = matcher.find(tokens, true, true)?;
    if matches.is_empty() {
        return Ok(());
    }

    // local character offset of each token within this sequence; matches
    // are recomputed from token text lengths, never from document offsets
    let mut local = Vec::with_capacity(tokens.len() + 1);
    let mut acc = 0;
    for token in tokens {
        local.push(acc);
        acc += token.text.chars().count();
    }
    local.push(acc);

    let first_new = entities.len();
    for m in matches {
        let matched = &tokens[m.first..=m.last];
        let raw: String = matched.iter().map(|t| t.text.as_str()).collect();
        let term = collapse_whitespace(&raw);

        if term.chars().count() < cfg.min_term_len
            && !cfg.short_term_whitelist.iter().any(|w| *w == term)
        {
            continue;
        }

        // document-global span of the matched tokens, for overlap checking
        let raw_span = OffsetRange::new(matched[0].offset, matched[matched.len() - 1].end());
        if interval::overlaps(place_taken, raw_span) {
            continue;
        }

        let frequency = frequencies.get(&term).copied().unwrap_or(1);
        let score = term_profiles.get(&term).map(|idf| frequency as f64 * idf);
        if let Some(score) = score {
            if score <= cfg.specificity_threshold {
                debug!("not propagating {term:?}: specificity score {score}");
                continue;
            }
        }

        let name = Span {
            label: ComponentLabel::Software,
            raw_text: raw,
            start: local[m.first],
            end: local[m.last] + tokens[m.last].text.chars().count(),
            doc_range: raw_span,
            token_range: OffsetRange::new(m.first, m.last + 1),
        };
        let mut entity = Entity::new(name, normalize(&term));
        entity.propagated = true;

        interval::register(place_taken, raw_span);
        entities.push(entity);
    }

    if first_new < entities.len() {
        debug!("propagated {} new mentions", entities.len() - first_new);
        context::add_context(&mut entities[first_new..], None, tokens, true, segmenter);
    }
    Ok(())
}

fn is_capitalized_stopword(term: &str, stats: &dyn CorpusStats) -> bool {
    let first_capital = term.chars().next().map_or(false, char::is_uppercase);
    let all_capital = term
        .chars()
        .filter(|c| c.is_alphabetic())
        .all(char::is_uppercase);
    first_capital && !all_capital && stats.is_stopword(&term.to_lowercase())
}
