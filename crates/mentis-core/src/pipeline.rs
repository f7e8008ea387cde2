//! Document pipeline sequencing all engine stages.
//!
//! One [`DocumentPipeline`] is built per configuration and reused across
//! documents; it is `Sync` and processes documents independently, so batch
//! processing parallelizes per document.

use std::sync::Arc;

use tracing::info;

use mentis_common::services::{CorpusStats, SentenceSegmenter};
use mentis_common::{BiblioRef, EngineConfig, Entity, Result, Token};

use crate::aggregator::{self, KeepExisting, SlotPolicy};
use crate::consolidate;
use crate::context::{self, RuleSegmenter};
use crate::decode;
use crate::normalize::normalize_name;
use crate::propagation;
use crate::references;

/// One tokenized text segment of a document, usually a paragraph, with the
/// tagger's per-token labels when the segment was tagged.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub tokens: Vec<Token>,
    pub labels: Option<Vec<String>>,
}

impl Sequence {
    pub fn labeled(tokens: Vec<Token>, labels: Vec<String>) -> Self {
        Self { tokens, labels: Some(labels) }
    }

    /// A segment without tagger output; it still takes part in propagation.
    pub fn unlabeled(tokens: Vec<Token>) -> Self {
        Self { tokens, labels: None }
    }
}

/// A complete document as the engine sees it: tagged and untagged segments
/// in reading order, plus the document's reference callout markers.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
    pub sequences: Vec<Sequence>,
    pub bib_refs: Vec<BiblioRef>,
}

pub struct DocumentPipeline {
    cfg: EngineConfig,
    stats: Arc<dyn CorpusStats>,
    segmenter: Box<dyn SentenceSegmenter>,
    policy: Box<dyn SlotPolicy>,
    normalize: fn(&str) -> String,
}

impl DocumentPipeline {
    pub fn new(cfg: EngineConfig, stats: Arc<dyn CorpusStats>) -> Self {
        Self {
            cfg,
            stats,
            segmenter: Box::new(RuleSegmenter),
            policy: Box::new(KeepExisting),
            normalize: normalize_name,
        }
    }

    pub fn with_segmenter(mut self, segmenter: Box<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn SlotPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_normalizer(mut self, normalize: fn(&str) -> String) -> Self {
        self.normalize = normalize;
        self
    }

    /// Run all stages over one document and return its entities in document
    /// order.
    pub fn process(&self, input: &DocumentInput) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();

        for sequence in &input.sequences {
            let Some(labels) = &sequence.labels else {
                continue;
            };
            let spans = decode::decode(&sequence.tokens, labels)?;
            let mut found =
                aggregator::group(&spans, self.policy.as_ref(), &self.normalize);
            context::add_context(
                &mut found,
                None,
                &sequence.tokens,
                true,
                self.segmenter.as_ref(),
            );
            entities.extend(found);
        }
        info!("recognized {} directly tagged mentions", entities.len());

        let matcher = propagation::build_term_index(&entities, self.stats.as_ref())?;
        if !matcher.is_empty() {
            let all_tokens: Vec<Token> = input
                .sequences
                .iter()
                .flat_map(|s| s.tokens.iter().cloned())
                .collect();
            let profiles = propagation::build_term_profiles(&entities, self.stats.as_ref());
            let frequencies = propagation::build_frequencies(&entities, &all_tokens)?;
            let mut place_taken = propagation::prepare_place_taken(&entities);
            for sequence in &input.sequences {
                propagation::propagate(
                    &sequence.tokens,
                    &mut entities,
                    &profiles,
                    &matcher,
                    &mut place_taken,
                    &frequencies,
                    &self.cfg.propagation,
                    self.segmenter.as_ref(),
                    &self.normalize,
                )?;
            }
        }

        references::filter_spurious_versions(&mut entities, &input.bib_refs);
        references::attach_refs(&mut entities, &input.bib_refs, self.cfg.references.max_gap);
        consolidate::consolidate(&mut entities);

        entities.sort_by_key(Entity::order_key);
        info!("document yields {} entities", entities.len());
        Ok(entities)
    }

    /// Process several documents, in parallel when the `parallel` feature
    /// is enabled.
    pub fn process_batch(&self, inputs: &[DocumentInput]) -> Vec<Result<Vec<Entity>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            inputs.par_iter().map(|input| self.process(input)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            inputs.iter().map(|input| self.process(input)).collect()
        }
    }
}
