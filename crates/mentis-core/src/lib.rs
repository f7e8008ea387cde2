//! Entity aggregation and document-level consistency engine for software
//! mentions.
//!
//! Input: labeled token spans from an external sequence tagger plus the
//! document token stream. Output: a consistent, ordered list of software
//! mention entities. The flow for one document:
//!   1. Decode tagger output into labeled spans (`decode`)
//!   2. Group spans into entities anchored on software names (`aggregator`)
//!   3. Assign each entity its containing sentence (`context`)
//!   4. Re-find known names elsewhere in the document under a specificity
//!      gate (`propagation`, backed by `matcher` and `interval`)
//!   5. Attach bibliographic reference callouts (`references`)
//!   6. Share knowledge and references between same-name mentions
//!      (`consolidate`)
//!
//! `pipeline` sequences the stages; each stage is also usable on its own.
//! PDF/XML parsing, the tagging model, sentence-boundary detection and
//! knowledge-base disambiguation are external collaborators; this crate
//! only consumes their already-resolved results.

pub mod aggregator;
pub mod consolidate;
pub mod context;
pub mod decode;
pub mod interval;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod propagation;
pub mod references;

pub use aggregator::{KeepExisting, SlotPolicy};
pub use matcher::TermMatcher;
pub use pipeline::{DocumentInput, DocumentPipeline, Sequence};

pub use mentis_common::{
    BiblioRef, ComponentLabel, EngineConfig, Entity, Knowledge, MentisError,
    OffsetRange, Result, Span, Token,
};
