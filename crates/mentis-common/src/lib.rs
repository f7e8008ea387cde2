//! Shared data model and plumbing for the mentis workspace.
//!
//! Holds the types that cross crate boundaries: tokens, labeled spans,
//! software-mention entities, bibliographic reference callouts, the error
//! type and the engine configuration. The processing logic itself lives in
//! `mentis-core`; lexical resources in `mentis-lexicon`.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::EngineConfig;
pub use error::{MentisError, Result};
pub use services::{CorpusStats, SentenceSegmenter};
pub use types::{
    BiblioRef, ComponentLabel, Entity, Knowledge, OffsetRange, Span, Token,
};
