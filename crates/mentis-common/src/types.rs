//! Core entity types for software-mention extraction.
//!
//! A document is a sequence of externally produced [`Token`]s. The tagger
//! (out of scope here) labels token runs; those runs are decoded into
//! [`Span`]s, which the aggregation engine groups into [`Entity`] values:
//! one per software-name occurrence, with optional version/creator/URL
//! components and attached bibliographic reference callouts.

use serde::{Deserialize, Serialize};

use crate::error::{MentisError, Result};

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A single layout token of the source document.
///
/// Tokens are produced by an external tokenizer. `offset` is the
/// document-global character offset of the token start; `coords` carries an
/// opaque page/layout reference that this crate passes through unexamined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<serde_json::Value>,
}

impl Token {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self { text: text.into(), offset, coords: None }
    }

    /// Document-global character offset one past the token end.
    pub fn end(&self) -> usize {
        self.offset + self.text.chars().count()
    }

    /// Whitespace tokens are treated as delimiters by the term matcher.
    pub fn is_delimiter(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }
}

// ---------------------------------------------------------------------------
// Offset ranges
// ---------------------------------------------------------------------------

/// A half-open `[start, end)` interval over character or token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, other: &OffsetRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// ---------------------------------------------------------------------------
// Component labels
// ---------------------------------------------------------------------------

/// Label assigned by the sequence tagger to a run of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentLabel {
    Software,
    Version,
    Creator,
    Url,
    Other,
}

impl ComponentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentLabel::Software => "software",
            ComponentLabel::Version => "version",
            ComponentLabel::Creator => "creator",
            ComponentLabel::Url => "url",
            ComponentLabel::Other => "other",
        }
    }

    /// Parse a tagger label string. Accepts angle-bracketed forms
    /// (`<software>`) and BIO prefixes (`B-software`, `I-software`) as
    /// emitted by common taggers; anything unrecognized is a decode error.
    pub fn parse(label: &str) -> Result<Self> {
        let clean = label
            .trim()
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_start_matches("B-")
            .trim_start_matches("I-");
        match clean.to_ascii_lowercase().as_str() {
            "software" => Ok(ComponentLabel::Software),
            "version" => Ok(ComponentLabel::Version),
            // the annotation guidelines use "publisher" and "creator"
            // interchangeably for the producing organisation
            "creator" | "publisher" => Ok(ComponentLabel::Creator),
            "url" => Ok(ComponentLabel::Url),
            "other" | "o" => Ok(ComponentLabel::Other),
            _ => Err(MentisError::Label(label.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A labeled interval over a token sequence.
///
/// `start`/`end` are character offsets local to the token sequence the span
/// was decoded from; they are rewritten to sentence-relative offsets once a
/// context is assigned. `doc_range` is the document-global character range of
/// the underlying tokens and never changes after decoding. `token_range`
/// indexes into the owning token sequence so callers can recover layout
/// coordinates without the span ever copying tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub label: ComponentLabel,
    pub raw_text: String,
    pub start: usize,
    pub end: usize,
    pub doc_range: OffsetRange,
    pub token_range: OffsetRange,
}

impl Span {
    /// Local character range of the span.
    pub fn local_range(&self) -> OffsetRange {
        OffsetRange::new(self.start, self.end)
    }

    /// A span with an empty or inverted interval cannot be anchored to a
    /// sentence; such spans are skipped rather than failing the document.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

// ---------------------------------------------------------------------------
// Bibliographic reference callout
// ---------------------------------------------------------------------------

/// A reference callout (e.g. `[3]`) resolved by the external
/// citation-matching stage. Offsets are document-global. `ref_key` indexes
/// into the caller's bibliography; this crate never dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiblioRef {
    pub ref_key: usize,
    pub start: usize,
    pub end: usize,
    pub raw_form: String,
}

impl BiblioRef {
    pub fn range(&self) -> OffsetRange {
        OffsetRange::new(self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Opaque disambiguation payload (external identifier, score, language, …).
/// The engine copies and merges these maps but never interprets their keys.
pub type Knowledge = serde_json::Map<String, serde_json::Value>;

/// A software mention: one software-name span plus the components and
/// reference callouts aggregated around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Span>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bib_refs: Vec<BiblioRef>,
    /// True when this mention was created by propagation rather than by
    /// direct tagging.
    #[serde(default)]
    pub propagated: bool,
    /// Marked for exclusion by an external policy; never removed here.
    #[serde(default)]
    pub filtered: bool,
    pub normalized_form: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Sentence start in the document-global coordinate space, once a
    /// context has been assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_offset: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<Knowledge>,
}

impl Entity {
    pub fn new(name: Span, normalized_form: String) -> Self {
        Self {
            name,
            version: None,
            creator: None,
            url: None,
            bib_refs: Vec::new(),
            propagated: false,
            filtered: false,
            normalized_form,
            context: None,
            context_offset: None,
            knowledge: None,
        }
    }

    pub fn slot(&self, label: ComponentLabel) -> Option<&Span> {
        match label {
            ComponentLabel::Version => self.version.as_ref(),
            ComponentLabel::Creator => self.creator.as_ref(),
            ComponentLabel::Url => self.url.as_ref(),
            ComponentLabel::Software | ComponentLabel::Other => None,
        }
    }

    /// Set the slot for `span.label`, replacing any occupant. Software and
    /// Other spans have no slot and are ignored.
    pub fn set_slot(&mut self, span: Span) {
        match span.label {
            ComponentLabel::Version => self.version = Some(span),
            ComponentLabel::Creator => self.creator = Some(span),
            ComponentLabel::Url => self.url = Some(span),
            ComponentLabel::Software | ComponentLabel::Other => {}
        }
    }

    /// All populated component spans, name first.
    pub fn components(&self) -> impl Iterator<Item = &Span> {
        std::iter::once(&self.name)
            .chain(self.version.as_ref())
            .chain(self.creator.as_ref())
            .chain(self.url.as_ref())
    }

    /// Sort key giving the total order over mentions: document-global
    /// position of the name span.
    pub fn order_key(&self) -> (usize, usize) {
        (self.name.doc_range.start, self.name.doc_range.end)
    }

    /// Serialize the entity for downstream formatters.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
