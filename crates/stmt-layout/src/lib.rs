//! Bank statement layout verification
//!
//! Learns the visual layout a bank's statements normally have (field
//! positions, font sizes, font styles) from a corpus of known-good
//! documents, then flags statements whose fields deviate from that norm.
//!
//! Two halves:
//! - Template synthesis: match field keywords across a training corpus,
//!   aggregate the observed geometry/typography per field, and reduce it
//!   to per-field tolerance ranges ([`template::synthesize`]).
//! - Anomaly detection: match the same keywords on a single document and
//!   compare each observation against the stored template
//!   ([`compare::compare`], [`validate::validate_document`]).
//!
//! Document decomposition (pages → lines → styled spans) is an injected
//! collaborator behind [`document::DocumentParser`]; any extraction
//! backend producing that shape is substitutable.

pub mod aggregate;
pub mod bank;
pub mod compare;
pub mod config;
pub mod corpus;
pub mod document;
pub mod fields;
pub mod matcher;
pub mod normalize;
pub mod store;
pub mod template;
pub mod validate;

pub use aggregate::Aggregate;
pub use bank::{BankIdentifier, BankMatch, IfscBankIdentifier, UNKNOWN_BANK};
pub use compare::{compare, Anomaly, Severity, POSITION_THRESHOLD};
pub use config::LayoutConfig;
pub use corpus::{ingest_all_banks, ingest_bank_corpus, IngestStats};
pub use document::{BBox, Document, DocumentParser, JsonDocumentParser, Line, Page, Span};
pub use fields::load_field_list;
pub use matcher::{extract_observed, find_field_occurrences, Occurrence};
pub use normalize::{normalize_font, normalize_text};
pub use store::TemplateStore;
pub use template::{synthesize, FieldTemplate, Interval, PositionRange, Synthesis, Template};
pub use validate::{validate_document, ValidationReport};

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by layout verification
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The decomposition collaborator could not read the document.
    /// Batch callers skip the document; single-document validation
    /// surfaces this instead of returning an empty anomaly list.
    #[error("Document unreadable: {0}")]
    DocumentUnreadable(String),

    #[error("No template found for bank '{bank}' (looked for {path})")]
    TemplateNotFound { bank: String, path: PathBuf },

    #[error("Malformed template {path}: {reason}")]
    MalformedTemplate { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
