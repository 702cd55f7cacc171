//! Decomposed document model and the extraction collaborator interface
//!
//! A document arrives already decomposed into ordered pages, each an
//! ordered list of lines, each an ordered list of spans (contiguous runs
//! of uniformly-styled text with a bounding box, font name, and size).
//! The engine never parses file formats itself; it consumes this shape
//! through [`DocumentParser`], so any extraction backend producing it is
//! substitutable.

use crate::LayoutError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bounding box as reported by the extraction backend: top-left
/// (x0, y0) and bottom-right (x1, y1) in document coordinate units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// A contiguous run of uniformly-styled text within a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub text: String,
    pub bbox: BBox,
    /// Raw font name as reported by the backend (e.g. "Arial-BoldMT")
    pub font: String,
    pub size: f64,
}

impl Span {
    pub fn new(text: impl Into<String>, bbox: BBox, font: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            bbox,
            font: font.into(),
            size,
        }
    }
}

/// One line of text, in span order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Space-joined text of all spans, the unit keyword matching runs on.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One page, in line order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub lines: Vec<Line>,
}

impl Page {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A fully decomposed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// First-page text, used for bank identification.
    pub fn first_page_text(&self) -> String {
        self.pages.first().map(|p| p.text()).unwrap_or_default()
    }
}

/// Document decomposition collaborator
///
/// Implementations turn a document file into the page/line/span shape.
/// A failure to decompose must surface as
/// [`LayoutError::DocumentUnreadable`], never as a partial document.
pub trait DocumentParser {
    fn parse(&self, path: &Path) -> Result<Document, LayoutError>;

    /// File extensions (lowercase, without the dot) this parser accepts
    /// during corpus discovery.
    fn extensions(&self) -> &[&str];
}

/// Parser for documents already decomposed to JSON by an external
/// extraction tool, in the exact [`Document`] serde shape.
pub struct JsonDocumentParser;

impl DocumentParser for JsonDocumentParser {
    fn parse(&self, path: &Path) -> Result<Document, LayoutError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::DocumentUnreadable(format!("{}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            LayoutError::DocumentUnreadable(format!("{}: {}", path.display(), e))
        })
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}
