//! Keyword occurrence matching
//!
//! Scans a decomposed document for field keywords and records the
//! geometry/typography of the span carrying each match. Matching is
//! substring containment on normalized text; the first keyword in list
//! order that matches a line claims it, so the field-list order is
//! significant when one keyword is a substring of another.

use crate::document::{Document, Line};
use crate::normalize::normalize_text;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One observed instance of a field keyword on a document.
/// Immutable once created by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Raw font name of the carrying span
    pub font: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Occurrence {
    fn from_span(page: usize, span: &crate::document::Span) -> Self {
        Self {
            page,
            x: span.bbox.x0,
            y: span.bbox.y0,
            width: span.bbox.width(),
            height: span.bbox.height(),
            font: span.font.clone(),
            size: span.size,
            bold: span.font.contains("Bold"),
            italic: span.font.contains("Italic"),
        }
    }
}

/// Match one line against the keyword list. Returns the matched keyword
/// index and, when some single span contains the keyword, the occurrence
/// taken from the first such span. A keyword split across spans matches
/// the line but yields no occurrence (known gap).
fn match_line(page: usize, line: &Line, normalized_keywords: &[String]) -> Option<(usize, Option<Occurrence>)> {
    let norm_line = normalize_text(&line.text());
    for (idx, norm_kw) in normalized_keywords.iter().enumerate() {
        if !norm_line.contains(norm_kw.as_str()) {
            continue;
        }
        let occurrence = line
            .spans
            .iter()
            .find(|span| normalize_text(&span.text).contains(norm_kw.as_str()))
            .map(|span| Occurrence::from_span(page, span));
        // First keyword in list order wins the line, occurrence or not.
        return Some((idx, occurrence));
    }
    None
}

/// Find every occurrence of every field keyword across the whole
/// document (training path). Fields with no match are absent from the
/// returned map.
pub fn find_field_occurrences(
    document: &Document,
    keywords: &[String],
) -> BTreeMap<String, Vec<Occurrence>> {
    let normalized: Vec<String> = keywords.iter().map(|k| normalize_text(k)).collect();
    let mut found: BTreeMap<String, Vec<Occurrence>> = BTreeMap::new();

    for (page_idx, page) in document.pages.iter().enumerate() {
        for line in &page.lines {
            if let Some((kw_idx, Some(occ))) = match_line(page_idx, line, &normalized) {
                found.entry(keywords[kw_idx].clone()).or_default().push(occ);
            }
        }
    }
    found
}

/// Extract at most one occurrence per field from the first page
/// (validation path). When several lines match the same field, the last
/// match wins.
pub fn extract_observed(
    document: &Document,
    keywords: &[String],
) -> BTreeMap<String, Occurrence> {
    let normalized: Vec<String> = keywords.iter().map(|k| normalize_text(k)).collect();
    let mut observed = BTreeMap::new();

    if let Some(page) = document.pages.first() {
        for line in &page.lines {
            if let Some((kw_idx, Some(occ))) = match_line(0, line, &normalized) {
                observed.insert(keywords[kw_idx].clone(), occ);
            }
        }
    }
    observed
}
