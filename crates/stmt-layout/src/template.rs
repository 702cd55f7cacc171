//! Field templates and template synthesis
//!
//! Reduces a field's accumulated occurrences to tolerance intervals
//! built around medians (robust to a few outlier detections), plus the
//! set of normalized font names, OR'd style flags, and the pages the
//! field was seen on.

use crate::aggregate::Aggregate;
use crate::matcher::Occurrence;
use crate::normalize::normalize_font;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Half-width of the x/y tolerance band around the median.
pub const POSITION_MARGIN: f64 = 15.0;
/// Width gets a tighter band than position; glyph metrics drift less
/// than layout.
pub const WIDTH_MARGIN: f64 = 5.0;
pub const HEIGHT_MARGIN: f64 = 3.0;
pub const FONT_SIZE_MARGIN: f64 = 0.5;

/// Closed interval, persisted as `[lo, hi]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval(pub f64, pub f64);

impl Interval {
    pub fn around(center: f64, margin: f64) -> Self {
        Self(center - margin, center + margin)
    }

    pub fn lo(&self) -> f64 {
        self.0
    }

    pub fn hi(&self) -> f64 {
        self.1
    }

    pub fn contains(&self, value: f64) -> bool {
        self.0 <= value && value <= self.1
    }

    /// Containment with extra slack on both ends (comparison-time
    /// threshold on top of the stored range).
    pub fn contains_with_slack(&self, value: f64, slack: f64) -> bool {
        self.0 - slack <= value && value <= self.1 + slack
    }
}

/// Independent tolerance intervals for the four geometry dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRange {
    pub x: Interval,
    pub y: Interval,
    pub width: Interval,
    pub height: Interval,
}

/// Synthesized expectation for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTemplate {
    pub position_range: PositionRange,
    pub font_size_range: Interval,
    /// Normalized font names seen in training
    pub fonts: BTreeSet<String>,
    /// True if any training occurrence had the flag set
    pub bold: bool,
    pub italic: bool,
    /// Sorted distinct page indices the field was observed on
    pub pages: Vec<usize>,
}

/// Per-bank mapping from field keyword to its template.
/// Produced once from a training corpus, persisted, then read-only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    fields: BTreeMap<String, FieldTemplate>,
}

impl Template {
    pub fn get(&self, field: &str) -> Option<&FieldTemplate> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldTemplate)> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldTemplate)> for Template {
    fn from_iter<I: IntoIterator<Item = (String, FieldTemplate)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Synthesis output: the template plus the requested fields that had no
/// training occurrences and were omitted from it.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub template: Template,
    pub dropped_fields: Vec<String>,
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

fn synthesize_field(occurrences: &[Occurrence]) -> FieldTemplate {
    let x_med = median(occurrences.iter().map(|o| o.x).collect());
    let y_med = median(occurrences.iter().map(|o| o.y).collect());
    let w_med = median(occurrences.iter().map(|o| o.width).collect());
    let h_med = median(occurrences.iter().map(|o| o.height).collect());
    let size_med = median(occurrences.iter().map(|o| o.size).collect());

    let fonts = occurrences
        .iter()
        .map(|o| normalize_font(&o.font))
        .collect::<BTreeSet<_>>();
    let pages = occurrences
        .iter()
        .map(|o| o.page)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    FieldTemplate {
        position_range: PositionRange {
            x: Interval::around(x_med, POSITION_MARGIN),
            y: Interval::around(y_med, POSITION_MARGIN),
            width: Interval::around(w_med, WIDTH_MARGIN),
            height: Interval::around(h_med, HEIGHT_MARGIN),
        },
        font_size_range: Interval::around(size_med, FONT_SIZE_MARGIN),
        fonts,
        bold: occurrences.iter().any(|o| o.bold),
        italic: occurrences.iter().any(|o| o.italic),
        pages,
    }
}

/// Synthesize a template from an aggregated corpus. Deterministic for a
/// fixed aggregate. Requested fields with zero occurrences are omitted
/// from the template and reported in `dropped_fields` so callers can
/// treat them as unverifiable instead of discovering the gap later.
pub fn synthesize(field_list: &[String], aggregate: &Aggregate) -> Synthesis {
    let mut fields = BTreeMap::new();
    let mut dropped_fields = Vec::new();

    for field in field_list {
        match aggregate.occurrences(field) {
            Some(occurrences) if !occurrences.is_empty() => {
                fields.insert(field.clone(), synthesize_field(occurrences));
            }
            _ => dropped_fields.push(field.clone()),
        }
    }

    Synthesis {
        template: Template { fields },
        dropped_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn occ(page: usize, x: f64, y: f64, w: f64, h: f64, font: &str, size: f64) -> Occurrence {
        Occurrence {
            page,
            x,
            y,
            width: w,
            height: h,
            font: font.to_string(),
            size,
            bold: font.contains("Bold"),
            italic: font.contains("Italic"),
        }
    }

    fn aggregate_of(field: &str, occurrences: Vec<Occurrence>) -> Aggregate {
        let mut agg = Aggregate::new();
        let mut batch = BTreeMap::new();
        batch.insert(field.to_string(), occurrences);
        agg.merge_document(batch);
        agg
    }

    #[test]
    fn ranges_are_median_plus_minus_margin() {
        let agg = aggregate_of(
            "Account Number",
            vec![
                occ(0, 100.0, 200.0, 80.0, 12.0, "ArialMT", 10.0),
                occ(0, 102.0, 201.0, 81.0, 12.0, "ArialMT", 10.0),
                occ(0, 98.0, 199.0, 79.0, 12.0, "ArialMT", 10.0),
            ],
        );
        let synthesis = synthesize(&["Account Number".to_string()], &agg);
        let field = synthesis.template.get("Account Number").unwrap();

        assert_eq!(field.position_range.x, Interval(85.0, 115.0));
        assert_eq!(field.position_range.y, Interval(185.0, 215.0));
        assert_eq!(field.position_range.width, Interval(75.0, 85.0));
        assert_eq!(field.position_range.height, Interval(9.0, 15.0));
        assert_eq!(field.font_size_range, Interval(9.5, 10.5));
    }

    #[test]
    fn even_sample_count_uses_mean_of_middle_two() {
        let agg = aggregate_of(
            "IFSC",
            vec![
                occ(0, 10.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(0, 20.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(0, 30.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(0, 40.0, 0.0, 50.0, 10.0, "Arial", 10.0),
            ],
        );
        let synthesis = synthesize(&["IFSC".to_string()], &agg);
        let field = synthesis.template.get("IFSC").unwrap();
        // median = (20 + 30) / 2 = 25
        assert_eq!(field.position_range.x, Interval(10.0, 40.0));
    }

    #[test]
    fn fonts_are_normalized_and_deduplicated() {
        let agg = aggregate_of(
            "Branch",
            vec![
                occ(0, 0.0, 0.0, 50.0, 10.0, "ArialMT", 10.0),
                occ(0, 0.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(0, 0.0, 0.0, 50.0, 10.0, "Arial-Bold", 10.0),
            ],
        );
        let synthesis = synthesize(&["Branch".to_string()], &agg);
        let field = synthesis.template.get("Branch").unwrap();

        let fonts: Vec<&str> = field.fonts.iter().map(|s| s.as_str()).collect();
        assert_eq!(fonts, vec!["arial", "arialbold"]);
    }

    #[test]
    fn style_flags_or_across_occurrences() {
        let agg = aggregate_of(
            "Branch",
            vec![
                occ(0, 0.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(0, 0.0, 0.0, 50.0, 10.0, "Arial-Bold", 10.0),
            ],
        );
        let synthesis = synthesize(&["Branch".to_string()], &agg);
        let field = synthesis.template.get("Branch").unwrap();
        assert!(field.bold);
        assert!(!field.italic);
    }

    #[test]
    fn pages_are_sorted_and_distinct() {
        let agg = aggregate_of(
            "Branch",
            vec![
                occ(2, 0.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(0, 0.0, 0.0, 50.0, 10.0, "Arial", 10.0),
                occ(2, 0.0, 0.0, 50.0, 10.0, "Arial", 10.0),
            ],
        );
        let synthesis = synthesize(&["Branch".to_string()], &agg);
        assert_eq!(synthesis.template.get("Branch").unwrap().pages, vec![0, 2]);
    }

    #[test]
    fn zero_occurrence_fields_are_dropped_and_reported() {
        let agg = aggregate_of(
            "Account Number",
            vec![occ(0, 0.0, 0.0, 50.0, 10.0, "Arial", 10.0)],
        );
        let fields = vec!["Account Number".to_string(), "Customer ID".to_string()];
        let synthesis = synthesize(&fields, &agg);

        assert_eq!(synthesis.template.len(), 1);
        assert!(synthesis.template.get("Customer ID").is_none());
        assert_eq!(synthesis.dropped_fields, vec!["Customer ID".to_string()]);
    }

    #[test]
    fn template_serializes_to_persistence_shape() {
        let agg = aggregate_of(
            "IFSC",
            vec![occ(0, 100.0, 200.0, 80.0, 12.0, "ArialMT", 10.0)],
        );
        let synthesis = synthesize(&["IFSC".to_string()], &agg);
        let json = serde_json::to_value(&synthesis.template).unwrap();

        let field = &json["IFSC"];
        assert_eq!(field["position_range"]["x"], serde_json::json!([85.0, 115.0]));
        assert_eq!(field["font_size_range"], serde_json::json!([9.5, 10.5]));
        assert_eq!(field["fonts"], serde_json::json!(["arial"]));
        assert_eq!(field["bold"], serde_json::json!(false));
        assert_eq!(field["pages"], serde_json::json!([0]));
    }
}
