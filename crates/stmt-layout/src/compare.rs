//! Anomaly comparison against a synthesized template
//!
//! Evaluates one document's observed occurrences against a bank's
//! template. A field absent from the document is a single major anomaly;
//! a present field runs three independent checks (position, font size,
//! style), each able to add its own minor anomaly in the same pass.
//! Fields absent from the template are never checked.

use crate::matcher::Occurrence;
use crate::normalize::normalize_font;
use crate::template::{FieldTemplate, Template};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Extra slack beyond the stored position range when checking x/y.
/// Looser than the synthesis margin to tolerate cross-render jitter
/// beyond pure training variance.
pub const POSITION_THRESHOLD: f64 = 30.0;

/// Anomaly severity: `major` for a field entirely absent, `minor` for a
/// present field deviating in position, size, or style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Major,
    Minor,
}

/// One detected deviation for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub field: String,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub reason: String,
}

fn check_position(field: &str, expected: &FieldTemplate, actual: &Occurrence) -> Option<Anomaly> {
    let xr = &expected.position_range.x;
    let yr = &expected.position_range.y;
    // Width/height are synthesis-time statistics only; x/y carry the
    // layout-drift signal at comparison time.
    if xr.contains_with_slack(actual.x, POSITION_THRESHOLD)
        && yr.contains_with_slack(actual.y, POSITION_THRESHOLD)
    {
        return None;
    }
    Some(Anomaly {
        field: field.to_string(),
        severity: Severity::Minor,
        reason: format!(
            "Position out of expected range: ({:.1}, {:.1}) vs expected ({:.1}-{:.1}, {:.1}-{:.1})",
            actual.x,
            actual.y,
            xr.lo(),
            xr.hi(),
            yr.lo(),
            yr.hi()
        ),
    })
}

fn check_font_size(field: &str, expected: &FieldTemplate, actual: &Occurrence) -> Option<Anomaly> {
    if expected.font_size_range.contains(actual.size) {
        return None;
    }
    Some(Anomaly {
        field: field.to_string(),
        severity: Severity::Minor,
        reason: format!(
            "Font size mismatch: {:.1} vs expected range [{:.1}-{:.1}]",
            actual.size,
            expected.font_size_range.lo(),
            expected.font_size_range.hi()
        ),
    })
}

fn check_style(field: &str, expected: &FieldTemplate, actual: &Occurrence) -> Option<Anomaly> {
    let normalized_font = normalize_font(&actual.font);
    let mut issues = Vec::new();

    if !expected.fonts.contains(&normalized_font) {
        issues.push(format!(
            "font '{}' not in expected {:?}",
            normalized_font, expected.fonts
        ));
    }
    if actual.bold != expected.bold {
        issues.push(format!(
            "bold: {} vs expected: {}",
            actual.bold, expected.bold
        ));
    }
    if actual.italic != expected.italic {
        issues.push(format!(
            "italic: {} vs expected: {}",
            actual.italic, expected.italic
        ));
    }

    if issues.is_empty() {
        return None;
    }
    // Font-name/bold/italic violations combine into a single anomaly.
    Some(Anomaly {
        field: field.to_string(),
        severity: Severity::Minor,
        reason: format!("Style mismatch: {}", issues.join(", ")),
    })
}

/// Compare observed occurrences against a template. Anomalies come out
/// in template field order, then position/size/style order within a
/// field. Never fails; malformed bounds are evaluated as given.
pub fn compare(template: &Template, observed: &BTreeMap<String, Occurrence>) -> Vec<Anomaly> {
    let mut anomalies = Vec::new();

    for (field, expected) in template.iter() {
        let Some(actual) = observed.get(field) else {
            anomalies.push(Anomaly {
                field: field.clone(),
                severity: Severity::Major,
                reason: "Field missing from document".to_string(),
            });
            continue;
        };

        anomalies.extend(check_position(field, expected, actual));
        anomalies.extend(check_font_size(field, expected, actual));
        anomalies.extend(check_style(field, expected, actual));
    }

    anomalies
}
