//! Single-document validation
//!
//! Identifies the issuing bank, loads its template, matches the
//! template's fields on the document's first page, and compares. Errors
//! (unreadable document, missing template, malformed template) surface
//! as errors; an empty anomaly list always means a validation actually
//! ran and found nothing.

use crate::bank::{BankIdentifier, BankMatch};
use crate::compare::{compare, Anomaly, Severity};
use crate::document::DocumentParser;
use crate::matcher::extract_observed;
use crate::store::TemplateStore;
use crate::LayoutError;
use serde::Serialize;
use std::path::Path;

/// Result of validating one document against its bank's template
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub document: String,
    pub bank: String,
    pub ifsc: Option<String>,
    pub anomalies: Vec<Anomaly>,
    /// Templated fields found on the document
    pub fields_found: usize,
    /// Fields in the template
    pub total_fields: usize,
    pub major_count: usize,
    pub minor_count: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Plain-text rendering for CLI output.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Layout validation: {}\n", self.document));
        out.push_str(&format!(
            "Bank: {} (IFSC: {})\n",
            self.bank,
            self.ifsc.as_deref().unwrap_or("-")
        ));
        out.push_str(&format!(
            "Fields found: {}/{}\n",
            self.fields_found, self.total_fields
        ));

        if self.anomalies.is_empty() {
            out.push_str("No anomalies detected\n");
            return out;
        }

        out.push_str(&format!(
            "Anomalies: {} ({} major, {} minor)\n",
            self.anomalies.len(),
            self.major_count,
            self.minor_count
        ));
        for anomaly in &self.anomalies {
            let tag = match anomaly.severity {
                Severity::Major => "MAJOR",
                Severity::Minor => "minor",
            };
            out.push_str(&format!("  [{tag}] {}: {}\n", anomaly.field, anomaly.reason));
        }
        out
    }
}

/// Validate one document. The template is selected by the identified
/// bank; the template's own field set drives the matching.
pub fn validate_document<P, B>(
    parser: &P,
    identifier: &B,
    store: &TemplateStore,
    path: &Path,
) -> Result<ValidationReport, LayoutError>
where
    P: DocumentParser,
    B: BankIdentifier,
{
    let document = parser.parse(path)?;
    let BankMatch { bank, ifsc } = identifier.identify(&document.first_page_text());
    tracing::info!(document = %path.display(), %bank, "validating document layout");

    let template = store.load(&bank)?;
    let keywords: Vec<String> = template.field_names().cloned().collect();
    let observed = extract_observed(&document, &keywords);
    let anomalies = compare(&template, &observed);

    let major_count = anomalies
        .iter()
        .filter(|a| a.severity == Severity::Major)
        .count();
    let minor_count = anomalies.len() - major_count;

    Ok(ValidationReport {
        document: path.display().to_string(),
        bank,
        ifsc,
        anomalies,
        fields_found: observed.len(),
        total_fields: template.len(),
        major_count,
        minor_count,
    })
}
