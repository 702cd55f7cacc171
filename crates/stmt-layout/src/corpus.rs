//! Corpus ingestion and template generation
//!
//! Walks a bank's corpus folder, matches field keywords in every
//! readable document, merges the per-document results, and synthesizes
//! and persists the bank's template. Documents are processed in parallel
//! (the aggregate merge is order-independent); an unreadable document is
//! logged and skipped, never aborting the batch.

use crate::aggregate::Aggregate;
use crate::config::LayoutConfig;
use crate::document::DocumentParser;
use crate::fields::load_field_list;
use crate::matcher::find_field_occurrences;
use crate::template::synthesize;
use crate::LayoutError;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of ingesting one bank's corpus
#[derive(Debug, Clone, Serialize)]
pub struct IngestStats {
    pub bank: String,
    pub documents_ok: usize,
    pub documents_failed: usize,
    /// Fields that made it into the template
    pub fields_templated: usize,
    /// Requested fields with no training occurrences, omitted from the
    /// template
    pub dropped_fields: Vec<String>,
    /// Where the template was written; `None` when the corpus yielded
    /// no occurrences at all
    pub template_path: Option<PathBuf>,
}

/// List corpus files with one of the parser's extensions, sorted for
/// reproducible logs (processing order does not affect the template).
fn corpus_files(folder: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, LayoutError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| extensions.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Ingest one bank's corpus and persist its template.
pub fn ingest_bank_corpus<P>(
    parser: &P,
    config: &LayoutConfig,
    bank: &str,
) -> Result<IngestStats, LayoutError>
where
    P: DocumentParser + Sync,
{
    let field_list = load_field_list(&config.field_file(bank))?;
    let files = corpus_files(&config.bank_folder(bank), parser.extensions())?;
    tracing::info!(bank, documents = files.len(), "ingesting corpus");

    // Each worker builds a partial aggregate; merge order is free
    // because the per-field multiset union is commutative.
    let (aggregate, documents_ok, documents_failed) = files
        .par_iter()
        .map(|path| {
            match parser
                .parse(path)
                .map(|doc| find_field_occurrences(&doc, &field_list))
            {
                Ok(batch) => {
                    let mut partial = Aggregate::new();
                    partial.merge_document(batch);
                    (partial, 1usize, 0usize)
                }
                Err(e) => {
                    tracing::warn!(document = %path.display(), error = %e, "skipping unreadable document");
                    (Aggregate::new(), 0, 1)
                }
            }
        })
        .reduce(
            || (Aggregate::new(), 0, 0),
            |(a, ok_a, failed_a), (b, ok_b, failed_b)| {
                (a.merge(b), ok_a + ok_b, failed_a + failed_b)
            },
        );

    let synthesis = synthesize(&field_list, &aggregate);
    for field in &synthesis.dropped_fields {
        tracing::warn!(bank, %field, "no training occurrences; field omitted from template");
    }

    let template_path = if synthesis.template.is_empty() {
        tracing::warn!(bank, "corpus produced no field occurrences; template not written");
        None
    } else {
        Some(config.store().save(bank, &synthesis.template)?)
    };

    Ok(IngestStats {
        bank: bank.to_string(),
        documents_ok,
        documents_failed,
        fields_templated: synthesis.template.len(),
        dropped_fields: synthesis.dropped_fields,
        template_path,
    })
}

/// Generate templates for every bank folder that has a field list.
/// Folders without one are skipped with a warning.
pub fn ingest_all_banks<P>(parser: &P, config: &LayoutConfig) -> Result<Vec<IngestStats>, LayoutError>
where
    P: DocumentParser + Sync,
{
    let mut stats = Vec::new();
    let mut banks = Vec::new();
    for entry in std::fs::read_dir(&config.banks_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                banks.push(name.to_string());
            }
        }
    }
    banks.sort();

    for bank in banks {
        if !config.field_file(&bank).is_file() {
            tracing::warn!(%bank, "no field list; skipping bank folder");
            continue;
        }
        stats.push(ingest_bank_corpus(parser, config, &bank)?);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BBox, Document, JsonDocumentParser, Line, Page, Span};

    fn statement(x: f64) -> Document {
        Document::new(vec![Page::new(vec![Line::new(vec![Span::new(
            "Account Number: 1234",
            BBox {
                x0: x,
                y0: 200.0,
                x1: x + 80.0,
                y1: 212.0,
            },
            "ArialMT",
            10.0,
        )])])])
    }

    fn write_corpus(root: &Path, bank: &str, docs: &[Document]) {
        let folder = root.join("banks").join(bank);
        std::fs::create_dir_all(&folder).unwrap();
        for (i, doc) in docs.iter().enumerate() {
            std::fs::write(
                folder.join(format!("stmt_{i}.json")),
                serde_json::to_string(doc).unwrap(),
            )
            .unwrap();
        }
        std::fs::create_dir_all(root.join("fields")).unwrap();
        std::fs::write(
            root.join("fields").join(format!("{bank}.txt")),
            "Account Number\nCustomer ID\n",
        )
        .unwrap();
    }

    #[test]
    fn ingest_writes_template_and_reports_drops() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayoutConfig::under_root(dir.path());
        write_corpus(dir.path(), "hdfc", &[statement(100.0), statement(102.0)]);

        let stats = ingest_bank_corpus(&JsonDocumentParser, &config, "hdfc").unwrap();

        assert_eq!(stats.documents_ok, 2);
        assert_eq!(stats.documents_failed, 0);
        assert_eq!(stats.fields_templated, 1);
        assert_eq!(stats.dropped_fields, vec!["Customer ID".to_string()]);

        let template = config.store().load("hdfc").unwrap();
        assert!(template.get("Account Number").is_some());
    }

    #[test]
    fn unreadable_documents_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayoutConfig::under_root(dir.path());
        write_corpus(dir.path(), "hdfc", &[statement(100.0)]);
        std::fs::write(
            config.bank_folder("hdfc").join("corrupt.json"),
            "not json at all",
        )
        .unwrap();

        let stats = ingest_bank_corpus(&JsonDocumentParser, &config, "hdfc").unwrap();
        assert_eq!(stats.documents_ok, 1);
        assert_eq!(stats.documents_failed, 1);
        assert!(stats.template_path.is_some());
    }

    #[test]
    fn empty_corpus_writes_no_template() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayoutConfig::under_root(dir.path());
        write_corpus(dir.path(), "hdfc", &[]);

        let stats = ingest_bank_corpus(&JsonDocumentParser, &config, "hdfc").unwrap();
        assert_eq!(stats.template_path, None);
        assert!(matches!(
            config.store().load("hdfc").unwrap_err(),
            LayoutError::TemplateNotFound { .. }
        ));
    }

    #[test]
    fn all_banks_driver_skips_folders_without_field_lists() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayoutConfig::under_root(dir.path());
        write_corpus(dir.path(), "hdfc", &[statement(100.0)]);
        std::fs::create_dir_all(config.bank_folder("no_fields")).unwrap();

        let stats = ingest_all_banks(&JsonDocumentParser, &config).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].bank, "hdfc");
    }
}
