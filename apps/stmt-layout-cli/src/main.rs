//! Statement layout verification CLI
//!
//! One entry point for both halves of the engine: template generation
//! from per-bank corpora, and single-document validation.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stmt_layout::{
    ingest_all_banks, ingest_bank_corpus, validate_document, IfscBankIdentifier,
    JsonDocumentParser, LayoutConfig, TemplateStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "stmt-layout")]
#[command(
    version,
    about = "Learn bank-statement layout templates and flag layout anomalies"
)]
struct Args {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize templates from per-bank corpora of known-good statements
    Generate {
        /// Root holding one corpus folder per bank
        #[arg(long, default_value = "banks")]
        banks_dir: PathBuf,

        /// Directory with <bank>.txt field lists
        #[arg(long, default_value = "fields")]
        fields_dir: PathBuf,

        /// Where templates are written
        #[arg(long, default_value = "templates")]
        templates_dir: PathBuf,

        /// Restrict to a single bank id
        #[arg(long)]
        bank: Option<String>,
    },

    /// Validate one decomposed statement against its bank's template
    Validate {
        /// Decomposed document (pages/lines/spans JSON)
        document: PathBuf,

        /// Directory holding the stored templates
        #[arg(long, default_value = "templates")]
        templates_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let parser = JsonDocumentParser;

    match args.command {
        Command::Generate {
            banks_dir,
            fields_dir,
            templates_dir,
            bank,
        } => {
            let config = LayoutConfig::new(banks_dir, fields_dir, templates_dir);
            let stats = match bank {
                Some(bank) => vec![ingest_bank_corpus(&parser, &config, &bank)
                    .with_context(|| format!("generating template for bank '{bank}'"))?],
                None => ingest_all_banks(&parser, &config)
                    .context("generating templates for all banks")?,
            };

            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                for s in &stats {
                    println!(
                        "{}: {} documents ok, {} failed, {} fields templated",
                        s.bank, s.documents_ok, s.documents_failed, s.fields_templated
                    );
                    if !s.dropped_fields.is_empty() {
                        println!("  dropped (no samples): {}", s.dropped_fields.join(", "));
                    }
                    match &s.template_path {
                        Some(path) => println!("  template: {}", path.display()),
                        None => println!("  template not written (empty corpus)"),
                    }
                }
            }
        }

        Command::Validate {
            document,
            templates_dir,
        } => {
            let store = TemplateStore::new(templates_dir);
            let report = validate_document(&parser, &IfscBankIdentifier, &store, &document)
                .with_context(|| format!("validating {}", document.display()))?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.to_text());
            }
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
