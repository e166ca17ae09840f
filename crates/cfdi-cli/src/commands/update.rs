//! Update command - append new invoices to the report.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use cfdi_core::{run_with, BatchEvent, CfdiParser};

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Directory holding the XML invoices
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Report file (.xlsx or .csv)
    #[arg(short, long)]
    report: Option<PathBuf>,
}

/// A document that could not be extracted.
struct Failure {
    file_name: String,
    reason: String,
}

pub fn run(args: UpdateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(report) = args.report {
        config.report_path = report;
    }

    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
        .progress_chars("=>-");

    let mut progress: Option<ProgressBar> = None;
    let mut failures = Vec::new();
    let mut added = Vec::new();

    let summary = run_with(&config, &CfdiParser::new(), |event| match event {
        BatchEvent::Started { documents } => {
            println!(
                "{} Found {} documents in {}",
                style("ℹ").blue(),
                documents,
                config.input_dir.display()
            );
            let bar = ProgressBar::new(*documents as u64);
            bar.set_style(bar_style.clone());
            progress = Some(bar);
        }
        BatchEvent::Document {
            record,
            classification,
            ..
        } => {
            if record.is_error() {
                failures.push(Failure {
                    file_name: record.file_name.clone(),
                    reason: record.issue_date.clone().unwrap_or_default(),
                });
            } else if classification.is_added() {
                added.push(record.file_name.clone());
            }
            if let Some(bar) = &progress {
                bar.inc(1);
            }
        }
    })?;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    match summary.prior_rows {
        Some(rows) => println!(
            "{} Existing report {} has {} rows",
            style("ℹ").blue(),
            summary.report_path.display(),
            rows
        ),
        None => println!(
            "{} Report {} will be created",
            style("ℹ").blue(),
            summary.report_path.display()
        ),
    }

    if summary.documents == 0 {
        println!(
            "{} No documents found in {}",
            style("!").yellow(),
            config.input_dir.display()
        );
        return Ok(());
    }

    for file_name in &added {
        println!("  {} {}", style("[NEW]").green(), file_name);
    }
    if !added.is_empty() {
        println!();
    }

    if !failures.is_empty() {
        println!("{}", style("Documents with errors:").red());
        for failure in &failures {
            println!("  - {}: {}", failure.file_name, failure.reason);
        }
        println!();
    }

    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        summary.documents,
        start.elapsed()
    );
    println!(
        "   {} skipped (already reported), {} added, {} with errors",
        style(summary.skipped).dim(),
        style(summary.added).green(),
        style(summary.errors).red()
    );

    if summary.written {
        println!(
            "{} Report saved to {}",
            style("✓").green(),
            summary.report_path.display()
        );
    } else {
        println!("{} No new invoices; report left unchanged", style("ℹ").blue());
    }

    Ok(())
}
