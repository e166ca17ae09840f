//! Inspect command - extract a single invoice and print it.

use std::path::PathBuf;

use clap::Args;
use console::style;

use cfdi_core::invoice::InvoiceParser;
use cfdi_core::models::record::{COLUMNS, NOT_AVAILABLE};
use cfdi_core::{CfdiParser, InvoiceRecord};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Invoice XML file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output with the report columns
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let record = CfdiParser::new().extract_file(&args.input);
    if record.is_error() {
        eprintln!(
            "{} Could not extract {}",
            style("✗").red(),
            args.input.display()
        );
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&record)?,
        OutputFormat::Csv => format_record_csv(&record)?,
        OutputFormat::Text => format_record_text(&record),
    };
    println!("{}", output.trim_end());

    Ok(())
}

fn format_record_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    wtr.write_record(record.to_cells().iter().map(|cell| cell.to_string()))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(record: &InvoiceRecord) -> String {
    let show = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let mut output = String::new();

    output.push_str(&format!("UUID: {}\n", record.identifier));
    output.push_str(&format!("File: {}\n", record.file_name));
    if record.is_error() {
        output.push_str(&format!("{}\n", show(&record.issue_date)));
        return output;
    }

    output.push_str(&format!(
        "Date: {} {}\n",
        show(&record.issue_date),
        show(&record.issue_time)
    ));
    output.push_str(&format!("Series/Folio: {}/{}\n", show(&record.series), show(&record.folio)));
    output.push('\n');

    output.push_str("Issuer:\n");
    output.push_str(&format!("  {}\n", show(&record.issuer_name)));
    output.push_str(&format!("  RFC: {}\n", show(&record.issuer_rfc)));
    output.push('\n');

    output.push_str("Receiver:\n");
    output.push_str(&format!("  RFC: {}\n", show(&record.receiver_rfc)));
    output.push_str(&format!("  Use: {}\n", show(&record.cfdi_use)));
    output.push('\n');

    output.push_str("Amounts:\n");
    output.push_str(&format!("  Subtotal:    {}\n", record.subtotal));
    output.push_str(&format!("  Transferred: {}\n", record.transferred_taxes));
    output.push_str(&format!("  Withheld:    {}\n", record.withheld_taxes));
    output.push_str(&format!("  Total:       {}\n", record.total));
    output.push('\n');

    output.push_str(&format!(
        "Payment: form {}, method {}\n",
        show(&record.payment_form),
        show(&record.payment_method)
    ));

    output
}
