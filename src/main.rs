use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use config::BrandTaxonomy;
use export::write_workbook;
use loader::TableReader;
use pipeline::AuditPipeline;
use processor::audit_builder;

mod config;
mod export;
mod loader;
mod models;
mod pipeline;
mod processor;

/// Brand advertising audit: ingest the Sponsored Products, Sponsored Brands
/// and Business reports, attribute rows to brands, and export the per-brand
/// efficiency workbook.
#[derive(Parser, Debug)]
#[command(name = "brand-ad-audit", version)]
struct Args {
    /// Sponsored Products search-term report (csv or xlsx)
    #[arg(long, value_name = "FILE")]
    sponsored_products: PathBuf,

    /// Sponsored Brands report (csv or xlsx)
    #[arg(long, value_name = "FILE")]
    sponsored_brands: PathBuf,

    /// Business report with per-product total sales (csv or xlsx)
    #[arg(long, value_name = "FILE")]
    business: PathBuf,

    /// Output workbook path; defaults to a timestamped name
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Optional TOML file overriding the built-in brand taxonomy
    #[arg(long, value_name = "FILE")]
    brands: Option<PathBuf>,

    /// What-if growth applied to the advertising side, in percent
    #[arg(long, default_value_t = 0.0, value_name = "PCT")]
    spend_growth: f64,

    /// What-if growth applied to total sales, in percent
    #[arg(long, default_value_t = 0.0, value_name = "PCT")]
    sales_growth: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let inputs = [
        ("Sponsored Products", &args.sponsored_products),
        ("Sponsored Brands", &args.sponsored_brands),
        ("Business", &args.business),
    ];
    check_inputs_present(&inputs)?;

    let taxonomy = match &args.brands {
        Some(path) => {
            let path = path.to_string_lossy();
            let taxonomy = BrandTaxonomy::from_file(&path)?;
            info!("Loaded brand taxonomy from {}", path);
            taxonomy
        }
        None => BrandTaxonomy::default(),
    };
    info!("🚀 Starting brand audit with {} brands", taxonomy.brands.len());

    let mut tables = Vec::with_capacity(inputs.len());
    for (label, path) in &inputs {
        let df = TableReader::read_path(path)
            .with_context(|| format!("Failed to load the {} report", label))?;
        info!("Loaded {} report: {} rows ({})", label, df.height(), path.display());
        tables.push(df);
    }
    let mut tables = tables.into_iter();
    let (sp, sb, business) = (tables.next(), tables.next(), tables.next());

    let pipeline = AuditPipeline::new(&taxonomy)?;
    let mut output = pipeline.run(sp, sb, business)?;

    if args.spend_growth != 0.0 || args.sales_growth != 0.0 {
        info!(
            "Applying growth assumptions: spend {:+.1}%, sales {:+.1}%",
            args.spend_growth, args.sales_growth
        );
        output.audit = audit_builder::project(&output.audit, args.spend_growth, args.sales_growth);
    }

    if output.audit.is_empty() {
        warn!("⚠️ No rows matched the brand taxonomy; workbook will be empty");
    }

    let output_path = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "brand_audit_{}.xlsx",
            Utc::now().format("%Y%m%d_%H%M%S")
        ))
    });
    write_workbook(&output_path, &output.audit, &output.drilldowns)?;

    info!(
        "✅ Audited {} brands across {} drilldown sheets",
        output.audit.len(),
        output.drilldowns.len()
    );
    info!("📊 Workbook written to {}", output_path.display());

    Ok(())
}

/// Precondition check: every report file must exist before the pipeline
/// runs. Lists all missing inputs at once so the caller fixes them in one go.
fn check_inputs_present(inputs: &[(&str, &PathBuf)]) -> Result<()> {
    let missing: Vec<String> = inputs
        .iter()
        .filter(|(_, path)| !path.exists())
        .map(|(label, path)| format!("{} ({})", label, path.display()))
        .collect();

    if !missing.is_empty() {
        bail!("Missing required input files: {}", missing.join(", "));
    }
    Ok(())
}
