use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::warn;

use crate::config::MetricSpec;
use crate::loader::report_loader::BRAND_COLUMN;
use crate::models::BrandAggregate;
use crate::processor::column_resolver::{self, RATIO_COLUMN_EXCLUDES};

/// Group a tagged report by brand and sum the configured metric columns.
///
/// A metric whose source column cannot be located contributes 0 for every
/// brand; real exports vary in which optional columns they include, so a
/// missing column is a warning, not an error. Unmapped rows are kept so the
/// aggregate stays auditable against the raw report.
pub fn aggregate(df: &DataFrame, metrics: &[MetricSpec]) -> Result<BrandAggregate> {
    let mut totals = BrandAggregate::new();
    if df.height() == 0 {
        return Ok(totals);
    }

    let brands = df
        .column(BRAND_COLUMN)
        .context("Report has no Brand column; tag brands before aggregating")?
        .str()?;

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for spec in metrics {
        let Some(source) =
            column_resolver::resolve(&column_names, spec.keywords, RATIO_COLUMN_EXCLUDES)
        else {
            warn!(
                "No column matching {:?} found; {:?} sums as 0",
                spec.keywords, spec.metric
            );
            continue;
        };

        let values = df.column(source)?.cast(&DataType::Float64)?;
        let values = values.f64()?;
        for idx in 0..df.height() {
            if let Some(brand) = brands.get(idx) {
                let value = values.get(idx).unwrap_or(0.0);
                totals
                    .entry(brand.to_string())
                    .or_default()
                    .add_value(spec.metric, value);
            }
        }
    }

    Ok(totals)
}

/// Additive union of two aggregates: every brand present on either side
/// appears in the result, with absent sides contributing 0. This is how the
/// two advertising report types combine into one per-brand ad total.
pub fn merge_additive(a: &BrandAggregate, b: &BrandAggregate) -> BrandAggregate {
    let mut combined = a.clone();
    for (brand, totals) in b {
        combined.entry(brand.clone()).or_default().add(totals);
    }
    combined
}
