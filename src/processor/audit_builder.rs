use std::collections::BTreeSet;

use crate::models::{AuditRecord, BrandAggregate, MetricTotals, UNMAPPED};

/// Division that can never leak NaN or infinity into the output: a zero
/// denominator yields 0, which is valid output, not an error.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Outer-join the combined advertising aggregate with the business aggregate
/// on brand and derive the full ratio set from the raw sums.
///
/// Brands present on only one side are zero-filled on the other. Rows that
/// never matched the taxonomy ("Unmapped") are dropped from the deliverable;
/// they were kept through aggregation so totals stay auditable.
pub fn build(ad: &BrandAggregate, business: &BrandAggregate) -> Vec<AuditRecord> {
    let brands: BTreeSet<&String> = ad.keys().chain(business.keys()).collect();

    brands
        .into_iter()
        .filter(|brand| brand.as_str() != UNMAPPED)
        .map(|brand| {
            let mut combined = ad.get(brand).copied().unwrap_or_default();
            combined.total_sales = business
                .get(brand)
                .map(|t| t.total_sales)
                .unwrap_or_default();
            record_from_totals(brand.clone(), &combined)
        })
        .collect()
}

/// What-if projection: scale the advertising side by one growth factor and
/// total sales by another, then re-derive every ratio from the scaled sums.
/// Growth is given in percent; 0 leaves a record unchanged.
pub fn project(
    records: &[AuditRecord],
    spend_growth_pct: f64,
    sales_growth_pct: f64,
) -> Vec<AuditRecord> {
    let spend_factor = 1.0 + spend_growth_pct / 100.0;
    let sales_factor = 1.0 + sales_growth_pct / 100.0;

    records
        .iter()
        .map(|record| {
            let scaled = MetricTotals {
                spend: record.spend * spend_factor,
                clicks: record.clicks * spend_factor,
                impressions: record.impressions * spend_factor,
                ad_sales: record.ad_sales * spend_factor,
                orders: record.orders * spend_factor,
                total_sales: record.total_sales * sales_factor,
            };
            record_from_totals(record.brand.clone(), &scaled)
        })
        .collect()
}

/// Every ratio is computed independently from the raw sums, never from
/// another ratio's rounded value.
fn record_from_totals(brand: String, totals: &MetricTotals) -> AuditRecord {
    let organic_sales = totals.total_sales - totals.ad_sales;
    AuditRecord {
        brand,
        spend: totals.spend,
        clicks: totals.clicks,
        impressions: totals.impressions,
        ad_sales: totals.ad_sales,
        orders: totals.orders,
        total_sales: totals.total_sales,
        organic_sales,
        ctr: safe_div(totals.clicks, totals.impressions),
        cvr: safe_div(totals.orders, totals.clicks),
        roas: safe_div(totals.ad_sales, totals.spend),
        acos: safe_div(totals.spend, totals.ad_sales),
        tacos: safe_div(totals.spend, totals.total_sales),
        paid_contribution: safe_div(totals.ad_sales, totals.total_sales),
        organic_contribution: safe_div(organic_sales, totals.total_sales),
    }
}
