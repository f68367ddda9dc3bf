use serde::Serialize;
use std::collections::BTreeMap;

/// Sentinel brand for rows whose text matched no taxonomy entry.
pub const UNMAPPED: &str = "Unmapped";

/// Canonical metric names the aggregation layer sums into, regardless of how
/// the source report labels its columns ("7 Day Total Sales", "Spend(USD)", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Spend,
    Clicks,
    Impressions,
    AdSales,
    Orders,
    TotalSales,
}

/// Summed raw metrics for one brand. Metrics a source report does not carry
/// stay at 0, which is what the outer join downstream expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricTotals {
    pub spend: f64,
    pub clicks: f64,
    pub impressions: f64,
    pub ad_sales: f64,
    pub orders: f64,
    pub total_sales: f64,
}

impl MetricTotals {
    pub fn add_value(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Spend => self.spend += value,
            Metric::Clicks => self.clicks += value,
            Metric::Impressions => self.impressions += value,
            Metric::AdSales => self.ad_sales += value,
            Metric::Orders => self.orders += value,
            Metric::TotalSales => self.total_sales += value,
        }
    }

    pub fn add(&mut self, other: &MetricTotals) {
        self.spend += other.spend;
        self.clicks += other.clicks;
        self.impressions += other.impressions;
        self.ad_sales += other.ad_sales;
        self.orders += other.orders;
        self.total_sales += other.total_sales;
    }
}

/// Per-brand totals for one report, or for several reports merged additively.
/// BTreeMap keeps brand ordering deterministic across runs.
pub type BrandAggregate = BTreeMap<String, MetricTotals>;

/// One row of the consolidated per-brand fact table.
///
/// `organic_sales` is `total_sales - ad_sales` and is deliberately not
/// clamped at 0; a negative value signals an attribution-window data-quality
/// issue worth surfacing. Every ratio is 0 when its denominator is 0.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub brand: String,
    pub spend: f64,
    pub clicks: f64,
    pub impressions: f64,
    pub ad_sales: f64,
    pub orders: f64,
    pub total_sales: f64,
    pub organic_sales: f64,
    pub ctr: f64,
    pub cvr: f64,
    pub roas: f64,
    pub acos: f64,
    pub tacos: f64,
    pub paid_contribution: f64,
    pub organic_contribution: f64,
}

/// Per (campaign, search term) detail row for one brand, built straight from
/// the tagged raw tables. `orders`/`cvr` are None when the source report has
/// no orders column at all.
#[derive(Debug, Clone, Serialize)]
pub struct DrilldownRecord {
    pub brand: String,
    pub campaign: String,
    pub search_term: String,
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub ad_sales: f64,
    pub orders: Option<f64>,
    pub ctr: f64,
    pub cvr: Option<f64>,
    pub roas: f64,
    pub acos: f64,
}
