use crate::models::Metric;

/// The three report shapes one audit run consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    SponsoredProducts,
    SponsoredBrands,
    Business,
}

impl ReportKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::SponsoredProducts => "Sponsored Products",
            ReportKind::SponsoredBrands => "Sponsored Brands",
            ReportKind::Business => "Business",
        }
    }
}

/// Maps one canonical metric to the header keywords that locate its source
/// column. A report missing the column simply contributes 0 for the metric.
#[derive(Debug, Clone)]
pub struct MetricSpec {
    pub metric: Metric,
    pub keywords: &'static [&'static str],
}

/// Per-report configuration: where the brand-bearing text lives and which
/// metric columns to sum. Consolidates the naming drift across report
/// exports ("7 Day Total Sales" vs "14 Day Total Sales" vs
/// "Ordered Product Sales") into keyword lookups.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub kind: ReportKind,
    pub brand_source_keywords: &'static [&'static str],
    pub metrics: Vec<MetricSpec>,
}

impl ReportSpec {
    pub fn for_kind(kind: ReportKind) -> Self {
        let spec = |metric: Metric, keywords: &'static [&'static str]| MetricSpec {
            metric,
            keywords,
        };
        match kind {
            ReportKind::SponsoredProducts | ReportKind::SponsoredBrands => ReportSpec {
                kind,
                brand_source_keywords: &["campaign"],
                metrics: vec![
                    spec(Metric::Spend, &["spend", "cost"]),
                    spec(Metric::Clicks, &["clicks"]),
                    spec(Metric::Impressions, &["impressions"]),
                    spec(Metric::AdSales, &["sales"]),
                    spec(Metric::Orders, &["orders", "units ordered"]),
                ],
            },
            ReportKind::Business => ReportSpec {
                kind,
                brand_source_keywords: &["title"],
                metrics: vec![spec(Metric::TotalSales, &["ordered product sales", "sales"])],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ad_reports_share_metric_shape() {
        let sp = ReportSpec::for_kind(ReportKind::SponsoredProducts);
        let sb = ReportSpec::for_kind(ReportKind::SponsoredBrands);
        assert_eq!(sp.metrics.len(), sb.metrics.len());
        assert_eq!(sp.brand_source_keywords, &["campaign"]);
        assert_eq!(sb.brand_source_keywords, &["campaign"]);
    }

    #[test]
    fn test_business_report_uses_title() {
        let business = ReportSpec::for_kind(ReportKind::Business);
        assert_eq!(business.brand_source_keywords, &["title"]);
        assert!(business
            .metrics
            .iter()
            .all(|m| m.metric == Metric::TotalSales));
    }
}
