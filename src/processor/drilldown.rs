use anyhow::Result;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::warn;

use crate::loader::report_loader::BRAND_COLUMN;
use crate::models::DrilldownRecord;
use crate::processor::audit_builder::safe_div;
use crate::processor::column_resolver::{self, RATIO_COLUMN_EXCLUDES};

#[derive(Default, Clone, Copy)]
struct RowSums {
    impressions: f64,
    clicks: f64,
    spend: f64,
    ad_sales: f64,
    orders: Option<f64>,
}

/// Build the per (campaign, search term) detail table for one brand from the
/// tagged raw ad tables, concatenated across sources and sorted descending
/// by attributed sales.
///
/// A table missing an optional metric column (commonly Orders) contributes
/// rows without that metric instead of failing; a table without a campaign
/// column is skipped entirely.
pub fn assemble(tables: &[DataFrame], brand: &str) -> Result<Vec<DrilldownRecord>> {
    let mut records = Vec::new();

    for df in tables {
        if df.height() == 0 {
            continue;
        }
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let Some(campaign_col) =
            column_resolver::resolve(&column_names, &["campaign"], RATIO_COLUMN_EXCLUDES)
        else {
            warn!("Ad table has no campaign column; skipping in drilldown");
            continue;
        };
        let term_col =
            column_resolver::resolve(&column_names, &["search term", "targeting"], RATIO_COLUMN_EXCLUDES);

        let Ok(brands) = df.column(BRAND_COLUMN) else {
            warn!("Ad table is untagged; skipping in drilldown");
            continue;
        };
        let brands = brands.str()?;
        let campaigns = df.column(campaign_col)?.str()?;
        let terms = match term_col {
            Some(name) => Some(df.column(name)?.str()?),
            None => None,
        };

        let metric = |keywords: &[&str]| -> Result<Option<Vec<f64>>> {
            match column_resolver::resolve(&column_names, keywords, RATIO_COLUMN_EXCLUDES) {
                Some(name) => {
                    let col = df.column(name)?.cast(&DataType::Float64)?;
                    let values = col
                        .f64()?
                        .into_iter()
                        .map(|v| v.unwrap_or(0.0))
                        .collect();
                    Ok(Some(values))
                }
                None => Ok(None),
            }
        };
        let impressions = metric(&["impressions"])?;
        let clicks = metric(&["clicks"])?;
        let spend = metric(&["spend", "cost"])?;
        let sales = metric(&["sales"])?;
        let orders = metric(&["orders", "units ordered"])?;

        let mut groups: BTreeMap<(String, String), RowSums> = BTreeMap::new();
        for idx in 0..df.height() {
            if brands.get(idx) != Some(brand) {
                continue;
            }
            let campaign = campaigns.get(idx).unwrap_or_default().to_string();
            let term = terms
                .and_then(|t| t.get(idx))
                .unwrap_or_default()
                .to_string();

            let sums = groups.entry((campaign, term)).or_default();
            let at = |values: &Option<Vec<f64>>| values.as_ref().map_or(0.0, |v| v[idx]);
            sums.impressions += at(&impressions);
            sums.clicks += at(&clicks);
            sums.spend += at(&spend);
            sums.ad_sales += at(&sales);
            if let Some(values) = &orders {
                *sums.orders.get_or_insert(0.0) += values[idx];
            }
        }

        for ((campaign, search_term), sums) in groups {
            records.push(DrilldownRecord {
                brand: brand.to_string(),
                campaign,
                search_term,
                impressions: sums.impressions,
                clicks: sums.clicks,
                spend: sums.spend,
                ad_sales: sums.ad_sales,
                orders: sums.orders,
                ctr: safe_div(sums.clicks, sums.impressions),
                cvr: sums.orders.map(|o| safe_div(o, sums.clicks)),
                roas: safe_div(sums.ad_sales, sums.spend),
                acos: safe_div(sums.spend, sums.ad_sales),
            });
        }
    }

    records.sort_by(|a, b| b.ad_sales.total_cmp(&a.ad_sales));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp_table() -> DataFrame {
        DataFrame::new(vec![
            Series::new(
                "Campaign Name".into(),
                vec!["MA_Search", "MA_Search", "CL_Broad"],
            )
            .into(),
            Series::new(
                "Customer Search Term".into(),
                vec!["perfume", "body mist", "lipstick"],
            )
            .into(),
            Series::new(
                BRAND_COLUMN.into(),
                vec!["Maison de l'Avenir", "Maison de l'Avenir", "Creation Lamis"],
            )
            .into(),
            Series::new("Impressions".into(), vec![1000.0_f64, 500.0, 200.0]).into(),
            Series::new("Clicks".into(), vec![50.0_f64, 10.0, 4.0]).into(),
            Series::new("Spend".into(), vec![20.0_f64, 5.0, 2.0]).into(),
            Series::new("7 Day Total Sales".into(), vec![60.0_f64, 90.0, 12.0]).into(),
            Series::new("7 Day Total Orders (#)".into(), vec![3.0_f64, 2.0, 1.0]).into(),
        ])
        .unwrap()
    }

    // Sponsored Brands variant: no search term, no orders column.
    fn sb_table() -> DataFrame {
        DataFrame::new(vec![
            Series::new("Campaign Name".into(), vec!["MA_Showcase"]).into(),
            Series::new(BRAND_COLUMN.into(), vec!["Maison de l'Avenir"]).into(),
            Series::new("Impressions".into(), vec![400.0_f64]).into(),
            Series::new("Clicks".into(), vec![8.0_f64]).into(),
            Series::new("Spend".into(), vec![4.0_f64]).into(),
            Series::new("14 Day Total Sales".into(), vec![120.0_f64]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_filters_to_brand_and_sorts_by_sales() {
        let tables = vec![sp_table()];
        let records = assemble(&tables, "Maison de l'Avenir").unwrap();
        assert_eq!(records.len(), 2);
        // Descending by attributed sales.
        assert_eq!(records[0].search_term, "body mist");
        assert_eq!(records[0].ad_sales, 90.0);
        assert_eq!(records[1].ad_sales, 60.0);
        assert!(records.iter().all(|r| r.brand == "Maison de l'Avenir"));
    }

    #[test]
    fn test_row_level_ratios() {
        let tables = vec![sp_table()];
        let records = assemble(&tables, "Creation Lamis").unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.ctr, 0.02);
        assert_eq!(r.roas, 6.0);
        assert_eq!(r.cvr, Some(0.25));
        assert_eq!(r.orders, Some(1.0));
    }

    #[test]
    fn test_missing_orders_column_tolerated() {
        let tables = vec![sb_table()];
        let records = assemble(&tables, "Maison de l'Avenir").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].orders, None);
        assert_eq!(records[0].cvr, None);
        assert_eq!(records[0].search_term, "");
        assert_eq!(records[0].roas, 30.0);
    }

    #[test]
    fn test_concatenates_across_tables() {
        let tables = vec![sp_table(), sb_table()];
        let records = assemble(&tables, "Maison de l'Avenir").unwrap();
        assert_eq!(records.len(), 3);
        // SB row has the highest sales and must lead.
        assert_eq!(records[0].campaign, "MA_Showcase");
    }

    #[test]
    fn test_unknown_brand_yields_empty() {
        let tables = vec![sp_table()];
        let records = assemble(&tables, "Paris Collection").unwrap();
        assert!(records.is_empty());
    }
}
