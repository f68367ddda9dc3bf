use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::{AuditRecord, DrilldownRecord};

pub const AUDIT_SHEET_NAME: &str = "Brand Audit";

/// Excel's worksheet naming limit.
const SHEET_NAME_LIMIT: usize = 31;

const AUDIT_HEADERS: &[&str] = &[
    "Brand",
    "Spend",
    "Clicks",
    "Impressions",
    "Ad Sales",
    "Orders",
    "Total Sales",
    "Organic Sales",
    "CTR",
    "CVR",
    "ROAS",
    "ACOS",
    "TACOS",
    "Paid Contribution",
    "Organic Contribution",
];

const DRILLDOWN_HEADERS: &[&str] = &[
    "Campaign",
    "Search Term",
    "Impressions",
    "Clicks",
    "Spend",
    "Ad Sales",
    "Orders",
    "CTR",
    "CVR",
    "ROAS",
    "ACOS",
];

/// Write the consolidated audit sheet plus one drilldown sheet per brand.
pub fn write_workbook(
    path: &Path,
    audit: &[AuditRecord],
    drilldowns: &BTreeMap<String, Vec<DrilldownRecord>>,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet
        .set_name(AUDIT_SHEET_NAME)
        .context("Failed to name the audit worksheet")?;
    for (col, header) in AUDIT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (idx, record) in audit.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, record.brand.as_str())?;
        let numbers = [
            record.spend,
            record.clicks,
            record.impressions,
            record.ad_sales,
            record.orders,
            record.total_sales,
            record.organic_sales,
            record.ctr,
            record.cvr,
            record.roas,
            record.acos,
            record.tacos,
            record.paid_contribution,
            record.organic_contribution,
        ];
        for (offset, value) in numbers.iter().enumerate() {
            sheet.write_number(row, (offset + 1) as u16, *value)?;
        }
    }

    for (brand, records) in drilldowns {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&sheet_name_for(brand))
            .with_context(|| format!("Failed to name worksheet for brand {}", brand))?;

        for (col, header) in DRILLDOWN_HEADERS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet.write_string(row, 0, record.campaign.as_str())?;
            sheet.write_string(row, 1, record.search_term.as_str())?;
            sheet.write_number(row, 2, record.impressions)?;
            sheet.write_number(row, 3, record.clicks)?;
            sheet.write_number(row, 4, record.spend)?;
            sheet.write_number(row, 5, record.ad_sales)?;
            match record.orders {
                Some(orders) => sheet.write_number(row, 6, orders)?,
                None => sheet.write_string(row, 6, "")?,
            };
            sheet.write_number(row, 7, record.ctr)?;
            match record.cvr {
                Some(cvr) => sheet.write_number(row, 8, cvr)?,
                None => sheet.write_string(row, 8, "")?,
            };
            sheet.write_number(row, 9, record.roas)?;
            sheet.write_number(row, 10, record.acos)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook: {}", path.display()))?;
    Ok(())
}

/// Worksheet names must drop Excel's forbidden characters and fit the
/// 31-character limit; truncation happens on a char boundary.
fn sheet_name_for(brand: &str) -> String {
    let sanitized: String = brand
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    sanitized.chars().take(SHEET_NAME_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_truncated_to_limit() {
        let long = "An Extremely Long Brand Display Name Ltd";
        let name = sheet_name_for(long);
        assert_eq!(name.chars().count(), SHEET_NAME_LIMIT);
        assert!(long.starts_with(&name));
    }

    #[test]
    fn test_sheet_name_forbidden_chars_removed() {
        assert_eq!(sheet_name_for("Brand: A/B [Test]?"), "Brand AB Test");
        assert_eq!(sheet_name_for("Maison de l'Avenir"), "Maison de l'Avenir");
    }

    #[test]
    fn test_short_names_untouched() {
        assert_eq!(sheet_name_for("CP Trendies"), "CP Trendies");
    }
}
