/// Headers that look like raw metrics but are actually derived ratios.
/// "ROAS" and friends must never win a search for a raw Sales/Spend column.
pub const RATIO_COLUMN_EXCLUDES: &[&str] = &["acos", "roas", "cpc", "ctr", "rate"];

/// Find the first header that contains any include keyword and none of the
/// exclude keywords, comparing trimmed and lower-cased. Headers are scanned
/// in their original order, so the result is deterministic for a given table.
pub fn resolve<'a>(
    columns: &'a [String],
    include: &[&str],
    exclude: &[&str],
) -> Option<&'a str> {
    columns
        .iter()
        .find(|header| {
            let lowered = header.trim().to_lowercase();
            include.iter().any(|k| lowered.contains(k))
                && !exclude.iter().any(|k| lowered.contains(k))
        })
        .map(|header| header.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_match_in_column_order() {
        let cols = headers(&["Impressions", "7 Day Total Sales ", "14 Day Total Sales"]);
        assert_eq!(
            resolve(&cols, &["sales"], RATIO_COLUMN_EXCLUDES),
            Some("7 Day Total Sales ")
        );
    }

    #[test]
    fn test_ratio_columns_excluded() {
        // "Total Return on Ad Spend (ROAS)" contains "spend"; exclusion keeps
        // the raw Spend column from being shadowed by the ratio.
        let cols = headers(&["Total Return on Ad Spend (ROAS)", "Spend"]);
        assert_eq!(
            resolve(&cols, &["spend"], RATIO_COLUMN_EXCLUDES),
            Some("Spend")
        );

        let cols = headers(&["Click-Thru Rate (CTR)", "Clicks"]);
        assert_eq!(
            resolve(&cols, &["click"], RATIO_COLUMN_EXCLUDES),
            Some("Clicks")
        );
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let cols = headers(&["  SPEND(USD)  "]);
        assert_eq!(
            resolve(&cols, &["spend"], RATIO_COLUMN_EXCLUDES),
            Some("  SPEND(USD)  ")
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let cols = headers(&["Campaign Name", "Clicks"]);
        assert_eq!(resolve(&cols, &["sales"], RATIO_COLUMN_EXCLUDES), None);
        assert_eq!(resolve(&[], &["sales"], RATIO_COLUMN_EXCLUDES), None);
    }
}
