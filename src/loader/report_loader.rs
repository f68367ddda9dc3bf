use anyhow::Result;
use polars::prelude::*;

use crate::processor::{BrandResolver, NumericNormalizer};

/// Column appended by brand tagging.
pub const BRAND_COLUMN: &str = "Brand";

/// A column whose header contains one of these tokens carries free text
/// (campaign names, product titles, search terms) and must never be
/// numerically coerced, even when its cells happen to contain digits.
const IDENTIFIER_TOKENS: &[&str] = &[
    "name",
    "title",
    "term",
    "targeting",
    "match",
    "brand",
    "asin",
];

/// Prepares one loaded report for aggregation: trims header whitespace and
/// coerces every non-identifier column to numbers under the numeric-only
/// policy (unparseable cells degrade to 0).
pub struct ReportLoader {
    normalizer: NumericNormalizer,
}

impl ReportLoader {
    pub fn new() -> Result<Self> {
        Ok(ReportLoader {
            normalizer: NumericNormalizer::new()?,
        })
    }

    pub fn load(&self, df: &mut DataFrame) -> Result<()> {
        self.trim_headers(df)?;

        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for name in column_names {
            let lowered = name.to_lowercase();
            if IDENTIFIER_TOKENS.iter().any(|token| lowered.contains(token)) {
                continue;
            }

            let column = df.column(&name)?;
            let values: Vec<f64> = match column.dtype() {
                DataType::String => column
                    .str()?
                    .into_iter()
                    .map(|cell| cell.map_or(0.0, |s| self.normalizer.to_number(s)))
                    .collect(),
                _ => {
                    let casted = column.cast(&DataType::Float64)?;
                    casted
                        .f64()?
                        .into_iter()
                        .map(|v| v.unwrap_or(0.0))
                        .collect()
                }
            };
            df.with_column(Series::new(name.as_str().into(), values))?;
        }

        Ok(())
    }

    fn trim_headers(&self, df: &mut DataFrame) -> Result<()> {
        let renames: Vec<(String, String)> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| name.trim() != name)
            .map(|name| (name.clone(), name.trim().to_string()))
            .collect();

        for (old, new) in renames {
            // A trimmed name colliding with an existing column would make the
            // table ambiguous; leave the original header in place instead.
            if df.column(&new).is_err() {
                df.rename(&old, new.as_str().into())?;
            }
        }
        Ok(())
    }

    /// Append the resolved brand per row, reading the given brand-bearing
    /// text column (campaign name or product title).
    pub fn tag_brands(
        &self,
        df: &mut DataFrame,
        brand_column: &str,
        resolver: &BrandResolver,
    ) -> Result<()> {
        let brands: Vec<String> = df
            .column(brand_column)?
            .str()?
            .into_iter()
            .map(|text| resolver.resolve(text))
            .collect();
        df.with_column(Series::new(BRAND_COLUMN.into(), brands))?;
        Ok(())
    }
}
