use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Read as IoRead;
use std::path::Path;

/// Reads one uploaded table (CSV or spreadsheet) into an all-string
/// DataFrame. Typing is deferred to the ReportLoader, which knows which
/// columns are identifiers and which are metrics.
pub struct TableReader;

impl TableReader {
    pub fn read_path(path: &Path) -> Result<DataFrame> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" | "txt" => {
                let file = std::fs::File::open(path)
                    .with_context(|| format!("Failed to open report: {}", path.display()))?;
                Self::read_csv(file)
            }
            "xlsx" | "xls" | "xlsb" | "ods" => Self::read_spreadsheet(path),
            other => bail!(
                "Unsupported report format '{}' for {}",
                other,
                path.display()
            ),
        }
    }

    /// CSV with a header row. Tolerates a UTF-8 BOM (Excel exports carry one)
    /// and ragged rows.
    pub fn read_csv<R: IoRead>(reader: R) -> Result<DataFrame> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Self::to_dataframe(headers, rows)
    }

    fn read_spreadsheet(path: &Path) -> Result<DataFrame> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let Some(sheet_name) = sheet_names.first() else {
            bail!("Spreadsheet has no sheets: {}", path.display());
        };

        let range = workbook
            .worksheet_range(sheet_name)
            .with_context(|| format!("Failed to read sheet '{}'", sheet_name))?;

        let mut row_iter = range.rows();
        let Some(header_row) = row_iter.next() else {
            return Ok(DataFrame::empty());
        };
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| Self::cell_to_string(cell).trim().to_string())
            .collect();

        let rows: Vec<Vec<String>> = row_iter
            .map(|row| row.iter().map(Self::cell_to_string).collect())
            .collect();

        Self::to_dataframe(headers, rows)
    }

    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.to_string(),
            Data::Empty => String::new(),
            Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            other => format!("{}", other),
        }
    }

    /// The teacher-style Series-vector construction: one string Series per
    /// header, short rows padded with empty cells, surplus cells dropped.
    fn to_dataframe(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<DataFrame> {
        if headers.is_empty() {
            return Ok(DataFrame::empty());
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut series_vec = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let mut name = if header.is_empty() {
                format!("column_{}", idx + 1)
            } else {
                header.clone()
            };
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                suffix += 1;
                name = format!("{}_{}", header, suffix);
            }

            let values: Vec<String> = rows
                .iter()
                .map(|row| row.get(idx).cloned().unwrap_or_default())
                .collect();
            series_vec.push(Series::new(name.as_str().into(), values).into());
        }

        DataFrame::new(series_vec).context("Failed to build DataFrame from report rows")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_with_bom_and_trailing_spaces() {
        let data = "\u{feff}Campaign Name,Spend,7 Day Total Sales \n\
                    MA_Search,AED 100.00,\"AED 1,300.00\"\n\
                    CL_Broad,50,200\n";
        let df = TableReader::read_csv(data.as_bytes()).unwrap();
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Campaign Name", "Spend", "7 Day Total Sales"]);
        let spend = df.column("Spend").unwrap().str().unwrap();
        assert_eq!(spend.get(0), Some("AED 100.00"));
    }

    #[test]
    fn test_ragged_rows_padded() {
        let data = "Campaign Name,Spend,Clicks\nMA_Search,10\n";
        let df = TableReader::read_csv(data.as_bytes()).unwrap();
        assert_eq!(df.height(), 1);
        let clicks = df.column("Clicks").unwrap().str().unwrap();
        assert_eq!(clicks.get(0), Some(""));
    }

    #[test]
    fn test_duplicate_headers_disambiguated() {
        let data = "Sales,Sales\n1,2\n";
        let df = TableReader::read_csv(data.as_bytes()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["Sales", "Sales_2"]);
    }

    #[test]
    fn test_headers_only_is_empty_table() {
        let data = "Campaign Name,Spend\n";
        let df = TableReader::read_csv(data.as_bytes()).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let result = TableReader::read_path(Path::new("report.parquet"));
        assert!(result.is_err());
    }
}
