use anyhow::Result;
use regex::Regex;

/// Outcome of normalizing one cell: either a parsed number or the original
/// text passed through untouched. The caller decides whether pass-through is
/// acceptable for the column's role.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedCell {
    Number(f64),
    Text(String),
}

/// Strips currency markers and thousands separators from textual cells and
/// coerces them to numbers. Report exports prefix monetary columns with the
/// marketplace currency ("AED 300.00") and separate thousands with commas.
pub struct NumericNormalizer {
    currency_code: Regex,
}

impl NumericNormalizer {
    pub fn new() -> Result<Self> {
        Ok(NumericNormalizer {
            currency_code: Regex::new(r"(?i)\b(aed|usd|eur|gbp|sar|inr)\b")?,
        })
    }

    /// Normalize a single cell. Idempotent: feeding the rendered result back
    /// in yields the same outcome.
    pub fn normalize(&self, raw: &str) -> NormalizedCell {
        let stripped = self.strip_markers(raw);
        match stripped.parse::<f64>() {
            Ok(value) if value.is_finite() => NormalizedCell::Number(value),
            _ => NormalizedCell::Text(raw.to_string()),
        }
    }

    /// Numeric-only policy: a cell that still fails to parse after stripping
    /// degrades to 0 rather than raising. Empty/missing cells are 0.
    pub fn to_number(&self, raw: &str) -> f64 {
        match self.normalize(raw) {
            NormalizedCell::Number(value) => value,
            NormalizedCell::Text(_) => 0.0,
        }
    }

    fn strip_markers(&self, raw: &str) -> String {
        let without_code = self.currency_code.replace_all(raw, "");
        without_code
            .replace('$', "")
            .replace('€', "")
            .replace('£', "")
            .replace('₹', "")
            .replace('\u{a0}', " ")
            .replace(',', "")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> NumericNormalizer {
        NumericNormalizer::new().unwrap()
    }

    #[test]
    fn test_currency_stripping() {
        let n = normalizer();
        assert_eq!(n.normalize("AED 300.00"), NormalizedCell::Number(300.0));
        assert_eq!(n.normalize("aed 1,250.50"), NormalizedCell::Number(1250.5));
        assert_eq!(n.normalize("$19.99"), NormalizedCell::Number(19.99));
        assert_eq!(n.normalize("USD\u{a0}42"), NormalizedCell::Number(42.0));
    }

    #[test]
    fn test_thousands_separators() {
        let n = normalizer();
        assert_eq!(n.normalize("1,234,567"), NormalizedCell::Number(1_234_567.0));
        assert_eq!(n.to_number(" 2,000 "), 2000.0);
    }

    #[test]
    fn test_pass_through_on_non_numeric() {
        let n = normalizer();
        assert_eq!(
            n.normalize("Customer Search Term"),
            NormalizedCell::Text("Customer Search Term".to_string())
        );
        // Numeric-only policy degrades the same input to 0.
        assert_eq!(n.to_number("Customer Search Term"), 0.0);
    }

    #[test]
    fn test_empty_is_zero_in_numeric_context() {
        let n = normalizer();
        assert_eq!(n.to_number(""), 0.0);
        assert_eq!(n.to_number("   "), 0.0);
    }

    #[test]
    fn test_never_produces_non_finite() {
        let n = normalizer();
        assert_eq!(n.to_number("inf"), 0.0);
        assert_eq!(n.to_number("NaN"), 0.0);
    }

    #[test]
    fn test_idempotence() {
        let n = normalizer();
        for raw in ["AED 300.00", "1,234", "Widget 5pc", "", "42", "-3.5"] {
            let once = n.normalize(raw);
            let rendered = match &once {
                NormalizedCell::Number(v) => v.to_string(),
                NormalizedCell::Text(t) => t.clone(),
            };
            let twice = n.normalize(&rendered);
            assert_eq!(once, twice, "normalizing twice diverged for {:?}", raw);
        }
    }

    #[test]
    fn test_currency_code_only_strips_whole_words() {
        let n = normalizer();
        // "Faeda" contains "aed" but is not a currency marker.
        assert_eq!(
            n.normalize("Faeda Cream"),
            NormalizedCell::Text("Faeda Cream".to_string())
        );
    }
}
