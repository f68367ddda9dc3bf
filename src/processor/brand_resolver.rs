use crate::config::BrandTaxonomy;
use crate::models::UNMAPPED;

/// Separators that may follow a brand prefix in a campaign name. Naming
/// conventions drift across teams: "MA_Auto", "CPT | Broad", "DC - Exact".
const PREFIX_SEPARATORS: &[&str] = &["_", " ", "-", " |", " -"];

/// Maps free-text campaign names and product titles onto the brand taxonomy.
///
/// Three tiers, each exhausted across all entries (in declared taxonomy
/// order) before the next is tried:
/// 1. prefix code + separator at the start of the text,
/// 2. full canonical name contained anywhere in the text,
/// 3. any whitespace-delimited word equal to a prefix code.
/// Anything else resolves to the `Unmapped` sentinel.
pub struct BrandResolver<'a> {
    taxonomy: &'a BrandTaxonomy,
    upper_prefixes: Vec<String>,
    upper_names: Vec<String>,
}

impl<'a> BrandResolver<'a> {
    pub fn new(taxonomy: &'a BrandTaxonomy) -> Self {
        let upper_prefixes = taxonomy
            .brands
            .iter()
            .map(|entry| entry.prefix.trim().to_uppercase())
            .collect();
        let upper_names = taxonomy
            .brands
            .iter()
            .map(|entry| normalize_text(&entry.name))
            .collect();
        BrandResolver {
            taxonomy,
            upper_prefixes,
            upper_names,
        }
    }

    pub fn resolve(&self, text: Option<&str>) -> String {
        let Some(raw) = text else {
            return UNMAPPED.to_string();
        };
        let normalized = normalize_text(raw);
        if normalized.is_empty() {
            return UNMAPPED.to_string();
        }

        // Tier 1: leading prefix code followed by a separator.
        for (idx, prefix) in self.upper_prefixes.iter().enumerate() {
            let leads = PREFIX_SEPARATORS
                .iter()
                .any(|sep| normalized.starts_with(&format!("{prefix}{sep}")));
            if leads {
                return self.taxonomy.brands[idx].name.clone();
            }
        }

        // Tier 2: full canonical name embedded in a product title.
        for (idx, name) in self.upper_names.iter().enumerate() {
            if normalized.contains(name.as_str()) {
                return self.taxonomy.brands[idx].name.clone();
            }
        }

        // Tier 3: prefix code as an isolated word anywhere in the text.
        for (idx, prefix) in self.upper_prefixes.iter().enumerate() {
            if normalized.split_whitespace().any(|word| word == prefix) {
                return self.taxonomy.brands[idx].name.clone();
            }
        }

        UNMAPPED.to_string()
    }
}

/// Upper-case, trim, and fold the typographic variants seen in real exports:
/// the right single quotation mark (U+2019) and a contracted spelling of the
/// flagship brand.
fn normalize_text(text: &str) -> String {
    text.trim()
        .to_uppercase()
        .replace('\u{2019}', "'")
        .replace("MAISON D'AVENIR", "MAISON DE L'AVENIR")
}
