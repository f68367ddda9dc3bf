use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One taxonomy entry: the short campaign prefix code and the canonical
/// display name it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    pub prefix: String,
    pub name: String,
}

/// The fixed, ordered brand catalogue. Constructed once at startup and passed
/// by reference into every component; never mutated during a run. Entry order
/// matters: it is the tie-break order for ambiguous brand matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandTaxonomy {
    pub brands: Vec<BrandEntry>,
}

impl BrandTaxonomy {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read brand taxonomy file: {}", path))?;
        let taxonomy: BrandTaxonomy = toml::from_str(&content)
            .with_context(|| format!("Failed to parse brand taxonomy file: {}", path))?;
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.brands.is_empty() {
            bail!("Brand taxonomy is empty");
        }
        let mut prefixes = HashSet::new();
        let mut names = HashSet::new();
        for entry in &self.brands {
            if !prefixes.insert(entry.prefix.to_uppercase()) {
                bail!("Duplicate brand prefix in taxonomy: {}", entry.prefix);
            }
            if !names.insert(entry.name.to_uppercase()) {
                bail!("Duplicate brand name in taxonomy: {}", entry.name);
            }
        }
        Ok(())
    }
}

impl Default for BrandTaxonomy {
    fn default() -> Self {
        let entry = |prefix: &str, name: &str| BrandEntry {
            prefix: prefix.to_string(),
            name: name.to_string(),
        };
        BrandTaxonomy {
            brands: vec![
                entry("MA", "Maison de l'Avenir"),
                entry("CL", "Creation Lamis"),
                entry("JPD", "Jean Paul Dupont"),
                entry("PC", "Paris Collection"),
                entry("DC", "Dorall Collection"),
                entry("CPT", "CP Trendies"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue_is_valid() {
        let taxonomy = BrandTaxonomy::default();
        assert!(taxonomy.validate().is_ok());
        assert_eq!(taxonomy.brands.len(), 6);
        assert_eq!(taxonomy.brands[0].prefix, "MA");
        assert_eq!(taxonomy.brands[0].name, "Maison de l'Avenir");
    }

    #[test]
    fn test_duplicate_prefix_rejected() {
        let taxonomy = BrandTaxonomy {
            brands: vec![
                BrandEntry {
                    prefix: "MA".to_string(),
                    name: "Maison de l'Avenir".to_string(),
                },
                BrandEntry {
                    prefix: "ma".to_string(),
                    name: "Other Brand".to_string(),
                },
            ],
        };
        assert!(taxonomy.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_src = r#"
            [[brands]]
            prefix = "MA"
            name = "Maison de l'Avenir"

            [[brands]]
            prefix = "CPT"
            name = "CP Trendies"
        "#;
        let taxonomy: BrandTaxonomy = toml::from_str(toml_src).unwrap();
        assert!(taxonomy.validate().is_ok());
        assert_eq!(taxonomy.brands[1].name, "CP Trendies");
    }
}
