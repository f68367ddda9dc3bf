pub mod audit_builder;
pub mod brand_aggregator;
pub mod brand_resolver;
pub mod column_resolver;
pub mod drilldown;
pub mod numeric_normalizer;

pub use brand_resolver::BrandResolver;
pub use numeric_normalizer::{NormalizedCell, NumericNormalizer};
