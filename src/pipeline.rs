use anyhow::Result;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::{BrandTaxonomy, ReportKind, ReportSpec};
use crate::loader::ReportLoader;
use crate::models::{AuditRecord, BrandAggregate, DrilldownRecord};
use crate::processor::column_resolver::{self, RATIO_COLUMN_EXCLUDES};
use crate::processor::{audit_builder, brand_aggregator, drilldown, BrandResolver};

/// The deliverable of one run: the consolidated per-brand fact table and the
/// per-brand campaign/search-term detail tables.
pub struct PipelineOutput {
    pub audit: Vec<AuditRecord>,
    pub drilldowns: BTreeMap<String, Vec<DrilldownRecord>>,
}

/// One batch run over up to three loaded reports. Holds no state beyond the
/// borrowed, immutable brand taxonomy; concurrent runs never alias.
pub struct AuditPipeline<'a> {
    resolver: BrandResolver<'a>,
    loader: ReportLoader,
}

impl<'a> AuditPipeline<'a> {
    pub fn new(taxonomy: &'a BrandTaxonomy) -> Result<Self> {
        Ok(AuditPipeline {
            resolver: BrandResolver::new(taxonomy),
            loader: ReportLoader::new()?,
        })
    }

    pub fn run(
        &self,
        sponsored_products: Option<DataFrame>,
        sponsored_brands: Option<DataFrame>,
        business: Option<DataFrame>,
    ) -> Result<PipelineOutput> {
        let mut ad_aggregate = BrandAggregate::new();
        let mut ad_tables = Vec::new();

        let ad_inputs = [
            (sponsored_products, ReportKind::SponsoredProducts),
            (sponsored_brands, ReportKind::SponsoredBrands),
        ];
        for (table, kind) in ad_inputs {
            let Some(df) = table else { continue };
            if let Some((tagged, spec)) = self.prepare(df, kind)? {
                let aggregate = brand_aggregator::aggregate(&tagged, &spec.metrics)?;
                info!(
                    "{}: {} rows across {} brands",
                    kind.label(),
                    tagged.height(),
                    aggregate.len()
                );
                ad_aggregate = brand_aggregator::merge_additive(&ad_aggregate, &aggregate);
                ad_tables.push(tagged);
            }
        }

        let mut business_aggregate = BrandAggregate::new();
        if let Some(df) = business {
            if let Some((tagged, spec)) = self.prepare(df, ReportKind::Business)? {
                business_aggregate = brand_aggregator::aggregate(&tagged, &spec.metrics)?;
                info!(
                    "{}: {} rows across {} brands",
                    ReportKind::Business.label(),
                    tagged.height(),
                    business_aggregate.len()
                );
            }
        }

        let audit = audit_builder::build(&ad_aggregate, &business_aggregate);

        let mut drilldowns = BTreeMap::new();
        for record in &audit {
            let details = drilldown::assemble(&ad_tables, &record.brand)?;
            drilldowns.insert(record.brand.clone(), details);
        }

        Ok(PipelineOutput { audit, drilldowns })
    }

    /// Normalize one report and tag each row with its resolved brand.
    /// Returns None when the report has no usable brand-bearing column,
    /// which drops it from the run with a warning rather than failing.
    fn prepare(&self, mut df: DataFrame, kind: ReportKind) -> Result<Option<(DataFrame, ReportSpec)>> {
        let spec = ReportSpec::for_kind(kind);
        self.loader.load(&mut df)?;

        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let Some(brand_source) = column_resolver::resolve(
            &column_names,
            spec.brand_source_keywords,
            RATIO_COLUMN_EXCLUDES,
        ) else {
            warn!(
                "{} report has no column matching {:?}; skipping",
                kind.label(),
                spec.brand_source_keywords
            );
            return Ok(None);
        };

        let brand_source = brand_source.to_string();
        self.loader.tag_brands(&mut df, &brand_source, &self.resolver)?;
        Ok(Some((df, spec)))
    }
}
