//! Grounding lookups for audience generation.

use anyhow::Result;
use campaign_core::config::GroundingConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::source::{CustomerDataSource, SqliteDataSource};
use crate::types::{split_composite, ColumnInfo, GroundingContext, GroundingData};

/// Fetches schema and observed values for the configured customer table.
pub struct GroundingService {
    source: Arc<dyn CustomerDataSource>,
    table: String,
    product_column: String,
    location_column: String,
    behavior_column: String,
    max_values: usize,
}

impl GroundingService {
    pub fn new(source: Arc<dyn CustomerDataSource>, config: &GroundingConfig) -> Self {
        Self {
            source,
            table: config.table.clone(),
            product_column: config.product_column.clone(),
            location_column: config.location_column.clone(),
            behavior_column: config.behavior_column.clone(),
            max_values: config.max_values,
        }
    }

    /// Build the service when grounding is enabled; `Ok(None)` otherwise.
    pub fn from_config(config: &GroundingConfig) -> CampaignResult<Option<Self>> {
        let Some(url) = config.database_url.as_deref().filter(|_| config.enabled) else {
            return Ok(None);
        };
        let source = SqliteDataSource::connect_lazy(url)
            .map_err(|e| CampaignError::Grounding(format!("{e:#}")))?;
        info!(table = %config.table, "Customer data grounding enabled");
        Ok(Some(Self::new(Arc::new(source), config)))
    }

    /// Look up grounding data. Never fails: lookup errors are logged and
    /// returned as [`GroundingContext::Unavailable`].
    pub async fn fetch_context(&self) -> GroundingContext {
        match self.load().await {
            Ok(data) => {
                metrics::counter!("grounding.lookups", "outcome" => "ok").increment(1);
                debug!(
                    products = data.products.len(),
                    locations = data.locations.len(),
                    behaviors = data.behaviors.len(),
                    "Grounding data loaded"
                );
                GroundingContext::Available(data)
            }
            Err(e) => {
                metrics::counter!("grounding.lookups", "outcome" => "error").increment(1);
                warn!(
                    source = self.source.source_name(),
                    error = %e,
                    "Customer data unavailable, continuing without grounding"
                );
                GroundingContext::unavailable(format!("{e:#}"))
            }
        }
    }

    async fn load(&self) -> Result<GroundingData> {
        let columns = self.source.describe_table(&self.table).await?;

        let products = self.column_values(&columns, &self.product_column).await?;
        let locations = self.column_values(&columns, &self.location_column).await?;
        let behaviors = self.column_values(&columns, &self.behavior_column).await?;

        Ok(GroundingData {
            table: self.table.clone(),
            columns,
            products,
            locations,
            behaviors,
        })
    }

    /// Atomic values of one column; empty when the table has no such column.
    async fn column_values(&self, columns: &[ColumnInfo], column: &str) -> Result<Vec<String>> {
        if !columns.iter().any(|c| c.name.eq_ignore_ascii_case(column)) {
            warn!(table = %self.table, column, "Grounding column not found in table");
            return Ok(Vec::new());
        }
        let raw = self
            .source
            .distinct_values(&self.table, column, self.max_values)
            .await?;
        let mut values = split_composite(raw);
        values.truncate(self.max_values);
        Ok(values)
    }
}
