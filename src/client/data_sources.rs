//! Data source endpoints
//!
//! Data sources are the tables inside a database. Queries are cached per
//! parameter set, keyed by the data source id plus the canonical encoding
//! of filter, sorts and pagination.

use serde_json::Value;

use super::{into_results, NotionClient};
use crate::cache::invalidation::resolve;
use crate::cache::key::{parametrized_key, resource_key};
use crate::cache::{Partition, WriteOperation, WriteTarget};
use crate::error::Result;
use crate::models::{QueryDataSourceParams, UpdateDataSourceRequest};
use crate::transport::ApiRequest;

impl NotionClient {
    /// Retrieves a data source with its property schema.
    pub async fn get_data_source(&self, data_source_id: &str) -> Result<Value> {
        self.read_through(
            Partition::DataSources,
            resource_key(data_source_id),
            ApiRequest::get(format!("data_sources/{data_source_id}")),
        )
        .await
    }

    /// Queries a data source. Cached per parameter set.
    pub async fn query_data_source(
        &self,
        data_source_id: &str,
        params: &QueryDataSourceParams,
    ) -> Result<Value> {
        let mut request = ApiRequest::post(
            format!("data_sources/{data_source_id}/query"),
            params.to_body(),
        );
        for property in &params.filter_properties {
            request = request.with_query("filter_properties[]", property.clone());
        }

        self.read_through(
            Partition::DataSources,
            parametrized_key(data_source_id, &params.cache_params()),
            request,
        )
        .await
    }

    /// Templates available in a data source. Not cached.
    pub async fn get_data_source_templates(&self, data_source_id: &str) -> Result<Value> {
        self.perform(ApiRequest::get(format!("data_sources/{data_source_id}/templates")))
            .await
    }

    /// Updates a data source's schema, title, icon, trash state or parent.
    ///
    /// Only the cached data source itself is dropped; cached query results
    /// expire on their TTL. A move also drops the destination database.
    pub async fn update_data_source(
        &self,
        data_source_id: &str,
        request: &UpdateDataSourceRequest,
    ) -> Result<Value> {
        let new_database = request.new_database_id();
        let operation = if new_database.is_some() {
            WriteOperation::MoveDataSource
        } else {
            WriteOperation::UpdateDataSource
        };
        let target = WriteTarget::resource(data_source_id).with_parent(new_database);

        self.write_through(
            ApiRequest::patch(format!("data_sources/{data_source_id}"), request.to_body()),
            |_| resolve(operation, target),
        )
        .await
    }

    /// First page of entries with no filter or sort.
    pub async fn get_data_source_entries(&self, data_source_id: &str) -> Result<Vec<Value>> {
        let response = self
            .query_data_source(data_source_id, &QueryDataSourceParams::default())
            .await?;
        Ok(into_results(response))
    }
}
