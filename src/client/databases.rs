//! Database endpoints

use serde_json::Value;

use super::{into_results, NotionClient};
use crate::cache::invalidation::resolve;
use crate::cache::key::{resource_key, ALL_SENTINEL};
use crate::cache::{Partition, WriteOperation, WriteTarget};
use crate::error::Result;
use crate::models::{CreateDatabaseRequest, SearchFilter, SearchRequest, UpdateDatabaseRequest};
use crate::transport::ApiRequest;

impl NotionClient {
    /// Retrieves a database container and its data source list.
    pub async fn get_database(&self, database_id: &str) -> Result<Value> {
        self.read_through(
            Partition::Databases,
            resource_key(database_id),
            ApiRequest::get(format!("databases/{database_id}")),
        )
        .await
    }

    /// Creates a database with one initial data source under a page.
    pub async fn create_database(&self, request: &CreateDatabaseRequest) -> Result<Value> {
        let target = WriteTarget::parent(&request.parent_page_id);
        self.write_through(ApiRequest::post("databases", request.to_body()), |_| {
            resolve(WriteOperation::CreateDatabase, target)
        })
        .await
    }

    /// Updates title or schema and drops the cached database and database
    /// listing.
    pub async fn update_database(
        &self,
        database_id: &str,
        request: &UpdateDatabaseRequest,
    ) -> Result<Value> {
        self.write_through(
            ApiRequest::patch(format!("databases/{database_id}"), request.to_body()),
            |_| resolve(WriteOperation::UpdateDatabase, WriteTarget::resource(database_id)),
        )
        .await
    }

    /// Every database visible to the integration, via search. Cached in
    /// `databases` under the listing sentinel.
    pub async fn get_all_databases(&self) -> Result<Vec<Value>> {
        let request = ApiRequest::post(
            "search",
            SearchRequest::objects(SearchFilter::Database).to_body(),
        );
        let response = self
            .read_through(Partition::Databases, ALL_SENTINEL.to_string(), request)
            .await?;
        Ok(into_results(response))
    }
}
