//! Page endpoints

use serde_json::{json, Value};

use super::{into_results, NotionClient};
use crate::cache::invalidation::resolve;
use crate::cache::key::{resource_key, ALL_SENTINEL};
use crate::cache::{Partition, WriteOperation, WriteTarget};
use crate::error::Result;
use crate::models::{CreatePageRequest, Parent, SearchFilter, SearchRequest};
use crate::transport::ApiRequest;

impl NotionClient {
    /// Retrieves a page. Cached in `pages` by id.
    pub async fn get_page(&self, page_id: &str) -> Result<Value> {
        self.read_through(
            Partition::Pages,
            resource_key(page_id),
            ApiRequest::get(format!("pages/{page_id}")),
        )
        .await
    }

    /// Updates page properties and drops the cached page and page listing.
    pub async fn update_page(&self, page_id: &str, properties: Value) -> Result<Value> {
        self.write_through(
            ApiRequest::patch(format!("pages/{page_id}"), json!({ "properties": properties })),
            |_| resolve(WriteOperation::UpdatePage, WriteTarget::resource(page_id)),
        )
        .await
    }

    /// Creates a page.
    ///
    /// Invalid parent/template/position combinations are rejected before
    /// any request is sent. On success the parent's cached entries and the
    /// cached page listing are dropped.
    pub async fn create_page(&self, request: &CreatePageRequest) -> Result<Value> {
        let body = request.to_body()?;
        let operation = match request.parent {
            Parent::PageId { .. } => WriteOperation::CreatePageInPage,
            Parent::DataSourceId { .. } => WriteOperation::CreatePageInDataSource,
            Parent::Workspace { .. } => WriteOperation::CreateWorkspacePage,
        };
        let target = WriteTarget::default().with_parent(request.parent.id());

        self.write_through(ApiRequest::post("pages", body), |_| resolve(operation, target))
            .await
    }

    /// Every page visible to the integration, via search. Cached in
    /// `pages` under the listing sentinel.
    pub async fn get_all_pages(&self) -> Result<Vec<Value>> {
        let request = ApiRequest::post("search", SearchRequest::objects(SearchFilter::Page).to_body());
        let response = self
            .read_through(Partition::Pages, ALL_SENTINEL.to_string(), request)
            .await?;
        Ok(into_results(response))
    }
}
