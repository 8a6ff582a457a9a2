//! Search endpoint

use serde_json::Value;

use super::NotionClient;
use crate::error::Result;
use crate::models::SearchRequest;
use crate::transport::ApiRequest;

impl NotionClient {
    /// Searches pages and databases by title. Not cached.
    pub async fn search(&self, request: &SearchRequest) -> Result<Value> {
        self.perform(ApiRequest::post("search", request.to_body())).await
    }
}
