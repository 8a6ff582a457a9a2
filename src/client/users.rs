//! User endpoints. Never cached.

use serde_json::Value;

use super::NotionClient;
use crate::error::Result;
use crate::models::{ListUsersParams, MAX_PAGE_SIZE};
use crate::transport::ApiRequest;

impl NotionClient {
    pub async fn get_users(&self, params: &ListUsersParams) -> Result<Value> {
        let page_size = params.page_size.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE);
        self.perform(ApiRequest::get("users").with_query("page_size", page_size.to_string()))
            .await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Value> {
        self.perform(ApiRequest::get(format!("users/{user_id}"))).await
    }

    /// The integration's own bot user.
    pub async fn get_bot_user(&self) -> Result<Value> {
        self.perform(ApiRequest::get("users/me")).await
    }
}
