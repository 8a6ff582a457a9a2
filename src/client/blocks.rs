//! Block endpoints
//!
//! Child listings are cached per pagination window under `{block_id}:`,
//! so a write to a block's children drops every cached window at once.

use serde_json::{json, Value};

use super::NotionClient;
use crate::cache::invalidation::resolve;
use crate::cache::key::{parametrized_key, resource_key};
use crate::cache::{Partition, WriteOperation, WriteTarget};
use crate::error::Result;
use crate::models::BlockChildrenParams;
use crate::transport::ApiRequest;

impl NotionClient {
    pub async fn get_block(&self, block_id: &str) -> Result<Value> {
        self.read_through(
            Partition::Blocks,
            resource_key(block_id),
            ApiRequest::get(format!("blocks/{block_id}")),
        )
        .await
    }

    /// Lists a block's (or page's) children. Cached per pagination window.
    pub async fn get_block_children(
        &self,
        block_id: &str,
        params: &BlockChildrenParams,
    ) -> Result<Value> {
        let mut request = ApiRequest::get(format!("blocks/{block_id}/children"));
        for (name, value) in params.to_query() {
            request = request.with_query(name, value);
        }

        self.read_through(
            Partition::Blocks,
            parametrized_key(block_id, &params.cache_params()),
            request,
        )
        .await
    }

    pub async fn append_block_children(&self, block_id: &str, children: Vec<Value>) -> Result<Value> {
        self.write_through(
            ApiRequest::patch(
                format!("blocks/{block_id}/children"),
                json!({ "children": children }),
            ),
            |_| resolve(WriteOperation::AppendBlockChildren, WriteTarget::resource(block_id)),
        )
        .await
    }

    /// Updates a block's content. `content` is the type-keyed payload,
    /// e.g. `{"paragraph": {"rich_text": [...]}}`.
    pub async fn update_block(&self, block_id: &str, content: Value) -> Result<Value> {
        self.write_through(ApiRequest::patch(format!("blocks/{block_id}"), content), |_| {
            resolve(WriteOperation::UpdateBlock, WriteTarget::resource(block_id))
        })
        .await
    }

    /// Archives a block. The parent whose child listings go stale is read
    /// from the returned block.
    pub async fn delete_block(&self, block_id: &str) -> Result<Value> {
        self.write_through(ApiRequest::delete(format!("blocks/{block_id}")), |deleted| {
            let target = WriteTarget::resource(block_id).with_parent(parent_id(deleted));
            resolve(WriteOperation::DeleteBlock, target)
        })
        .await
    }
}

/// Id of a block's parent block or page.
fn parent_id(block: &Value) -> Option<&str> {
    let parent = block.get("parent")?;
    ["block_id", "page_id"]
        .iter()
        .find_map(|field| parent.get(*field).and_then(Value::as_str))
}
