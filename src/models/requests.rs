//! Request models
//!
//! Typed parameter sets for the Notion endpoints the client wraps. Each
//! model renders the JSON body (or query) it sends; cached reads derive
//! their cache key from that same rendering.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{NotionError, Result};

/// Largest page size Notion accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn clamp_page_size(page_size: u32) -> u32 {
    page_size.min(MAX_PAGE_SIZE)
}

// == Parent ==
/// Where a new page lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Parent {
    PageId { page_id: String },
    DataSourceId { data_source_id: String },
    Workspace { workspace: bool },
}

impl Parent {
    pub fn page(id: impl Into<String>) -> Self {
        Parent::PageId { page_id: id.into() }
    }

    pub fn data_source(id: impl Into<String>) -> Self {
        Parent::DataSourceId {
            data_source_id: id.into(),
        }
    }

    pub fn workspace() -> Self {
        Parent::Workspace { workspace: true }
    }

    /// Id of the parent resource, None for the workspace.
    pub fn id(&self) -> Option<&str> {
        match self {
            Parent::PageId { page_id } => Some(page_id),
            Parent::DataSourceId { data_source_id } => Some(data_source_id),
            Parent::Workspace { .. } => None,
        }
    }
}

// == Create Page ==
/// Body of `POST /pages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePageRequest {
    pub parent: Parent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<Value>,
    /// `{"type": "none" | "default" | "template_id", ...}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
    /// `{"type": "page_start" | "page_end" | "after_block", ...}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
}

impl CreatePageRequest {
    pub fn new(parent: Parent) -> Self {
        Self {
            parent,
            properties: None,
            children: None,
            icon: None,
            cover: None,
            template: None,
            position: None,
        }
    }

    pub fn properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn children(mut self, children: Vec<Value>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn icon(mut self, icon: Value) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn cover(mut self, cover: Value) -> Self {
        self.cover = Some(cover);
        self
    }

    pub fn template(mut self, template: Value) -> Self {
        self.template = Some(template);
        self
    }

    pub fn position(mut self, position: Value) -> Self {
        self.position = Some(position);
        self
    }

    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let uses_template = self
            .template
            .as_ref()
            .and_then(|t| t.get("type"))
            .and_then(Value::as_str)
            .is_some_and(|t| t != "none");
        if self.children.is_some() && uses_template {
            return Some(
                "Cannot specify 'children' when using a template. The template overrides page content."
                    .to_string(),
            );
        }
        if self.position.is_some() && !matches!(self.parent, Parent::PageId { .. }) {
            return Some(
                "The 'position' parameter is only valid when the parent is a page.".to_string(),
            );
        }
        if self.parent.id().is_some_and(str::is_empty) {
            return Some("Parent id cannot be empty".to_string());
        }
        None
    }

    /// Validated JSON body.
    pub fn to_body(&self) -> Result<Value> {
        if let Some(message) = self.validate() {
            return Err(NotionError::invalid(message));
        }
        serde_json::to_value(self).map_err(|e| NotionError::invalid(e.to_string()))
    }
}

// == Query Data Source ==
/// Filter, sort and pagination for `POST /data_sources/{id}/query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDataSourceParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Value>>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Property ids/names to return, sent as `filter_properties[]`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_properties: Vec<String>,
}

impl Default for QueryDataSourceParams {
    fn default() -> Self {
        Self {
            filter: None,
            sorts: None,
            page_size: MAX_PAGE_SIZE,
            start_cursor: None,
            filter_properties: Vec::new(),
        }
    }
}

impl QueryDataSourceParams {
    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sorts(mut self, sorts: Vec<Value>) -> Self {
        self.sorts = Some(sorts);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    pub fn filter_properties(mut self, properties: Vec<String>) -> Self {
        self.filter_properties = properties;
        self
    }

    /// JSON body. Empty filters and sort lists are omitted.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("page_size".into(), json!(clamp_page_size(self.page_size)));
        if let Some(filter) = self.filter.as_ref().filter(|f| !is_empty_json(f)) {
            body.insert("filter".into(), filter.clone());
        }
        if let Some(sorts) = self.sorts.as_ref().filter(|s| !s.is_empty()) {
            body.insert("sorts".into(), json!(sorts));
        }
        if let Some(cursor) = &self.start_cursor {
            body.insert("start_cursor".into(), json!(cursor));
        }
        Value::Object(body)
    }

    /// Everything that distinguishes one query from another.
    ///
    /// `filter_properties` is a set, so it is sorted and deduplicated.
    pub fn cache_params(&self) -> Value {
        let mut params = self.to_body();
        if !self.filter_properties.is_empty() {
            let mut properties = self.filter_properties.clone();
            properties.sort();
            properties.dedup();
            params["filter_properties"] = json!(properties);
        }
        params
    }
}

// == Block Children ==
/// Pagination for `GET /blocks/{id}/children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockChildrenParams {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl Default for BlockChildrenParams {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            start_cursor: None,
        }
    }
}

impl BlockChildrenParams {
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    /// Query-string pairs.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![(
            "page_size".to_string(),
            clamp_page_size(self.page_size).to_string(),
        )];
        if let Some(cursor) = &self.start_cursor {
            query.push(("start_cursor".to_string(), cursor.clone()));
        }
        query
    }

    pub fn cache_params(&self) -> Value {
        let mut params = json!({"page_size": clamp_page_size(self.page_size)});
        if let Some(cursor) = &self.start_cursor {
            params["start_cursor"] = json!(cursor);
        }
        params
    }
}

// == Search ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    Page,
    Database,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::Page => "page",
            SearchFilter::Database => "database",
        }
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filter: Option<SearchFilter>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub start_cursor: Option<String>,
}

impl SearchRequest {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn objects(filter: SearchFilter) -> Self {
        Self {
            filter: Some(filter),
            ..Self::default()
        }
    }

    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert(
            "page_size".into(),
            json!(clamp_page_size(self.page_size.unwrap_or(MAX_PAGE_SIZE))),
        );
        if !self.query.is_empty() {
            body.insert("query".into(), json!(self.query));
        }
        if let Some(filter) = self.filter {
            body.insert(
                "filter".into(),
                json!({"value": filter.as_str(), "property": "object"}),
            );
        }
        if let Some(cursor) = &self.start_cursor {
            body.insert("start_cursor".into(), json!(cursor));
        }
        Value::Object(body)
    }
}

// == Databases ==
/// Body of `POST /databases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDatabaseRequest {
    pub parent_page_id: String,
    /// Property schema of the initial data source
    pub properties: Value,
    #[serde(default)]
    pub title: Option<Vec<Value>>,
}

impl CreateDatabaseRequest {
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "parent": {"type": "page_id", "page_id": self.parent_page_id},
            "initial_data_source": {"properties": self.properties},
        });
        if let Some(title) = self.title.as_ref().filter(|t| !t.is_empty()) {
            body["title"] = json!(title);
        }
        body
    }
}

/// Body of `PATCH /databases/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDatabaseRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub properties: Option<Value>,
}

impl UpdateDatabaseRequest {
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(title) = self.title.as_ref().filter(|t| !t.is_empty()) {
            body.insert("title".into(), json!([{"text": {"content": title}}]));
        }
        if let Some(properties) = &self.properties {
            body.insert("properties".into(), properties.clone());
        }
        Value::Object(body)
    }
}

// == Data Sources ==
/// Body of `PATCH /data_sources/{id}`.
///
/// A property mapped to `null` removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDataSourceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_trash: Option<bool>,
    /// `{"type": "database_id", "database_id": ...}` moves the data source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Value>,
}

impl UpdateDataSourceRequest {
    /// Database the data source is being moved to, if any.
    pub fn new_database_id(&self) -> Option<&str> {
        self.parent
            .as_ref()
            .and_then(|p| p.get("database_id"))
            .and_then(Value::as_str)
    }

    pub fn to_body(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({}))
    }
}

// == Pages / Blocks ==
/// Body of `PATCH /pages/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePageRequest {
    pub properties: Value,
}

/// Body of `PATCH /blocks/{id}/children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendChildrenRequest {
    pub children: Vec<Value>,
}

/// Users listing pagination.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListUsersParams {
    #[serde(default)]
    pub page_size: Option<u32>,
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
