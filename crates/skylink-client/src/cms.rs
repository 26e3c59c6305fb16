//! Read-only client for the headless CMS.
//!
//! Collections live under `{base_url}/api/{collection}` and answer with
//! `{data, meta: {pagination}}`. Entries come back either wrapped as
//! `{id, attributes: {..}}` or already flat depending on the CMS version;
//! [`flatten_entry`] normalizes both to `{id, ..}` before deserializing.

use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use skylink_core::cms::{
    BlogPost, CmsPage, Faq, JobOpening, LegalPage, Pagination, ShippingRate, collections,
};
use skylink_core::SkylinkConfig;
use std::fmt;
use std::time::Duration;

/// Default deadline for [`CmsClient::probe`].
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterOp {
    Eq,
    Contains,
}

impl FilterOp {
    fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::Contains => "$contains",
        }
    }
}

/// Query-string builder for collection requests.
///
/// ```
/// use skylink_client::cms::CmsQuery;
///
/// let query = CmsQuery::new().filter_eq("slug", "hello").populate_all();
/// assert_eq!(
///     query.to_pairs(),
///     vec![
///         ("filters[slug][$eq]".to_string(), "hello".to_string()),
///         ("populate".to_string(), "*".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsQuery {
    filters: Vec<(String, FilterOp, String)>,
    sort: Vec<String>,
    page: Option<u32>,
    page_size: Option<u32>,
    populate: Vec<String>,
    populate_all: bool,
}

impl CmsQuery {
    /// Empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// `filters[field][$eq]=value`
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), FilterOp::Eq, value.into()));
        self
    }

    /// `filters[field][$contains]=value`
    pub fn filter_contains(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .push((field.into(), FilterOp::Contains, value.into()));
        self
    }

    /// Appends a sort key such as `publishedAt:desc`.
    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    /// 1-based page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Entries per page.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Populates one relation by name.
    pub fn populate(mut self, relation: impl Into<String>) -> Self {
        self.populate.push(relation.into());
        self
    }

    /// Populates every first-level relation (`populate=*`).
    pub fn populate_all(mut self) -> Self {
        self.populate_all = true;
        self
    }

    /// Renders the query as ordered key/value pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for (field, op, value) in &self.filters {
            pairs.push((format!("filters[{field}][{}]", op.as_str()), value.clone()));
        }
        for (i, key) in self.sort.iter().enumerate() {
            pairs.push((format!("sort[{i}]"), key.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("pagination[page]".to_string(), page.to_string()));
        }
        if let Some(size) = self.page_size {
            pairs.push(("pagination[pageSize]".to_string(), size.to_string()));
        }
        if self.populate_all {
            pairs.push(("populate".to_string(), "*".to_string()));
        } else {
            for (i, relation) in self.populate.iter().enumerate() {
                pairs.push((format!("populate[{i}]"), relation.clone()));
            }
        }

        pairs
    }
}

/// Flattens one CMS entry.
///
/// `{id, attributes: {..}}` becomes `{id, ..}`. Entries without an
/// `attributes` object are passed through. Relations shaped like
/// `{data: ..}` inside the entry are flattened recursively; `{data: null}`
/// becomes `null`.
pub fn flatten_entry(entry: Value) -> Value {
    match entry {
        Value::Object(mut map) => {
            let attributes = match map.remove("attributes") {
                Some(Value::Object(attributes)) => Some(attributes),
                Some(other) => {
                    map.insert("attributes".to_string(), other);
                    None
                }
                None => None,
            };
            if let Some(attributes) = attributes {
                let mut flat = Map::new();
                if let Some(id) = map.remove("id") {
                    flat.insert("id".to_string(), id);
                }
                for (key, value) in attributes {
                    flat.insert(key, flatten_value(value));
                }
                for (key, value) in map {
                    flat.entry(key).or_insert(value);
                }
                Value::Object(flat)
            } else {
                Value::Object(
                    map.into_iter()
                        .map(|(key, value)| (key, flatten_value(value)))
                        .collect(),
                )
            }
        }
        other => other,
    }
}

fn flatten_value(value: Value) -> Value {
    match value {
        Value::Object(mut map) if is_relation(&map) => match map.remove("data") {
            Some(Value::Array(items)) => {
                Value::Array(items.into_iter().map(flatten_entry).collect())
            }
            Some(Value::Null) | None => Value::Null,
            Some(single) => flatten_entry(single),
        },
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, flatten_value(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(flatten_value).collect()),
        other => other,
    }
}

fn is_relation(map: &Map<String, Value>) -> bool {
    map.contains_key("data") && map.keys().all(|k| k == "data" || k == "meta")
}

/// Result of a CMS reachability probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CmsStatus {
    /// HEAD answered 2xx.
    Connected,
    /// HEAD answered with a non-success status.
    Error,
    /// Network failure or deadline exceeded.
    Disconnected,
    /// No CMS configured.
    Unknown,
}

impl CmsStatus {
    /// Whether this status degrades overall service health.
    pub fn is_degraded(&self) -> bool {
        matches!(self, CmsStatus::Error | CmsStatus::Disconnected)
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CmsStatus::Connected => "connected",
            CmsStatus::Error => "error",
            CmsStatus::Disconnected => "disconnected",
            CmsStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CmsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: ResponseMeta,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMeta {
    #[serde(default)]
    pagination: Pagination,
}

/// CMS REST client.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    health_timeout: Duration,
}

impl CmsClient {
    /// Creates an anonymous client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Creates a client from the `[cms]` section.
    pub fn from_config(config: &SkylinkConfig) -> Self {
        let client = Self::new(config.cms.base_url.clone())
            .with_health_timeout(Duration::from_secs(config.cms.health_timeout_secs));
        match &config.cms.api_token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.api_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    /// Overrides the probe deadline.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a base URL is set at all.
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/api/{collection}", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Option<Value>> {
        tracing::debug!(url = %url, params = query.len(), "CMS request");

        let response = self
            .authorize(self.http.get(url).query(query))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|source| Error::Decode {
                url: url.to_string(),
                source,
            })
    }

    /// Fetches one page of a collection.
    pub async fn find_many<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &CmsQuery,
    ) -> Result<CmsPage<T>> {
        let url = self.collection_url(collection);
        let Some(body) = self.get_json(&url, &query.to_pairs()).await? else {
            return Err(Error::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                url,
            });
        };

        let response: CollectionResponse =
            serde_json::from_value(body).map_err(|source| Error::Decode {
                url: url.clone(),
                source,
            })?;

        let entries = match response.data {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            single => vec![single],
        };

        let items = entries
            .into_iter()
            .map(|entry| decode_entry(&url, entry))
            .collect::<Result<Vec<T>>>()?;

        Ok(CmsPage {
            items,
            pagination: response.meta.pagination,
        })
    }

    /// Fetches one entry by numeric id; `None` when the CMS answers 404.
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: u64,
    ) -> Result<Option<T>> {
        let url = format!("{}/{id}", self.collection_url(collection));
        let query = CmsQuery::new().populate_all().to_pairs();
        let Some(body) = self.get_json(&url, &query).await? else {
            return Ok(None);
        };

        match body.get("data").cloned() {
            Some(Value::Null) | None => Ok(None),
            Some(entry) => decode_entry(&url, entry).map(Some),
        }
    }

    /// First entry whose `slug` equals `slug`.
    pub async fn find_by_slug<T: DeserializeOwned>(
        &self,
        collection: &str,
        slug: &str,
    ) -> Result<Option<T>> {
        let query = CmsQuery::new().filter_eq("slug", slug).populate_all();
        let page = self.find_many::<T>(collection, &query).await?;
        Ok(page.items.into_iter().next())
    }

    /// Newest blog posts first.
    pub async fn blog_posts(&self, page: u32, page_size: u32) -> Result<CmsPage<BlogPost>> {
        let query = CmsQuery::new()
            .sort("publishedAt:desc")
            .page(page)
            .page_size(page_size)
            .populate_all();
        self.find_many(collections::BLOG_POSTS, &query).await
    }

    /// Blog post by slug.
    pub async fn blog_post(&self, slug: &str) -> Result<Option<BlogPost>> {
        self.find_by_slug(collections::BLOG_POSTS, slug).await
    }

    /// Open positions.
    pub async fn jobs(&self) -> Result<Vec<JobOpening>> {
        let query = CmsQuery::new()
            .filter_eq("isActive", "true")
            .sort("publishedAt:desc")
            .populate_all();
        Ok(self.find_many(collections::JOBS, &query).await?.items)
    }

    /// FAQs ordered by category, then `order`.
    pub async fn faqs(&self) -> Result<Vec<Faq>> {
        let query = CmsQuery::new().sort("category:asc").sort("order:asc");
        Ok(self.find_many(collections::FAQS, &query).await?.items)
    }

    /// Rate cards ordered by country.
    pub async fn shipping_rates(&self) -> Result<Vec<ShippingRate>> {
        let query = CmsQuery::new().sort("country:asc").page_size(100);
        Ok(self.find_many(collections::SHIPPING_RATES, &query).await?.items)
    }

    /// Legal page by slug.
    pub async fn legal_page(&self, slug: &str) -> Result<Option<LegalPage>> {
        self.find_by_slug(collections::LEGAL_PAGES, slug).await
    }

    /// Checks reachability with a HEAD request under the health deadline.
    pub async fn probe(&self) -> CmsStatus {
        if !self.is_configured() {
            return CmsStatus::Unknown;
        }

        let request = self
            .authorize(self.http.head(&self.base_url))
            .timeout(self.health_timeout);

        match request.send().await {
            Ok(response) if response.status().is_success() => CmsStatus::Connected,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "CMS health probe failed");
                CmsStatus::Error
            }
            Err(e) => {
                tracing::warn!(error = %e, "CMS unreachable");
                CmsStatus::Disconnected
            }
        }
    }
}

fn decode_entry<T: DeserializeOwned>(url: &str, entry: Value) -> Result<T> {
    serde_json::from_value(flatten_entry(entry)).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_rendering_order() {
        let pairs = CmsQuery::new()
            .filter_eq("slug", "x")
            .filter_contains("title", "ship")
            .sort("publishedAt:desc")
            .sort("id:asc")
            .page(2)
            .page_size(10)
            .populate_all()
            .to_pairs();

        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        assert_eq!(
            rendered,
            vec![
                "filters[slug][$eq]=x",
                "filters[title][$contains]=ship",
                "sort[0]=publishedAt:desc",
                "sort[1]=id:asc",
                "pagination[page]=2",
                "pagination[pageSize]=10",
                "populate=*",
            ]
        );
    }

    #[test]
    fn test_named_populate() {
        let pairs = CmsQuery::new().populate("coverImage").populate("tags").to_pairs();
        assert_eq!(pairs[0], ("populate[0]".to_string(), "coverImage".to_string()));
        assert_eq!(pairs[1], ("populate[1]".to_string(), "tags".to_string()));
    }

    #[test]
    fn test_empty_query() {
        assert!(CmsQuery::new().to_pairs().is_empty());
    }

    #[test]
    fn test_flatten_wrapped_entry() {
        let flat = flatten_entry(json!({
            "id": 4,
            "attributes": {
                "title": "Hello",
                "coverImage": {"data": {"id": 9, "attributes": {"url": "/a.png"}}},
                "tags": {"data": [{"id": 1, "attributes": {"name": "air"}}]},
                "author": {"data": null}
            }
        }));

        assert_eq!(
            flat,
            json!({
                "id": 4,
                "title": "Hello",
                "coverImage": {"id": 9, "url": "/a.png"},
                "tags": [{"id": 1, "name": "air"}],
                "author": null
            })
        );
    }

    #[test]
    fn test_flatten_passes_flat_entry_through() {
        let entry = json!({"id": 2, "question": "Q?", "answer": [{"type": "paragraph"}]});
        assert_eq!(flatten_entry(entry.clone()), entry);
    }

    #[test]
    fn test_flatten_keeps_data_field_with_siblings() {
        let entry = json!({"id": 1, "data": "x", "other": 2});
        assert_eq!(flatten_entry(entry.clone()), entry);
    }

    #[test]
    fn test_cms_status_wire_names() {
        assert_eq!(
            serde_json::to_value(CmsStatus::Disconnected).unwrap(),
            json!("disconnected")
        );
        assert!(CmsStatus::Error.is_degraded());
        assert!(!CmsStatus::Unknown.is_degraded());
        assert_eq!(CmsStatus::Connected.to_string(), "connected");
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let client = CmsClient::new("http://cms.test/").with_token("  ");
        assert!(client.api_token.is_none());
        assert_eq!(client.base_url(), "http://cms.test");
    }

    #[test]
    fn test_unconfigured_client() {
        assert!(!CmsClient::new("").is_configured());
    }
}
