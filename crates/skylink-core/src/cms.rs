//! Flat view models for CMS content.
//!
//! The CMS returns entries as `{id, attributes: {...}}`; `skylink-client`
//! flattens them into `{id, ...}` before deserializing into these types.
//! Every field is defaulted, and `null` reads as a missing field, so a
//! renamed or unset field in the CMS degrades to an empty value instead of
//! failing the page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection names in the CMS REST API.
pub mod collections {
    /// Blog posts
    pub const BLOG_POSTS: &str = "blog-posts";
    /// Job openings
    pub const JOBS: &str = "jobs";
    /// Frequently asked questions
    pub const FAQS: &str = "faqs";
    /// Shipping rate cards
    pub const SHIPPING_RATES: &str = "shipping-rates";
    /// Legal pages (terms, privacy, ...)
    pub const LEGAL_PAGES: &str = "legal-pages";
}

/// Pagination block from a collection response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Entries per page.
    pub page_size: u32,
    /// Total pages.
    pub page_count: u32,
    /// Total entries.
    pub total: u64,
}

/// One page of flattened entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsPage<T> {
    /// Entries on this page.
    pub items: Vec<T>,
    /// Pagination metadata (zeroed when the CMS omits it).
    pub pagination: Pagination,
}

impl<T> CmsPage<T> {
    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        self.pagination.page < self.pagination.page_count
    }
}

/// Media reference after flattening.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Media {
    /// Absolute or CMS-relative URL.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub url: String,
    /// Alt text.
    pub alternative_text: Option<String>,
}

/// Blog post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    /// CMS id.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub id: u64,
    /// Headline.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub title: String,
    /// URL slug.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub slug: String,
    /// Short summary for cards.
    pub excerpt: Option<String>,
    /// Rich-text blocks or markdown, depending on the field type.
    pub content: Value,
    /// Author display name.
    pub author: Option<String>,
    /// Category label.
    pub category: Option<String>,
    /// Cover image.
    pub cover_image: Option<Media>,
    /// ISO-8601 publish timestamp.
    pub published_at: Option<String>,
}

/// Job opening.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobOpening {
    /// CMS id.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub id: u64,
    /// Role title.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub title: String,
    /// URL slug.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub slug: String,
    /// Department.
    pub department: Option<String>,
    /// Office or "Remote".
    pub location: Option<String>,
    /// Full-time, contract, ...
    pub employment_type: Option<String>,
    /// Rich-text or markdown description.
    pub description: Value,
    /// Whether applications are open.
    pub is_active: Option<bool>,
    /// ISO-8601 publish timestamp.
    pub published_at: Option<String>,
}

/// Frequently asked question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Faq {
    /// CMS id.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub id: u64,
    /// Question text.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub question: String,
    /// Answer (rich text or markdown).
    pub answer: Value,
    /// Grouping label.
    pub category: Option<String>,
    /// Sort key within a category.
    pub order: Option<i64>,
}

/// Shipping rate card row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingRate {
    /// CMS id.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub id: u64,
    /// Destination country.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub country: String,
    /// Service tier, e.g. "Express".
    pub service_type: Option<String>,
    /// Lower weight bound in kg.
    pub min_weight: Option<f64>,
    /// Upper weight bound in kg.
    pub max_weight: Option<f64>,
    /// Price for the band.
    pub price: Option<f64>,
    /// ISO currency code.
    pub currency: Option<String>,
    /// Advertised transit time, free text.
    pub transit_time: Option<String>,
}

/// Legal page (terms of service, privacy policy, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegalPage {
    /// CMS id.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub id: u64,
    /// Page title.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub title: String,
    /// URL slug.
    #[serde(deserialize_with = "crate::serde_util::null_as_default")]
    pub slug: String,
    /// Rich-text or markdown body.
    pub content: Value,
    /// ISO-8601 last-updated timestamp.
    pub updated_at: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blog_post_from_flat_entry() {
        let post: BlogPost = serde_json::from_value(json!({
            "id": 7,
            "title": "Shipping to the UK",
            "slug": "shipping-to-the-uk",
            "content": "Hello **world**",
            "publishedAt": "2025-06-01T10:00:00.000Z",
            "coverImage": {"url": "/uploads/uk.jpg", "alternativeText": "London"}
        }))
        .unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.slug, "shipping-to-the-uk");
        assert_eq!(post.cover_image.unwrap().url, "/uploads/uk.jpg");
        assert!(post.excerpt.is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let faq: Faq = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(faq.question, "");
        assert_eq!(faq.answer, Value::Null);
    }

    #[test]
    fn test_null_fields_default() {
        let post: BlogPost = serde_json::from_value(json!({
            "id": 1, "title": "Hi", "slug": null, "excerpt": null, "content": null
        }))
        .unwrap();
        assert_eq!(post.title, "Hi");
        assert_eq!(post.slug, "");
        assert!(post.excerpt.is_none());

        let rate: ShippingRate =
            serde_json::from_value(json!({"id": null, "country": null})).unwrap();
        assert_eq!(rate.id, 0);
        assert_eq!(rate.country, "");

        let media: Media = serde_json::from_value(json!({"url": null})).unwrap();
        assert_eq!(media.url, "");
    }

    #[test]
    fn test_shipping_rate_numbers() {
        let rate: ShippingRate = serde_json::from_value(json!({
            "id": 3, "country": "USA", "minWeight": 0.5, "maxWeight": 1, "price": 42.5
        }))
        .unwrap();
        assert_eq!(rate.max_weight, Some(1.0));
        assert_eq!(rate.price, Some(42.5));
    }

    #[test]
    fn test_page_has_next() {
        let page = CmsPage::<Faq> {
            items: vec![],
            pagination: Pagination {
                page: 1,
                page_size: 10,
                page_count: 2,
                total: 12,
            },
        };
        assert!(page.has_next());
    }
}
