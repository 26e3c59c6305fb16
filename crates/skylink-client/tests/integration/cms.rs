//! CMS client against a mock CMS.

use crate::common::wrapped_entry;
use serde_json::json;
use skylink_client::{CmsClient, CmsQuery, CmsStatus};
use skylink_core::cms::{BlogPost, Faq};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_blog_posts_flattens_and_paginates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/blog-posts"))
        .and(query_param("sort[0]", "publishedAt:desc"))
        .and(query_param("pagination[page]", "1"))
        .and(query_param("pagination[pageSize]", "2"))
        .and(query_param("populate", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                wrapped_entry(2, json!({"title": "Newer", "slug": "newer"})),
                wrapped_entry(1, json!({"title": "Older", "slug": "older"}))
            ],
            "meta": {"pagination": {"page": 1, "pageSize": 2, "pageCount": 3, "total": 5}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = CmsClient::new(server.uri()).blog_posts(1, 2).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, 2);
    assert_eq!(page.items[0].slug, "newer");
    assert_eq!(page.pagination.total, 5);
    assert!(page.has_next());
}

#[tokio::test]
async fn test_null_fields_do_not_fail_the_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/blog-posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                wrapped_entry(2, json!({"title": "Draft", "slug": null, "excerpt": null})),
                wrapped_entry(1, json!({"title": "Older", "slug": "older"}))
            ],
            "meta": {"pagination": {"page": 1, "pageSize": 10, "pageCount": 1, "total": 2}}
        })))
        .mount(&server)
        .await;

    let page = CmsClient::new(server.uri()).blog_posts(1, 10).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Draft");
    assert_eq!(page.items[0].slug, "");
    assert_eq!(page.items[1].slug, "older");
}

#[tokio::test]
async fn test_find_by_slug_uses_eq_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/legal-pages"))
        .and(query_param("filters[slug][$eq]", "privacy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 8, "title": "Privacy", "slug": "privacy", "content": "# Privacy"}],
            "meta": {}
        })))
        .mount(&server)
        .await;

    let page = CmsClient::new(server.uri())
        .legal_page("privacy")
        .await
        .unwrap()
        .expect("page exists");
    assert_eq!(page.id, 8);
    assert_eq!(page.content, json!("# Privacy"));
}

#[tokio::test]
async fn test_find_by_slug_missing_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/blog-posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "meta": {}})))
        .mount(&server)
        .await;

    let post = CmsClient::new(server.uri()).blog_post("nope").await.unwrap();
    assert!(post.is_none());
}

#[tokio::test]
async fn test_find_one_handles_404_and_entry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/faqs/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": wrapped_entry(3, json!({"question": "How long?", "answer": "5 days"}))
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/faqs/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = CmsClient::new(server.uri());
    let faq: Faq = client.find_one("faqs", 3).await.unwrap().unwrap();
    assert_eq!(faq.question, "How long?");
    assert!(client.find_one::<Faq>("faqs", 4).await.unwrap().is_none());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let faqs = CmsClient::new(server.uri())
        .with_token("secret")
        .faqs()
        .await
        .unwrap();
    assert!(faqs.is_empty());
}

#[tokio::test]
async fn test_collection_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = CmsClient::new(server.uri())
        .find_many::<BlogPost>("blog-posts", &CmsQuery::new())
        .await
        .unwrap_err();
    assert!(matches!(err, skylink_client::Error::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_probe_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = CmsClient::new(server.uri());
    assert_eq!(client.probe().await, CmsStatus::Connected);
    assert_eq!(client.probe().await, CmsStatus::Error);
}

#[tokio::test]
async fn test_probe_deadline_is_disconnected() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = CmsClient::new(server.uri()).with_health_timeout(Duration::from_millis(50));
    assert_eq!(client.probe().await, CmsStatus::Disconnected);
}

#[tokio::test]
async fn test_probe_without_cms_is_unknown() {
    assert_eq!(CmsClient::new("").probe().await, CmsStatus::Unknown);
}
