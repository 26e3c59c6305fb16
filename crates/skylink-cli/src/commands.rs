//! Handlers for the non-config commands.

use crate::cli::{ContentAction, HistoryAction};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use skylink_client::{CmsClient, TrackingClient};
use skylink_content::{excerpt, render_content, render_plain};
use skylink_core::cms::{BlogPost, LegalPage};
use skylink_core::dates::estimate_transit;
use skylink_core::{
    HistoryStore, SkylinkConfig, TrackingEnvelope, TrackingHistory, TrackingNumber,
    ensure_success, format_tracking_date, parse_weight,
};
use std::fmt::Write as _;

const EXCERPT_CHARS: usize = 160;

/// `skylink serve`
pub async fn cmd_serve(
    mut config: SkylinkConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;
    skylink_api::serve(config).await?;
    Ok(())
}

/// `skylink track`
///
/// With `json` the carrier body is printed as received, then checked like a
/// summary lookup. Successful lookups are recorded in `history` when a store
/// is given.
pub async fn cmd_track(
    config: &SkylinkConfig,
    raw: &str,
    json: bool,
    history: Option<&HistoryStore>,
) -> Result<()> {
    let client = TrackingClient::from_config(config);

    let number = match TrackingNumber::parse(raw) {
        Ok(number) => number,
        Err(e) => return Err(anyhow!(e.user_message())),
    };

    if json {
        let body = client.fetch_raw(number.as_str()).await.map_err(|e| {
            tracing::error!(awb = %number, error = %e, "Tracking lookup failed");
            anyhow!(e.user_message())
        })?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        TrackingEnvelope::from_value(body)
            .and_then(ensure_success)
            .map_err(|e| anyhow!(e.user_message()))?;
    } else {
        let envelope = client.track(number.as_str()).await.map_err(|e| {
            if e.is_transport() {
                tracing::error!(awb = %number, error = %e, "Tracking lookup failed");
            }
            anyhow!(e.user_message())
        })?;
        print!("{}", render_tracking(&envelope));
    }

    if let Some(store) = history {
        if let Err(e) = store.record(number.as_str()) {
            tracing::warn!(error = %e, path = %store.path().display(), "Could not save history");
        }
    }
    Ok(())
}

/// Human-readable summary of a successful envelope.
pub fn render_tracking(envelope: &TrackingEnvelope) -> String {
    let data = &envelope.data;
    let mut out = String::new();
    let dash = "-";

    let _ = writeln!(
        out,
        "Tracking number: {}",
        data.awb_number.as_deref().unwrap_or(dash)
    );
    let _ = writeln!(out, "Status:          {}", data.status.as_deref().unwrap_or(dash));
    let _ = writeln!(
        out,
        "Route:           {} -> {}",
        data.origin.as_deref().unwrap_or(dash),
        data.destination.as_deref().unwrap_or(dash)
    );
    if let Some(booked) = data.booking_date.as_deref() {
        let _ = writeln!(out, "Booked:          {}", format_tracking_date(booked, None));
    }
    if let Some(weight) = data.weight.as_deref() {
        let _ = writeln!(out, "Weight:          {}", parse_weight(weight).display_value);
    }
    if let (Some(destination), Some(booked)) =
        (data.destination.as_deref(), data.booking_date.as_deref())
    {
        let _ = writeln!(
            out,
            "Estimated:       {}",
            skylink_core::estimated_delivery(destination, booked)
        );
    }

    if !data.history.is_empty() {
        let _ = writeln!(out, "\nHistory:");
        for event in &data.history {
            let when = event
                .date
                .as_deref()
                .map(|d| format_tracking_date(d, event.time.as_deref()))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<24}  {:<16}  {}",
                when,
                event.location.as_deref().unwrap_or(dash),
                event.status.as_deref().unwrap_or(dash)
            );
        }
    }
    out
}

/// `skylink weight`
pub fn cmd_weight(raw: &str) {
    let parsed = parse_weight(raw);
    println!("Value:   {}", parsed.value);
    println!("Unit:    {}", parsed.unit);
    println!("Display: {}", parsed.display_value);
}

/// `skylink eta`
pub fn cmd_eta(destination: &str, booking_date: &str) {
    match estimate_transit(destination, booking_date) {
        Some(estimate) => {
            println!("Destination:  {}", estimate.destination);
            println!("Transit days: {}", estimate.transit_days);
            println!("Estimated:    {}", estimate.display());
        }
        None => println!("Estimated:    {}", skylink_core::dates::CALCULATING),
    }
}

/// `skylink history`
pub fn cmd_history(store: &HistoryStore, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List => print!("{}", render_history(&store.load())),
        HistoryAction::Remove { number } => {
            let mut history = store.load();
            let cleaned = TrackingNumber::sanitize(&number);
            if history.remove(&cleaned) {
                store.save(&history)?;
                println!("Removed {cleaned}");
            } else {
                println!("{cleaned} is not in history");
            }
        }
        HistoryAction::Clear => {
            store.save(&TrackingHistory::new())?;
            println!("History cleared");
        }
    }
    Ok(())
}

/// One line per entry, newest first.
pub fn render_history(history: &TrackingHistory) -> String {
    if history.is_empty() {
        return "No recent lookups\n".to_string();
    }
    history
        .entries()
        .iter()
        .map(|entry| {
            format!(
                "{:<20}  {}\n",
                entry.tracking_number,
                entry
                    .searched_at
                    .with_timezone(&Local)
                    .format("%b %-d, %Y %-I:%M %p")
            )
        })
        .collect()
}

/// `skylink content`
pub async fn cmd_content(config: &SkylinkConfig, action: ContentAction) -> Result<()> {
    if !config.cms_enabled() {
        return Err(anyhow!("No CMS configured (set cms.base_url or STRAPI_URL)"));
    }
    let cms = CmsClient::from_config(config);

    match action {
        ContentAction::Posts { page, page_size } => {
            let posts = cms
                .blog_posts(page, page_size)
                .await
                .context("Failed to load blog posts")?;
            for post in &posts.items {
                print!("{}", render_post_line(post));
            }
            println!(
                "\nPage {} of {} ({} posts)",
                posts.pagination.page, posts.pagination.page_count, posts.pagination.total
            );
        }
        ContentAction::Post { slug, html } => {
            let post = cms
                .blog_post(&slug)
                .await
                .context("Failed to load blog post")?
                .ok_or_else(|| anyhow!("No blog post with slug '{slug}'"))?;
            println!("{}\n", post.title);
            println!("{}", render_body(&post.content, html));
        }
        ContentAction::Jobs => {
            for job in cms.jobs().await.context("Failed to load jobs")? {
                println!(
                    "{}  [{}]  {}",
                    job.title,
                    job.department.as_deref().unwrap_or("-"),
                    job.location.as_deref().unwrap_or("-")
                );
            }
        }
        ContentAction::Faqs => {
            for faq in cms.faqs().await.context("Failed to load FAQs")? {
                println!("Q: {}\nA: {}\n", faq.question, render_plain(&faq.answer));
            }
        }
        ContentAction::Rates => {
            for rate in cms
                .shipping_rates()
                .await
                .context("Failed to load shipping rates")?
            {
                println!(
                    "{:<16} {:<12} {:>8} {:<4} {}",
                    rate.country,
                    rate.service_type.as_deref().unwrap_or("-"),
                    rate.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
                    rate.currency.as_deref().unwrap_or(""),
                    rate.transit_time.as_deref().unwrap_or("")
                );
            }
        }
        ContentAction::Legal { slug, html } => {
            let page: LegalPage = cms
                .legal_page(&slug)
                .await
                .context("Failed to load legal page")?
                .ok_or_else(|| anyhow!("No legal page with slug '{slug}'"))?;
            println!("{}\n", page.title);
            println!("{}", render_body(&page.content, html));
        }
    }
    Ok(())
}

fn render_body(content: &serde_json::Value, html: bool) -> String {
    if html {
        render_content(content)
    } else {
        render_plain(content)
    }
}

fn render_post_line(post: &BlogPost) -> String {
    let date = post
        .published_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.format("%b %-d, %Y").to_string())
        .unwrap_or_default();

    let summary = post
        .excerpt
        .clone()
        .or_else(|| post.content.as_str().and_then(|md| excerpt(md, EXCERPT_CHARS)))
        .unwrap_or_default();

    let mut line = format!("{date:<13} {} ({})\n", post.title, post.slug);
    if !summary.is_empty() {
        let _ = writeln!(line, "              {summary}");
    }
    line
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_render_tracking_summary() {
        let envelope = TrackingEnvelope::from_value(json!({
            "data": {
                "status": "SUCCESS",
                "awbNo": "SKY123",
                "origin": "INDIA",
                "destination": "UNKNOWN COUNTRY",
                "bookingDate": "01-JAN-2025",
                "weight": "1000g",
                "history": [
                    {"status": "Booked", "location": "DELHI", "date": "01-JAN-2025", "time": "09:30"}
                ]
            }
        }))
        .unwrap();

        let out = render_tracking(&envelope);
        assert!(out.contains("Tracking number: SKY123"));
        assert!(out.contains("Route:           INDIA -> UNKNOWN COUNTRY"));
        assert!(out.contains("Booked:          Jan 1, 2025"));
        assert!(out.contains("Weight:          1.00 kg"));
        assert!(out.contains("Estimated:       Wednesday, January 8, 2025"));
        assert!(out.contains("Jan 1, 2025, 9:30 AM"));
        assert!(out.contains("DELHI"));
    }

    #[test]
    fn test_render_tracking_sparse_envelope() {
        let envelope = TrackingEnvelope::from_value(json!({"data": {"status": "SUCCESS"}})).unwrap();
        let out = render_tracking(&envelope);
        assert!(out.contains("Route:           - -> -"));
        assert!(!out.contains("History:"));
        assert!(!out.contains("Estimated:"));
    }

    #[test]
    fn test_history_commands() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        assert_eq!(render_history(&store.load()), "No recent lookups\n");

        store.record("SKY1").unwrap();
        store.record("SKY2").unwrap();
        let listed = render_history(&store.load());
        assert!(listed.starts_with("SKY2"));

        cmd_history(&store, HistoryAction::Remove { number: "SKY-2".to_string() }).unwrap();
        assert_eq!(store.load().len(), 1);

        cmd_history(&store, HistoryAction::Clear).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_post_line_uses_markdown_excerpt() {
        let post = BlogPost {
            id: 1,
            title: "Peak season".to_string(),
            slug: "peak-season".to_string(),
            content: json!("# Peak\n\nBook **early** this year."),
            published_at: Some("2025-11-02T08:00:00.000Z".to_string()),
            ..BlogPost::default()
        };
        let line = render_post_line(&post);
        assert!(line.starts_with("Nov 2, 2025"));
        assert!(line.contains("Peak season (peak-season)"));
        assert!(line.contains("Book early this year."));
    }

    #[tokio::test]
    async fn test_track_rejects_punctuation_before_network() {
        let config = SkylinkConfig::default();
        let err = cmd_track(&config, "--//--", false, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid tracking number");
    }

    async fn config_for(server: &MockServer, body: serde_json::Value) -> SkylinkConfig {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
        let mut config = SkylinkConfig::default();
        config.tracking.base_url = format!("{}/track", server.uri());
        config
    }

    #[tokio::test]
    async fn test_track_json_embedded_error_is_not_recorded() {
        let server = MockServer::start().await;
        let config = config_for(
            &server,
            json!({"statusCode": 200, "data": {"status": "ERROR", "message": "Not found"}}),
        )
        .await;
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        let err = cmd_track(&config, "SKY404", true, Some(&store))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found");
        assert!(store.load().is_empty());
    }

    #[tokio::test]
    async fn test_track_json_success_is_recorded() {
        let server = MockServer::start().await;
        let config = config_for(
            &server,
            json!({"statusCode": 200, "data": {"status": "SUCCESS", "awbNo": "SKY1"}}),
        )
        .await;
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        cmd_track(&config, "SKY1", true, Some(&store)).await.unwrap();
        assert_eq!(store.load().entries()[0].tracking_number, "SKY1");
    }

    #[tokio::test]
    async fn test_content_requires_cms() {
        let mut config = SkylinkConfig::default();
        config.cms.base_url = String::new();
        assert!(cmd_content(&config, ContentAction::Jobs).await.is_err());
    }
}
