//! Integration tests for the HTTP routes

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use lens_core::config::LensConfig;
use lens_core::store::{FeedStore, UnconfiguredStore};
use lens_core::window::FeedWindow;
use lens_core::{ClientRef, DateRecord, LensError, LensResult, OwnerProfile, ProjectRef};
use lens_server::state::AppState;
use serde_json::Value;

/// Mock store with one owner, one client and two upcoming dates
struct MockStore {
    healthy: bool,
    projects_fail: bool,
}

impl MockStore {
    fn healthy() -> Self {
        MockStore {
            healthy: true,
            projects_fail: false,
        }
    }

    fn failing() -> Self {
        MockStore {
            healthy: false,
            projects_fail: false,
        }
    }

    fn dates() -> Vec<DateRecord> {
        let start = Utc::now() + Duration::days(1);
        vec![
            DateRecord {
                id: "d2".to_string(),
                project_id: "p2".to_string(),
                starts_at: Some(start + Duration::hours(3)),
                ends_at: Some(start + Duration::hours(4)),
                location: None,
            },
            DateRecord {
                id: "d1".to_string(),
                project_id: "p1".to_string(),
                starts_at: Some(start),
                ends_at: Some(start + Duration::hours(1)),
                location: Some("Studio A".to_string()),
            },
        ]
    }

    fn projects() -> Vec<ProjectRef> {
        vec![
            ProjectRef {
                id: "p1".to_string(),
                title: Some("Shoot A".to_string()),
                status: Some("CONFIRMED".to_string()),
                client_id: Some("c1".to_string()),
                owner_id: Some("u1".to_string()),
            },
            ProjectRef {
                id: "p2".to_string(),
                title: Some("Shoot B".to_string()),
                status: Some("cancelled".to_string()),
                client_id: None,
                owner_id: Some("u2".to_string()),
            },
        ]
    }
}

#[async_trait]
impl FeedStore for MockStore {
    async fn dates_in_window(&self, _: &FeedWindow, limit: usize) -> LensResult<Vec<DateRecord>> {
        if !self.healthy {
            return Err(LensError::Store {
                status: 500,
                message: "connection refused".to_string(),
            });
        }
        let mut dates = Self::dates();
        dates.truncate(limit);
        Ok(dates)
    }

    async fn projects_by_ids(&self, ids: &[String]) -> LensResult<Vec<ProjectRef>> {
        if self.projects_fail {
            return Err(LensError::Decode("projects: bad json".to_string()));
        }
        Ok(Self::projects()
            .into_iter()
            .filter(|p| ids.contains(&p.id))
            .collect())
    }

    async fn clients_by_ids(&self, _: &[String]) -> LensResult<Vec<ClientRef>> {
        Ok(vec![ClientRef {
            id: "c1".to_string(),
            name: Some("Acme".to_string()),
        }])
    }

    async fn profile_by_token(&self, token: &str) -> LensResult<Option<OwnerProfile>> {
        Ok((token == "tok-1").then(|| OwnerProfile {
            user_id: "u1".to_string(),
            default_alarm_minutes: Some(20),
        }))
    }
}

fn config() -> LensConfig {
    let mut config = LensConfig::default();
    config.feed.base_url = Some("https://lens.example".to_string());
    config
}

fn server_with(store: Arc<dyn FeedStore>) -> TestServer {
    let app = lens_server::app(AppState::new(store, config()));
    TestServer::new(app).expect("Failed to create test server")
}

fn server() -> TestServer {
    server_with(Arc::new(MockStore::healthy()))
}

#[tokio::test]
async fn test_feed_headers() {
    let response = server().get("/api/ics").await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type"),
        "text/calendar; charset=utf-8"
    );
    assert_eq!(response.header("cache-control"), "no-store, max-age=0");
}

#[tokio::test]
async fn test_feed_body() {
    let response = server().get("/api/ics").await;
    let body = response.text();

    assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(body.ends_with("END:VCALENDAR\r\n"));
    assert!(body.contains("SUMMARY:Shoot A — CONFIRMED — Acme\r\n"));
    assert!(body.contains("SUMMARY:Shoot B — CANCELLED\r\n"));
    assert!(body.contains("STATUS:CANCELLED\r\n"));
    assert!(body.contains("URL:https://lens.example/projects/p1\r\n"));
    assert!(!body.contains("VALARM"));

    let d1 = body.find("UID:d1@project-lens").unwrap();
    let d2 = body.find("UID:d2@project-lens").unwrap();
    assert!(d1 < d2);
}

#[tokio::test]
async fn test_feed_query_parameters() {
    let response = server()
        .get("/api/ics")
        .add_query_param("calname", "My shoots")
        .add_query_param("alarm", "15")
        .add_query_param("past", "include")
        .add_query_param("sinceDays", "3")
        .await;
    let body = response.text();

    assert!(body.contains("X-WR-CALNAME:My shoots\r\n"));
    assert_eq!(body.matches("TRIGGER;RELATED=START:-PT900S").count(), 2);
}

#[tokio::test]
async fn test_feed_with_token_is_owner_scoped() {
    let response = server()
        .get("/api/ics")
        .add_query_param("token", "tok-1")
        .await;
    let body = response.text();

    assert!(body.contains("UID:d1@project-lens"));
    assert!(!body.contains("UID:d2@project-lens"));
    assert!(body.contains("TRIGGER;RELATED=START:-PT1200S"));
}

#[tokio::test]
async fn test_feed_bad_parameters_still_serve_feed() {
    let response = server()
        .get("/api/ics")
        .add_query_param("alarm", "soon")
        .add_query_param("sinceDays", "many")
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("BEGIN:VEVENT"));
    assert!(!body.contains("VALARM"));
}

#[tokio::test]
async fn test_feed_store_failure_is_fail_soft() {
    let response = server_with(Arc::new(MockStore::failing()))
        .get("/api/ics")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type"),
        "text/calendar; charset=utf-8"
    );
    let body = response.text();
    assert!(body.contains("X-ERROR:Store responded with 500: connection refused\r\n"));
    assert!(!body.contains("BEGIN:VEVENT"));
}

#[tokio::test]
async fn test_feed_unknown_token_serves_public_feed() {
    let response = server()
        .get("/api/ics")
        .add_query_param("token", "stolen")
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(!body.contains("X-ERROR"));
    assert!(body.contains("UID:d1@project-lens"));
    assert!(body.contains("UID:d2@project-lens"));
    assert_eq!(body.matches("TRIGGER;RELATED=START:-PT900S").count(), 2);
}

#[tokio::test]
async fn test_feed_huge_lookback_still_serves_feed() {
    let response = server()
        .get("/api/ics")
        .add_query_param("past", "include")
        .add_query_param("sinceDays", "100000000")
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("BEGIN:VEVENT"));
    assert!(!body.contains("X-ERROR"));
}

#[tokio::test]
async fn test_feed_huge_alarm_is_capped() {
    let response = server()
        .get("/api/ics")
        .add_query_param("alarm", "1e17")
        .await;

    response.assert_status_ok();
    let body = response.text();
    assert_eq!(body.matches("TRIGGER;RELATED=START:-PT2419200S").count(), 2);
}

#[tokio::test]
async fn test_feed_without_store_config() {
    let response = server_with(Arc::new(UnconfiguredStore)).get("/api/ics").await;

    response.assert_status_ok();
    assert!(response.text().contains("X-ERROR:Store is not configured"));
}

#[tokio::test]
async fn test_subscription_links_and_preview() {
    let response = server()
        .get("/api/ics/subscription")
        .add_query_param("alarm", "15")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["https_url"], "https://lens.example/api/ics?alarm=15");
    assert_eq!(json["webcal_url"], "webcal://lens.example/api/ics?alarm=15");
    assert_eq!(json["alarm_minutes"], 15);

    let upcoming = json["upcoming"].as_array().unwrap();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0]["title"], "Shoot A");
    assert_eq!(upcoming[0]["client"], "Acme");
    assert_eq!(upcoming[0]["status"], "CONFIRMED");
    assert!(upcoming[0]["reminder_at"].is_string());
}

#[tokio::test]
async fn test_subscription_unknown_token_previews_public_feed() {
    let response = server()
        .get("/api/ics/subscription")
        .add_query_param("token", "stolen")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["https_url"], "https://lens.example/api/ics?token=stolen");
    assert_eq!(json["alarm_minutes"], 15);
    assert_eq!(json["upcoming"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_subscription_huge_alarm_is_capped() {
    let response = server()
        .get("/api/ics/subscription")
        .add_query_param("alarm", "1e17")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["alarm_minutes"], 40_320);
    assert_eq!(json["https_url"], "https://lens.example/api/ics?alarm=40320");
    assert!(json["upcoming"][0]["reminder_at"].is_string());
}

#[tokio::test]
async fn test_debug_reports_sample() {
    let response = server().get("/api/ics-debug").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["counts"]["future_dates"], 2);
    assert_eq!(json["counts"]["projects"], 2);
    assert!(json["error"].is_null());
    assert_eq!(json["store"]["configured"], false);
}

#[tokio::test]
async fn test_debug_reports_error() {
    let response = server_with(Arc::new(MockStore::failing()))
        .get("/api/ics-debug")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["counts"]["future_dates"], 0);
    assert_eq!(json["error"], "Store responded with 500: connection refused");
}

#[tokio::test]
async fn test_debug_keeps_dates_when_projects_fail() {
    let store = MockStore {
        projects_fail: true,
        ..MockStore::healthy()
    };
    let response = server_with(Arc::new(store)).get("/api/ics-debug").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["counts"]["future_dates"], 2);
    assert_eq!(json["counts"]["projects"], 0);
    assert_eq!(json["error"], "Could not decode store response: projects: bad json");
}

#[tokio::test]
async fn test_health() {
    let response = server().get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "ok");
}
