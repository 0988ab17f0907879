//! Integration tests for `HomieClient` against a mocked backend.

use std::io::Write;
use std::time::{Duration, Instant};

use serde_json::json;
use shared::intake::{AnalysisRequest, ImageFile};
use shared::models::{FeedbackSubmission, FeedbackType};
use shared::{Config, Error, HomieClient};
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HomieClient {
    HomieClient::new(&Config::default().with_api_url(server.uri())).unwrap()
}

fn analysis_body(ticket_id: i64) -> serde_json::Value {
    json!({
        "ticketId": ticket_id,
        "materials": [
            { "name": "Silicone caulk", "spec": "100% silicone", "qty": "1 tube",
              "alt": ["Siliconized acrylic"], "store_price": "$8.98", "store_name": "Home Depot" }
        ],
        "tools": [{ "name": "Caulk gun", "purpose": "Apply caulk" }],
        "steps": ["Remove old caulk", "Clean surface", "Apply new bead"],
        "likelihood": { "caulk_failure": 0.8, "water_damage": 0.2 },
        "safety": ["Ventilate the room"]
    })
}

#[tokio::test]
async fn test_analyze_posts_multipart_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_string_contains("Caulk around tub is peeling"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(42)))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .analyze(&AnalysisRequest::new("  Caulk around tub is peeling ", None))
        .await
        .unwrap();

    assert_eq!(response.ticket_id, 42);
    assert_eq!(response.result.materials[0].alt, vec!["Siliconized acrylic"]);
    assert_eq!(response.result.steps.len(), 3);
}

#[tokio::test]
async fn test_analyze_uses_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Model overloaded" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&AnalysisRequest::new("Leaky faucet", None))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.user_message(), "Model overloaded");
}

#[tokio::test]
async fn test_analyze_falls_back_without_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&AnalysisRequest::new("Leaky faucet", None))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Analysis failed");
}

#[tokio::test]
async fn test_analyze_rejects_empty_request_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(1)))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze(&AnalysisRequest::new("   ", None))
        .await
        .unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    let config = Config::default().with_api_url("http://127.0.0.1:1");
    let client = HomieClient::new(&config).unwrap();

    let err = client.tickets().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert_eq!(err.user_message(), "Network error. Please try again.");
}

#[tokio::test]
async fn test_not_helpful_feedback_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/feedback"))
        .and(body_json(json!({
            "ticketId": 42,
            "feedbackType": "not-helpful",
            "feedbackText": "missing a step",
            "userEmail": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .submit_feedback(&FeedbackSubmission {
            ticket_id: 42,
            feedback_type: FeedbackType::NotHelpful,
            feedback_text: Some("missing a step".to_string()),
            user_email: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_feedback_failure_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/feedback"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .submit_feedback(&FeedbackSubmission {
            ticket_id: 1,
            feedback_type: FeedbackType::Helpful,
            feedback_text: None,
            user_email: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Failed to submit feedback. Please try again.");
}

#[tokio::test]
async fn test_generate_questions_without_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-questions"))
        .and(body_json(json!({ "description": "Ceiling fan wobbles" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let set = client_for(&server)
        .generate_questions("Ceiling fan wobbles")
        .await
        .unwrap();

    assert!(set.is_none());
}

#[tokio::test]
async fn test_ask_followup_sends_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/followup-question"))
        .and(body_json(json!({
            "originalAnalysis": "Project: Home improvement project",
            "question": "Can I use acrylic?"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer": "Yes, indoors." })),
        )
        .mount(&server)
        .await;

    let answer = client_for(&server)
        .ask_followup("Project: Home improvement project", "Can I use acrylic?")
        .await
        .unwrap();

    assert_eq!(answer, "Yes, indoors.");
}

#[tokio::test]
async fn test_recent_tickets_newest_first_and_capped() {
    let server = MockServer::start().await;
    let tickets: Vec<serde_json::Value> = (1..=25)
        .map(|id| {
            json!({
                "id": id,
                "created_at": format!("2025-01-{:02}T10:00:00Z", id),
                "status": "completed",
                "user_email": null,
                "description": format!("Project {}", id),
                "latest_analysis": null
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tickets))
        .mount(&server)
        .await;

    let recent = client_for(&server).recent_tickets(20).await.unwrap();

    assert_eq!(recent.len(), 20);
    assert_eq!(recent[0].id, 25);
    assert_eq!(recent[19].id, 6);
}

#[tokio::test]
async fn test_broken_images_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/img/ok.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/img/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ok = format!("{}/img/ok.jpg", server.uri());
    let missing = format!("{}/img/missing.jpg", server.uri());
    let broken = client_for(&server)
        .broken_images(&[ok.clone(), missing.clone()])
        .await;

    assert!(broken.contains(&missing));
    assert!(!broken.contains(&ok));
}

#[tokio::test]
async fn test_image_checks_run_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(700)))
        .expect(6)
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..6)
        .map(|i| format!("{}/img/{}.jpg", server.uri(), i))
        .collect();
    let started = Instant::now();
    let broken = client_for(&server).broken_images(&urls).await;
    let elapsed = started.elapsed();

    assert!(broken.is_empty());
    assert!(elapsed < Duration::from_millis(2000), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_slow_image_counts_as_broken() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/img/slow.jpg"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let slow = format!("{}/img/slow.jpg", server.uri());
    let client = client_for(&server).with_probe_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let broken = client.broken_images(&[slow.clone()]).await;

    assert!(broken.contains(&slow));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_analyze_sends_image_part() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(body_string_contains("name=\"image\""))
        .and(body_string_contains("filename=\"tub.png\""))
        .and(body_string_contains("Content-Type: image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body(9)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tub.png");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"fake png bytes").unwrap();
    drop(file);

    let image = ImageFile::load(&path).await.unwrap();
    assert_eq!(image.mime_type, "image/png");

    let response = client_for(&server)
        .analyze(&AnalysisRequest::new("", Some(image)))
        .await
        .unwrap();

    assert_eq!(response.ticket_id, 9);
}
