//! Functional tests for LLM-backed planning and its heuristic fallback

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storyboard_gateway::config::LlmConfig;
use storyboard_gateway::planner::{
    HeuristicPlanner, LlmShotGenerator, PlanRequest, Shot, ShotGenerator, ShotPlanner,
};
use storyboard_gateway::{AppError, Result};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plan_request(shot_count: u32) -> PlanRequest {
    PlanRequest {
        prompt: "dolly in on the hero, 45 degree angle".to_string(),
        captions: vec!["640x480 scene, central subject likely.".to_string()],
        shot_count,
        language: "en".to_string(),
    }
}

fn heuristic(request: &PlanRequest) -> Vec<Shot> {
    HeuristicPlanner::new().plan(&request.prompt, request.shot_count, &request.language)
}

fn llm_config(endpoint: &str) -> LlmConfig {
    LlmConfig {
        enabled: true,
        endpoint: endpoint.to_string(),
        model: "test-model".to_string(),
        api_key: Some("secret".to_string()),
        timeout_ms: 5000,
        temperature: 0.2,
    }
}

fn generated_shots(count: u32) -> serde_json::Value {
    let shots: Vec<_> = (1..=count)
        .map(|id| {
            json!({
                "id": id,
                "title": format!("Beat {}", id),
                "framing": "CU",
                "camera_angle": "low angle",
                "movement": "handheld",
                "lens": "50mm",
                "duration_sec": 2.0,
                "notes": "generated"
            })
        })
        .collect();
    json!(shots)
}

fn chat_reply(content: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

async fn planner_for(server: &MockServer, timeout: Duration) -> ShotPlanner {
    let generator = LlmShotGenerator::new(&llm_config(&server.uri())).unwrap();
    ShotPlanner::with_primary(Arc::new(generator), timeout)
}

#[tokio::test]
async fn test_generated_plan_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(chat_reply(generated_shots(3).to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let planner = planner_for(&server, Duration::from_secs(5)).await;
    let plan = planner.plan(&plan_request(3)).await;

    assert_eq!(plan.len(), 3);
    assert!(plan.iter().all(|s| s.notes == "generated"));
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let request = plan_request(3);
    let plan = planner_for(&server, Duration::from_secs(5)).await.plan(&request).await;

    assert_eq!(
        serde_json::to_vec(&plan).unwrap(),
        serde_json::to_vec(&heuristic(&request)).unwrap()
    );
}

#[tokio::test]
async fn test_empty_answer_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply("[]".to_string()))
        .mount(&server)
        .await;

    let request = plan_request(4);
    let plan = planner_for(&server, Duration::from_secs(5)).await.plan(&request).await;

    assert_eq!(plan, heuristic(&request));
}

#[tokio::test]
async fn test_wrong_length_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply(generated_shots(2).to_string()))
        .mount(&server)
        .await;

    let request = plan_request(5);
    let plan = planner_for(&server, Duration::from_secs(5)).await.plan(&request).await;

    assert_eq!(plan, heuristic(&request));
}

#[tokio::test]
async fn test_malformed_shot_falls_back() {
    let server = MockServer::start().await;
    let reply = json!([{ "id": 1, "title": "x", "framing": "overhead" }]).to_string();
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply(reply))
        .mount(&server)
        .await;

    let request = plan_request(1);
    let plan = planner_for(&server, Duration::from_secs(5)).await.plan(&request).await;

    assert_eq!(plan, heuristic(&request));
}

#[tokio::test]
async fn test_slow_answer_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(chat_reply(generated_shots(3).to_string()).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let request = plan_request(3);
    let plan = planner_for(&server, Duration::from_millis(200)).await.plan(&request).await;

    assert_eq!(plan, heuristic(&request));
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    // Nothing listens on the discard port
    let generator = LlmShotGenerator::new(&llm_config("http://127.0.0.1:9")).unwrap();
    let planner = ShotPlanner::with_primary(Arc::new(generator), Duration::from_secs(5));

    let request = plan_request(2);
    assert_eq!(planner.plan(&request).await, heuristic(&request));
}

struct FailingGenerator;

#[async_trait]
impl ShotGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _request: &PlanRequest) -> Result<Vec<Shot>> {
        Err(AppError::Generation("service unavailable".to_string()))
    }
}

struct EmptyGenerator;

#[async_trait]
impl ShotGenerator for EmptyGenerator {
    fn name(&self) -> &str {
        "empty"
    }

    async fn generate(&self, _request: &PlanRequest) -> Result<Vec<Shot>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_custom_generators_fall_back() {
    let request = plan_request(6);
    let expected = heuristic(&request);

    let failing = ShotPlanner::with_primary(Arc::new(FailingGenerator), Duration::from_secs(1));
    assert_eq!(failing.plan(&request).await, expected);

    let empty = ShotPlanner::with_primary(Arc::new(EmptyGenerator), Duration::from_secs(1));
    assert_eq!(empty.plan(&request).await, expected);
}
