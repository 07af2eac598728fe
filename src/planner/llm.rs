//! Shot generation through an OpenAI-compatible chat completions API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{AppError, Result};
use crate::planner::traits::{PlanRequest, Shot, ShotGenerator};

const SYSTEM_PROMPT: &str = "You are a cinematographer planning storyboards. \
Reply with JSON only: an array of shot objects, no prose and no markdown.";

/// Chat completions client that asks the model for a shot list
pub struct LlmShotGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Models answer either with a bare array or wrapped in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ShotList {
    Bare(Vec<Shot>),
    Wrapped { shots: Vec<Shot> },
}

impl LlmShotGenerator {
    /// Create a new generator from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            temperature: config.temperature,
        })
    }

    fn user_prompt(request: &PlanRequest) -> String {
        let captions = if request.captions.is_empty() {
            "none".to_string()
        } else {
            request
                .captions
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}. {}", i + 1, c))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "Creative brief:\n{prompt}\n\n\
             Reference frames:\n{captions}\n\n\
             Plan exactly {count} shots. Write titles and notes in language \"{language}\".\n\
             Each shot object has: id (integer, 1-based, sequential), title (string), \
             framing (one of WS, MS, CU, ECU), camera_angle (string), movement (string), \
             lens (focal length such as 35mm), duration_sec (positive number), notes (string).",
            prompt = request.prompt,
            captions = captions,
            count = request.shot_count,
            language = request.language,
        )
    }
}

/// Parse the model's reply into shots, tolerating markdown code fences
pub fn parse_shot_list(content: &str) -> Result<Vec<Shot>> {
    let json_text = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let shots = match serde_json::from_str::<ShotList>(json_text)
        .map_err(|e| AppError::Generation(format!("Unparseable shot list: {}", e)))?
    {
        ShotList::Bare(shots) => shots,
        ShotList::Wrapped { shots } => shots,
    };

    if shots.is_empty() {
        return Err(AppError::Generation("Model returned no shots".to_string()));
    }

    Ok(shots)
}

#[async_trait]
impl ShotGenerator for LlmShotGenerator {
    fn name(&self) -> &str {
        "llm"
    }

    async fn generate(&self, request: &PlanRequest) -> Result<Vec<Shot>> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!(url = %url, model = %self.model, shots = request.shot_count, "Requesting shot plan");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_prompt(request),
                },
            ],
            temperature: self.temperature,
        };

        let mut call = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(format!("Text generation timed out: {}", e))
            } else {
                AppError::HttpClient(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!(
                "Text generation returned {}: {}",
                status, text
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to parse response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::Generation("Response had no message content".to_string()))?;

        parse_shot_list(&content)
    }
}
