//! The `ScenarioParser` seam and its OpenAI-backed implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use testpilot_core_types::{Action, ActionType, Scenario};
use tracing::{debug, info, warn};

use crate::errors::ParseError;
use crate::prompt::{extract_json, SYSTEM_PROMPT};
use crate::rate_limit::RateLimiter;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Turns a natural-language instruction into a scenario.
#[async_trait]
pub trait ScenarioParser: Send + Sync {
    async fn parse(&self, instruction: &str) -> Result<Scenario, ParseError>;
}

/// Endpoint, model and credential for the chat-completions call.
#[derive(Debug, Clone)]
pub struct ParserSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
}

impl ParserSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// [`ScenarioParser`] over an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiParser {
    http: reqwest::Client,
    settings: ParserSettings,
    limiter: RateLimiter,
}

impl OpenAiParser {
    pub fn new(settings: ParserSettings) -> Result<Self, ParseError> {
        if settings.api_key.trim().is_empty() {
            return Err(ParseError::MissingCredential("api key"));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ParseError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            settings,
            limiter: RateLimiter::default(),
        })
    }

    async fn complete(&self, instruction: &str) -> Result<String, ParseError> {
        let request = ChatRequest {
            model: &self.settings.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: instruction,
                },
            ],
        };

        // The permit stays held for the whole round trip.
        let _permit = self.limiter.acquire().await;
        debug!(model = %self.settings.model, "requesting scenario translation");

        let response = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ParseError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(ParseError::RateLimited),
            status if !status.is_success() => {
                return Err(ParseError::Transport(format!(
                    "endpoint returned {status}"
                )));
            }
            _ => {}
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ParseError::Malformed("response carried no choices".to_string()))
    }
}

#[async_trait]
impl ScenarioParser for OpenAiParser {
    async fn parse(&self, instruction: &str) -> Result<Scenario, ParseError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(ParseError::NoActions);
        }

        let content = self.complete(instruction).await?;
        let actions = decode_actions(&content)?;
        info!(actions = actions.len(), "instruction parsed");

        Ok(Scenario::new(scenario_name(instruction), instruction).with_actions(actions))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

/// One entry of the model's action array, before validation.
#[derive(Debug, Deserialize)]
struct RawAction {
    action: String,
    #[serde(default)]
    target: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

/// Decode the model's reply into validated actions. Entries the engine does
/// not recognize, or that fail the action invariants, are skipped with a
/// warning; an empty usable set is `NoActions`.
fn decode_actions(content: &str) -> Result<Vec<Action>, ParseError> {
    let body = extract_json(content);
    let raw: Vec<RawAction> =
        serde_json::from_str(body).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let mut actions = Vec::with_capacity(raw.len());
    for entry in raw {
        let action_type = match entry.action.to_lowercase().as_str() {
            "navigate" => ActionType::Navigate,
            "click" => ActionType::Click,
            "type" => ActionType::Type,
            "wait_for_element" => ActionType::WaitForElement,
            "verify_text" => ActionType::VerifyText,
            "verify_url" => ActionType::VerifyUrl,
            other => {
                warn!(action = other, "skipping unrecognized action");
                continue;
            }
        };

        match Action::new(action_type, entry.target, entry.value) {
            Ok(action) => {
                let action = match entry.timeout_secs {
                    Some(secs) => action.with_timeout_secs(secs),
                    None => action,
                };
                actions.push(action);
            }
            Err(err) => warn!(error = %err, "skipping invalid action"),
        }
    }

    if actions.is_empty() {
        return Err(ParseError::NoActions);
    }
    Ok(actions)
}

/// A short scenario name from the leading words of the instruction.
fn scenario_name(instruction: &str) -> String {
    let mut name: String = instruction
        .split_whitespace()
        .take(6)
        .collect::<Vec<_>>()
        .join(" ");
    if instruction.split_whitespace().count() > 6 {
        name.push_str("...");
    }
    name
}
