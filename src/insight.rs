//! Natural-language questions about the KPI report, answered by a hosted
//! completion API.
//!
//! One call to [`InsightClient::ask`] is one POST. There is no retry, no
//! timeout and no streaming; a failure is returned to the caller as is.

use crate::error::InsightError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

pub const MISSING_QUERY: &str = "Please enter both an API key and a query";
pub const MISSING_DATA: &str = "Please upload all three CSV files first";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
    /// Company named in the prompt framing, if any.
    pub organization: Option<String>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            api_version: DEFAULT_API_VERSION.to_string(),
            organization: None,
        }
    }
}

/// A question that passed input checks and may go over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightRequest<'a> {
    pub credential: &'a str,
    pub question: &'a str,
    pub report: &'a str,
}

impl<'a> InsightRequest<'a> {
    pub fn validate(
        credential: &'a str,
        question: &'a str,
        report: Option<&'a str>,
    ) -> Result<Self, InsightError> {
        if question.trim().is_empty() || credential.trim().is_empty() {
            return Err(InsightError::MissingInput(MISSING_QUERY.to_string()));
        }
        match report {
            Some(report) if !report.is_empty() => Ok(Self { credential, question, report }),
            _ => Err(InsightError::MissingInput(MISSING_DATA.to_string())),
        }
    }
}

pub fn compose_prompt(config: &InsightConfig, report: &str, question: &str) -> String {
    let subject = match config.organization.as_deref().map(str::trim) {
        Some(org) if !org.is_empty() => format!("a complete supply chain dataset for {org}"),
        _ => "a complete supply chain dataset".to_string(),
    };
    format!(
        "You are analyzing {subject} with Inbound (vendor deliveries), Outbound (customer orders), and Inventory (product catalog) data. \n\
         \n\
         Based on this comprehensive supply chain data summary, please answer the question with specific insights and actionable recommendations:\n\
         \n\
         {report}\n\
         \n\
         Question: {question}\n\
         \n\
         Provide a detailed answer with specific numbers and insights from the data. Format your response with clear headers using ## for main sections, and use bullet points where appropriate."
    )
}

pub fn request_body(config: &InsightConfig, prompt: &str) -> Value {
    json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "messages": [
            { "role": "user", "content": prompt }
        ]
    })
}

/// Pulls the answer text out of a provider response envelope.
///
/// An envelope wrapped by a CORS proxy (`{"contents": "<json string>"}`) is
/// unwrapped first.
pub fn extract_answer(envelope: Value) -> Result<String, InsightError> {
    let envelope = match envelope.get("contents") {
        Some(Value::String(inner)) if !inner.is_empty() => serde_json::from_str::<Value>(inner)
            .map_err(|e| InsightError::Transport(e.to_string()))?,
        _ => envelope,
    };

    if let Some(err) = envelope.get("error").filter(|e| truthy(e)) {
        let message = match err.get("message").filter(|m| truthy(m)) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => err.to_string(),
        };
        return Err(InsightError::Provider(message));
    }

    match envelope.pointer("/content/0/text") {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        _ => Err(InsightError::UnexpectedFormat(envelope.to_string())),
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Sends one JSON POST and returns the parsed response body, whatever its status.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> Result<Value, InsightError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> Result<Value, InsightError> {
        let mut req = self.client.post(url);
        for (name, value) in headers {
            req = req.header(*name, value.as_str());
        }
        let response = req
            .json(body)
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;
        tracing::debug!(%status, bytes = text.len(), "completion response received");
        serde_json::from_str(&text).map_err(|e| InsightError::Transport(e.to_string()))
    }
}

pub struct InsightClient<T = HttpTransport> {
    config: InsightConfig,
    transport: T,
}

impl InsightClient<HttpTransport> {
    pub fn new(config: InsightConfig) -> Self {
        Self { config, transport: HttpTransport::new() }
    }
}

impl<T: CompletionTransport> InsightClient<T> {
    pub fn with_transport(config: InsightConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates inputs, then issues exactly one request. Validation failures never reach the network.
    pub async fn ask(
        &self,
        credential: &str,
        question: &str,
        report: Option<&str>,
    ) -> Result<String, InsightError> {
        let req = InsightRequest::validate(credential, question, report)?;
        let prompt = compose_prompt(&self.config, req.report, req.question);
        let body = request_body(&self.config, &prompt);
        let headers = [
            ("content-type", "application/json".to_string()),
            ("x-api-key", req.credential.to_string()),
            ("anthropic-version", self.config.api_version.clone()),
        ];

        tracing::info!(model = %self.config.model, prompt_chars = prompt.len(), "sending insight query");
        let envelope = self.transport.post_json(&self.config.endpoint, &headers, &body).await?;
        let answer = extract_answer(envelope);
        if let Err(InsightError::Provider(msg)) = &answer {
            tracing::warn!(error = %msg, "provider returned an error");
        }
        answer
    }
}
