use async_trait::async_trait;
use chainscope::insight::{
    compose_prompt, extract_answer, request_body, CompletionTransport, InsightClient, InsightConfig,
    InsightRequest, MISSING_DATA, MISSING_QUERY,
};
use chainscope::InsightError;
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct SentRequest {
    url: String,
    headers: Vec<(String, String)>,
    body: Value,
}

struct FakeTransport {
    reply: Mutex<Option<Result<Value, InsightError>>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl FakeTransport {
    fn replying(reply: Result<Value, InsightError>) -> Self {
        Self { reply: Mutex::new(Some(reply)), sent: Mutex::new(Vec::new()) }
    }

    fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionTransport for FakeTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
        body: &Value,
    ) -> Result<Value, InsightError> {
        self.sent.lock().unwrap().push(SentRequest {
            url: url.to_string(),
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            body: body.clone(),
        });
        self.reply
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(InsightError::Transport("no reply queued".into())))
    }
}

fn ok_envelope(text: &str) -> Value {
    json!({
        "id": "msg_1",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }]
    })
}

#[test]
fn validation_requires_question_and_credential() {
    let err = InsightRequest::validate("", "why?", Some("report")).unwrap_err();
    assert_eq!(err.to_string(), MISSING_QUERY);
    let err = InsightRequest::validate("sk-test", "   ", Some("report")).unwrap_err();
    assert_eq!(err.to_string(), MISSING_QUERY);
    // credential/question are checked before the report
    let err = InsightRequest::validate(" ", "", None).unwrap_err();
    assert_eq!(err.to_string(), MISSING_QUERY);
}

#[test]
fn validation_requires_report() {
    let err = InsightRequest::validate("sk-test", "why?", None).unwrap_err();
    assert!(matches!(err, InsightError::MissingInput(ref m) if m == MISSING_DATA));
    let ok = InsightRequest::validate("sk-test", "why?", Some("R")).unwrap();
    assert_eq!(ok.report, "R");
}

#[test]
fn prompt_embeds_report_and_question() {
    let cfg = InsightConfig::default();
    let prompt = compose_prompt(&cfg, "REPORT BODY", "Which vendor is worst?");
    assert!(prompt.starts_with("You are analyzing a complete supply chain dataset with Inbound"));
    assert!(prompt.contains("\n\nREPORT BODY\n\nQuestion: Which vendor is worst?\n\n"));
    assert!(prompt.contains("clear headers using ## for main sections"));
    assert!(prompt.contains("bullet points"));
    let report_at = prompt.find("REPORT BODY").unwrap();
    let question_at = prompt.find("Question:").unwrap();
    assert!(report_at < question_at);
}

#[test]
fn prompt_names_organization_when_configured() {
    let cfg = InsightConfig { organization: Some("Northwind".into()), ..Default::default() };
    let prompt = compose_prompt(&cfg, "R", "Q");
    assert!(prompt.starts_with("You are analyzing a complete supply chain dataset for Northwind with"));
}

#[test]
fn body_carries_model_and_token_budget() {
    let cfg = InsightConfig::default();
    let body = request_body(&cfg, "hello");
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["max_tokens"], 1500);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "hello");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[test]
fn extracts_first_content_text() {
    let answer = extract_answer(ok_envelope("## Summary\n- fine")).unwrap();
    assert_eq!(answer, "## Summary\n- fine");
}

#[test]
fn provider_error_message_is_surfaced() {
    let env = json!({"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}});
    let err = extract_answer(env).unwrap_err();
    assert!(matches!(err, InsightError::Provider(ref m) if m == "invalid x-api-key"));
    assert_eq!(err.to_string(), "API Error: invalid x-api-key");
}

#[test]
fn provider_error_without_message_is_serialized() {
    let env = json!({"error": {"type": "overloaded_error"}});
    let err = extract_answer(env).unwrap_err();
    assert_eq!(err.to_string(), r#"API Error: {"type":"overloaded_error"}"#);
}

#[test]
fn proxy_wrapped_envelope_is_unwrapped() {
    let inner = ok_envelope("wrapped answer").to_string();
    let env = json!({ "contents": inner, "status": {"http_code": 200} });
    assert_eq!(extract_answer(env).unwrap(), "wrapped answer");

    let bad = json!({ "contents": "not json" });
    assert!(matches!(extract_answer(bad), Err(InsightError::Transport(_))));
}

#[test]
fn unexpected_shape_is_reported_with_payload() {
    let err = extract_answer(json!({"content": []})).unwrap_err();
    assert_eq!(err.to_string(), r#"Unexpected response format: {"content":[]}"#);
    let err = extract_answer(json!({"content": [{"type": "text", "text": ""}]})).unwrap_err();
    assert!(matches!(err, InsightError::UnexpectedFormat(_)));
}

#[tokio::test]
async fn ask_sends_exactly_one_request() {
    let cfg = InsightConfig { endpoint: "http://localhost:9/v1/messages".into(), ..Default::default() };
    let client = InsightClient::with_transport(cfg, FakeTransport::replying(Ok(ok_envelope("answer"))));
    let answer = client.ask("sk-test", "What is late?", Some("THE REPORT")).await.unwrap();
    assert_eq!(answer, "answer");

    let sent = client.transport().sent();
    assert_eq!(sent.len(), 1);
    let req = &sent[0];
    assert_eq!(req.url, "http://localhost:9/v1/messages");
    assert!(req.headers.contains(&("x-api-key".to_string(), "sk-test".to_string())));
    assert!(req.headers.contains(&("anthropic-version".to_string(), "2023-06-01".to_string())));
    assert!(req.headers.contains(&("content-type".to_string(), "application/json".to_string())));
    let content = req.body["messages"][0]["content"].as_str().unwrap();
    assert!(content.contains("THE REPORT"));
    assert!(content.contains("Question: What is late?"));
}

#[tokio::test]
async fn ask_without_inputs_does_no_io() {
    let client = InsightClient::with_transport(
        InsightConfig::default(),
        FakeTransport::replying(Ok(ok_envelope("never"))),
    );
    assert!(matches!(client.ask("", "q", Some("r")).await, Err(InsightError::MissingInput(_))));
    assert!(matches!(client.ask("k", "", Some("r")).await, Err(InsightError::MissingInput(_))));
    assert!(matches!(client.ask("k", "q", None).await, Err(InsightError::MissingInput(_))));
    assert!(client.transport().sent().is_empty());
}

#[tokio::test]
async fn transport_failure_is_not_retried() {
    let client = InsightClient::with_transport(
        InsightConfig::default(),
        FakeTransport::replying(Err(InsightError::Transport("connection refused".into()))),
    );
    let err = client.ask("k", "q", Some("r")).await.unwrap_err();
    assert_eq!(err.to_string(), "Error: connection refused");
    assert_eq!(client.transport().sent().len(), 1);
}

#[tokio::test]
async fn provider_error_from_ask() {
    let env = json!({"error": {"message": "rate limited"}});
    let client = InsightClient::with_transport(InsightConfig::default(), FakeTransport::replying(Ok(env)));
    let err = client.ask("k", "q", Some("r")).await.unwrap_err();
    assert_eq!(err.to_string(), "API Error: rate limited");
}
