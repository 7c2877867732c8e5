//! Gemini client and service against a mock server.

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use axis_chat::{
    ChatWidget, ConversationService, Content, Error, Gemini, GeminiService,
    GenerateContentRequest, GenerationConfig, KnownModel, Model, Persona, WidgetConfig,
};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";
const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash";

fn client(server: &MockServer) -> Gemini {
    Gemini::with_options(
        Some("test-key".to_string()),
        Some(format!("{}/v1beta", server.uri())),
        Some(Duration::from_secs(5)),
    )
    .unwrap()
}

fn service(server: &MockServer) -> GeminiService {
    GeminiService::new(client(server), Model::Known(KnownModel::Gemini25Flash))
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16}
    }))
}

fn model_info() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "name": "models/gemini-2.5-flash",
        "displayName": "Gemini 2.5 Flash",
        "supportedGenerationMethods": ["generateContent", "countTokens"]
    }))
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == GENERATE_PATH)
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}

#[tokio::test]
async fn generate_content_sends_key_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Hello"}]}]
        })))
        .respond_with(reply("Hi there!"))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateContentRequest::new(vec![Content::user("Hello")]);
    let response = client(&server)
        .generate_content(&Model::default(), &request)
        .await
        .unwrap();
    assert_eq!(response.text().unwrap(), "Hi there!");
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 16);
}

#[tokio::test]
async fn status_codes_map_to_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "Invalid JSON payload", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after", "7"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {"code": 409, "message": "conflict", "status": "ABORTED"}
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let request = GenerateContentRequest::new(vec![Content::user("Hello")]);

    let err = client
        .generate_content(&Model::default(), &request)
        .await
        .unwrap_err();
    assert!(err.is_bad_request());
    assert!(err.to_string().contains("Invalid JSON payload"));

    let err = client
        .generate_content(&KnownModel::Gemini25Pro.into(), &request)
        .await
        .unwrap_err();
    assert!(err.is_service_unavailable());
    assert!(matches!(
        err,
        Error::ServiceUnavailable {
            retry_after: Some(7),
            ..
        }
    ));

    let err = client
        .generate_content(&KnownModel::Gemini20Flash.into(), &request)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(409));
    assert!(matches!(err, Error::Api { status: Some(ref s), .. } if s == "ABORTED"));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let request = GenerateContentRequest::new(vec![Content::user("Hello")]);
    let err = client(&server)
        .generate_content(&Model::default(), &request)
        .await
        .unwrap_err();
    assert!(err.is_invalid_response());
}

#[tokio::test]
async fn session_replays_history_and_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(model_info())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(reply("We build websites."))
        .expect(2)
        .mount(&server)
        .await;

    let service = service(&server)
        .with_generation_config(GenerationConfig::default().with_max_output_tokens(Some(64)));
    let mut session = service.create_session("You are Axis AI.").await.unwrap();
    service.send_turn(&mut session, "Hi").await.unwrap();
    service
        .send_turn(&mut session, "What do you do?")
        .await
        .unwrap();
    assert_eq!(session.history_len(), 4);

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(
        bodies[0]["systemInstruction"],
        json!({"parts": [{"text": "You are Axis AI."}]})
    );
    assert_eq!(bodies[0]["generationConfig"], json!({"maxOutputTokens": 64}));
    assert_eq!(
        bodies[1]["contents"],
        json!([
            {"role": "user", "parts": [{"text": "Hi"}]},
            {"role": "model", "parts": [{"text": "We build websites."}]},
            {"role": "user", "parts": [{"text": "What do you do?"}]}
        ])
    );
}

#[tokio::test]
async fn failed_turn_is_not_replayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "first"}]}]
        })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "second"}]}]
        })))
        .respond_with(reply("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let service = service(&server).with_verify_model(false);
    let mut session = service.create_session("").await.unwrap();
    let err = service.send_turn(&mut session, "first").await.unwrap_err();
    assert!(err.is_server_error());
    assert_eq!(session.history_len(), 0);

    service.send_turn(&mut session, "second").await.unwrap();
    assert_eq!(session.history_len(), 2);
    let bodies = request_bodies(&server).await;
    assert_eq!(bodies[1]["contents"].as_array().unwrap().len(), 1);
    assert!(bodies[1].get("systemInstruction").is_none());
}

#[tokio::test]
async fn unreachable_model_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "model not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let err = service(&server).create_session("preamble").await.unwrap_err();
    assert!(err.is_service_unavailable());
    assert!(err.to_string().contains("model not found"));
}

#[tokio::test]
async fn blocked_prompt_becomes_apology() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(model_info())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let mut widget = ChatWidget::connect(service(&server), WidgetConfig::new())
        .await
        .unwrap();
    assert!(widget.is_available());
    let turn = widget.send_message("Hello").await.unwrap();
    assert_eq!(turn.text(), Persona::default().apology);
    assert_eq!(widget.stats().apologies, 1);
}

#[tokio::test]
async fn widget_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(model_info())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(reply("We offer web design, AI automation..."))
        .mount(&server)
        .await;

    let mut widget = ChatWidget::connect(service(&server), WidgetConfig::new())
        .await
        .unwrap();
    let exchange = widget.submit_message("What services do you offer?").unwrap();
    assert_eq!(widget.transcript().len(), 2);
    assert!(widget.is_pending());

    let completion = exchange.resolve().await;
    widget.complete(completion).unwrap();
    assert_eq!(widget.transcript().len(), 3);
    assert_eq!(
        widget.transcript()[2].text(),
        "We offer web design, AI automation..."
    );
    assert!(!widget.is_pending());

    let bodies = request_bodies(&server).await;
    assert!(
        bodies[0]["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("You are Axis AI")
    );
}

#[tokio::test]
async fn widget_degraded_when_server_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut widget = ChatWidget::connect(service(&server), WidgetConfig::new())
        .await
        .unwrap();
    assert!(!widget.is_available());
    assert_eq!(widget.transcript().len(), 1);
    assert!(widget.submit_message("Hello").unwrap_err().is_service_unavailable());
    assert!(widget.reconnect().await.is_err());
    assert!(!widget.is_available());
}
