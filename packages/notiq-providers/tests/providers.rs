use std::{
	future::IntoFuture,
	sync::{Arc, Mutex},
};

use axum::{
	Json, Router,
	extract::State,
	http::{HeaderMap, StatusCode},
	response::IntoResponse,
	routing,
};
use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use notiq_config::{ChatProviderConfig, EmbeddingProviderConfig};
use notiq_providers::{Error, completion, embedding};

#[derive(Clone, Default)]
struct Captured {
	bodies: Arc<Mutex<Vec<Value>>>,
	auth: Arc<Mutex<Vec<String>>>,
}

async fn start_server(app: Router) -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock server.");
	let addr = listener.local_addr().expect("Failed to read mock server address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, app).into_future().await;
	});

	format!("http://{addr}")
}

async fn chat_handler(
	State(captured): State<Captured>,
	headers: HeaderMap,
	Json(payload): Json<Value>,
) -> impl IntoResponse {
	let auth = headers
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_string();

	captured.auth.lock().expect("lock").push(auth);
	captured.bodies.lock().expect("lock").push(payload);

	Json(serde_json::json!({
		"choices": [{ "message": { "role": "assistant", "content": "{\"tags\": [\"rust\"]}" } }]
	}))
}

async fn embeddings_handler(Json(payload): Json<Value>) -> impl IntoResponse {
	let count = payload.get("input").and_then(Value::as_array).map(Vec::len).unwrap_or(0);
	let data: Vec<Value> = (0..count)
		.rev()
		.map(|index| serde_json::json!({ "index": index, "embedding": [index as f32, 0.5] }))
		.collect();

	Json(serde_json::json!({ "data": data }))
}

async fn failing_handler() -> impl IntoResponse {
	StatusCode::BAD_GATEWAY
}

fn chat_cfg(api_base: String) -> ChatProviderConfig {
	let mut default_headers = Map::new();

	default_headers.insert("X-Title".to_string(), Value::String("notiq".to_string()));

	ChatProviderConfig {
		provider_id: "mock".to_string(),
		api_base,
		api_key: "chat-secret".to_string(),
		path: "/chat/completions".to_string(),
		model: "mock-model".to_string(),
		temperature: None,
		timeout_ms: 5_000,
		default_headers,
	}
}

fn embedding_cfg(api_base: String) -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "mock".to_string(),
		api_base,
		api_key: "embed-secret".to_string(),
		path: "/embeddings".to_string(),
		model: "mock-embed".to_string(),
		dimensions: 2,
		timeout_ms: 5_000,
		default_headers: Map::new(),
	}
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		notiq_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn rejects_non_string_default_header() {
	let mut headers = Map::new();

	headers.insert("X-Retries".to_string(), Value::from(3));

	let err = notiq_providers::auth_headers("secret", &headers).expect_err("must reject");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn completion_posts_messages_and_returns_first_choice() {
	let captured = Captured::default();
	let app = Router::new()
		.route("/chat/completions", routing::post(chat_handler))
		.with_state(captured.clone());
	let base = start_server(app).await;
	let messages = vec![
		serde_json::json!({ "role": "system", "content": "tagger" }),
		serde_json::json!({ "role": "user", "content": "notes" }),
	];
	let text = completion::complete(&chat_cfg(base), &messages, true)
		.await
		.expect("Completion must succeed.");

	assert_eq!(text, "{\"tags\": [\"rust\"]}");

	let bodies = captured.bodies.lock().expect("lock");

	assert_eq!(bodies.len(), 1);
	assert_eq!(bodies[0]["model"], "mock-model");
	assert_eq!(bodies[0]["messages"][1]["content"], "notes");
	assert_eq!(bodies[0]["response_format"]["type"], "json_object");
	assert_eq!(captured.auth.lock().expect("lock")[0], "Bearer chat-secret");
}

#[tokio::test]
async fn completion_surfaces_upstream_failure_without_retry() {
	let app = Router::new().route("/chat/completions", routing::post(failing_handler));
	let base = start_server(app).await;
	let err = completion::complete(&chat_cfg(base), &[], false)
		.await
		.expect_err("A 502 must fail the call.");

	assert!(matches!(err, Error::Reqwest(_)));
}

#[tokio::test]
async fn embeddings_come_back_in_input_order() {
	let app = Router::new().route("/embeddings", routing::post(embeddings_handler));
	let base = start_server(app).await;
	let texts = vec!["first".to_string(), "second".to_string()];
	let vectors =
		embedding::embed(&embedding_cfg(base), &texts).await.expect("Embedding must succeed.");

	assert_eq!(vectors, vec![vec![0.0, 0.5], vec![1.0, 0.5]]);
}
