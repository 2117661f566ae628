use serde_json::Value;

use crate::Result;

/// Sends one chat completion request and returns the first choice's text.
///
/// A response without choices or content yields an empty string. There is no retry: callers
/// see the upstream failure directly.
pub async fn complete(
	cfg: &notiq_config::ChatProviderConfig,
	messages: &[Value],
	json_object: bool,
) -> Result<String> {
	let client = crate::http_client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = request_body(cfg, messages, json_object);
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(first_choice_text(&json))
}

fn request_body(
	cfg: &notiq_config::ChatProviderConfig,
	messages: &[Value],
	json_object: bool,
) -> Value {
	let mut body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
	});

	if let Some(temperature) = cfg.temperature {
		body["temperature"] = serde_json::json!(temperature);
	}
	if json_object {
		body["response_format"] = serde_json::json!({ "type": "json_object" });
	}

	body
}

fn first_choice_text(json: &Value) -> String {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.unwrap_or_default()
		.to_string()
}

#[cfg(test)]
mod tests {
	use serde_json::Map;

	use super::*;

	fn cfg(temperature: Option<f32>) -> notiq_config::ChatProviderConfig {
		notiq_config::ChatProviderConfig {
			provider_id: "test".to_string(),
			api_base: "http://127.0.0.1:1".to_string(),
			api_key: "key".to_string(),
			path: "/chat/completions".to_string(),
			model: "m".to_string(),
			temperature,
			timeout_ms: 1_000,
			default_headers: Map::new(),
		}
	}

	#[test]
	fn reads_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"tags\": []}" } },
				{ "message": { "content": "ignored" } }
			]
		});

		assert_eq!(first_choice_text(&json), "{\"tags\": []}");
	}

	#[test]
	fn missing_content_is_empty() {
		assert_eq!(first_choice_text(&serde_json::json!({ "choices": [] })), "");
		assert_eq!(first_choice_text(&serde_json::json!({ "choices": [{ "message": {} }] })), "");
	}

	#[test]
	fn json_requests_carry_response_format() {
		let body = request_body(&cfg(Some(0.2)), &[], true);

		assert_eq!(body["response_format"]["type"], "json_object");
		assert!(body["temperature"].is_number());
	}

	#[test]
	fn text_requests_omit_optional_fields() {
		let body = request_body(&cfg(None), &[], false);

		assert!(body.get("response_format").is_none());
		assert!(body.get("temperature").is_none());
	}
}
