use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Runs a chat completion and returns the JSON object the model produced.
pub async fn infer(cfg: &digest_config::LlmProviderConfig, messages: &[Value]) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	for attempt in 1..=cfg.max_attempts {
		let body = serde_json::json!({
			"model": cfg.model,
			"temperature": cfg.temperature,
			"messages": messages,
		});
		let res = client
			.post(&url)
			.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
			.json(&body)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		match parse_reasoning_json(json) {
			Ok(parsed) => return Ok(parsed),
			Err(err) => {
				tracing::debug!(attempt, error = %err, "Reasoning response is not usable JSON.");
			},
		}
	}

	Err(Error::InvalidResponse { message: "Reasoning response is not valid JSON.".to_string() })
}

fn parse_reasoning_json(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		return extract_json_object(content).ok_or_else(|| Error::InvalidResponse {
			message: "Reasoning content does not contain a JSON object.".to_string(),
		});
	}

	if json.is_object() && json.get("choices").is_none() {
		return Ok(json);
	}

	Err(Error::InvalidResponse { message: "Reasoning response is missing JSON content.".to_string() })
}

/// Accepts bare JSON, a fenced code block, or an object embedded in surrounding prose.
pub fn extract_json_object(content: &str) -> Option<Value> {
	let fenced = fenced_block(content).unwrap_or(content);

	if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(fenced.trim()) {
		return Some(value);
	}

	let start = content.find('{')?;
	let end = content.rfind('}')?;

	if end <= start {
		return None;
	}

	match serde_json::from_str::<Value>(&content[start..=end]) {
		Ok(value @ Value::Object(_)) => Some(value),
		_ => None,
	}
}

fn fenced_block(content: &str) -> Option<&str> {
	let (_, rest) = content.split_once("```json").or_else(|| content.split_once("```"))?;
	let (block, _) = rest.split_once("```")?;

	Some(block)
}
