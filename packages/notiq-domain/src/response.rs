//! Result shapes returned by the completion model, and their best-effort decoding.
//!
//! Every shape defaults each field, so partial answers decode and a failed decode can fall back
//! to `Default::default()`.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResult {
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainResult {
	pub explanation: String,
	pub complexity: String,
	pub concepts: Vec<String>,
	pub suggestions: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefactorResult {
	pub refactored: String,
	pub improvements: Vec<String>,
	pub reasoning: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitResult {
	pub message: String,
	#[serde(rename = "type")]
	pub commit_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<String>,
	pub breaking: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorInsightResult {
	pub explanation: String,
	pub detected_language: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub detected_framework: Option<String>,
	pub possible_causes: Vec<String>,
	pub solutions: Vec<Solution>,
	pub related_docs: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solution {
	pub title: String,
	pub steps: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
}

/// Decodes model output into `T`, tolerating a surrounding markdown code fence.
pub fn decode<T>(raw: &str) -> serde_json::Result<T>
where
	T: DeserializeOwned,
{
	serde_json::from_str(strip_code_fence(raw))
}

/// Tags arrive either as `{"tags": [...]}` or as a bare array. Anything else is an error.
pub fn decode_tags(raw: &str) -> serde_json::Result<TagResult> {
	let value: Value = decode(raw)?;
	let items = match value {
		Value::Array(items) => items,
		Value::Object(mut object) => match object.remove("tags") {
			Some(Value::Array(items)) => items,
			Some(Value::Null) | None => Vec::new(),
			Some(other) => {
				return Err(serde::de::Error::custom(format!(
					"tags must be an array, got {other}"
				)));
			},
		},
		other => {
			return Err(serde::de::Error::custom(format!(
				"expected a tags object or array, got {other}"
			)));
		},
	};
	let tags = items.into_iter().filter_map(|item| item.as_str().map(str::to_string)).collect();

	Ok(TagResult { tags: normalize_tags(tags) })
}

/// Trims tags, drops blanks, and removes duplicates keeping the first occurrence.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(tags.len());

	for tag in tags {
		let trimmed = tag.trim();

		if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
			continue;
		}

		out.push(trimmed.to_string());
	}

	out
}

fn strip_code_fence(raw: &str) -> &str {
	let trimmed = raw.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	// Skip the info string, e.g. "json".
	let Some((_, body)) = rest.split_once('\n') else {
		return trimmed;
	};

	body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
