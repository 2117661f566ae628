use time::macros::datetime;

use notiq_domain::{
	Error,
	prompt::{self, CommitStyle, Operation, OutputFormat},
	response::{self, ErrorInsightResult, ExplainResult},
	search_filter::SearchFilters,
};

fn tags(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn every_operation_rejects_missing_input() {
	let rejected = [
		prompt::summarize(None).err(),
		prompt::summarize(Some("   ")).err(),
		prompt::rewrite(None, Some("shorter")).err(),
		prompt::tag(None).err(),
		prompt::explain(None, Some("rust"), None).err(),
		prompt::refactor(Some("fn a() {}"), None, None).err(),
		prompt::refactor(None, Some("rust"), None).err(),
		prompt::commit_message(Some(""), None).err(),
		prompt::error_insight(None, None, None).err(),
	];

	for err in rejected {
		assert!(matches!(err, Some(Error::MissingField { .. })), "unexpected result: {err:?}");
	}
}

#[test]
fn blank_tag_content_skips_the_model() {
	assert!(prompt::tag(Some("")).expect("blank content is not an error").is_none());
	assert!(prompt::tag(Some(" \n\t")).expect("blank content is not an error").is_none());
}

#[test]
fn tag_prompt_asks_for_json() {
	let prompt = prompt::tag(Some("Standup notes about the billing migration"))
		.expect("valid input")
		.expect("non-blank content builds a prompt");

	assert_eq!(prompt.operation, Operation::Tag);
	assert_eq!(prompt.format, OutputFormat::JsonObject);
	assert!(prompt.user.contains("billing migration"));
	assert!(prompt.user.contains("\"tags\": string[]"));
}

#[test]
fn summarize_and_rewrite_are_plain_text() {
	let summary = prompt::summarize(Some("Long note")).expect("valid input");
	let rewrite = prompt::rewrite(Some("Long note"), None).expect("valid input");

	assert_eq!(summary.format, OutputFormat::Text);
	assert_eq!(rewrite.format, OutputFormat::Text);
	assert!(rewrite.user.contains("clearer and more professional"));
}

#[test]
fn rewrite_uses_the_given_instruction() {
	let prompt = prompt::rewrite(Some("Long note"), Some("Turn it into bullet points"))
		.expect("valid input");

	assert!(prompt.user.contains("Turn it into bullet points"));
	assert!(!prompt.user.contains("clearer and more professional"));
}

#[test]
fn commit_style_defaults_to_conventional() {
	let prompt = prompt::commit_message(Some("+fn added() {}"), None).expect("valid input");

	assert!(prompt.user.contains("Style: conventional"));
	assert!(prompt.user.contains("```diff\n+fn added() {}\n```"));
	assert_eq!(CommitStyle::default(), CommitStyle::Conventional);
}

#[test]
fn commit_style_lookup_is_case_insensitive() {
	let prompt = prompt::commit_message(Some("-old"), Some("Simple")).expect("valid input");

	assert!(prompt.user.contains("Style: simple"));
}

#[test]
fn unknown_commit_style_is_invalid_input() {
	let err = prompt::commit_message(Some("-old"), Some("haiku")).expect_err("must reject");

	assert!(matches!(err, Error::InvalidInput { .. }));
}

#[test]
fn explain_fences_code_with_language() {
	let prompt =
		prompt::explain(Some("let x = 1;"), Some("rust"), Some("parser setup")).expect("valid");

	assert!(prompt.user.contains("```rust\nlet x = 1;\n```"));
	assert!(prompt.user.contains("(context: parser setup)"));
	assert!(prompt.user.contains("\"complexity\""));
}

#[test]
fn error_insight_mentions_known_context() {
	let prompt = prompt::error_insight(
		Some("TypeError: Cannot read properties of undefined"),
		Some("javascript"),
		None,
	)
	.expect("valid input");

	assert!(prompt.user.contains("Language: javascript"));
	assert!(!prompt.user.contains("Framework:"));
	assert_eq!(prompt.messages().len(), 2);
	assert_eq!(prompt.messages()[0]["role"], "system");
}

#[test]
fn decode_fails_on_prose_so_callers_can_default() {
	assert!(response::decode::<ExplainResult>("Sure! Here is the explanation.").is_err());
	assert!(response::decode_tags("not json").is_err());
}

#[test]
fn decodes_fenced_error_insight() {
	let raw = "```json\n{\"explanation\": \"x is undefined\", \"detectedLanguage\": \"javascript\", \"solutions\": [{\"title\": \"Guard\", \"steps\": [\"check x\"]}]}\n```";
	let parsed: ErrorInsightResult = response::decode(raw).expect("fenced JSON must decode");

	assert_eq!(parsed.detected_language, "javascript");
	assert_eq!(parsed.detected_framework, None);
	assert_eq!(parsed.solutions[0].steps, tags(&["check x"]));
	assert!(parsed.related_docs.is_empty());
}

#[test]
fn decodes_tags_from_object_or_array() {
	let from_object =
		response::decode_tags(r#"{"tags": ["work", " meeting ", "work", ""]}"#).expect("object");
	let from_array = response::decode_tags(r#"["rust", "async"]"#).expect("array");
	let from_empty = response::decode_tags("{}").expect("empty object");

	assert_eq!(from_object.tags, tags(&["work", "meeting"]));
	assert_eq!(from_array.tags, tags(&["rust", "async"]));
	assert!(from_empty.tags.is_empty());
}

#[test]
fn inverted_date_range_matches_nothing() {
	let filters =
		SearchFilters::from_raw(None, Some("2024-06-01"), Some("2024-05-01")).expect("valid");
	let rows = vec![
		(tags(&["a"]), datetime!(2024-05-15 12:00 UTC)),
		(tags(&["b"]), datetime!(2024-06-15 12:00 UTC)),
		(tags(&[]), datetime!(2024-04-15 12:00 UTC)),
	];
	let kept = filters.apply(rows, |(tags, created_at)| (tags.as_slice(), *created_at));

	assert!(kept.is_empty());
}

#[test]
fn tag_filter_keeps_any_overlap_in_order() {
	let filters = SearchFilters::from_raw(Some(tags(&["rust", "go"])), None, None).expect("valid");
	let rows = vec![
		("first", tags(&["go", "cli"]), datetime!(2024-01-01 0:00 UTC)),
		("second", tags(&["python"]), datetime!(2024-01-02 0:00 UTC)),
		("third", tags(&["rust"]), datetime!(2024-01-03 0:00 UTC)),
	];
	let kept = filters.apply(rows, |(_, tags, created_at)| (tags.as_slice(), *created_at));
	let names: Vec<_> = kept.iter().map(|(name, _, _)| *name).collect();

	assert_eq!(names, vec!["first", "third"]);
}

#[test]
fn date_bounds_are_inclusive() {
	let filters = SearchFilters::from_raw(
		None,
		Some("2024-05-01T00:00:00Z"),
		Some("2024-05-31T00:00:00Z"),
	)
	.expect("valid");

	assert!(filters.matches(&[], datetime!(2024-05-01 0:00 UTC)));
	assert!(filters.matches(&[], datetime!(2024-05-31 0:00 UTC)));
	assert!(!filters.matches(&[], datetime!(2024-05-31 0:00:01 UTC)));
}

#[test]
fn malformed_filter_date_is_invalid_input() {
	let err = SearchFilters::from_raw(None, Some("last week"), None).expect_err("must reject");

	assert!(matches!(err, Error::InvalidInput { .. }));
}
