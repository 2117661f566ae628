//! Prompt templates for every AI operation.
//!
//! Builders validate their required inputs first, so a rejected request never reaches the
//! completion provider.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

const SUMMARIZE_SYSTEM: &str =
	"You are a note summarizer. Write concise, clear summaries that keep the key facts.";
const REWRITE_SYSTEM: &str =
	"You are a writing assistant. Rewrite notes to improve clarity and professionalism.";
const REWRITE_DEFAULT_INSTRUCTION: &str = "Make it clearer and more professional";
const TAG_SYSTEM: &str = "You extract tags from notes. Choose 3 to 5 relevant tags: lowercase, single words or short hyphenated phrases, for example \"work\", \"meeting\", \"project-alpha\".";
const EXPLAIN_SYSTEM: &str =
	"You are an expert code reviewer and educator. Explain code clearly and give actionable insights.";
const REFACTOR_SYSTEM: &str = "You are a software engineer who specializes in refactoring. Favor clean code, performance, and maintainability.";
const REFACTOR_DEFAULT_GOAL: &str = "Refactor and optimize it for readability, performance, and maintainability";
const COMMIT_SYSTEM: &str = "You write clear, concise commit messages that follow common conventions. Read the change carefully and describe its intent.";
const ERROR_INSIGHT_SYSTEM: &str = "You are a debugging assistant with deep knowledge of programming languages, frameworks, and common failure patterns. Give clear, actionable solutions.";

const TAG_SCHEMA: &str = r#"{
  "tags": string[]
}"#;
const EXPLAIN_SCHEMA: &str = r#"{
  "explanation": string,
  "complexity": "simple" | "moderate" | "complex",
  "concepts": string[],
  "suggestions": string[]
}"#;
const REFACTOR_SCHEMA: &str = r#"{
  "refactored": string,
  "improvements": string[],
  "reasoning": string
}"#;
const COMMIT_SCHEMA: &str = r#"{
  "message": string,
  "type": "feat" | "fix" | "docs" | "style" | "refactor" | "test" | "chore",
  "scope": string | null,
  "breaking": boolean
}"#;
const ERROR_INSIGHT_SCHEMA: &str = r#"{
  "explanation": string,
  "detectedLanguage": string,
  "detectedFramework": string | null,
  "possibleCauses": string[],
  "solutions": [
    {
      "title": string,
      "steps": string[],
      "code": string | null,
      "reference": string | null
    }
  ],
  "relatedDocs": string[]
}"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
	Summarize,
	Rewrite,
	Tag,
	Explain,
	Refactor,
	CommitMessage,
	ErrorInsight,
}
impl Operation {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Summarize => "summarize",
			Self::Rewrite => "rewrite",
			Self::Tag => "tag",
			Self::Explain => "explain",
			Self::Refactor => "refactor",
			Self::CommitMessage => "commit_message",
			Self::ErrorInsight => "error_insight",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
	Text,
	JsonObject,
}

#[derive(Clone, Debug)]
pub struct Prompt {
	pub operation: Operation,
	pub system: String,
	pub user: String,
	pub format: OutputFormat,
}
impl Prompt {
	fn text(operation: Operation, system: &str, user: String) -> Self {
		Self { operation, system: system.to_string(), user, format: OutputFormat::Text }
	}

	fn json(operation: Operation, system: &str, user: String, schema: &str) -> Self {
		let user =
			format!("{user}\n\nRespond with a single JSON object of exactly this shape:\n{schema}");

		Self { operation, system: system.to_string(), user, format: OutputFormat::JsonObject }
	}

	/// Chat messages in the OpenAI wire shape.
	pub fn messages(&self) -> Vec<Value> {
		vec![
			serde_json::json!({ "role": "system", "content": self.system }),
			serde_json::json!({ "role": "user", "content": self.user }),
		]
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStyle {
	#[default]
	Conventional,
	Semantic,
	Simple,
}
impl CommitStyle {
	pub fn parse(raw: &str) -> Result<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"conventional" => Ok(Self::Conventional),
			"semantic" => Ok(Self::Semantic),
			"simple" => Ok(Self::Simple),
			other => Err(Error::InvalidInput {
				message: format!(
					"Unknown commit style {other:?}; expected conventional, semantic, or simple."
				),
			}),
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Conventional => "conventional",
			Self::Semantic => "semantic",
			Self::Simple => "simple",
		}
	}

	fn instruction(self) -> &'static str {
		match self {
			Self::Conventional =>
				"Use the Conventional Commits format: type(scope): description. Types: feat, fix, docs, style, refactor, test, chore.",
			Self::Semantic => "Use a semantic commit format with a clear, descriptive message.",
			Self::Simple => "Keep it simple and straightforward.",
		}
	}
}

pub fn summarize(content: Option<&str>) -> Result<Prompt> {
	let content = required(content, "Content is required")?;

	Ok(Prompt::text(
		Operation::Summarize,
		SUMMARIZE_SYSTEM,
		format!("Summarize this note:\n{content}"),
	))
}

pub fn rewrite(content: Option<&str>, instruction: Option<&str>) -> Result<Prompt> {
	let content = required(content, "Content is required")?;
	let instruction = optional(instruction).unwrap_or(REWRITE_DEFAULT_INSTRUCTION);

	Ok(Prompt::text(
		Operation::Rewrite,
		REWRITE_SYSTEM,
		format!("Rewrite this note. Instruction: {instruction}\n\nNote:\n{content}"),
	))
}

/// Returns `Ok(None)` for blank content: there is nothing to tag and the model is not asked.
pub fn tag(content: Option<&str>) -> Result<Option<Prompt>> {
	let Some(content) = content else {
		return Err(Error::MissingField { message: "Content is required".to_string() });
	};

	if content.trim().is_empty() {
		return Ok(None);
	}

	Ok(Some(Prompt::json(
		Operation::Tag,
		TAG_SYSTEM,
		format!("Extract tags from this note:\n{content}"),
		TAG_SCHEMA,
	)))
}

pub fn explain(code: Option<&str>, language: Option<&str>, context: Option<&str>) -> Result<Prompt> {
	let code = required(code, "Code is required")?;
	let language = optional(language);
	let mut user = format!("Explain the following {} snippet", language.unwrap_or("code"));

	if let Some(context) = optional(context) {
		user.push_str(&format!(" (context: {context})"));
	}

	user.push_str(":\n\n");
	user.push_str(&fence(language.unwrap_or(""), code));
	user.push_str(
		"\n\nCover what the code does, how complex it is, the key concepts it relies on, and any improvements worth making.",
	);

	Ok(Prompt::json(Operation::Explain, EXPLAIN_SYSTEM, user, EXPLAIN_SCHEMA))
}

pub fn refactor(
	code: Option<&str>,
	language: Option<&str>,
	instruction: Option<&str>,
) -> Result<Prompt> {
	let (Some(code), Some(language)) = (optional(code), optional(language)) else {
		return Err(Error::MissingField { message: "Code and language are required".to_string() });
	};
	let goal = match optional(instruction) {
		Some(instruction) => format!("Refactor it following this instruction: {instruction:?}"),
		None => REFACTOR_DEFAULT_GOAL.to_string(),
	};
	let user = format!(
		"Here is some {language} code. {goal}.\n\n{}\n\nReturn the refactored code, the list of improvements made, and the reasoning behind them.",
		fence(language, code)
	);

	Ok(Prompt::json(Operation::Refactor, REFACTOR_SYSTEM, user, REFACTOR_SCHEMA))
}

pub fn commit_message(diff: Option<&str>, style: Option<&str>) -> Result<Prompt> {
	let diff = required(diff, "Diff is required")?;
	let style = match optional(style) {
		Some(raw) => CommitStyle::parse(raw)?,
		None => CommitStyle::default(),
	};
	let user = format!(
		"Write a commit message for the following git diff.\n\n{}\n\nStyle: {}\n{}\n\nAlso classify the commit type, name the scope if there is one, and say whether the change is breaking.",
		fence("diff", diff),
		style.as_str(),
		style.instruction()
	);

	Ok(Prompt::json(Operation::CommitMessage, COMMIT_SYSTEM, user, COMMIT_SCHEMA))
}

pub fn error_insight(
	error_text: Option<&str>,
	language: Option<&str>,
	framework: Option<&str>,
) -> Result<Prompt> {
	let error_text = required(error_text, "Error text is required")?;
	let mut user = format!("Analyze this error log:\n\n{}\n", fence("", error_text));

	if let Some(language) = optional(language) {
		user.push_str(&format!("\nLanguage: {language}"));
	}
	if let Some(framework) = optional(framework) {
		user.push_str(&format!("\nFramework: {framework}"));
	}

	user.push_str(
		"\n\nExplain what the error means, detect the language and framework when they were not given, list possible causes, give step-by-step solutions, and point to related documentation.",
	);

	Ok(Prompt::json(Operation::ErrorInsight, ERROR_INSIGHT_SYSTEM, user, ERROR_INSIGHT_SCHEMA))
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
	optional(value).ok_or_else(|| Error::MissingField { message: message.to_string() })
}

fn optional(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}

/// Wraps `body` in a backtick fence longer than any backtick run inside it.
fn fence(info: &str, body: &str) -> String {
	let mut longest = 0;
	let mut run = 0;

	for ch in body.chars() {
		if ch == '`' {
			run += 1;
			longest = longest.max(run);
		} else {
			run = 0;
		}
	}

	let ticks = "`".repeat(longest.max(2) + 1);

	format!("{ticks}{info}\n{body}\n{ticks}")
}
