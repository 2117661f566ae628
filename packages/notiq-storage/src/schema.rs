pub fn render_schema(vector_dim: u32) -> String {
	let init = include_str!("../../../sql/init.sql");
	let expanded = expand_includes(init);

	expanded.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_notes.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_notes.sql")),
				"tables/002_ai_metadata.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_ai_metadata.sql")),
				"tables/003_snippets.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_snippets.sql")),
				"tables/004_error_logs.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_error_logs.sql")),
				"tables/005_dev_journal.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_dev_journal.sql")),
				"functions/001_search_notes_semantic.sql" => out
					.push_str(include_str!("../../../sql/functions/001_search_notes_semantic.sql")),
				"functions/002_increment_snippet_usage.sql" => out.push_str(include_str!(
					"../../../sql/functions/002_increment_snippet_usage.sql"
				)),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_every_include_with_the_vector_dimension() {
		let sql = render_schema(1_536);

		assert!(!sql.contains("\\ir "));
		assert!(!sql.contains("<VECTOR_DIM>"));
		assert!(sql.contains("embedding vector(1536)"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS dev_journal"));
		assert!(sql.contains("FUNCTION increment_snippet_usage"));
	}

	#[test]
	fn function_bodies_survive_statement_splitting() {
		let sql = render_schema(8);
		let function = sql
			.split(';')
			.find(|statement| statement.contains("FUNCTION search_notes_semantic"))
			.expect("search function must be present");

		assert!(function.contains("LIMIT match_count\n$$"));
	}
}
