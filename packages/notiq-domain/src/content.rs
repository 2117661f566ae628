/// Hash of the trimmed note content; equal hashes mean the stored embedding is current.
pub fn content_hash(content: &str) -> String {
	blake3::hash(content.trim().as_bytes()).to_hex().to_string()
}

/// Whitespace-only edits at the edges do not count as a change.
pub fn changed_materially(before: &str, after: &str) -> bool {
	before.trim() != after.trim()
}
