use digest_storage::{archive::ArchiveStore, models::ArchiveEntry};
use digest_testkit::TempArchive;

fn entry(title: &str, embedding: Vec<f32>) -> ArchiveEntry {
	ArchiveEntry {
		title: title.to_string(),
		summary: format!("{title} summary."),
		date: "2026-10-16".to_string(),
		embedding,
	}
}

#[test]
fn missing_document_opens_empty() {
	let temp = TempArchive::new();
	let archive = ArchiveStore::open(temp.path());

	assert!(archive.is_empty());
}

#[test]
fn corrupt_document_opens_empty() {
	let temp = TempArchive::new();

	temp.write_raw("{ not json").expect("Failed to seed archive.");

	let archive = ArchiveStore::open(temp.path());

	assert!(archive.is_empty());
}

#[test]
fn append_writes_through_and_survives_reopen() {
	let temp = TempArchive::new();
	let mut archive = ArchiveStore::open(temp.path());

	archive.append(entry("Speculative Decoding", vec![1.0, 0.0])).expect("Append failed.");
	archive.append(entry("KV Cache Pruning", vec![0.0, 1.0])).expect("Append failed.");

	let reopened = ArchiveStore::open(temp.path());
	let titles: Vec<&str> = reopened.entries().iter().map(|e| e.title.as_str()).collect();

	assert_eq!(titles, vec!["Speculative Decoding", "KV Cache Pruning"]);
	assert_eq!(reopened.entries()[0].embedding, vec![1.0, 0.0]);
}

#[test]
fn persisted_document_is_a_plain_entry_list() {
	let temp = TempArchive::new();
	let mut archive = ArchiveStore::open(temp.path());

	archive.append(entry("Sparse MoE", vec![0.5, 0.5])).expect("Append failed.");

	let raw = temp.read_raw().expect("Failed to read archive.");
	let value: serde_json::Value = serde_json::from_str(&raw).expect("Archive must be JSON.");

	assert_eq!(
		value,
		serde_json::json!([{
			"title": "Sparse MoE",
			"summary": "Sparse MoE summary.",
			"date": "2026-10-16",
			"embedding": [0.5, 0.5]
		}])
	);
}

#[test]
fn storage_does_not_deduplicate() {
	let temp = TempArchive::new();
	let mut archive = ArchiveStore::open(temp.path());

	archive.append(entry("Same", vec![1.0, 0.0])).expect("Append failed.");
	archive.append(entry("Same", vec![1.0, 0.0])).expect("Append failed.");

	assert_eq!(archive.len(), 2);
}

#[test]
fn empty_embedding_is_rejected_without_writing() {
	let temp = TempArchive::new();
	let mut archive = ArchiveStore::open(temp.path());

	assert!(archive.append(entry("Empty", Vec::new())).is_err());
	assert!(archive.is_empty());
	assert!(temp.read_raw().is_err());
}

#[test]
fn nearest_uses_loaded_entries() {
	let temp = TempArchive::new();
	let mut archive = ArchiveStore::open(temp.path());

	archive.append(entry("Audio Tokenizer", vec![0.9, 0.1])).expect("Append failed.");

	let reopened = ArchiveStore::open(temp.path());
	let found = reopened.nearest(&[1.0, 0.0], 0.3).expect("Expected a match.");

	assert_eq!(found.entry.title, "Audio Tokenizer");
}

#[test]
fn append_replaces_the_document_without_leaving_a_staging_file() {
	let temp = TempArchive::new();
	let mut archive = ArchiveStore::open(temp.path());

	archive.append(entry("Flash Decoding", vec![1.0, 0.0])).expect("Append failed.");

	let entries = std::fs::read_dir(temp.dir())
		.expect("Archive directory must exist.")
		.map(|entry| entry.expect("Failed to read directory entry.").file_name())
		.collect::<Vec<_>>();

	assert_eq!(entries, vec![std::ffi::OsString::from("paper_memory.json")]);
}

#[test]
fn failed_write_keeps_memory_unchanged() {
	let temp = TempArchive::new();

	// A directory at the archive path makes the final rename fail.
	std::fs::create_dir_all(temp.path()).expect("Failed to create blocking directory.");

	let mut archive = ArchiveStore::open(temp.path());

	assert!(archive.append(entry("Blocked", vec![1.0, 0.0])).is_err());
	assert!(archive.is_empty());
}
