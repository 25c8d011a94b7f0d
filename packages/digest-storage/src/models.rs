use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ArchiveEntry {
	pub title: String,
	pub summary: String,
	pub date: String,
	pub embedding: Vec<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarEntry<'a> {
	pub entry: &'a ArchiveEntry,
	pub similarity: f32,
}
