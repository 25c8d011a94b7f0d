use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub pipeline: Pipeline,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub archive: Archive,
}

#[derive(Debug, Deserialize)]
pub struct Archive {
	pub path: PathBuf,
	/// Minimum cosine similarity for an archived paper to count as a near match.
	#[serde(default = "default_similarity_threshold")]
	pub similarity_threshold: f32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub reasoning: LlmProviderConfig,
	pub papers: PaperFeedConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	/// Number of generations tried before a response that is not a JSON object is a failure.
	#[serde(default = "default_max_attempts")]
	pub max_attempts: u32,
}

#[derive(Debug, Deserialize)]
pub struct PaperFeedConfig {
	pub api_base: String,
	pub timeout_ms: u64,
	pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pipeline {
	pub max_candidates: u32,
	/// Inclusive lower bound on the combined 0-10 insight score.
	pub min_quality_score: u32,
	/// Candidates at or below this relevance are dropped.
	pub relevance_threshold: f32,
	pub relevance_weight: f32,
	pub topic_match_boost: f32,
	pub top_n: u32,
	/// Overlap score from which a `None`/`Incremental` judgment marks a duplicate.
	pub duplicate_overlap_threshold: u32,
	pub call_timeout_ms: u64,
	pub max_paper_chars: u32,
}
impl Default for Pipeline {
	fn default() -> Self {
		Self {
			max_candidates: 6,
			min_quality_score: 5,
			relevance_threshold: 0.2,
			relevance_weight: 20.0,
			topic_match_boost: 5.0,
			top_n: 3,
			duplicate_overlap_threshold: 8,
			call_timeout_ms: 120_000,
			max_paper_chars: 6_000,
		}
	}
}

fn default_similarity_threshold() -> f32 {
	0.3
}

fn default_max_attempts() -> u32 {
	3
}
