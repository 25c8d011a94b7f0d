mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Archive, Config, EmbeddingProviderConfig, LlmProviderConfig, PaperFeedConfig, Pipeline,
	Providers, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.archive.path.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.archive.path must be non-empty.".to_string(),
		});
	}

	let similarity_threshold = cfg.storage.archive.similarity_threshold;

	if !similarity_threshold.is_finite() {
		return Err(Error::Validation {
			message: "storage.archive.similarity_threshold must be a finite number.".to_string(),
		});
	}
	if !(-1.0..=1.0).contains(&similarity_threshold) {
		return Err(Error::Validation {
			message: "storage.archive.similarity_threshold must be in the range -1.0-1.0."
				.to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.reasoning.max_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.reasoning.max_attempts must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("reasoning", &cfg.providers.reasoning.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.providers.papers.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.papers.api_base must be non-empty.".to_string(),
		});
	}

	validate_pipeline(&cfg.pipeline)
}

fn validate_pipeline(pipeline: &Pipeline) -> Result<()> {
	if pipeline.max_candidates == 0 {
		return Err(Error::Validation {
			message: "pipeline.max_candidates must be greater than zero.".to_string(),
		});
	}
	if pipeline.top_n == 0 {
		return Err(Error::Validation {
			message: "pipeline.top_n must be greater than zero.".to_string(),
		});
	}
	if pipeline.min_quality_score > 10 {
		return Err(Error::Validation {
			message: "pipeline.min_quality_score must be 10 or less.".to_string(),
		});
	}
	if pipeline.duplicate_overlap_threshold > 10 {
		return Err(Error::Validation {
			message: "pipeline.duplicate_overlap_threshold must be 10 or less.".to_string(),
		});
	}
	if !pipeline.relevance_threshold.is_finite() {
		return Err(Error::Validation {
			message: "pipeline.relevance_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&pipeline.relevance_threshold) {
		return Err(Error::Validation {
			message: "pipeline.relevance_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}

	for (label, value) in [
		("pipeline.relevance_weight", pipeline.relevance_weight),
		("pipeline.topic_match_boost", pipeline.topic_match_boost),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if pipeline.call_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "pipeline.call_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if pipeline.max_paper_chars == 0 {
		return Err(Error::Validation {
			message: "pipeline.max_paper_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.papers
		.user_agent
		.as_deref()
		.map(|agent| agent.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.papers.user_agent = None;
	}
}
