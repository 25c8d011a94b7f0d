pub mod archive;
pub mod curator;
pub mod pipeline;
pub mod prompts;

mod error;

pub use archive::PaperArchive;
pub use error::{Error, Result};
pub use pipeline::{
	BriefingReport, BriefingRequest, CandidateDecision, CandidateOutcome, SkipReason,
};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde::de::DeserializeOwned;
use serde_json::Value;

use digest_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, PaperFeedConfig};
use digest_providers::{embedding, papers, reasoning};

pub use digest_providers::papers::PaperCandidate;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ReasoningProvider
where
	Self: Send + Sync,
{
	fn infer<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<Value>>;
}

pub trait PaperSource
where
	Self: Send + Sync,
{
	fn list_candidates<'a>(
		&'a self,
		cfg: &'a PaperFeedConfig,
		date: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<PaperCandidate>>>;

	fn fetch_text<'a>(
		&'a self,
		cfg: &'a PaperFeedConfig,
		id: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

/// Pipeline steps that call out to a provider. Used for timeouts and log fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
	Intent,
	Candidates,
	Fetch,
	Analysis,
	DuplicateLookup,
	DuplicateJudgment,
	ArchiveWrite,
	Relevance,
	Personalization,
}
impl Stage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Intent => "intent",
			Self::Candidates => "candidates",
			Self::Fetch => "fetch",
			Self::Analysis => "analysis",
			Self::DuplicateLookup => "duplicate_lookup",
			Self::DuplicateJudgment => "duplicate_judgment",
			Self::ArchiveWrite => "archive_write",
			Self::Relevance => "relevance",
			Self::Personalization => "personalization",
		}
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub reasoning: Arc<dyn ReasoningProvider>,
	pub papers: Arc<dyn PaperSource>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		reasoning: Arc<dyn ReasoningProvider>,
		papers: Arc<dyn PaperSource>,
	) -> Self {
		Self { embedding, reasoning, papers }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), reasoning: provider.clone(), papers: provider }
	}
}

pub struct DigestService {
	pub cfg: Config,
	pub archive: PaperArchive,
	pub providers: Providers,
}
impl DigestService {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let archive = PaperArchive::open(&cfg.storage.archive);

		Self { cfg, archive, providers }
	}

	/// Runs `fut` under the per-call deadline. Expiry is reported as a failure of `stage`.
	pub(crate) async fn bounded<T>(
		&self,
		stage: Stage,
		fut: impl Future<Output = Result<T>>,
	) -> Result<T> {
		let timeout_ms = self.cfg.pipeline.call_timeout_ms;

		match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout { stage: stage.as_str(), timeout_ms }),
		}
	}

	/// Embeds `texts` in one call and checks the vectors against the configured dimension.
	pub(crate) async fn embed_texts(&self, stage: Stage, texts: &[String]) -> Result<Vec<Vec<f32>>> {
		let cfg = &self.cfg.providers.embedding;
		let vectors = self.bounded(stage, self.providers.embedding.embed(cfg, texts)).await?;

		if vectors.len() != texts.len() {
			return Err(Error::Embedding {
				message: format!("Expected {} vectors, got {}.", texts.len(), vectors.len()),
			});
		}
		if vectors.iter().any(|vec| vec.len() != cfg.dimensions as usize) {
			return Err(Error::Embedding {
				message: format!("Embedding vector dimension mismatch for {}.", embedding_version(cfg)),
			});
		}

		Ok(vectors)
	}

	pub(crate) async fn embed_text(&self, stage: Stage, text: &str) -> Result<Vec<f32>> {
		let vectors = self.embed_texts(stage, &[text.to_string()]).await?;

		vectors.into_iter().next().ok_or_else(|| Error::Embedding {
			message: "Embedding provider returned no vectors.".to_string(),
		})
	}

	/// Sends `messages` to the reasoning provider and decodes the returned object as `T`.
	pub(crate) async fn infer_json<T>(&self, stage: Stage, messages: &[Value]) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let cfg = &self.cfg.providers.reasoning;
		let raw = self.bounded(stage, self.providers.reasoning.infer(cfg, messages)).await?;

		tracing::debug!(
			stage = stage.as_str(),
			provider_id = %cfg.provider_id,
			model = %cfg.model,
			"Reasoning output received."
		);

		serde_json::from_value(raw).map_err(|err| Error::Reasoning {
			message: format!(
				"{} output from {} does not match its schema: {err}",
				stage.as_str(),
				cfg.provider_id
			),
		})
	}
}

/// Names the vector space archive embeddings belong to.
pub(crate) fn embedding_version(cfg: &EmbeddingProviderConfig) -> String {
	format!("{}:{}:{}", cfg.provider_id, cfg.model, cfg.dimensions)
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding::embed(cfg, texts)
				.await
				.map_err(|err| Error::Embedding { message: err.to_string() })
		})
	}
}
impl ReasoningProvider for DefaultProviders {
	fn infer<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move {
			reasoning::infer(cfg, messages)
				.await
				.map_err(|err| Error::Reasoning { message: err.to_string() })
		})
	}
}
impl PaperSource for DefaultProviders {
	fn list_candidates<'a>(
		&'a self,
		cfg: &'a PaperFeedConfig,
		date: Option<&'a str>,
		limit: usize,
	) -> BoxFuture<'a, Result<Vec<PaperCandidate>>> {
		Box::pin(async move {
			papers::list_candidates(cfg, date, limit)
				.await
				.map_err(|err| Error::Fetch { message: err.to_string() })
		})
	}

	fn fetch_text<'a>(
		&'a self,
		cfg: &'a PaperFeedConfig,
		id: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			papers::fetch_text(cfg, id).await.map_err(|err| Error::Fetch { message: err.to_string() })
		})
	}
}
