use std::sync::{Mutex, MutexGuard};

use time::OffsetDateTime;

use digest_domain::{calendar, insight::PaperInsight};
use digest_storage::{archive::ArchiveStore, models::ArchiveEntry};

use crate::{DigestService, Error, Result, Stage, embedding_version};

/// Shared handle over the archive document. Lookups and appends are serialized.
pub struct PaperArchive {
	store: Mutex<ArchiveStore>,
	similarity_threshold: f32,
}
impl PaperArchive {
	pub fn open(cfg: &digest_config::Archive) -> Self {
		Self::from_store(ArchiveStore::open(cfg.path.clone()), cfg.similarity_threshold)
	}

	pub fn from_store(store: ArchiveStore, similarity_threshold: f32) -> Self {
		Self { store: Mutex::new(store), similarity_threshold }
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	pub fn entries(&self) -> Vec<ArchiveEntry> {
		self.lock().entries().to_vec()
	}

	/// Closest archived entry at or above the configured similarity threshold.
	pub fn nearest(&self, query: &[f32]) -> Option<ArchiveEntry> {
		let store = self.lock();

		store.nearest(query, self.similarity_threshold).map(|found| {
			tracing::debug!(
				title = %found.entry.title,
				similarity = found.similarity,
				"Archive neighbour found."
			);

			found.entry.clone()
		})
	}

	pub fn append(&self, entry: ArchiveEntry) -> Result<()> {
		self.lock().append(entry).map_err(Error::from)
	}

	fn lock(&self) -> MutexGuard<'_, ArchiveStore> {
		self.store.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl DigestService {
	/// Finds the archived paper most similar to `summary`.
	///
	/// An empty archive answers without calling the embedding provider.
	pub async fn retrieve_similar(&self, summary: &str) -> Result<Option<ArchiveEntry>> {
		let Some(query) = self.lookup_vector(summary).await? else {
			return Ok(None);
		};

		Ok(self.archive.nearest(&query))
	}

	/// Embeds the insight's one-liner and appends it to the archive under today's UTC date.
	pub async fn save(&self, insight: &PaperInsight) -> Result<()> {
		let embedding = self.embed_text(Stage::ArchiveWrite, &insight.one_liner).await?;

		self.save_embedded(insight, embedding)
	}

	/// Query vector for an archive lookup, or `None` when there is nothing to compare against.
	pub(crate) async fn lookup_vector(&self, summary: &str) -> Result<Option<Vec<f32>>> {
		if self.archive.is_empty() {
			return Ok(None);
		}

		Ok(Some(self.embed_text(Stage::DuplicateLookup, summary).await?))
	}

	/// Appends `insight` with an embedding of its one-liner computed earlier in the run.
	pub(crate) fn save_embedded(&self, insight: &PaperInsight, embedding: Vec<f32>) -> Result<()> {
		let date = calendar::format_date(OffsetDateTime::now_utc().date())
			.map_err(|err| Error::Storage { message: err.to_string() })?;

		self.archive.append(ArchiveEntry {
			title: insight.title.clone(),
			summary: insight.one_liner.clone(),
			date,
			embedding,
		})?;

		tracing::info!(
			title = %insight.title,
			entries = self.archive.len(),
			embedding_version = %embedding_version(&self.cfg.providers.embedding),
			"Paper archived."
		);

		Ok(())
	}
}
