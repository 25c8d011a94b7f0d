use digest_domain::{profile::ResearchProfile, vector};

use crate::{DigestService, Result, Stage};

impl DigestService {
	/// Relevance of `summary` to the profile, in `[0, 1]`.
	///
	/// A negative keyword in the summary vetoes the paper before any embedding is requested.
	pub async fn calculate_relevance(
		&self,
		summary: &str,
		profile: &ResearchProfile,
	) -> Result<f32> {
		if let Some(keyword) = profile.vetoed_by(summary) {
			tracing::info!(keyword, "Negative keyword vetoed candidate.");

			return Ok(0.0);
		}

		let mut texts = Vec::with_capacity(profile.interests().len() + 1);

		texts.push(summary.to_string());
		texts.extend(profile.interests().iter().cloned());

		let mut vectors = self.embed_texts(Stage::Relevance, &texts).await?;
		let interest_vectors = vectors.split_off(1);
		let Some(summary_vec) = vectors.pop() else {
			return Ok(0.0);
		};
		let Some(interest_vec) = vector::mean_pool(&interest_vectors) else {
			return Ok(0.0);
		};
		let relevance = vector::cosine_similarity(&summary_vec, &interest_vec).unwrap_or(0.0);

		Ok(relevance.clamp(0.0, 1.0))
	}
}
