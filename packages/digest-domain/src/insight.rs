use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub const MAX_NOVELTY: u32 = 4;
pub const MAX_RESULTS: u32 = 3;
pub const MAX_COMPLETENESS: u32 = 3;
pub const MAX_SCORE: u32 = MAX_NOVELTY + MAX_RESULTS + MAX_COMPLETENESS;

/// Graded reading of one paper.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaperInsight {
	pub title: String,
	pub one_liner: String,
	pub key_innovation: String,
	pub sota_comparison: String,
	pub score_novelty: u32,
	pub score_results: u32,
	pub score_completeness: u32,
	pub score: u32,
}
impl PaperInsight {
	pub fn validate(&self) -> Result<(), ValidationError> {
		for (field, value) in [("title", &self.title), ("one_liner", &self.one_liner)] {
			if value.trim().is_empty() {
				return Err(ValidationError::Empty { field });
			}
		}
		for (field, value, max) in [
			("score_novelty", self.score_novelty, MAX_NOVELTY),
			("score_results", self.score_results, MAX_RESULTS),
			("score_completeness", self.score_completeness, MAX_COMPLETENESS),
			("score", self.score, MAX_SCORE),
		] {
			if value > max {
				return Err(ValidationError::OutOfRange { field, value, max });
			}
		}

		let expected = self.score_novelty + self.score_results + self.score_completeness;

		if self.score != expected {
			return Err(ValidationError::ScoreMismatch { expected, actual: self.score });
		}

		Ok(())
	}
}

pub fn percentage(value: u32, max: u32) -> u32 {
	if max == 0 {
		return 0;
	}

	(f64::from(value) / f64::from(max) * 100.0).round() as u32
}
