use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub const MAX_TOPIC_OVERLAP: u32 = 10;
pub const DUPLICATE_OVERLAP_THRESHOLD: u32 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum InnovationType {
	None,
	Incremental,
	Breakthrough,
	#[serde(rename = "Different_Field")]
	DifferentField,
}
impl InnovationType {
	pub fn is_minor(self) -> bool {
		matches!(self, Self::None | Self::Incremental)
	}
}

/// Comparison of a new paper against its closest archived neighbour.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct DuplicateJudgment {
	pub topic_overlap_score: u32,
	pub innovation_type: InnovationType,
	pub has_quantitative_improvement: bool,
	pub reasoning_brief: String,
}
impl DuplicateJudgment {
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.topic_overlap_score > MAX_TOPIC_OVERLAP {
			return Err(ValidationError::OutOfRange {
				field: "topic_overlap_score",
				value: self.topic_overlap_score,
				max: MAX_TOPIC_OVERLAP,
			});
		}

		Ok(())
	}

	pub fn is_significant(&self) -> bool {
		self.is_significant_at(DUPLICATE_OVERLAP_THRESHOLD)
	}

	pub fn is_significant_at(&self, overlap_threshold: u32) -> bool {
		!(self.topic_overlap_score >= overlap_threshold && self.innovation_type.is_minor())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn judgment(overlap: u32, innovation_type: InnovationType) -> DuplicateJudgment {
		DuplicateJudgment {
			topic_overlap_score: overlap,
			innovation_type,
			has_quantitative_improvement: false,
			reasoning_brief: "Same method, new dataset.".to_string(),
		}
	}

	#[test]
	fn high_overlap_incremental_is_not_significant() {
		assert!(!judgment(9, InnovationType::Incremental).is_significant());
		assert!(!judgment(8, InnovationType::None).is_significant());
	}

	#[test]
	fn breakthrough_is_significant_at_any_overlap() {
		assert!(judgment(9, InnovationType::Breakthrough).is_significant());
		assert!(judgment(10, InnovationType::DifferentField).is_significant());
	}

	#[test]
	fn low_overlap_is_significant() {
		assert!(judgment(7, InnovationType::None).is_significant());
	}

	#[test]
	fn overlap_above_ten_is_invalid() {
		assert!(judgment(11, InnovationType::None).validate().is_err());
	}
}
