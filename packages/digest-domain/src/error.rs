#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("{field} must be in the range 0-{max}, got {value}.")]
	OutOfRange { field: &'static str, value: u32, max: u32 },
	#[error(
		"score must equal score_novelty + score_results + score_completeness ({expected}), got {actual}."
	)]
	ScoreMismatch { expected: u32, actual: u32 },
	#[error("{field} must be non-empty.")]
	Empty { field: &'static str },
}
