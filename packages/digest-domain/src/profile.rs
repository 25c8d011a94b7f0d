use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Structured reading of a freeform request, as produced by the reasoning service.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntentExtraction {
	pub core_interests: Vec<String>,
	#[serde(default)]
	pub context_tags: Vec<String>,
	#[serde(default)]
	pub pain_points: Vec<String>,
	#[serde(default)]
	pub negative_keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResearchProfile {
	interests: Vec<String>,
	context_tags: Vec<String>,
	pain_points: Vec<String>,
	negative_keywords: Vec<String>,
}
impl ResearchProfile {
	pub fn new(
		interests: Vec<String>,
		context_tags: Vec<String>,
		pain_points: Vec<String>,
		negative_keywords: Vec<String>,
	) -> Result<Self, ValidationError> {
		let interests = dedup_trimmed(interests);

		if interests.is_empty() {
			return Err(ValidationError::Empty { field: "core_interests" });
		}

		Ok(Self {
			interests,
			context_tags: trimmed(context_tags),
			pain_points: trimmed(pain_points),
			negative_keywords: trimmed(negative_keywords),
		})
	}

	pub fn from_intent(intent: IntentExtraction) -> Result<Self, ValidationError> {
		let IntentExtraction { core_interests, context_tags, pain_points, negative_keywords } =
			intent;

		Self::new(core_interests, context_tags, pain_points, negative_keywords)
	}

	pub fn interests(&self) -> &[String] {
		&self.interests
	}

	pub fn context_tags(&self) -> &[String] {
		&self.context_tags
	}

	pub fn pain_points(&self) -> &[String] {
		&self.pain_points
	}

	pub fn negative_keywords(&self) -> &[String] {
		&self.negative_keywords
	}

	/// Returns the first negative keyword found in `text`, compared case-insensitively.
	pub fn vetoed_by(&self, text: &str) -> Option<&str> {
		let haystack = text.to_lowercase();

		self.negative_keywords
			.iter()
			.find(|keyword| haystack.contains(&keyword.to_lowercase()))
			.map(String::as_str)
	}
}

fn trimmed(values: Vec<String>) -> Vec<String> {
	values
		.into_iter()
		.map(|value| value.trim().to_string())
		.filter(|value| !value.is_empty())
		.collect()
}

fn dedup_trimmed(values: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(values.len());

	for value in trimmed(values) {
		if !out.contains(&value) {
			out.push(value);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(values: &[&str]) -> Vec<String> {
		values.iter().map(|value| value.to_string()).collect()
	}

	#[test]
	fn interests_keep_first_occurrence_order() {
		let profile = ResearchProfile::new(
			strings(&["rag", " agents ", "rag", ""]),
			vec![],
			vec![],
			vec![],
		)
		.expect("Profile must be valid.");

		assert_eq!(profile.interests(), strings(&["rag", "agents"]).as_slice());
	}

	#[test]
	fn empty_interests_are_rejected() {
		let err = ResearchProfile::new(strings(&["  "]), vec![], vec![], vec![])
			.expect_err("Expected empty interests to be rejected.");

		assert_eq!(err, ValidationError::Empty { field: "core_interests" });
	}

	#[test]
	fn veto_is_case_insensitive_substring() {
		let profile =
			ResearchProfile::new(strings(&["vision"]), vec![], vec![], strings(&["Medical"]))
				.expect("Profile must be valid.");

		assert_eq!(profile.vetoed_by("A biomedical imaging benchmark"), Some("Medical"));
		assert_eq!(profile.vetoed_by("A driving benchmark"), None);
	}
}
