use serde_json::Value;

use digest_domain::{insight::PaperInsight, profile::ResearchProfile};
use digest_storage::models::ArchiveEntry;

pub fn intent_messages(user_prompt: &str) -> Vec<Value> {
	let schema = serde_json::json!({
		"core_interests": ["short keyword phrase"],
		"context_tags": ["field or domain"],
		"pain_points": ["problem the user wants solved"],
		"negative_keywords": ["topic the user wants to avoid"]
	});
	let system_prompt = "You are an expert research librarian. \
Extract search metadata from the user's request. \
Output must be valid JSON only and must match the provided schema exactly. \
core_interests must contain at least one entry. \
Use empty arrays when the request says nothing about a field.";
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema}\nUser request:\n{user_prompt}"
	);

	messages(system_prompt, user_prompt)
}

pub fn insight_messages(paper_text: &str) -> Vec<Value> {
	let schema = serde_json::json!({
		"title": "Exact paper title",
		"one_liner": "Honest summary of what the paper actually does, at most 20 words",
		"key_innovation": "The specific technical change",
		"sota_comparison": "How it compares to the state of the art, stated skeptically",
		"score_novelty": "integer 0-4",
		"score_results": "integer 0-3",
		"score_completeness": "integer 0-3",
		"score": "integer, the sum of the three sub-scores"
	});
	let system_prompt = "You are an experienced ML researcher grading papers for quality and novelty. \
Output must be valid JSON only and must use the exact field names of the provided schema. \
Novelty 0-4: 0 trivial change, 1 minor increment, 2 clear new approach (most papers), \
3 significant architectural or methodological innovation, 4 paradigm shift. \
Results 0-3: 0 no quantitative results or worse than baseline, 1 matches baselines, \
2 clear improvement with evidence (most papers), 3 beats the state of the art by a large margin. \
Completeness 0-3: 0 theory only, 1 implementation described without code, \
2 code or a reproducible method (most papers), 3 full open source release with extensive experiments. \
score must equal score_novelty + score_results + score_completeness. An average paper scores 5 to 7.";
	let user_prompt =
		format!("Return JSON matching this exact schema:\n{schema}\nPaper text:\n{paper_text}");

	messages(system_prompt, user_prompt)
}

pub fn duplicate_messages(current: &PaperInsight, previous: &ArchiveEntry) -> Vec<Value> {
	let schema = serde_json::json!({
		"topic_overlap_score": "integer 0-10",
		"innovation_type": "None|Incremental|Breakthrough|Different_Field",
		"has_quantitative_improvement": "boolean",
		"reasoning_brief": "At most 15 words explaining the difference"
	});
	let system_prompt = "You are a patent examiner comparing a new paper with an archived one. \
Decide whether the new paper is a duplicate or an incremental update of the archived paper. \
Output must be valid JSON only and must match the provided schema exactly.";
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema}\n\
[ARCHIVED PAPER] {}\nSummary: {}\n\n[NEW PAPER] {}\nSummary: {}",
		previous.title, previous.summary, current.title, current.one_liner
	);

	messages(system_prompt, user_prompt)
}

pub fn hook_messages(summary: &str, profile: &ResearchProfile) -> Vec<Value> {
	let schema = serde_json::json!({ "reason": "One sentence" });
	let system_prompt = "You are a product manager connecting a paper to a reader's problems. \
Write one sentence explaining why the paper helps the reader. \
Start with \"This paper...\" or \"By using...\". Do not open with \"Given your challenges\". \
Output must be valid JSON only and must match the provided schema exactly.";
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema}\n\
[READER]\nPain points: {}\nInterests: {}\nField: {}\n\n[PAPER]\n{summary}",
		profile.pain_points().join(", "),
		profile.interests().join(", "),
		profile.context_tags().join(", ")
	);

	messages(system_prompt, user_prompt)
}

fn messages(system_prompt: &str, user_prompt: String) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_prompt_is_a_system_then_user_pair() {
		let built = intent_messages("I study efficient transformer inference");

		assert_eq!(built.len(), 2);
		assert_eq!(built[0]["role"], "system");
		assert_eq!(built[1]["role"], "user");
		assert!(
			built[1]["content"]
				.as_str()
				.is_some_and(|content| content.contains("efficient transformer inference"))
		);
	}

	#[test]
	fn hook_prompt_lists_profile_context() {
		let profile = ResearchProfile::new(
			vec!["speculative decoding".to_string()],
			vec!["LLM serving".to_string()],
			vec!["latency".to_string(), "memory".to_string()],
			vec![],
		)
		.expect("Profile must be valid.");
		let built = hook_messages("Drafts tokens with a small model.", &profile);
		let content = built[1]["content"].as_str().unwrap_or_default();

		assert!(content.contains("Pain points: latency, memory"));
		assert!(content.contains("Interests: speculative decoding"));
		assert!(content.contains("Field: LLM serving"));
	}
}
