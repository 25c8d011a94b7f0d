use digest_config::Pipeline;

use crate::{
	card::{Badge, Card},
	insight::{self, MAX_COMPLETENESS, MAX_NOVELTY, MAX_RESULTS, PaperInsight},
};

const MIN_KEYWORD_CHARS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriorityPolicy {
	pub relevance_weight: f32,
	pub topic_match_boost: f32,
}
impl PriorityPolicy {
	pub fn from_config(cfg: &Pipeline) -> Self {
		Self { relevance_weight: cfg.relevance_weight, topic_match_boost: cfg.topic_match_boost }
	}
}
impl Default for PriorityPolicy {
	fn default() -> Self {
		Self::from_config(&Pipeline::default())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prioritized {
	pub priority: f32,
	pub badges: Vec<Badge>,
}

/// An accepted paper before ranking. Never mutated; ranking consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct CardDraft {
	pub id: String,
	pub title: String,
	pub badges: Vec<Badge>,
	pub personalized_reason: String,
	pub tldr: String,
	pub raw_novelty: u32,
	pub raw_results: u32,
	pub raw_completeness: u32,
	pub read_link: String,
}
impl CardDraft {
	pub fn new(
		id: impl Into<String>,
		insight: &PaperInsight,
		badges: Vec<Badge>,
		personalized_reason: impl Into<String>,
		read_link: impl Into<String>,
	) -> Self {
		Self {
			id: id.into(),
			title: insight.title.clone(),
			badges,
			personalized_reason: personalized_reason.into(),
			tldr: insight.one_liner.clone(),
			raw_novelty: insight.score_novelty,
			raw_results: insight.score_results,
			raw_completeness: insight.score_completeness,
			read_link: read_link.into(),
		}
	}

	fn into_card(self, rank: u32) -> Card {
		let CardDraft {
			id,
			title,
			badges,
			personalized_reason,
			tldr,
			raw_novelty,
			raw_results,
			raw_completeness,
			read_link,
		} = self;
		let badges = if rank == 1 {
			std::iter::once(Badge::TopPick).chain(badges).collect()
		} else {
			badges
		};

		Card {
			id,
			rank,
			title,
			badges,
			personalized_reason,
			tldr,
			metrics_novelty_pct: insight::percentage(raw_novelty, MAX_NOVELTY),
			metrics_results_pct: insight::percentage(raw_results, MAX_RESULTS),
			metrics_completeness_pct: insight::percentage(raw_completeness, MAX_COMPLETENESS),
			raw_novelty,
			raw_results,
			raw_completeness,
			read_link,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
	pub priority: f32,
	pub draft: CardDraft,
}

pub fn prioritize(
	insight: &PaperInsight,
	relevance: f32,
	keywords: &[String],
	policy: &PriorityPolicy,
) -> Prioritized {
	let mut badges = Vec::new();

	if insight.score_results == MAX_RESULTS {
		badges.push(Badge::SotaBeat);
	}
	if insight.score_novelty == MAX_NOVELTY {
		badges.push(Badge::NewArch);
	}

	let mut priority = insight.score as f32 + relevance * policy.relevance_weight;

	if matched_keyword(&insight.title, keywords).is_some() {
		priority += policy.topic_match_boost;

		badges.push(Badge::TopicMatch);
	}

	Prioritized { priority, badges }
}

/// Lower-cased interest words longer than two characters, first occurrence order.
pub fn topic_keywords(interests: &[String]) -> Vec<String> {
	let mut keywords: Vec<String> = Vec::new();

	for interest in interests {
		for word in interest.to_lowercase().split_whitespace() {
			if word.chars().count() >= MIN_KEYWORD_CHARS && !keywords.iter().any(|kw| kw == word)
			{
				keywords.push(word.to_string());
			}
		}
	}

	keywords
}

pub fn matched_keyword<'a>(title: &str, keywords: &'a [String]) -> Option<&'a str> {
	let title = title.to_lowercase();

	keywords.iter().find(|keyword| title_matches(&title, keyword)).map(String::as_str)
}

fn title_matches(title: &str, keyword: &str) -> bool {
	// A plural form in the title already contains the keyword itself.
	title.contains(keyword)
		|| keyword
			.strip_suffix('s')
			.is_some_and(|singular| !singular.is_empty() && title.contains(singular))
}

/// Stable sort by priority, highest first, then keep the first `top_n` and assign 1-based ranks.
pub fn rank_candidates(mut scored: Vec<ScoredCandidate>, top_n: usize) -> Vec<Card> {
	scored.sort_by(|lhs, rhs| rhs.priority.total_cmp(&lhs.priority));

	scored
		.into_iter()
		.take(top_n)
		.zip(1..)
		.map(|(candidate, rank)| candidate.draft.into_card(rank))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn insight(title: &str, novelty: u32, results: u32, completeness: u32) -> PaperInsight {
		PaperInsight {
			title: title.to_string(),
			one_liner: format!("{title} summary."),
			key_innovation: "n/a".to_string(),
			sota_comparison: "n/a".to_string(),
			score_novelty: novelty,
			score_results: results,
			score_completeness: completeness,
			score: novelty + results + completeness,
		}
	}

	#[test]
	fn keywords_skip_short_words_and_duplicates() {
		let interests = vec!["AI for Robotics".to_string(), "robotics at scale".to_string()];

		assert_eq!(topic_keywords(&interests), vec!["for", "robotics", "scale"]);
	}

	#[test]
	fn singular_folding_matches_title() {
		let keywords = vec!["transformers".to_string()];

		assert_eq!(matched_keyword("A Transformer for Audio", &keywords), Some("transformers"));
	}

	#[test]
	fn plural_title_matches_singular_keyword() {
		let keywords = vec!["agent".to_string()];

		assert_eq!(matched_keyword("Cooperative Agents", &keywords), Some("agent"));
	}

	#[test]
	fn badges_follow_sub_scores() {
		let prioritized =
			prioritize(&insight("Graph Kernels", 4, 3, 1), 0.5, &[], &PriorityPolicy::default());

		assert_eq!(prioritized.badges, vec![Badge::SotaBeat, Badge::NewArch]);
		assert_eq!(prioritized.priority, 18.0);
	}

	#[test]
	fn top_pick_only_on_first_rank() {
		let scored = ["A", "B"]
			.iter()
			.zip([1.0_f32, 2.0])
			.map(|(id, priority)| ScoredCandidate {
				priority,
				draft: CardDraft::new(*id, &insight(id, 2, 2, 2), vec![Badge::SotaBeat], "", ""),
			})
			.collect();
		let cards = rank_candidates(scored, 3);

		assert_eq!(cards[0].id, "B");
		assert_eq!(cards[0].badges, vec![Badge::TopPick, Badge::SotaBeat]);
		assert_eq!(cards[1].badges, vec![Badge::SotaBeat]);
	}
}
