use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Badge {
	#[serde(rename = "Top Pick")]
	TopPick,
	#[serde(rename = "SOTA Beat")]
	SotaBeat,
	#[serde(rename = "New Arch")]
	NewArch,
	#[serde(rename = "Topic Match")]
	TopicMatch,
}
impl Badge {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::TopPick => "Top Pick",
			Self::SotaBeat => "SOTA Beat",
			Self::NewArch => "New Arch",
			Self::TopicMatch => "Topic Match",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Card {
	pub id: String,
	pub rank: u32,
	pub title: String,
	pub badges: Vec<Badge>,
	pub personalized_reason: String,
	pub tldr: String,
	pub metrics_novelty_pct: u32,
	pub metrics_results_pct: u32,
	pub metrics_completeness_pct: u32,
	pub raw_novelty: u32,
	pub raw_results: u32,
	pub raw_completeness: u32,
	pub read_link: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Briefing {
	pub user_intent: Vec<String>,
	pub timestamp: String,
	pub cards: Vec<Card>,
}
impl Briefing {
	pub fn is_empty(&self) -> bool {
		self.cards.is_empty()
	}
}
