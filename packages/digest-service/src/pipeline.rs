use serde::{Deserialize, Serialize};

use digest_domain::{
	calendar,
	card::Briefing,
	duplicate::DuplicateJudgment,
	insight::PaperInsight,
	profile::{IntentExtraction, ResearchProfile},
	ranking::{self, CardDraft, PriorityPolicy, ScoredCandidate},
};
use digest_providers::papers;

use crate::{DigestService, Error, PaperCandidate, Result, Stage, prompts};

const RUN_LABEL_LATEST: &str = "Today";
const FETCH_FAILURE_MARKERS: [&str; 3] =
	["Abstract header not found", "Abstract not found", "Page fetch failed"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BriefingRequest {
	pub user_prompt: String,
	pub target_date: Option<String>,
	pub max_candidates: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BriefingReport {
	pub briefing: Briefing,
	pub decisions: Vec<CandidateDecision>,
}
impl BriefingReport {
	pub fn skipped(&self, reason: SkipReason) -> usize {
		self.decisions
			.iter()
			.filter(|decision| decision.outcome == CandidateOutcome::Skipped { reason })
			.count()
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateDecision {
	pub id: String,
	pub title: String,
	pub outcome: CandidateOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
	Accepted { priority: f32 },
	Skipped { reason: SkipReason },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
	FetchFailed,
	AnalysisFailed,
	LowQuality,
	Duplicate,
	LowRelevance,
	RelevanceFailed,
}
impl SkipReason {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::FetchFailed => "fetch_failed",
			Self::AnalysisFailed => "analysis_failed",
			Self::LowQuality => "low_quality",
			Self::Duplicate => "duplicate",
			Self::LowRelevance => "low_relevance",
			Self::RelevanceFailed => "relevance_failed",
		}
	}
}

#[derive(Debug, Deserialize)]
struct Hook {
	reason: String,
}

struct DuplicateCheck {
	duplicate: bool,
	summary_vector: Option<Vec<f32>>,
}
impl DuplicateCheck {
	fn new(duplicate: bool, summary_vector: Option<Vec<f32>>) -> Self {
		Self { duplicate, summary_vector }
	}
}

struct RunContext<'a> {
	profile: &'a ResearchProfile,
	keywords: &'a [String],
	policy: PriorityPolicy,
}

impl DigestService {
	/// Runs one briefing end to end.
	///
	/// Only intent extraction can fail the run. Every other failure skips the candidate at hand and
	/// is reported in `decisions`.
	pub async fn run(&self, req: BriefingRequest) -> Result<BriefingReport> {
		let limit = validate_request(&req, self.cfg.pipeline.max_candidates)?;
		let profile = self.extract_profile(&req.user_prompt).await?;

		tracing::info!(
			interests = ?profile.interests(),
			negative_keywords = ?profile.negative_keywords(),
			"Research profile extracted."
		);

		let candidates = self.list_candidates(req.target_date.as_deref(), limit).await;
		let keywords = ranking::topic_keywords(profile.interests());
		let ctx = RunContext {
			profile: &profile,
			keywords: &keywords,
			policy: PriorityPolicy::from_config(&self.cfg.pipeline),
		};
		let mut scored = Vec::new();
		let mut decisions = Vec::with_capacity(candidates.len());

		for candidate in candidates {
			let Some(id) = candidate.id.as_deref().filter(|id| !id.trim().is_empty()) else {
				tracing::info!(title = %candidate.title, "Discarding candidate without an id.");

				continue;
			};
			let outcome = match self.process_candidate(id, &candidate, &ctx).await {
				Ok(accepted) => {
					let priority = accepted.priority;

					scored.push(accepted);

					CandidateOutcome::Accepted { priority }
				},
				Err(reason) => {
					tracing::info!(id, reason = reason.as_str(), "Candidate skipped.");

					CandidateOutcome::Skipped { reason }
				},
			};

			decisions.push(CandidateDecision {
				id: id.to_string(),
				title: candidate.title.clone(),
				outcome,
			});
		}

		let cards = ranking::rank_candidates(scored, self.cfg.pipeline.top_n as usize);

		tracing::info!(
			candidates = decisions.len(),
			cards = cards.len(),
			"Briefing assembled."
		);

		Ok(BriefingReport {
			briefing: Briefing {
				user_intent: profile.interests().to_vec(),
				timestamp: req.target_date.unwrap_or_else(|| RUN_LABEL_LATEST.to_string()),
				cards,
			},
			decisions,
		})
	}

	async fn extract_profile(&self, user_prompt: &str) -> Result<ResearchProfile> {
		let intent: IntentExtraction = self
			.infer_json(Stage::Intent, &prompts::intent_messages(user_prompt))
			.await
			.map_err(|err| Error::Intent { message: err.to_string() })?;

		ResearchProfile::from_intent(intent).map_err(|err| Error::Intent { message: err.to_string() })
	}

	async fn list_candidates(&self, date: Option<&str>, limit: usize) -> Vec<PaperCandidate> {
		let source = self.providers.papers.list_candidates(&self.cfg.providers.papers, date, limit);

		match self.bounded(Stage::Candidates, source).await {
			Ok(mut candidates) => {
				candidates.truncate(limit);

				tracing::info!(count = candidates.len(), "Candidate papers listed.");

				candidates
			},
			Err(err) => {
				tracing::warn!(error = %err, "Candidate list unavailable. Treating the feed as empty.");

				Vec::new()
			},
		}
	}

	async fn process_candidate(
		&self,
		id: &str,
		candidate: &PaperCandidate,
		ctx: &RunContext<'_>,
	) -> std::result::Result<ScoredCandidate, SkipReason> {
		let text = self.fetch_text(id).await.map_err(|err| {
			tracing::warn!(id, error = %err, "Paper text unavailable.");

			SkipReason::FetchFailed
		})?;
		let insight = self.analyze(&text).await.map_err(|err| {
			tracing::warn!(id, error = %err, "Paper analysis failed.");

			SkipReason::AnalysisFailed
		})?;

		if insight.score < self.cfg.pipeline.min_quality_score {
			tracing::info!(id, score = insight.score, "Paper below the quality bar.");

			return Err(SkipReason::LowQuality);
		}

		let check = self.check_duplicate(id, &insight).await;

		if check.duplicate {
			return Err(SkipReason::Duplicate);
		}

		let archived = match check.summary_vector {
			Some(embedding) => self.save_embedded(&insight, embedding),
			None => self.save(&insight).await,
		};

		if let Err(err) = archived {
			tracing::error!(id, error = %err, "Failed to archive paper.");
		}

		let relevance =
			self.calculate_relevance(&insight.one_liner, ctx.profile).await.map_err(|err| {
				tracing::warn!(id, error = %err, "Relevance scoring failed.");

				SkipReason::RelevanceFailed
			})?;

		if relevance <= self.cfg.pipeline.relevance_threshold {
			tracing::info!(id, relevance, "Paper below the relevance bar.");

			return Err(SkipReason::LowRelevance);
		}

		let hook = self.personalize(&insight.one_liner, ctx.profile).await;
		let prioritized = ranking::prioritize(&insight, relevance, ctx.keywords, &ctx.policy);
		let read_link = papers::paper_url(&self.cfg.providers.papers, id);

		tracing::info!(
			id,
			title = %candidate.title,
			score = insight.score,
			relevance,
			priority = prioritized.priority,
			"Candidate accepted."
		);

		Ok(ScoredCandidate {
			priority: prioritized.priority,
			draft: CardDraft::new(id, &insight, prioritized.badges, hook, read_link),
		})
	}

	async fn fetch_text(&self, id: &str) -> Result<String> {
		let text = self
			.bounded(
				Stage::Fetch,
				self.providers.papers.fetch_text(&self.cfg.providers.papers, id),
			)
			.await?;

		if text.trim().is_empty() {
			return Err(Error::Fetch { message: "Paper text is empty.".to_string() });
		}
		if let Some(marker) = FETCH_FAILURE_MARKERS.iter().find(|marker| text.contains(**marker)) {
			return Err(Error::Fetch { message: format!("Paper source reported: {marker}.") });
		}

		Ok(text)
	}

	async fn analyze(&self, text: &str) -> Result<PaperInsight> {
		let text = truncate_chars(text, self.cfg.pipeline.max_paper_chars as usize);
		let insight: PaperInsight =
			self.infer_json(Stage::Analysis, &prompts::insight_messages(text)).await?;

		insight.validate()?;

		Ok(insight)
	}

	/// Duplicate gate. Lookup and judgment failures both count as "not a duplicate".
	///
	/// The lookup vector is handed back so the archive write can reuse it.
	async fn check_duplicate(&self, id: &str, insight: &PaperInsight) -> DuplicateCheck {
		let query = match self.lookup_vector(&insight.one_liner).await {
			Ok(Some(query)) => query,
			Ok(None) => return DuplicateCheck::new(false, None),
			Err(err) => {
				tracing::warn!(id, error = %err, "Archive lookup failed. Treating paper as new.");

				return DuplicateCheck::new(false, None);
			},
		};
		let Some(previous) = self.archive.nearest(&query) else {
			return DuplicateCheck::new(false, Some(query));
		};
		let duplicate = match self.judge_duplicate(insight, &previous).await {
			Ok(judgment) => {
				let significant =
					judgment.is_significant_at(self.cfg.pipeline.duplicate_overlap_threshold);

				tracing::info!(
					id,
					archived = %previous.title,
					overlap = judgment.topic_overlap_score,
					innovation = ?judgment.innovation_type,
					significant,
					reasoning = %judgment.reasoning_brief,
					"Duplicate judgment."
				);

				!significant
			},
			Err(err) => {
				tracing::warn!(id, error = %err, "Duplicate judgment failed. Treating paper as new.");

				false
			},
		};

		DuplicateCheck::new(duplicate, Some(query))
	}

	async fn judge_duplicate(
		&self,
		insight: &PaperInsight,
		previous: &digest_storage::models::ArchiveEntry,
	) -> Result<DuplicateJudgment> {
		let judgment: DuplicateJudgment = self
			.infer_json(Stage::DuplicateJudgment, &prompts::duplicate_messages(insight, previous))
			.await?;

		judgment.validate()?;

		Ok(judgment)
	}

	async fn personalize(&self, summary: &str, profile: &ResearchProfile) -> String {
		let hook: Result<Hook> =
			self.infer_json(Stage::Personalization, &prompts::hook_messages(summary, profile)).await;

		match hook {
			Ok(hook) if !hook.reason.trim().is_empty() => hook.reason.trim().to_string(),
			Ok(_) => fallback_hook(profile),
			Err(err) => {
				tracing::warn!(error = %err, "Hook generation failed. Using fallback.");

				fallback_hook(profile)
			},
		}
	}
}

fn validate_request(req: &BriefingRequest, default_limit: u32) -> Result<usize> {
	if req.user_prompt.trim().is_empty() {
		return Err(Error::InvalidRequest { message: "user_prompt must not be empty.".to_string() });
	}

	let limit = req.max_candidates.unwrap_or(default_limit);

	if limit == 0 {
		return Err(Error::InvalidRequest {
			message: "max_candidates must be greater than zero.".to_string(),
		});
	}
	if let Some(date) = req.target_date.as_deref() {
		calendar::parse_date(date).map_err(|_| Error::InvalidRequest {
			message: "target_date must be formatted as YYYY-MM-DD.".to_string(),
		})?;
	}

	Ok(limit as usize)
}

fn fallback_hook(profile: &ResearchProfile) -> String {
	match profile.pain_points().first() {
		Some(pain_point) => format!("Relevant to {pain_point}."),
		None => "Relevant to your research.".to_string(),
	}
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}
