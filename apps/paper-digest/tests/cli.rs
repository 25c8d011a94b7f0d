use clap::Parser;
use time::{Weekday, macros::date};

use digest_domain::{
	calendar,
	card::{Badge, Briefing, Card},
};
use digest_service::{BriefingReport, CandidateDecision, CandidateOutcome, SkipReason};
use digest_testkit::TempArchive;
use paper_digest::{Args, BRIEFING_FILE, DateChoice};

fn card() -> Card {
	Card {
		id: "2610.00001".to_string(),
		rank: 1,
		title: "Sparse Attention for Transformer Inference".to_string(),
		badges: vec![Badge::TopPick, Badge::TopicMatch],
		personalized_reason: "This paper cuts serving latency.".to_string(),
		tldr: "Transformer inference with learned sparse attention.".to_string(),
		metrics_novelty_pct: 75,
		metrics_results_pct: 67,
		metrics_completeness_pct: 100,
		raw_novelty: 3,
		raw_results: 2,
		raw_completeness: 3,
		read_link: "https://huggingface.co/papers/2610.00001".to_string(),
	}
}

fn report(cards: Vec<Card>, decisions: Vec<CandidateDecision>) -> BriefingReport {
	BriefingReport {
		briefing: Briefing {
			user_intent: vec!["efficient transformer inference".to_string()],
			timestamp: "Today".to_string(),
			cards,
		},
		decisions,
	}
}

fn decision(id: &str, outcome: CandidateOutcome) -> CandidateDecision {
	CandidateDecision { id: id.to_string(), title: format!("Paper {id}"), outcome }
}

#[test]
fn parses_kebab_case_flags() {
	let args = Args::try_parse_from([
		"paper-digest",
		"-c",
		"digest.toml",
		"--prompt",
		"efficient inference",
		"--date-strategy",
		"yesterday",
		"--max-papers",
		"4",
	])
	.expect("Arguments must parse.");

	assert_eq!(args.config.to_str(), Some("digest.toml"));
	assert_eq!(args.date_strategy, Some(DateChoice::Yesterday));
	assert_eq!(args.max_papers, Some(4));
	assert_eq!(args.output_dir.to_str(), Some("output"));
	assert_eq!(args.date, None);
}

#[test]
fn prompt_is_required() {
	assert!(Args::try_parse_from(["paper-digest", "-c", "digest.toml"]).is_err());
}

#[test]
fn explicit_date_wins_over_strategy() {
	let resolved = paper_digest::resolve_target_date(
		Some("2026-10-14"),
		Some(DateChoice::Yesterday),
		date!(2026 - 10 - 18),
	)
	.expect("Date must resolve.");

	assert_eq!(resolved.as_deref(), Some("2026-10-14"));
}

#[test]
fn strategy_skips_the_weekend() {
	let resolved =
		paper_digest::resolve_target_date(None, Some(DateChoice::Yesterday), date!(2026 - 10 - 18))
			.expect("Date must resolve.");

	assert_eq!(resolved.as_deref(), Some("2026-10-16"));
}

#[test]
fn random_strategy_picks_a_recent_weekday() {
	let today = date!(2026 - 10 - 18);

	for _ in 0..50 {
		let resolved = paper_digest::resolve_target_date(None, Some(DateChoice::Random), today)
			.expect("Date must resolve.")
			.expect("Random strategy must pick a date.");
		let picked = calendar::parse_date(&resolved).expect("Resolved date must parse.");
		let days_back = (today - picked).whole_days();

		assert!((1..=32).contains(&days_back), "{resolved} is {days_back} days back.");
		assert!(!matches!(picked.weekday(), Weekday::Saturday | Weekday::Sunday));
	}
}

#[test]
fn no_date_reads_the_latest_feed() {
	let resolved = paper_digest::resolve_target_date(None, None, date!(2026 - 10 - 18))
		.expect("Date must resolve.");

	assert_eq!(resolved, None);
}

#[test]
fn malformed_date_is_rejected() {
	assert!(paper_digest::resolve_target_date(Some("10/14/2026"), None, date!(2026 - 10 - 18)).is_err());
}

#[test]
fn briefing_is_written_as_pretty_json() {
	let temp = TempArchive::new();
	let out_dir = temp.dir().join("output");
	let briefing = report(vec![card()], Vec::new()).briefing;
	let path = paper_digest::write_briefing(&out_dir, &briefing).expect("Write must succeed.");

	assert_eq!(path, out_dir.join(BRIEFING_FILE));

	let raw = std::fs::read_to_string(&path).expect("Briefing must exist.");
	let value: serde_json::Value = serde_json::from_str(&raw).expect("Briefing must be JSON.");

	assert!(raw.contains("\n  \"user_intent\""));
	assert_eq!(value["cards"][0]["badges"], serde_json::json!(["Top Pick", "Topic Match"]));
	assert_eq!(value["timestamp"], "Today");
}

#[test]
fn empty_briefing_suggests_broadening() {
	let summary = paper_digest::render_summary(&report(
		Vec::new(),
		vec![decision("2610.00001", CandidateOutcome::Skipped { reason: SkipReason::LowQuality })],
	));

	assert!(summary.starts_with("Processed 1 candidates, 0 accepted (Today)."));
	assert!(summary.contains("Broaden the interests"));
}

#[test]
fn summary_lists_ranked_cards() {
	let summary = paper_digest::render_summary(&report(
		vec![card()],
		vec![decision("2610.00001", CandidateOutcome::Accepted { priority: 31.0 })],
	));

	assert!(summary.contains("#1 Sparse Attention for Transformer Inference"));
	assert!(summary.contains("[Top Pick, Topic Match]"));
	assert!(!summary.contains("Broaden"));
}
