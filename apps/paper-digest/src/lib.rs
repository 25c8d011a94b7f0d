use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use color_eyre::eyre;
use rand::Rng;
use time::{Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

use digest_domain::{
	calendar::{self, DateStrategy},
	card::Briefing,
};
use digest_service::{BriefingReport, BriefingRequest, CandidateOutcome, DigestService};

pub const BRIEFING_FILE: &str = "daily_briefing.json";

#[derive(Debug, Parser)]
#[command(
	version = digest_cli::VERSION,
	rename_all = "kebab",
	styles = digest_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Freeform description of what you research and what you want to avoid.
	#[arg(long, value_name = "TEXT")]
	pub prompt: String,
	/// Feed date to read. Takes precedence over `--date-strategy`.
	#[arg(long, value_name = "YYYY-MM-DD")]
	pub date: Option<String>,
	#[arg(long, value_enum, value_name = "STRATEGY")]
	pub date_strategy: Option<DateChoice>,
	/// Defaults to `pipeline.max_candidates`.
	#[arg(long, value_name = "N")]
	pub max_papers: Option<u32>,
	#[arg(long, value_name = "DIR", default_value = "output")]
	pub output_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DateChoice {
	Today,
	Yesterday,
	/// A weekday between 1 and 30 days back.
	Random,
}
impl From<DateChoice> for DateStrategy {
	fn from(choice: DateChoice) -> Self {
		match choice {
			DateChoice::Today => Self::Today,
			DateChoice::Yesterday => Self::Yesterday,
			DateChoice::Random => {
				Self::DaysBack(rand::thread_rng().gen_range(1..=calendar::RANDOM_LOOKBACK_DAYS))
			},
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = digest_config::load(&args.config)?;

	init_tracing(&config)?;

	let target_date = resolve_target_date(
		args.date.as_deref(),
		args.date_strategy,
		OffsetDateTime::now_utc().date(),
	)?;

	tracing::info!(target_date = target_date.as_deref().unwrap_or("latest"), "Starting briefing.");

	let service = DigestService::new(config);
	let report = service
		.run(BriefingRequest {
			user_prompt: args.prompt,
			target_date,
			max_candidates: args.max_papers,
		})
		.await?;
	let path = write_briefing(&args.output_dir, &report.briefing)?;

	tracing::info!(path = %path.display(), cards = report.briefing.cards.len(), "Briefing written.");

	print!("{}", render_summary(&report));

	Ok(())
}

/// An explicit date wins; otherwise the strategy picks a weekday; with neither the latest feed is
/// read.
pub fn resolve_target_date(
	date: Option<&str>,
	strategy: Option<DateChoice>,
	today: Date,
) -> color_eyre::Result<Option<String>> {
	if let Some(date) = date {
		let parsed = calendar::parse_date(date)
			.map_err(|err| eyre::eyre!("--date must be formatted as YYYY-MM-DD: {err}."))?;

		return Ok(Some(calendar::format_date(parsed)?));
	}

	match strategy {
		Some(choice) => {
			let date = calendar::research_date(choice.into(), today);

			Ok(Some(calendar::format_date(date)?))
		},
		None => Ok(None),
	}
}

pub fn write_briefing(dir: &Path, briefing: &Briefing) -> color_eyre::Result<PathBuf> {
	fs::create_dir_all(dir)?;

	let path = dir.join(BRIEFING_FILE);
	let payload = serde_json::to_string_pretty(briefing)?;

	fs::write(&path, payload)?;

	Ok(path)
}

pub fn render_summary(report: &BriefingReport) -> String {
	let mut out = String::new();
	let accepted = report
		.decisions
		.iter()
		.filter(|decision| matches!(decision.outcome, CandidateOutcome::Accepted { .. }))
		.count();

	out.push_str(&format!(
		"Processed {} candidates, {accepted} accepted ({}).\n",
		report.decisions.len(),
		report.briefing.timestamp
	));

	if report.briefing.is_empty() {
		out.push_str("No papers qualified. Try one of the following:\n");
		out.push_str("  - Broaden the interests in your prompt.\n");
		out.push_str("  - Remove negative keywords that may be too strict.\n");
		out.push_str("  - Pick another date with --date or --date-strategy.\n");
		out.push_str("  - Raise --max-papers to read more of the feed.\n");

		return out;
	}

	for card in &report.briefing.cards {
		let badges = card.badges.iter().map(|badge| badge.as_str()).collect::<Vec<_>>();

		out.push_str(&format!("#{} {}\n", card.rank, card.title));

		if !badges.is_empty() {
			out.push_str(&format!("   [{}]\n", badges.join(", ")));
		}

		out.push_str(&format!("   {}\n", card.tldr));
		out.push_str(&format!("   {}\n", card.personalized_reason));
		out.push_str(&format!("   {}\n", card.read_link));
	}

	out
}

fn init_tracing(config: &digest_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
