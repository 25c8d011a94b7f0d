use serde::{Deserialize, Serialize};
use time::{Date, Duration, Weekday, macros::format_description};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStrategy {
	Today,
	Yesterday,
	DaysBack(u8),
}

/// Upper bound of the randomized look-back window, in days.
pub const RANDOM_LOOKBACK_DAYS: u8 = 30;

/// Feed date for a strategy. Weekends slide back to the preceding Friday.
pub fn research_date(strategy: DateStrategy, today: Date) -> Date {
	let candidate = match strategy {
		DateStrategy::Today => today,
		DateStrategy::Yesterday => today - Duration::days(1),
		DateStrategy::DaysBack(days) => today - Duration::days(i64::from(days)),
	};

	match candidate.weekday() {
		Weekday::Saturday => candidate - Duration::days(1),
		Weekday::Sunday => candidate - Duration::days(2),
		_ => candidate,
	}
}

pub fn format_date(date: Date) -> Result<String, time::error::Format> {
	date.format(format_description!("[year]-[month]-[day]"))
}

pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
	Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	#[test]
	fn weekday_is_kept() {
		assert_eq!(research_date(DateStrategy::Today, date!(2026 - 10 - 14)), date!(2026 - 10 - 14));
	}

	#[test]
	fn weekend_slides_to_friday() {
		assert_eq!(research_date(DateStrategy::Today, date!(2026 - 10 - 17)), date!(2026 - 10 - 16));
		assert_eq!(
			research_date(DateStrategy::Yesterday, date!(2026 - 10 - 19)),
			date!(2026 - 10 - 16)
		);
	}

	#[test]
	fn days_back_slides_like_the_other_strategies() {
		assert_eq!(
			research_date(DateStrategy::DaysBack(3), date!(2026 - 10 - 14)),
			date!(2026 - 10 - 09)
		);
		assert_eq!(
			research_date(DateStrategy::DaysBack(4), date!(2026 - 10 - 18)),
			date!(2026 - 10 - 14)
		);
	}

	#[test]
	fn dates_round_trip_through_the_feed_format() {
		let parsed = parse_date("2026-03-09").expect("Expected a valid date.");

		assert_eq!(parsed, date!(2026 - 03 - 09));
		assert_eq!(format_date(parsed).expect("Expected formatting."), "2026-03-09");
		assert!(parse_date("03/09/2026").is_err());
	}
}
