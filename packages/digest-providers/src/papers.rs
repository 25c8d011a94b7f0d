use std::time::Duration;

use regex::Regex;
use reqwest::{
	Client,
	header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; digest/0.1)";
const ABSTRACT_HEADER: &str = "Abstract</h2>";
const AI_SUMMARY_PATTERN: &str = r#"(?s)class="text-blue-700[^"]*">(.*?)</p>"#;
const ABSTRACT_PATTERN: &str = r#"(?s)class="text-gray-600">(.*?)</p>"#;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaperCandidate {
	pub title: String,
	pub url: String,
	pub upvotes: u64,
	pub id: Option<String>,
}

pub fn paper_url(cfg: &digest_config::PaperFeedConfig, id: &str) -> String {
	format!("{}/papers/{id}", cfg.api_base.trim_end_matches('/'))
}

pub async fn list_candidates(
	cfg: &digest_config::PaperFeedConfig,
	date: Option<&str>,
	limit: usize,
) -> Result<Vec<PaperCandidate>> {
	let client = build_client(cfg)?;
	let url = format!("{}/api/daily_papers", cfg.api_base.trim_end_matches('/'));
	let mut req = client.get(url);

	if let Some(date) = date {
		req = req.query(&[("date", date)]);
	}

	let json: Value = req.send().await?.error_for_status()?.json().await?;

	parse_daily_papers(cfg, json, limit)
}

pub async fn fetch_text(cfg: &digest_config::PaperFeedConfig, id: &str) -> Result<String> {
	let client = build_client(cfg)?;
	let html = client.get(paper_url(cfg, id)).send().await?.error_for_status()?.text().await?;

	parse_paper_page(&html)
}

fn build_client(cfg: &digest_config::PaperFeedConfig) -> Result<Client> {
	let mut headers = HeaderMap::new();
	let agent = cfg.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

	headers.insert(USER_AGENT, HeaderValue::from_str(agent)?);

	Ok(Client::builder()
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.default_headers(headers)
		.build()?)
}

fn parse_daily_papers(
	cfg: &digest_config::PaperFeedConfig,
	json: Value,
	limit: usize,
) -> Result<Vec<PaperCandidate>> {
	let items = json.as_array().ok_or_else(|| Error::InvalidResponse {
		message: "Daily papers response is not an array.".to_string(),
	})?;
	let mut papers = Vec::with_capacity(items.len().min(limit));

	for item in items.iter().take(limit) {
		let paper = item.get("paper");
		let title = item
			.get("title")
			.and_then(Value::as_str)
			.or_else(|| paper.and_then(|p| p.get("title")).and_then(Value::as_str));
		let Some(title) = title else {
			tracing::warn!("Skipping daily paper item without a title.");

			continue;
		};
		let id = paper
			.and_then(|p| p.get("id"))
			.and_then(Value::as_str)
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.map(str::to_string);
		let upvotes = item
			.get("upvotes")
			.and_then(Value::as_u64)
			.or_else(|| paper.and_then(|p| p.get("upvotes")).and_then(Value::as_u64))
			.unwrap_or(0);
		let url = id.as_deref().map(|id| paper_url(cfg, id)).unwrap_or_default();

		papers.push(PaperCandidate { title: title.trim().to_string(), url, upvotes, id });
	}

	Ok(papers)
}

fn parse_paper_page(html: &str) -> Result<String> {
	let Some((_, section)) = html.split_once(ABSTRACT_HEADER) else {
		return Err(Error::InvalidResponse {
			message: "Abstract header not found on page.".to_string(),
		});
	};
	let ai_summary = first_capture(AI_SUMMARY_PATTERN, section)?;
	let real_abstract = first_capture(ABSTRACT_PATTERN, section)?;
	let mut out = String::from("Source: Hugging Face Page\n");

	if let Some(summary) = ai_summary {
		out.push_str(&format!("AI Summary: {summary}\n\n"));
	}

	match real_abstract {
		Some(text) => out.push_str(&format!("Full Abstract: {text}")),
		None => out.push_str("Abstract text could not be parsed."),
	}

	Ok(out)
}

fn first_capture(pattern: &str, haystack: &str) -> Result<Option<String>> {
	let re = Regex::new(pattern)?;

	Ok(re
		.captures(haystack)
		.and_then(|caps| caps.get(1))
		.map(|m| m.as_str().trim().to_string())
		.filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn feed_config() -> digest_config::PaperFeedConfig {
		digest_config::PaperFeedConfig {
			api_base: "https://huggingface.co/".to_string(),
			timeout_ms: 1_000,
			user_agent: None,
		}
	}

	#[test]
	fn daily_papers_keep_feed_order_and_limit() {
		let json = serde_json::json!([
			{ "title": "First", "upvotes": 12, "paper": { "id": "2601.00001" } },
			{ "paper": { "id": "2601.00002", "title": "Second", "upvotes": 3 } },
			{ "title": "Third", "paper": {} },
			{ "title": "Fourth", "paper": { "id": "2601.00004" } }
		]);
		let papers = parse_daily_papers(&feed_config(), json, 3).expect("parse failed");

		assert_eq!(papers.len(), 3);
		assert_eq!(papers[0].url, "https://huggingface.co/papers/2601.00001");
		assert_eq!(papers[0].upvotes, 12);
		assert_eq!(papers[1].title, "Second");
		assert_eq!(papers[1].upvotes, 3);
		assert_eq!(papers[2].id, None);
		assert_eq!(papers[2].url, "");
	}

	#[test]
	fn paper_page_yields_summary_and_abstract() {
		let html = r#"<h2>Abstract</h2><p class="text-blue-700 dark:text-blue-300">
			Faster decoding.</p><p class="text-gray-600">We propose a decoder.</p>"#;
		let text = parse_paper_page(html).expect("parse failed");

		assert_eq!(
			text,
			"Source: Hugging Face Page\nAI Summary: Faster decoding.\n\nFull Abstract: We propose a decoder."
		);
	}

	#[test]
	fn paper_page_without_abstract_paragraph_is_marked() {
		let text = parse_paper_page("<h2>Abstract</h2><div></div>").expect("parse failed");

		assert!(text.ends_with("Abstract text could not be parsed."));
	}

	#[test]
	fn paper_page_without_header_is_an_error() {
		assert!(parse_paper_page("<html></html>").is_err());
	}
}
