//! Rendering of redirect reports for consumers.
//!
//! The JSON document produced here is the wire contract shared with existing
//! consumers, so field names and string literals must not change.

use crate::rules::{MatchTrace, RedirectReport};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Aggregate match label for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideMatchResult {
	Matched,
	MisMatched,
}

impl SideMatchResult {
	pub fn as_str(&self) -> &'static str {
		match self {
			SideMatchResult::Matched => "Matched",
			SideMatchResult::MisMatched => "MisMatched",
		}
	}
}

impl fmt::Display for SideMatchResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<bool> for SideMatchResult {
	fn from(matched: bool) -> Self {
		if matched {
			SideMatchResult::Matched
		} else {
			SideMatchResult::MisMatched
		}
	}
}

/// One `{rule, status}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStatus {
	pub rule: String,
	pub status: bool,
}

/// Match results for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideDocument {
	#[serde(rename = "SideMatchResult")]
	pub side_match_result: SideMatchResult,

	#[serde(rename = "eachRuleResult")]
	pub each_rule_result: Vec<RuleStatus>,
}

impl From<&MatchTrace> for SideDocument {
	fn from(trace: &MatchTrace) -> Self {
		SideDocument {
			side_match_result: trace.any_matched().into(),
			each_rule_result: trace
				.entries()
				.iter()
				.map(|e| RuleStatus {
					rule: e.pattern.clone(),
					status: e.matched,
				})
				.collect(),
		}
	}
}

/// The serialized form of a [`RedirectReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDocument {
	#[serde(rename = "testUrl")]
	pub test_url: String,

	#[serde(rename = "IsRedirected")]
	pub is_redirected: String,

	#[serde(rename = "clientRules")]
	pub client_rules: SideDocument,

	#[serde(rename = "agentRules")]
	pub agent_rules: SideDocument,
}

impl From<&RedirectReport> for RedirectDocument {
	fn from(report: &RedirectReport) -> Self {
		RedirectDocument {
			test_url: report.test_url.clone(),
			is_redirected: report.verdict(),
			client_rules: SideDocument::from(&report.client),
			agent_rules: SideDocument::from(&report.agent),
		}
	}
}

/// Render a report as a compact JSON line.
pub fn to_json(report: &RedirectReport) -> serde_json::Result<String> {
	serde_json::to_string(&RedirectDocument::from(report))
}

/// Render a report as indented JSON.
pub fn to_json_pretty(report: &RedirectReport) -> serde_json::Result<String> {
	serde_json::to_string_pretty(&RedirectDocument::from(report))
}

/// Render a report for a terminal.
pub fn to_text(report: &RedirectReport) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "URL: {}", report.test_url);
	let _ = writeln!(out, "{}", report.verdict());

	for (name, trace) in [("clientRules", &report.client), ("agentRules", &report.agent)] {
		let label = SideMatchResult::from(trace.any_matched());
		let _ = writeln!(out, "\n{name}: {label}");
		if trace.entries().is_empty() {
			let _ = writeln!(out, "  (no rules)");
		}
		for entry in trace.entries() {
			let mark = if entry.matched { "match" } else { "miss " };
			let _ = writeln!(out, "  [{mark}] {}", entry.pattern);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::{Side, decide};
	use serde_json::json;

	#[test]
	fn test_document_field_names() {
		let report = decide("http://example.com/bar", "foo;bar", "", Side::Client).unwrap();
		let value = serde_json::to_value(RedirectDocument::from(&report)).unwrap();

		assert_eq!(
			value,
			json!({
				"testUrl": "http://example.com/bar",
				"IsRedirected": "Redirect the URL from Client",
				"clientRules": {
					"SideMatchResult": "Matched",
					"eachRuleResult": [
						{"rule": "foo", "status": false},
						{"rule": "bar", "status": true}
					]
				},
				"agentRules": {
					"SideMatchResult": "MisMatched",
					"eachRuleResult": []
				}
			})
		);
	}

	#[test]
	fn test_not_redirected_document() {
		let report = decide("http://example.com/a", "", "/a$", Side::Client).unwrap();
		let json = to_json(&report).unwrap();
		assert!(json.contains(r#""IsRedirected":"Not Redirect the URL from Client""#));
		assert!(json.contains(r#""clientRules":{"SideMatchResult":"MisMatched""#));
		assert!(json.contains(r#"{"rule":"/a$","status":true}"#));
	}

	#[test]
	fn test_pretty_json_parses_back() {
		let report = decide("http://example.com/a", "/a$", "zzz", Side::Agent).unwrap();
		let pretty = to_json_pretty(&report).unwrap();
		let doc: RedirectDocument = serde_json::from_str(&pretty).unwrap();
		assert_eq!(doc, RedirectDocument::from(&report));
		assert_eq!(doc.is_redirected, "Not Redirect the URL from Agent");
	}

	#[test]
	fn test_label_display_matches_wire_literal() {
		for matched in [true, false] {
			let label = SideMatchResult::from(matched);
			let wire = serde_json::to_value(label).unwrap();
			assert_eq!(wire, label.to_string());
		}
		assert_eq!(SideMatchResult::MisMatched.to_string(), "MisMatched");
	}

	#[test]
	fn test_text_rendering() {
		let report = decide("http://example.com/bar", "foo;bar", "", Side::Client).unwrap();
		let text = to_text(&report);
		assert!(text.contains("URL: http://example.com/bar"));
		assert!(text.contains("Redirect the URL from Client"));
		assert!(text.contains("clientRules: Matched"));
		assert!(text.contains("[miss ] foo"));
		assert!(text.contains("[match] bar"));
		assert!(text.contains("agentRules: MisMatched"));
		assert!(text.contains("(no rules)"));
	}
}
