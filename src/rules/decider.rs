use crate::error::Result;
use crate::request::ValidationError;
use crate::rules::matcher::{self, MatchTrace, PatternSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The perspective a redirect decision is requested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
	Client,
	Agent,
}

impl Side {
	pub fn as_str(&self) -> &'static str {
		match self {
			Side::Client => "Client",
			Side::Agent => "Agent",
		}
	}
}

impl fmt::Display for Side {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Side {
	type Err = ValidationError;

	/// Accepts exactly `Client` or `Agent`; case matters.
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"Client" => Ok(Side::Client),
			"Agent" => Ok(Side::Agent),
			_ => Err(ValidationError::InvalidSide {
				value: s.to_string(),
			}),
		}
	}
}

/// The outcome of a redirect decision for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectReport {
	pub test_url: String,
	pub side: Side,
	pub redirected: bool,
	pub client: MatchTrace,
	pub agent: MatchTrace,
}

impl RedirectReport {
	/// The verdict as a sentence, e.g. `Redirect the URL from Client`.
	pub fn verdict(&self) -> String {
		if self.redirected {
			format!("Redirect the URL from {}", self.side)
		} else {
			format!("Not Redirect the URL from {}", self.side)
		}
	}
}

/// Apply the side precedence rule.
///
/// Redirect is suppressed only when the other side matched and this side
/// did not.
pub fn is_redirected(own_matched: bool, other_matched: bool) -> bool {
	!other_matched || own_matched
}

/// Decide whether `url` is redirected from `side`, given both rule strings.
pub fn decide(
	url: &str,
	client_rules: &str,
	agent_rules: &str,
	side: Side,
) -> Result<RedirectReport> {
	let client = matcher::evaluate(url, client_rules)?;
	let agent = matcher::evaluate(url, agent_rules)?;
	Ok(assemble(url, client, agent, side))
}

/// Same as [`decide`], from already-built pattern sets.
pub fn decide_sets(
	url: &str,
	client_rules: &PatternSet,
	agent_rules: &PatternSet,
	side: Side,
) -> Result<RedirectReport> {
	let client = client_rules.evaluate(url)?;
	let agent = agent_rules.evaluate(url)?;
	Ok(assemble(url, client, agent, side))
}

fn assemble(url: &str, client: MatchTrace, agent: MatchTrace, side: Side) -> RedirectReport {
	let (own, other) = match side {
		Side::Client => (&client, &agent),
		Side::Agent => (&agent, &client),
	};
	let redirected = is_redirected(own.any_matched(), other.any_matched());

	tracing::debug!(url, %side, redirected, "redirect decision");

	RedirectReport {
		test_url: url.to_string(),
		side,
		redirected,
		client,
		agent,
	}
}
