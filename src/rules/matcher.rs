use crate::error::{Error, Result};
use fancy_regex::Regex;

/// Separator between patterns in a rule string.
pub const RULE_DELIMITER: char = ';';

/// An ordered set of regex patterns for one side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
	patterns: Vec<String>,
}

impl PatternSet {
	/// Split a `;`-joined rule string into its patterns.
	///
	/// An empty string is the empty set. Pieces are not trimmed, and empty
	/// pieces are kept as literal (match-everything) patterns.
	pub fn parse(rules: &str) -> Self {
		if rules.is_empty() {
			return Self::default();
		}
		Self {
			patterns: rules.split(RULE_DELIMITER).map(str::to_string).collect(),
		}
	}

	/// Build a set from already-separated patterns.
	pub fn from_patterns(patterns: Vec<String>) -> Self {
		Self { patterns }
	}

	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	/// Compile every pattern, failing on the first invalid one.
	pub fn compile(&self) -> Result<Vec<Regex>> {
		self.patterns.iter().map(|p| compile_regex(p)).collect()
	}

	/// Evaluate every pattern against `url`.
	///
	/// All patterns are compiled before any is searched, so an invalid
	/// pattern yields no trace at all.
	pub fn evaluate(&self, url: &str) -> Result<MatchTrace> {
		let compiled = self.compile()?;

		let entries = self
			.patterns
			.iter()
			.zip(&compiled)
			.map(|(pattern, regex)| {
				let matched = regex.is_match(url).map_err(|source| Error::MatchFailed {
					pattern: pattern.clone(),
					source: Box::new(source),
				})?;
				Ok(RuleResult {
					pattern: pattern.clone(),
					matched,
				})
			})
			.collect::<Result<Vec<_>>>()?;

		let trace = MatchTrace::new(entries);
		tracing::debug!(
			url,
			rules = self.patterns.len(),
			any_matched = trace.any_matched(),
			"evaluated rule set"
		);
		Ok(trace)
	}
}

/// Outcome of a single pattern against a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
	/// The pattern exactly as supplied.
	pub pattern: String,

	/// Whether some substring of the URL matched the pattern.
	pub matched: bool,
}

/// Per-pattern results for one side, plus the aggregate flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTrace {
	entries: Vec<RuleResult>,
	any_matched: bool,
}

impl MatchTrace {
	fn new(entries: Vec<RuleResult>) -> Self {
		let any_matched = entries.iter().any(|e| e.matched);
		Self {
			entries,
			any_matched,
		}
	}

	pub fn entries(&self) -> &[RuleResult] {
		&self.entries
	}

	pub fn any_matched(&self) -> bool {
		self.any_matched
	}
}

/// Evaluate a `;`-joined rule string against `url`.
pub fn evaluate(url: &str, rules: &str) -> Result<MatchTrace> {
	if rules.is_empty() {
		return Ok(MatchTrace::default());
	}
	PatternSet::parse(rules).evaluate(url)
}

/// Compile a regex pattern string.
///
/// Look-around and backreferences are accepted, so rules written for
/// backtracking engines keep working.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| Error::InvalidRegex {
		pattern: pattern.to_string(),
		source: Box::new(source),
	})
}
